use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tree_sitter::Language;

/// Grammar variant a document is parsed with.
///
/// `Json` and `Unknown` can be produced by the resolvers so a host can pass
/// along whatever it was handed, but neither has a grammar here: asking for
/// their language is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFlavor {
    Js,
    Jsx,
    Ts,
    Tsx,
    Json,
    Unknown,
}

impl ScriptFlavor {
    /// Maps an editor language identifier to a flavor.
    pub fn from_language_id(language_id: &str) -> Self {
        match language_id {
            "javascript" => ScriptFlavor::Js,
            "javascriptreact" => ScriptFlavor::Jsx,
            "typescript" => ScriptFlavor::Ts,
            "typescriptreact" => ScriptFlavor::Tsx,
            "json" => ScriptFlavor::Json,
            _ => ScriptFlavor::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "js" | "mjs" | "cjs" => ScriptFlavor::Js,
            "jsx" => ScriptFlavor::Jsx,
            "ts" | "mts" | "cts" => ScriptFlavor::Ts,
            "tsx" => ScriptFlavor::Tsx,
            "json" => ScriptFlavor::Json,
            _ => ScriptFlavor::Unknown,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            ScriptFlavor::Js | ScriptFlavor::Jsx | ScriptFlavor::Ts | ScriptFlavor::Tsx
        )
    }

    /// The tree-sitter grammar for this flavor.
    ///
    /// The JavaScript grammar parses JSX natively, so `Js` and `Jsx` share it.
    /// Plain TypeScript uses the grammar without JSX, matching how `.ts` files
    /// treat `<T>` as a type assertion.
    pub fn language(&self) -> Result<Language> {
        match self {
            ScriptFlavor::Js | ScriptFlavor::Jsx => Ok(tree_sitter_javascript::LANGUAGE.into()),
            ScriptFlavor::Ts => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            ScriptFlavor::Tsx => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
            ScriptFlavor::Json | ScriptFlavor::Unknown => {
                Err(CoreError::UnsupportedFlavor(self.to_string()))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptFlavor::Js => "js",
            ScriptFlavor::Jsx => "jsx",
            ScriptFlavor::Ts => "ts",
            ScriptFlavor::Tsx => "tsx",
            ScriptFlavor::Json => "json",
            ScriptFlavor::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ScriptFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptFlavor {
    type Err = CoreError;

    /// Accepts flavor names (`tsx`) as well as editor language ids
    /// (`typescriptreact`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        let flavor = match normalized.as_str() {
            "js" => ScriptFlavor::Js,
            "jsx" => ScriptFlavor::Jsx,
            "ts" => ScriptFlavor::Ts,
            "tsx" => ScriptFlavor::Tsx,
            "json" => ScriptFlavor::Json,
            other => ScriptFlavor::from_language_id(other),
        };

        if flavor == ScriptFlavor::Unknown {
            return Err(CoreError::UnsupportedFlavor(s.to_string()));
        }
        Ok(flavor)
    }
}
