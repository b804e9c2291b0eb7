// Diagnostics module - 诊断模块
// 诊断记录、发布接口以及内存中的诊断集合

pub mod reporter;

use crate::ast::Range;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use reporter::{start_validating, TextDocument};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(range: Range, message: String, severity: Severity) -> Self {
        Self {
            range,
            message,
            severity,
        }
    }
}

/// Where published diagnostics go, keyed by document identity.
///
/// `set` replaces whatever was stored for `uri`; it never merges.
pub trait DiagnosticSink {
    fn set(&mut self, uri: &str, diagnostics: Vec<Diagnostic>);
}

/// In-memory sink, one list per document.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticCollection {
    entries: HashMap<String, Vec<Diagnostic>>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uri: &str) -> Option<&[Diagnostic]> {
        self.entries.get(uri).map(Vec::as_slice)
    }

    /// Drops the entry for a closed document.
    pub fn delete(&mut self, uri: &str) -> Option<Vec<Diagnostic>> {
        self.entries.remove(uri)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Diagnostic])> {
        self.entries
            .iter()
            .map(|(uri, diagnostics)| (uri.as_str(), diagnostics.as_slice()))
    }
}

impl DiagnosticSink for DiagnosticCollection {
    fn set(&mut self, uri: &str, diagnostics: Vec<Diagnostic>) {
        self.entries.insert(uri.to_string(), diagnostics);
    }
}
