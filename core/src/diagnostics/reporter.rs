use super::{Diagnostic, DiagnosticSink, Severity};
use crate::ast::{extract_all_naked_texts, ScriptFlavor};
use crate::config::ExtractorConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A document as handed over by the host for one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDocument {
    pub uri: String,
    pub text: String,
}

impl TextDocument {
    pub fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            text: text.into(),
        }
    }
}

pub fn naked_text_message(text: &str) -> String {
    format!(
        "Text string \"{}\" must be rendered within a <Text> component",
        text
    )
}

/// Scans `document` and publishes its diagnostics to `sink`, replacing the
/// previous set for the same uri. An empty scan publishes an empty list so
/// stale warnings disappear.
pub fn start_validating<S: DiagnosticSink + ?Sized>(
    document: &TextDocument,
    flavor: ScriptFlavor,
    sink: &mut S,
    config: &ExtractorConfig,
) -> Result<()> {
    let naked_texts = extract_all_naked_texts(&document.text, flavor, config)?;

    let diagnostics: Vec<Diagnostic> = naked_texts
        .into_iter()
        .map(|naked| {
            Diagnostic::new(
                naked.range,
                naked_text_message(&naked.text),
                Severity::Warning,
            )
        })
        .collect();

    log::debug!(
        "Publishing {} diagnostics for {}",
        diagnostics.len(),
        document.uri
    );
    sink.set(&document.uri, diagnostics);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCollection;
    use crate::error::CoreError;

    const URI: &str = "file:///src/App.jsx";

    #[test]
    fn publishes_one_warning_per_naked_text() {
        let mut sink = DiagnosticCollection::new();
        let document = TextDocument::new(URI, "const a = <View>Hi<Row>there</Row></View>;");

        start_validating(&document, ScriptFlavor::Jsx, &mut sink, &ExtractorConfig::default())
            .unwrap();

        let published = sink.get(URI).unwrap();
        assert_eq!(published.len(), 2);
        assert_eq!(
            published[0].message,
            "Text string \"Hi\" must be rendered within a <Text> component"
        );
        assert!(published.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn rescan_without_findings_clears_previous_diagnostics() {
        let mut sink = DiagnosticCollection::new();
        let config = ExtractorConfig::default();

        let dirty = TextDocument::new(URI, "const a = <View>One<Row>Two</Row></View>;");
        start_validating(&dirty, ScriptFlavor::Jsx, &mut sink, &config).unwrap();
        assert_eq!(sink.get(URI).unwrap().len(), 2);

        let fixed = TextDocument::new(URI, "const a = <View><Text>One</Text></View>;");
        start_validating(&fixed, ScriptFlavor::Jsx, &mut sink, &config).unwrap();
        assert_eq!(sink.get(URI), Some(&[][..]));
    }

    #[test]
    fn documents_are_published_independently() {
        let mut sink = DiagnosticCollection::new();
        let config = ExtractorConfig::default();

        let a = TextDocument::new("a", "const a = <View>A</View>;");
        let b = TextDocument::new("b", "const b = <Text>B</Text>;");
        start_validating(&a, ScriptFlavor::Jsx, &mut sink, &config).unwrap();
        start_validating(&b, ScriptFlavor::Jsx, &mut sink, &config).unwrap();

        assert_eq!(sink.get("a").unwrap().len(), 1);
        assert!(sink.get("b").unwrap().is_empty());
    }

    #[test]
    fn unsupported_flavor_propagates_and_publishes_nothing() {
        let mut sink = DiagnosticCollection::new();
        let document = TextDocument::new(URI, "{}");

        let result = start_validating(
            &document,
            ScriptFlavor::Unknown,
            &mut sink,
            &ExtractorConfig::default(),
        );
        assert!(matches!(result, Err(CoreError::UnsupportedFlavor(_))));
        assert!(sink.get(URI).is_none());
    }
}
