use super::{Finding, Scanner};
use crate::ast::{extract_all_naked_texts, ScriptFlavor};
use crate::config::ExtractorConfig;
use crate::diagnostics::reporter::naked_text_message;
use crate::diagnostics::Severity;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub struct NakedTextScanner {
    config: Arc<ExtractorConfig>,
}

impl NakedTextScanner {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[async_trait]
impl Scanner for NakedTextScanner {
    fn name(&self) -> String {
        "NakedTextScanner".to_string()
    }

    async fn scan_file(&self, path: &PathBuf, content: &str) -> Vec<Finding> {
        let flavor = ScriptFlavor::from_path(path);
        if !flavor.is_supported() {
            return Vec::new();
        }

        // Parsing is CPU bound; keep it off the async workers.
        let config = Arc::clone(&self.config);
        let source = content.to_string();
        let extracted =
            tokio::task::spawn_blocking(move || extract_all_naked_texts(&source, flavor, &config))
                .await;

        let naked_texts = match extracted {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                log::error!("Failed to scan {}: {}", path.display(), e);
                return Vec::new();
            }
            Err(e) => {
                log::error!("Scan task for {} failed: {}", path.display(), e);
                return Vec::new();
            }
        };
        log::debug!("{}: {} naked text fragments", path.display(), naked_texts.len());

        naked_texts
            .into_iter()
            .map(|naked| Finding {
                finding_id: Uuid::new_v4().to_string(),
                file_path: path.to_string_lossy().to_string(),
                range: naked.range,
                detector: self.name(),
                severity: Severity::Warning,
                message: naked_text_message(&naked.text),
                text: naked.text,
            })
            .collect()
    }
}
