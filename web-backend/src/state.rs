use std::sync::Arc;
use textguard_core::{load_project_config, DiagnosticCollection, ExtractorConfig};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    /// Published diagnostics per document uri. Holding the lock for the whole
    /// validation keeps scans of one document in order.
    pub diagnostics: Arc<Mutex<DiagnosticCollection>>,
    pub config: Arc<ExtractorConfig>,
}

impl AppState {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            diagnostics: Arc::new(Mutex::new(DiagnosticCollection::new())),
            config: Arc::new(config),
        }
    }

    /// Reads `.textguard.yml` from `TEXTGUARD_CONFIG_DIR`, or the working
    /// directory when unset.
    pub fn from_env() -> anyhow::Result<Self> {
        let config_dir = match std::env::var("TEXTGUARD_CONFIG_DIR") {
            Ok(dir) => std::path::PathBuf::from(dir),
            Err(_) => std::env::current_dir()?,
        };

        let project = load_project_config(&config_dir)
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", config_dir.display(), e))?;

        tracing::info!(
            "Exempt tags: {:?}",
            project.extractor.exempt_tags.iter().collect::<Vec<_>>()
        );
        Ok(Self::new(project.extractor))
    }
}
