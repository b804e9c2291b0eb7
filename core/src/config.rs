// Config module - 配置模块
// 豁免标签集合与项目级配置文件加载

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Tag names that already count as text containers.
pub const DEFAULT_EXEMPT_TAGS: [&str; 2] = ["Text", "TextComponent"];

/// File names looked up in a project root, first match wins.
pub const CONFIG_FILE_NAMES: [&str; 2] = [".textguard.yml", ".textguard.yaml"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub exempt_tags: BTreeSet<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            exempt_tags: DEFAULT_EXEMPT_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ExtractorConfig {
    pub fn with_exempt_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exempt_tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_exempt(&self, tag: &str) -> bool {
        self.exempt_tags.contains(tag)
    }
}

/// Contents of `.textguard.yml`.
///
/// ```yaml
/// exempt_tags: [Text, TextComponent, Heading]
/// ignore_paths: [node_modules, dist/]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    #[serde(flatten)]
    pub extractor: ExtractorConfig,
    pub ignore_paths: Vec<String>,
}

impl ProjectConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Loads the project config from `root`, falling back to defaults when no
/// config file exists. A file that exists but does not parse is an error.
pub fn load_project_config<P: AsRef<Path>>(root: P) -> Result<ProjectConfig> {
    let root = root.as_ref();

    for name in CONFIG_FILE_NAMES {
        let path = root.join(name);
        if path.is_file() {
            let content = fs::read_to_string(&path)?;
            let config = ProjectConfig::from_yaml(&content)?;
            log::debug!(
                "Loaded {} ({} exempt tags)",
                path.display(),
                config.extractor.exempt_tags.len()
            );
            return Ok(config);
        }
    }

    Ok(ProjectConfig::default())
}
