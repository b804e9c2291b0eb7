// Scanner module - 扫描器模块
// 定义扫描器的核心接口和类型

pub mod manager;
pub mod naked_text;

use crate::ast::Range;
use crate::config::load_project_config;
use crate::diagnostics::Severity;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 扫描发现结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub finding_id: String,
    pub file_path: String,
    pub range: Range,
    pub detector: String,
    pub severity: Severity,
    pub message: String,
    pub text: String,
}

/// 目录扫描结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub files_scanned: usize,
    pub findings: Vec<Finding>,
}

/// 扫描器 trait - 所有扫描器都需要实现此接口
#[async_trait]
pub trait Scanner: Send + Sync {
    /// 返回扫描器名称
    fn name(&self) -> String;

    /// 扫描单个文件
    async fn scan_file(&self, path: &PathBuf, content: &str) -> Vec<Finding>;
}

/// 便捷的 scan_directory 函数（用于web-backend）
///
/// Reads `.textguard.yml` from `path` when present, then scans every
/// supported file under it.
pub async fn scan_directory(path: &str) -> Result<ScanReport> {
    let project = load_project_config(path)?;

    let mut manager = manager::ScannerManager::new().with_ignore_paths(project.ignore_paths);
    manager.register_scanner(naked_text::NakedTextScanner::new(project.extractor));

    Ok(manager.scan_directory(path).await)
}

pub fn is_supported_file(path: &Path) -> bool {
    crate::ast::ScriptFlavor::from_path(path).is_supported()
}
