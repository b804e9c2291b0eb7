// textguard core library
// 核心功能库，包含语法树解析、裸文本提取、诊断发布和目录扫描

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod scanner;

// 重新导出常用类型
pub use ast::{extract_all_naked_texts, LineIndex, NakedText, Position, Range, ScriptFlavor};
pub use config::{load_project_config, ExtractorConfig, ProjectConfig};
pub use diagnostics::{
    start_validating, Diagnostic, DiagnosticCollection, DiagnosticSink, Severity, TextDocument,
};
pub use scanner::manager::ScannerManager;
pub use scanner::naked_text::NakedTextScanner;
pub use scanner::{scan_directory, Finding, ScanReport, Scanner};

pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CoreError {
        #[error("Unsupported script flavor: {0}")]
        UnsupportedFlavor(String),

        #[error("Failed to load grammar: {0}")]
        Language(#[from] tree_sitter::LanguageError),

        #[error("Parse error: {0}")]
        Parse(String),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Config error: {0}")]
        Config(#[from] serde_yaml::Error),
    }

    pub type Result<T> = std::result::Result<T, CoreError>;
}
