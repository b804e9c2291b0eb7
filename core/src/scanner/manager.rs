use super::{is_supported_file, Finding, ScanReport, Scanner};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct ScannerManager {
    scanners: Vec<Arc<dyn Scanner>>,
    ignore_paths: Vec<String>,
}

impl ScannerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path substrings to skip during directory scans.
    pub fn with_ignore_paths(mut self, ignore_paths: Vec<String>) -> Self {
        self.ignore_paths = ignore_paths;
        self
    }

    pub fn register_scanner<S: Scanner + 'static>(&mut self, scanner: S) {
        self.scanners.push(Arc::new(scanner));
    }

    pub fn scanner_names(&self) -> Vec<String> {
        self.scanners.iter().map(|s| s.name()).collect()
    }

    pub async fn scan_file(&self, path: &PathBuf, content: &str) -> Vec<Finding> {
        let mut all_findings = Vec::new();
        for scanner in &self.scanners {
            let findings = scanner.scan_file(path, content).await;
            all_findings.extend(findings);
        }
        all_findings
    }

    /// Scans every supported file below `root_path`, honouring `.gitignore`.
    /// Files are scanned concurrently; findings are ordered by path and then
    /// by position.
    pub async fn scan_directory(&self, root_path: &str) -> ScanReport {
        let walker = ignore::WalkBuilder::new(root_path).build();
        let mut set = tokio::task::JoinSet::new();
        let mut files_scanned = 0;

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().map_or(false, |ft| ft.is_file()) {
                continue;
            }
            let path = entry.path().to_path_buf();
            let relative = path.strip_prefix(root_path).unwrap_or(path.as_path());
            if !is_supported_file(&path) || self.is_ignored(relative) {
                continue;
            }

            files_scanned += 1;
            let manager = self.clone();
            set.spawn(async move {
                match tokio::fs::read_to_string(&path).await {
                    Ok(content) => manager.scan_file(&path, &content).await,
                    Err(e) => {
                        log::warn!("Failed to read {}: {}", path.display(), e);
                        Vec::new()
                    }
                }
            });
        }

        let mut all_findings = Vec::new();
        while let Some(res) = set.join_next().await {
            match res {
                Ok(findings) => all_findings.extend(findings),
                Err(e) => log::error!("Scan task failed: {}", e),
            }
        }

        all_findings.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then(a.range.start.cmp(&b.range.start))
        });

        ScanReport {
            files_scanned,
            findings: all_findings,
        }
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.ignore_paths
            .iter()
            .any(|pattern| !pattern.is_empty() && path.contains(pattern.as_str()))
    }
}
