use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::tempdir;
use textguard_core::Finding;

const UPLOAD_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Serialize, Deserialize)]
pub struct ScanRequest {
    pub project_path: String,
}

#[derive(Serialize, Deserialize)]
pub struct ScanResult {
    pub findings: Vec<Finding>,
    pub files_scanned: usize,
    pub scan_time: String,
    pub scanned_at: String,
}

pub fn configure_scanner_routes(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/scan", web::post().to(run_scan))
        .route("/upload", web::post().to(upload_and_scan));
}

async fn scan(project_path: &str) -> Result<ScanResult, String> {
    let start = std::time::Instant::now();

    let report = textguard_core::scan_directory(project_path)
        .await
        .map_err(|e| format!("Scan failed: {}", e))?;

    tracing::info!(
        "Scanned {} files under {}, {} findings",
        report.files_scanned,
        project_path,
        report.findings.len()
    );

    Ok(ScanResult {
        findings: report.findings,
        files_scanned: report.files_scanned,
        scan_time: format!("{:?}", start.elapsed()),
        scanned_at: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn run_scan(req: web::Json<ScanRequest>) -> impl Responder {
    if !Path::new(&req.project_path).is_dir() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Path '{}' is not a directory", req.project_path)
        }));
    }

    match scan(&req.project_path).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e })),
    }
}

/// Keeps the upload's relative path but drops root, prefix, `.` and `..`
/// components so nothing lands outside the temporary directory.
fn sanitize_upload_path(filename: &str) -> Option<PathBuf> {
    let relative: PathBuf = Path::new(filename)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}

pub async fn upload_and_scan(mut payload: Multipart) -> impl Responder {
    // 创建临时目录
    let temp_dir = match tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to create temp dir: {}", e)
            }));
        }
    };
    let project_path = temp_dir.path().to_string_lossy().to_string();
    let mut uploaded: HashSet<PathBuf> = HashSet::new();

    // 处理上传的文件
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Malformed upload: {}", e)
                }));
            }
        };

        let relative = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .and_then(sanitize_upload_path);
        let Some(relative) = relative else {
            continue;
        };
        if !uploaded.insert(relative.clone()) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Duplicate upload path: {}", relative.display())
            }));
        }

        let data = match field.bytes(UPLOAD_LIMIT).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Failed to read field: {}", e)
                }));
            }
            Err(_) => {
                return HttpResponse::PayloadTooLarge().json(serde_json::json!({
                    "error": "File size limit exceeded"
                }));
            }
        };

        // 保存文件
        let file_path = temp_dir.path().join(&relative);
        let written = file_path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|_| std::fs::File::create(&file_path))
            .and_then(|mut file| file.write_all(&data));
        if let Err(e) = written {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to write {}: {}", relative.display(), e)
            }));
        }
    }

    // 运行扫描
    match scan(&project_path).await {
        Ok(mut result) => {
            // Report paths relative to the upload, not the temp dir.
            for finding in &mut result.findings {
                if let Ok(relative) = Path::new(&finding.file_path).strip_prefix(temp_dir.path()) {
                    finding.file_path = relative.to_string_lossy().to_string();
                }
            }
            HttpResponse::Ok().json(result)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e })),
    }
}
