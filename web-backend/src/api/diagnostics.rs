use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use textguard_core::{start_validating, Diagnostic, ScriptFlavor, TextDocument};

use crate::state::AppState;

#[derive(Serialize, Deserialize)]
pub struct ValidateRequest {
    pub uri: String,
    pub text: String,
    #[serde(default)]
    pub language_id: Option<String>,
    #[serde(default)]
    pub flavor: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct UriQuery {
    pub uri: String,
}

#[derive(Serialize, Deserialize)]
pub struct DiagnosticsResponse {
    pub uri: String,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn configure_diagnostics_routes(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/validate", web::post().to(validate_document))
        .route("", web::get().to(get_diagnostics))
        .route("", web::delete().to(delete_diagnostics));
}

/// Explicit flavor first, then the editor language id, then the uri's
/// extension.
fn resolve_flavor(req: &ValidateRequest) -> Result<ScriptFlavor, String> {
    if let Some(flavor) = &req.flavor {
        return flavor.parse::<ScriptFlavor>().map_err(|e| e.to_string());
    }
    if let Some(language_id) = &req.language_id {
        return Ok(ScriptFlavor::from_language_id(language_id));
    }
    Ok(ScriptFlavor::from_path(Path::new(&req.uri)))
}

pub async fn validate_document(
    state: web::Data<AppState>,
    req: web::Json<ValidateRequest>,
) -> impl Responder {
    let req = req.into_inner();

    let flavor = match resolve_flavor(&req) {
        Ok(flavor) => flavor,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e }));
        }
    };

    let document = TextDocument::new(req.uri, req.text);
    let mut collection = state.diagnostics.lock().await;

    if let Err(e) = start_validating(&document, flavor, &mut *collection, &state.config) {
        tracing::warn!("Rejected {}: {}", document.uri, e);
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        }));
    }

    let diagnostics = collection
        .get(&document.uri)
        .map(<[Diagnostic]>::to_vec)
        .unwrap_or_default();
    tracing::debug!("{} diagnostics for {}", diagnostics.len(), document.uri);

    HttpResponse::Ok().json(DiagnosticsResponse {
        uri: document.uri,
        diagnostics,
    })
}

pub async fn get_diagnostics(
    state: web::Data<AppState>,
    query: web::Query<UriQuery>,
) -> impl Responder {
    let collection = state.diagnostics.lock().await;

    match collection.get(&query.uri) {
        Some(diagnostics) => HttpResponse::Ok().json(DiagnosticsResponse {
            uri: query.uri.clone(),
            diagnostics: diagnostics.to_vec(),
        }),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("No diagnostics published for '{}'", query.uri)
        })),
    }
}

/// Called when the host closes a document.
pub async fn delete_diagnostics(
    state: web::Data<AppState>,
    query: web::Query<UriQuery>,
) -> impl Responder {
    let removed = state.diagnostics.lock().await.delete(&query.uri);

    HttpResponse::Ok().json(serde_json::json!({
        "uri": query.uri,
        "removed": removed.is_some()
    }))
}
