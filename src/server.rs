use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{routing::post, Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::interface::ScannerService;

#[derive(Deserialize)]
pub struct ScanRequest {
    /// Scan configuration document (fields + treeRulesPrompt), as a JSON
    /// string. Empty means defaults.
    #[serde(default)]
    pub config: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellRequest {
    pub form_id: String,
}

fn json_body(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

pub fn router(service: Arc<ScannerService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST])
        .allow_headers(Any);

    let scan_service = Arc::clone(&service);
    let tome_service = Arc::clone(&service);
    let spell_service = service;

    Router::new()
        .route(
            "/v1/scan",
            post(move |Json(req): Json<ScanRequest>| {
                let service = Arc::clone(&scan_service);
                async move {
                    // The scan is synchronous; run it off the async worker.
                    let started = std::time::Instant::now();
                    let body = tokio::task::spawn_blocking(move || service.scan_all(&req.config))
                        .await
                        .map_err(join_error)?;
                    info!(ms = started.elapsed().as_secs_f64() * 1000.0, "scan complete");
                    Ok::<_, (StatusCode, &'static str)>(json_body(body))
                }
            }),
        )
        .route(
            "/v1/scan/tomes",
            post(move |Json(req): Json<ScanRequest>| {
                let service = Arc::clone(&tome_service);
                async move {
                    let started = std::time::Instant::now();
                    let body = tokio::task::spawn_blocking(move || service.scan_tomes(&req.config))
                        .await
                        .map_err(join_error)?;
                    info!(ms = started.elapsed().as_secs_f64() * 1000.0, "tome scan complete");
                    Ok::<_, (StatusCode, &'static str)>(json_body(body))
                }
            }),
        )
        .route(
            "/v1/spell",
            post(move |Json(req): Json<SpellRequest>| {
                let service = Arc::clone(&spell_service);
                async move {
                    let form_id = req.form_id.clone();
                    let body =
                        tokio::task::spawn_blocking(move || service.spell_info(&req.form_id))
                            .await
                            .map_err(join_error)?;
                    if body.is_empty() {
                        // Unknown id, wrong kind or malformed input all
                        // surface as an empty result.
                        warn!(%form_id, "spell lookup returned nothing");
                        return Err((StatusCode::NOT_FOUND, "no such spell"));
                    }
                    Ok::<_, (StatusCode, &'static str)>(json_body(body))
                }
            }),
        )
        .layer(cors)
}

fn join_error(e: tokio::task::JoinError) -> (StatusCode, &'static str) {
    warn!(error = %e, "join error");
    (StatusCode::INTERNAL_SERVER_ERROR, "join error")
}
