use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

pub const SERVICE_NAME: &str = "soccer-session-planner-api";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
}

/// `GET /` and `GET /health`.
pub fn health_router(media_mount: &str) -> Router<()> {
    let index = json!({
        "message": "Soccer Session Planner API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "media": format!("{}/{{bucket}}/{{*path}}", media_mount),
        },
    });

    Router::new()
        .route("/", get(move || async move { Json(index) }))
        .route("/health", get(health))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        service: SERVICE_NAME,
    })
}
