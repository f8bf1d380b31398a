use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Service name reported by the health probe
pub const SERVICE_NAME: &str = "spokspace-backend";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub ts: String,
}

/// Liveness probe. Needs no authentication.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME,
        ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
