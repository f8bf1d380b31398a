//! HTTP route handlers and the helpers they share.
//!
//! Handlers under `/api/me`, `/api/best-score` and `/api/emotions` run
//! behind [`AuthLayer`](crate::middleware::AuthLayer) and read the
//! [`VerifiedPrincipal`] from request extensions.

pub mod best_score;
pub mod emotions;
pub mod health;
pub mod me;

use crate::domain::error::{ApiError, ApiResult, Issue};
use crate::middleware::metrics::GatewayMetrics;
use crate::ports::outbound::KvStore;
use axum::extract::rejection::StringRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use spok_01_init_data::VerifiedPrincipal;
use std::collections::HashMap;
use std::sync::Arc;

/// Prefix every storage user id carries
pub const USER_ID_PREFIX: &str = "tg_";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    pub metrics: Arc<GatewayMetrics>,
}

/// Parse a request body as JSON.
///
/// A body over the size limit is `payload_too_large`. Non-UTF-8, empty or
/// malformed bodies are payload issues.
pub(crate) fn parse_json_body(body: Result<String, StringRejection>) -> ApiResult<Value> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!("Request body exceeds size limit");
            ApiError::payload_too_large()
        } else {
            ApiError::invalid_payload(vec![Issue::new("", rejection.body_text())])
        }
    })?;
    serde_json::from_str(&body).map_err(|e| {
        ApiError::invalid_payload(vec![Issue::new("", format!("body must be JSON: {e}"))])
    })
}

/// Trimmed, non-empty query parameter
pub(crate) fn query_param<'a>(query: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    query
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Check the `tg_<...>` shape, recording an issue on failure
pub(crate) fn check_user_id(value: &str, issues: &mut Vec<Issue>) {
    let valid = value
        .strip_prefix(USER_ID_PREFIX)
        .is_some_and(|rest| !rest.is_empty());
    if !valid {
        issues.push(Issue::new("user_id", "user_id must start with tg_"));
    }
}

/// The request may only touch the verified principal's own records
pub(crate) fn ensure_owner(principal: &VerifiedPrincipal, user_id: &str) -> ApiResult<()> {
    if principal.user.storage_id() == user_id {
        Ok(())
    } else {
        tracing::warn!(
            principal = principal.user_id(),
            requested = user_id,
            "Request names another user"
        );
        Err(ApiError::user_mismatch())
    }
}

/// `YYYY-MM-DD` by shape only
pub(crate) fn is_date_key(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Mark a response as uncacheable
pub(crate) fn no_store(response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// Method fallback for known paths
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Router fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Metrics snapshot
pub async fn metrics(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<Value> {
    axum::Json(state.metrics.to_json())
}
