//! Best score per user. Stored values only ever go up.

use super::{check_user_id, ensure_owner, no_store, parse_json_body, query_param, AppState};
use crate::domain::error::{ApiError, ApiResult, Issue};
use axum::extract::rejection::StringRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::{json, Value};
use spok_01_init_data::VerifiedPrincipal;
use std::collections::HashMap;
use tracing::debug;

/// Largest magnitude emitted as a JSON integer
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Serialize)]
pub struct BestScoreView {
    pub user_id: String,
    pub best_score: Value,
}

#[derive(Debug, Serialize)]
pub struct BestScoreUpdated {
    pub ok: bool,
    pub user_id: String,
    pub best_score: Value,
}

pub fn best_key(user_id: &str) -> String {
    format!("best:{user_id}")
}

/// Read a stored score. Anything unreadable counts as zero.
pub fn stored_score(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|s| s.is_finite()).unwrap_or(0.0)
}

/// Whole scores serialize as integers
pub fn score_json(score: f64) -> Value {
    if score.fract() == 0.0 && score.abs() <= MAX_EXACT_INTEGER {
        json!(score as i64)
    } else {
        json!(score)
    }
}

/// `GET /api/best-score?user_id=tg_<id>`
pub async fn get_best_score(
    State(state): State<AppState>,
    Extension(principal): Extension<VerifiedPrincipal>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let user_id = match query_param(&query, "user_id") {
        Some(requested) => {
            let mut issues = Vec::new();
            check_user_id(requested, &mut issues);
            if !issues.is_empty() {
                return Err(ApiError::invalid_query(issues));
            }
            requested.to_string()
        }
        None => principal.user.storage_id(),
    };
    ensure_owner(&principal, &user_id)?;

    let current = state.store.get(&best_key(&user_id)).await?;
    let best_score = score_json(stored_score(current.as_ref()));

    Ok(no_store(Json(BestScoreView {
        user_id,
        best_score,
    })))
}

/// `POST /api/best-score {user_id, score}`
pub async fn post_best_score(
    State(state): State<AppState>,
    Extension(principal): Extension<VerifiedPrincipal>,
    body: Result<String, StringRejection>,
) -> ApiResult<Json<BestScoreUpdated>> {
    let (user_id, score) = parse_payload(&parse_json_body(body)?)?;
    ensure_owner(&principal, &user_id)?;

    let key = best_key(&user_id);
    let current = stored_score(state.store.get(&key).await?.as_ref());
    let best = current.max(score);
    let best_score = score_json(best);
    state.store.set(&key, best_score.clone()).await?;

    debug!(user_id = %user_id, score, best, "Best score submitted");
    Ok(Json(BestScoreUpdated {
        ok: true,
        user_id,
        best_score,
    }))
}

fn parse_payload(body: &Value) -> ApiResult<(String, f64)> {
    let mut issues = Vec::new();

    let user_id = match body.get("user_id") {
        Some(Value::String(s)) => {
            check_user_id(s, &mut issues);
            Some(s.clone())
        }
        _ => {
            issues.push(Issue::new("user_id", "user_id must be a string"));
            None
        }
    };

    let score = match body.get("score").and_then(Value::as_f64) {
        Some(s) if s.is_finite() && s >= 0.0 => Some(s),
        Some(_) => {
            issues.push(Issue::new("score", "score must be >= 0"));
            None
        }
        None => {
            issues.push(Issue::new("score", "score must be a number"));
            None
        }
    };

    match (user_id, score) {
        (Some(user_id), Some(score)) if issues.is_empty() => Ok((user_id, score)),
        _ => Err(ApiError::invalid_payload(issues)),
    }
}
