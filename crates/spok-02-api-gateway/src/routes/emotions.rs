//! Daily mood entries.
//!
//! One record per user and day under `emo:<user_id>:<date_key>`, plus an
//! index set `emo_idx:<user_id>` of every date key written.

use super::{
    check_user_id, ensure_owner, is_date_key, no_store, parse_json_body, query_param, AppState,
};
use crate::domain::error::{ApiError, ApiResult, Issue};
use axum::extract::rejection::StringRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::{Extension, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spok_01_init_data::VerifiedPrincipal;
use std::collections::HashMap;
use tracing::debug;

/// Epoch values below this are seconds, at or above it milliseconds
const MILLIS_THRESHOLD: f64 = 1_000_000_000_000.0;

const DATE_KEY_MESSAGE: &str = "must be YYYY-MM-DD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionRecord {
    pub user_id: String,
    pub date_key: String,
    pub emotion: String,
    /// RFC 3339, millisecond precision, UTC
    pub created_at: String,
    pub platform: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmotionsView {
    pub user_id: String,
    pub records: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct EmotionSaved {
    pub ok: bool,
    pub record: EmotionRecord,
}

pub fn record_key(user_id: &str, date_key: &str) -> String {
    format!("emo:{user_id}:{date_key}")
}

pub fn index_key(user_id: &str) -> String {
    format!("emo_idx:{user_id}")
}

/// `GET /api/emotions?user_id=tg_<id>&from=YYYY-MM-DD&to=YYYY-MM-DD`
pub async fn get_emotions(
    State(state): State<AppState>,
    Extension(principal): Extension<VerifiedPrincipal>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let mut issues = Vec::new();

    let user_id = match query_param(&query, "user_id") {
        Some(requested) => {
            check_user_id(requested, &mut issues);
            requested.to_string()
        }
        None => principal.user.storage_id(),
    };
    let from = date_param(&query, "from", &mut issues);
    let to = date_param(&query, "to", &mut issues);

    let (from, to) = match (from, to) {
        (Some(from), Some(to)) if issues.is_empty() => (from, to),
        _ => return Err(ApiError::invalid_query(issues)),
    };
    if from > to {
        return Err(ApiError::invalid_range());
    }
    ensure_owner(&principal, &user_id)?;

    let mut date_keys: Vec<String> = state
        .store
        .smembers(&index_key(&user_id))
        .await?
        .into_iter()
        .filter(|d| d.as_str() >= from && d.as_str() <= to)
        .collect();
    date_keys.sort();

    let records = if date_keys.is_empty() {
        Vec::new()
    } else {
        let keys: Vec<String> = date_keys.iter().map(|d| record_key(&user_id, d)).collect();
        state
            .store
            .mget(&keys)
            .await?
            .into_iter()
            .filter_map(|v| v.and_then(stored_record))
            .collect()
    };

    Ok(no_store(Json(EmotionsView { user_id, records })))
}

/// `POST /api/emotions {user_id, date_key, emotion, created_at?, platform?}`
pub async fn post_emotion(
    State(state): State<AppState>,
    Extension(principal): Extension<VerifiedPrincipal>,
    body: Result<String, StringRejection>,
) -> ApiResult<Json<EmotionSaved>> {
    let record = parse_payload(&parse_json_body(body)?, Utc::now())?;
    ensure_owner(&principal, &record.user_id)?;

    let value = serde_json::to_value(&record).map_err(|e| {
        tracing::error!(error = %e, "Failed to encode emotion record");
        ApiError::storage_error()
    })?;
    state
        .store
        .set(&record_key(&record.user_id, &record.date_key), value)
        .await?;
    state
        .store
        .sadd(&index_key(&record.user_id), &record.date_key)
        .await?;

    debug!(user_id = %record.user_id, date_key = %record.date_key, "Emotion saved");
    Ok(Json(EmotionSaved { ok: true, record }))
}

fn date_param<'a>(
    query: &'a HashMap<String, String>,
    name: &str,
    issues: &mut Vec<Issue>,
) -> Option<&'a str> {
    match query_param(query, name) {
        Some(value) if is_date_key(value) => Some(value),
        _ => {
            issues.push(Issue::new(name, format!("{name} {DATE_KEY_MESSAGE}")));
            None
        }
    }
}

fn parse_payload(body: &Value, now: DateTime<Utc>) -> ApiResult<EmotionRecord> {
    let mut issues = Vec::new();

    let user_id = match body.get("user_id") {
        Some(Value::String(s)) => {
            check_user_id(s, &mut issues);
            s.clone()
        }
        _ => {
            issues.push(Issue::new("user_id", "user_id must be a string"));
            String::new()
        }
    };

    let date_key = match body.get("date_key") {
        Some(Value::String(s)) if is_date_key(s) => s.clone(),
        _ => {
            issues.push(Issue::new("date_key", format!("date_key {DATE_KEY_MESSAGE}")));
            String::new()
        }
    };

    let emotion = match body.get("emotion") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => {
            issues.push(Issue::new("emotion", "emotion must be non-empty"));
            String::new()
        }
    };

    let created_at = match body.get("created_at") {
        None => None,
        Some(v) if v.is_string() || v.is_number() => parse_created_at(v),
        Some(_) => {
            issues.push(Issue::new("created_at", "created_at must be a string or number"));
            None
        }
    };

    let platform = match body.get("platform") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            issues.push(Issue::new("platform", "platform must be a string"));
            None
        }
    };

    if !issues.is_empty() {
        return Err(ApiError::invalid_payload(issues));
    }

    Ok(EmotionRecord {
        user_id,
        date_key,
        emotion,
        created_at: created_at
            .unwrap_or(now)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        platform,
    })
}

/// Epoch seconds or milliseconds (number or numeric string), or an RFC 3339
/// string. Unparseable input yields `None`.
pub fn parse_created_at(value: &Value) -> Option<DateTime<Utc>> {
    let epoch = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<f64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    return DateTime::parse_from_rfc3339(trimmed)
                        .ok()
                        .map(|dt| dt.with_timezone(&Utc));
                }
            }
        }
        _ => None,
    }?;

    if !epoch.is_finite() {
        return None;
    }
    let millis = if epoch < MILLIS_THRESHOLD {
        epoch * 1000.0
    } else {
        epoch
    };
    DateTime::from_timestamp_millis(millis as i64)
}

/// Stored records come back as objects, or as JSON text from older writers
fn stored_record(value: Value) -> Option<Value> {
    match value {
        Value::Object(_) => Some(value),
        Value::String(text) => serde_json::from_str::<Value>(&text)
            .ok()
            .filter(Value::is_object),
        _ => None,
    }
}
