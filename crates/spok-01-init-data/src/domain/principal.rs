//! # Principal Extractor
//!
//! Parses the JSON `user` field and requires a numeric, non-zero `id`.

use crate::domain::entities::WebAppUser;
use crate::domain::errors::InitDataError;
use serde_json::Value;

/// Parse the `user` field into a [`WebAppUser`].
///
/// An empty field is treated as absent. Display attributes of the wrong
/// JSON type are dropped rather than rejected.
pub fn extract_user(raw: Option<&str>) -> Result<WebAppUser, InitDataError> {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return Err(InitDataError::MissingUser),
    };

    let value: Value = serde_json::from_str(raw).map_err(|_| InitDataError::InvalidUserJson)?;
    let object = value.as_object().ok_or(InitDataError::MissingUserId)?;

    let id = object
        .get("id")
        .and_then(Value::as_i64)
        .filter(|id| *id != 0)
        .ok_or(InitDataError::MissingUserId)?;

    let text = |field: &str| object.get(field).and_then(Value::as_str).map(str::to_owned);

    Ok(WebAppUser {
        id,
        first_name: text("first_name"),
        last_name: text("last_name"),
        username: text("username"),
        language_code: text("language_code"),
        is_premium: object.get("is_premium").and_then(Value::as_bool),
    })
}
