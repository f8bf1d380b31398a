//! # Freshness Gate
//!
//! Rejects payloads older than the allowed window. Timestamps in the future
//! are accepted: there is no upper bound on clock skew.

use crate::domain::errors::InitDataError;

/// Parse the `auth_date` field as integer seconds since the epoch.
pub fn parse_auth_date(raw: Option<&str>) -> Result<i64, InitDataError> {
    raw.and_then(|s| s.parse::<i64>().ok())
        .ok_or(InitDataError::InvalidAuthDate)
}

/// Check that `now - auth_date` does not exceed `max_age_secs`.
pub fn check_freshness(auth_date: i64, now: i64, max_age_secs: i64) -> Result<(), InitDataError> {
    if now.saturating_sub(auth_date) > max_age_secs {
        return Err(InitDataError::AuthDateExpired);
    }
    Ok(())
}
