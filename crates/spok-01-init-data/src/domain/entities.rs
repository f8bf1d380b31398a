//! # Domain Entities
//!
//! Credential, principal and outcome types for init data verification.

use crate::domain::errors::InitDataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// Maximum payload age accepted by default (24 hours).
pub const DEFAULT_MAX_AGE_SECS: i64 = 60 * 60 * 24;

/// Application credential issued by the host platform (the bot token).
///
/// Only ever used as HMAC key material. `Debug` is redacted and the
/// backing memory is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
    /// Wrap a configured credential.
    ///
    /// # Errors
    /// * `InitDataError::MissingCredential` - the token is empty or blank
    pub fn new(token: impl Into<String>) -> Result<Self, InitDataError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(InitDataError::MissingCredential);
        }
        Ok(Self(token))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(<redacted>)")
    }
}

impl Drop for BotToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// User record embedded in the `user` field of a verified payload.
///
/// Display attributes are carried as supplied; they are not sanitized
/// and must not drive authorization decisions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppUser {
    /// Numeric user identifier (always present once verified)
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// IETF language tag of the user's client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
}

impl WebAppUser {
    /// Storage-facing user key, `tg_<id>`.
    pub fn storage_id(&self) -> String {
        format!("tg_{}", self.id)
    }
}

/// Authenticated output of a successful verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedPrincipal {
    /// Issuance timestamp (seconds since epoch) taken from `auth_date`
    pub auth_date: i64,
    pub user: WebAppUser,
}

impl VerifiedPrincipal {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

/// Either `Ok(VerifiedPrincipal)` or the rejection reason.
pub type VerificationOutcome = Result<VerifiedPrincipal, InitDataError>;
