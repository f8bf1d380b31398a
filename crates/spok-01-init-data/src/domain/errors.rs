//! # Init Data Errors
//!
//! Rejection taxonomy for init data verification. Every variant is terminal
//! for the payload that produced it.

use thiserror::Error;

/// Reasons an init data payload (or the verifier itself) can be rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash)]
pub enum InitDataError {
    /// No bot token configured. Raised when the verifier is constructed,
    /// never per request.
    #[error("application credential is not configured")]
    MissingCredential,

    /// Payload carries no `hash` field
    #[error("payload has no hash field")]
    MissingHash,

    /// Supplied hash does not match the one computed over the payload
    #[error("payload hash does not match")]
    HashMismatch,

    /// `auth_date` is absent or not an integer
    #[error("auth_date is missing or not numeric")]
    InvalidAuthDate,

    /// `auth_date` is older than the freshness window
    #[error("auth_date is older than the allowed window")]
    AuthDateExpired,

    /// Payload carries no `user` field
    #[error("payload has no user field")]
    MissingUser,

    /// `user` field is not valid JSON
    #[error("user field is not valid JSON")]
    InvalidUserJson,

    /// `user` JSON has no numeric `id`
    #[error("user field has no numeric id")]
    MissingUserId,
}

impl InitDataError {
    /// Every variant, in pipeline order.
    pub const ALL: [InitDataError; 8] = [
        InitDataError::MissingCredential,
        InitDataError::MissingHash,
        InitDataError::HashMismatch,
        InitDataError::InvalidAuthDate,
        InitDataError::AuthDateExpired,
        InitDataError::MissingUser,
        InitDataError::InvalidUserJson,
        InitDataError::MissingUserId,
    ];

    /// Stable machine-readable code for client diagnostics and logs.
    pub fn code(&self) -> &'static str {
        match self {
            InitDataError::MissingCredential => "missing_credential",
            InitDataError::MissingHash => "missing_hash",
            InitDataError::HashMismatch => "hash_mismatch",
            InitDataError::InvalidAuthDate => "invalid_auth_date",
            InitDataError::AuthDateExpired => "auth_date_expired",
            InitDataError::MissingUser => "missing_user",
            InitDataError::InvalidUserJson => "invalid_user_json",
            InitDataError::MissingUserId => "missing_user_id",
        }
    }

    /// Position of this variant in [`InitDataError::ALL`].
    pub fn index(&self) -> usize {
        match self {
            InitDataError::MissingCredential => 0,
            InitDataError::MissingHash => 1,
            InitDataError::HashMismatch => 2,
            InitDataError::InvalidAuthDate => 3,
            InitDataError::AuthDateExpired => 4,
            InitDataError::MissingUser => 5,
            InitDataError::InvalidUserJson => 6,
            InitDataError::MissingUserId => 7,
        }
    }
}
