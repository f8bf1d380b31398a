//! API error types and their JSON bodies.
//!
//! Every failure response has the shape `{"ok": false, "reason": "<code>"}`,
//! with an `issues` array when request validation failed.

use crate::ports::outbound::StorageError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use spok_01_init_data::InitDataError;
use std::fmt;

/// Stable reason codes that are not init data rejections
pub mod reasons {
    pub const MISSING_INIT_DATA: &str = "missing_init_data";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const USER_MISMATCH: &str = "user_mismatch";
    pub const INVALID_QUERY: &str = "invalid_query";
    pub const INVALID_PAYLOAD: &str = "invalid_payload";
    pub const INVALID_RANGE: &str = "invalid_range";
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
    pub const STORAGE_ERROR: &str = "storage_error";
    pub const METHOD_NOT_ALLOWED: &str = "method_not_allowed";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// One failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Offending field
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// API error with HTTP status and stable reason code
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub reason: String,
    pub issues: Vec<Issue>,
}

impl ApiError {
    pub fn new(status: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            issues: Vec::new(),
        }
    }

    /// No init data was supplied
    pub fn missing_init_data() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, reasons::MISSING_INIT_DATA)
    }

    /// Init data was rejected. With `expose_reason = false` the body carries
    /// only the generic `unauthorized` code.
    pub fn rejected(err: InitDataError, expose_reason: bool) -> Self {
        let reason = if expose_reason {
            err.code()
        } else {
            reasons::UNAUTHORIZED
        };
        match err {
            InitDataError::MissingCredential => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, reasons::INTERNAL_ERROR)
            }
            _ => Self::new(StatusCode::UNAUTHORIZED, reason),
        }
    }

    /// Request names a user other than the verified principal
    pub fn user_mismatch() -> Self {
        Self::new(StatusCode::FORBIDDEN, reasons::USER_MISMATCH)
    }

    pub fn invalid_query(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            ..Self::new(StatusCode::BAD_REQUEST, reasons::INVALID_QUERY)
        }
    }

    pub fn invalid_payload(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            ..Self::new(StatusCode::BAD_REQUEST, reasons::INVALID_PAYLOAD)
        }
    }

    /// `from` is after `to`
    pub fn invalid_range() -> Self {
        Self::new(StatusCode::BAD_REQUEST, reasons::INVALID_RANGE)
    }

    /// Request body exceeds `limits.max_request_size`
    pub fn payload_too_large() -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, reasons::PAYLOAD_TOO_LARGE)
    }

    pub fn storage_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, reasons::STORAGE_ERROR)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, reasons::METHOD_NOT_ALLOWED)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, reasons::NOT_FOUND)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.reason)
    }
}

impl std::error::Error for ApiError {}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let fields = if self.issues.is_empty() { 2 } else { 3 };
        let mut state = serializer.serialize_struct("ApiError", fields)?;
        state.serialize_field("ok", &false)?;
        state.serialize_field("reason", &self.reason)?;
        if !self.issues.is_empty() {
            state.serialize_field("issues", &self.issues)?;
        }
        state.end()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut response = (status, Json(self)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("tma"));
        }
        response
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        tracing::error!(error = %e, "Storage operation failed");
        ApiError::storage_error()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (startup and serving, not per request)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(String),
}
