//! # Init Data Verifier (SPOK-01)
//!
//! Verifies the signed `initData` payload a host application hands to an
//! embedded mini-app and extracts the authenticated user from it.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Parsing, canonicalization and HMAC logic, no I/O
//! - **Ports Layer** (`ports/`): Verification API and the clock it depends on
//! - **Service Layer** (`service.rs`): Runs the pipeline in order
//!
//! ## Pipeline
//!
//! ```text
//! "auth_date=...&user=...&hash=..."
//!        │
//!        ▼
//!   RawPayload::parse ──────────────► MissingHash
//!        │
//!        ▼
//!   canonical_string  (sorted, "\n"-joined, hash excluded)
//!        │
//!        ▼
//!   SigningKey::derive (HMAC("WebAppData", bot_token))
//!        │
//!        ▼
//!   Signature::matches (constant-time) ► HashMismatch
//!        │
//!        ▼
//!   check_freshness ────────────────► InvalidAuthDate / AuthDateExpired
//!        │
//!        ▼
//!   extract_user ───────────────────► MissingUser / InvalidUserJson / MissingUserId
//!        │
//!        ▼
//!   VerifiedPrincipal
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use spok_01_init_data::{InitDataVerifier, InitDataVerificationApi};
//!
//! let verifier = InitDataVerifier::new(bot_token)?;
//! let principal = verifier.verify(&init_data)?;
//! println!("user {}", principal.user_id());
//! ```
//!
//! ## Security Notes
//!
//! - The bot token and derived key are never logged; their `Debug` output is redacted
//! - Hash comparison is constant-time once lengths match
//! - Payloads dated in the future are accepted (no upper skew bound)

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::entities::{
    BotToken, VerificationOutcome, VerifiedPrincipal, WebAppUser, DEFAULT_MAX_AGE_SECS,
};
pub use domain::errors::InitDataError;
pub use domain::payload::RawPayload;
pub use domain::signature::sign_init_data;
pub use ports::inbound::InitDataVerificationApi;
pub use ports::outbound::{Clock, FixedClock, SystemClock};
pub use service::{verify_at, InitDataVerifier};
