//! # Init Data Verification Service
//!
//! Wires the domain stages into the verification pipeline:
//!
//! ```text
//! parse → canonicalize → derive key → sign & compare → freshness → principal
//! ```
//!
//! Each stage short-circuits with its own [`InitDataError`].

use crate::domain::entities::{BotToken, VerificationOutcome, VerifiedPrincipal, DEFAULT_MAX_AGE_SECS};
use crate::domain::errors::InitDataError;
use crate::domain::freshness::{check_freshness, parse_auth_date};
use crate::domain::payload::RawPayload;
use crate::domain::principal::extract_user;
use crate::domain::secret::SigningKey;
use crate::domain::signature::Signature;
use crate::ports::inbound::InitDataVerificationApi;
use crate::ports::outbound::{Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Verify `init_data` against `token` as of `now` (Unix seconds).
pub fn verify_at(
    init_data: &str,
    token: &BotToken,
    now: i64,
    max_age_secs: i64,
) -> VerificationOutcome {
    let payload = RawPayload::parse(init_data)?;
    let canonical = payload.canonical_string();

    let key = SigningKey::derive(token);
    let expected = Signature::compute(&key, &canonical);
    let supplied = payload.hash().ok_or(InitDataError::MissingHash)?;
    if !expected.matches(supplied) {
        return Err(InitDataError::HashMismatch);
    }

    let auth_date = parse_auth_date(payload.auth_date())?;
    check_freshness(auth_date, now, max_age_secs)?;

    let user = extract_user(payload.user())?;
    Ok(VerifiedPrincipal { auth_date, user })
}

/// Init data verifier bound to one application credential.
///
/// Cheap to clone; the credential is shared, never mutated.
#[derive(Clone, Debug)]
pub struct InitDataVerifier<C: Clock = SystemClock> {
    token: Arc<BotToken>,
    max_age_secs: i64,
    clock: C,
}

impl InitDataVerifier<SystemClock> {
    /// Create a verifier using the wall clock and the default 24h window.
    ///
    /// # Errors
    /// * `InitDataError::MissingCredential` - the token is empty or blank
    pub fn new(token: impl Into<String>) -> Result<Self, InitDataError> {
        Ok(Self::from_token(BotToken::new(token)?, SystemClock))
    }
}

impl<C: Clock> InitDataVerifier<C> {
    pub fn from_token(token: BotToken, clock: C) -> Self {
        Self {
            token: Arc::new(token),
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            clock,
        }
    }

    /// Replace the clock (tests inject a fixed one).
    pub fn with_clock<D: Clock>(self, clock: D) -> InitDataVerifier<D> {
        InitDataVerifier {
            token: self.token,
            max_age_secs: self.max_age_secs,
            clock,
        }
    }

    /// Override the freshness window. Sub-second precision is dropped, so
    /// `1500ms` checks as one second.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age_secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        self
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs.unsigned_abs())
    }
}

impl<C: Clock> InitDataVerificationApi for InitDataVerifier<C> {
    fn verify(&self, init_data: &str) -> VerificationOutcome {
        let principal = verify_at(
            init_data,
            &self.token,
            self.clock.now_unix(),
            self.max_age_secs,
        )?;
        debug!(
            user_id = principal.user.id,
            auth_date = principal.auth_date,
            "Init data verified"
        );
        Ok(principal)
    }
}
