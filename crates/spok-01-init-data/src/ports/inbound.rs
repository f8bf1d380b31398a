//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::VerificationOutcome;

/// Init data verification API.
///
/// Implementations are pure and must be thread-safe (`Send + Sync`);
/// callers may invoke `verify` concurrently without coordination.
pub trait InitDataVerificationApi: Send + Sync {
    /// Verify a transport-encoded init data payload and extract its principal.
    fn verify(&self, init_data: &str) -> VerificationOutcome;
}
