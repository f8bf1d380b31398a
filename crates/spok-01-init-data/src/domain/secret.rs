//! # Secret Deriver
//!
//! The bot token is never used directly as the MAC key. The signing key is
//! `HMAC-SHA256(key = "WebAppData", message = bot_token)`.

use crate::domain::entities::BotToken;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Constant key of the derivation step.
pub const WEB_APP_DATA_KEY: &[u8] = b"WebAppData";

/// Per-verification signing key derived from the bot token.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey([u8; 32]);

impl SigningKey {
    /// Derive the signing key for `token`.
    pub fn derive(token: &BotToken) -> Self {
        let mut mac = HmacSha256::new_from_slice(WEB_APP_DATA_KEY)
            .expect("HMAC can take key of any size");
        mac.update(token.as_bytes());

        let mut key = [0u8; 32];
        key.copy_from_slice(&mac.finalize().into_bytes());
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}
