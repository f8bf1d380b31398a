//! # Signer / Comparator
//!
//! `hash = hex(HMAC-SHA256(signing_key, data_check_string))`, lowercase.
//!
//! Comparison against the supplied hash is constant-time once lengths
//! match. Length is not secret, so a mismatch returns early.

use crate::domain::entities::BotToken;
use crate::domain::payload::{RawPayload, HASH_FIELD};
use crate::domain::secret::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 digest.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Lowercase hex HMAC-SHA256 signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(String);

impl Signature {
    /// Sign a data-check string.
    pub fn compute(key: &SigningKey, canonical: &str) -> Self {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(canonical.as_bytes());
        Self(hex::encode(mac.finalize().into_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a supplied hex signature.
    ///
    /// Hex digits are case-insensitive on the wire; the supplied value is
    /// folded to lowercase before the constant-time comparison.
    pub fn matches(&self, supplied: &str) -> bool {
        if supplied.len() != self.0.len() {
            return false;
        }
        let supplied = supplied.to_ascii_lowercase();
        constant_time_eq(self.0.as_bytes(), supplied.as_bytes())
    }
}

/// Constant-time equality for equal-length byte strings.
///
/// Returns `false` immediately when the lengths differ; otherwise every
/// byte is compared.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Produce a signed wire payload from `fields` as the issuer would.
///
/// Any `hash` entry in `fields` is dropped and replaced by the computed one,
/// appended last.
pub fn sign_init_data<'a, I>(fields: I, token: &BotToken) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let fields: Vec<(String, String)> = fields
        .into_iter()
        .filter(|(k, _)| *k != HASH_FIELD)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let canonical = RawPayload::from_fields(fields.clone()).canonical_string();
    let signature = Signature::compute(&SigningKey::derive(token), &canonical);

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in &fields {
        serializer.append_pair(k, v);
    }
    serializer.append_pair(HASH_FIELD, signature.as_str());
    serializer.finish()
}
