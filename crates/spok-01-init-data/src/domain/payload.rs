//! # Payload Parser and Canonicalizer
//!
//! Wire format: `&`-joined, percent-encoded `key=value` pairs (the same
//! decoding rules as `application/x-www-form-urlencoded`, so `+` is a space).
//!
//! The canonical (data-check) string covers every field except `hash`,
//! sorted byte-wise by name and joined with `\n`.

use crate::domain::errors::InitDataError;
use std::collections::BTreeMap;

/// Field carrying the hex signature.
pub const HASH_FIELD: &str = "hash";
/// Field carrying the issuance timestamp.
pub const AUTH_DATE_FIELD: &str = "auth_date";
/// Field carrying the JSON user record.
pub const USER_FIELD: &str = "user";

/// Decoded payload: an ordered multimap of field name/value pairs.
///
/// Field names may repeat on the wire; the reserved-field accessors return
/// the last occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawPayload {
    fields: Vec<(String, String)>,
}

impl RawPayload {
    /// Decode a transport-encoded payload.
    ///
    /// # Errors
    /// * `InitDataError::MissingHash` - no non-empty `hash` field
    pub fn parse(encoded: &str) -> Result<Self, InitDataError> {
        let fields: Vec<(String, String)> = url::form_urlencoded::parse(encoded.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let payload = Self { fields };
        match payload.hash() {
            Some(hash) if !hash.is_empty() => Ok(payload),
            _ => Err(InitDataError::MissingHash),
        }
    }

    pub(crate) fn from_fields(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Last value for `name`, if present.
    pub fn last(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn hash(&self) -> Option<&str> {
        self.last(HASH_FIELD)
    }

    pub fn auth_date(&self) -> Option<&str> {
        self.last(AUTH_DATE_FIELD)
    }

    pub fn user(&self) -> Option<&str> {
        self.last(USER_FIELD)
    }

    /// All fields in wire order, reserved ones included.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build the data-check string that the issuer signed.
    ///
    /// Repeated names collapse to their last value, so every name appears
    /// exactly once. `BTreeMap<String, _>` orders keys by their UTF-8 bytes,
    /// which is the ordering the issuer uses.
    pub fn canonical_string(&self) -> String {
        let mut sorted: BTreeMap<&str, &str> = BTreeMap::new();
        for (k, v) in &self.fields {
            if k != HASH_FIELD {
                sorted.insert(k.as_str(), v.as_str());
            }
        }

        let mut out = String::new();
        for (i, (k, v)) in sorted.into_iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(k);
            out.push('=');
            out.push_str(v);
        }
        out
    }
}
