//! Strong validators and the single live validator slot.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::RwLock;

/// Hex characters kept from the digest by default (32 bits).
pub const DEFAULT_VALIDATOR_HEX_LEN: usize = 8;

/// Full SHA-256 digest length in hex characters.
pub const MAX_VALIDATOR_HEX_LEN: usize = 64;

/// Strong validator: a truncated SHA-256 of the payload, lowercase hex,
/// wrapped in double quotes (`"1a2b3c4d"`).
///
/// Eight hex characters leave a collision probability of roughly 2^-32 per
/// pair of distinct payloads. That is tolerable for one scalar resource but
/// not for a multi-entity cache; use [`Validator::from_payload_with_len`]
/// with a longer length there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Validator(String);

impl Validator {
    /// Derive the validator of a payload using the default length.
    pub fn from_payload(payload: &[u8]) -> Self {
        Self::from_payload_with_len(payload, DEFAULT_VALIDATOR_HEX_LEN)
    }

    /// Derive the validator keeping `hex_len` hex characters of the digest.
    ///
    /// `hex_len` is clamped to `1..=64`.
    pub fn from_payload_with_len(payload: &[u8], hex_len: usize) -> Self {
        let digest = Sha256::digest(payload);
        let hex = hex::encode(digest);
        let len = hex_len.clamp(1, MAX_VALIDATOR_HEX_LEN);
        Self(format!("\"{}\"", &hex[..len]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison against a header value. Anything not byte-identical,
    /// including weak or unquoted forms, does not match.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Validator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Holder of the one live validator.
///
/// Empty until the first qualifying response; afterwards every qualifying
/// response overwrites it. There is no history.
#[derive(Debug, Default)]
pub struct ValidatorState {
    current: RwLock<Option<Validator>>,
}

impl ValidatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live validator, if one has been issued.
    pub fn current(&self) -> Option<Validator> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Overwrite the live validator, returning the one it replaced.
    pub fn replace(&self, validator: Validator) -> Option<Validator> {
        self.current
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .replace(validator)
    }

    pub fn is_issued(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}
