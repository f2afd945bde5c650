//! Validator generation and `304 Not Modified` finalization.
//!
//! Runs after the resource handler. This is the only place where an exchange
//! is turned into a `304`.

use http::StatusCode;

use crate::guard::ConditionalContext;
use crate::validator::{Validator, ValidatorState, DEFAULT_VALIDATOR_HEX_LEN, MAX_VALIDATOR_HEX_LEN};

/// Shape of the handler's response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Fully buffered text or byte payload.
    Bytes(&'a [u8]),
    /// Anything that cannot be hashed as-is (streams, empty bodies, bodies
    /// over the buffering limit).
    Opaque,
}

/// Response as produced by the handler.
#[derive(Debug, Clone, Copy)]
pub struct ResponseDraft<'a> {
    pub status: StatusCode,
    /// Validator header already set by the handler.
    pub existing_validator: Option<&'a str>,
    pub payload: Payload<'a>,
}

/// Final disposition of the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalized {
    pub status: StatusCode,
    /// Freshly generated validator to attach as the `ETag` header.
    pub issued: Option<Validator>,
    /// Replace the body with an empty payload.
    pub strip_body: bool,
}

impl Finalized {
    pub fn is_not_modified(&self) -> bool {
        self.status == StatusCode::NOT_MODIFIED
    }
}

/// Computes validators and writes them to [`ValidatorState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorGenerator {
    hex_len: usize,
}

impl Default for ValidatorGenerator {
    fn default() -> Self {
        Self {
            hex_len: DEFAULT_VALIDATOR_HEX_LEN,
        }
    }
}

impl ValidatorGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator keeping `hex_len` digest characters, clamped to
    /// `DEFAULT_VALIDATOR_HEX_LEN..=MAX_VALIDATOR_HEX_LEN`.
    pub fn with_hex_len(hex_len: usize) -> Self {
        Self {
            hex_len: hex_len.clamp(DEFAULT_VALIDATOR_HEX_LEN, MAX_VALIDATOR_HEX_LEN),
        }
    }

    pub fn hex_len(&self) -> usize {
        self.hex_len
    }

    pub fn validator_for(&self, payload: &[u8]) -> Validator {
        Validator::from_payload_with_len(payload, self.hex_len)
    }

    /// Resolve the validator of a response and its final status.
    ///
    /// - an existing validator header is kept and the state is not touched
    /// - otherwise a byte payload with status < 400 gets a fresh validator,
    ///   which becomes the live one
    /// - `If-None-Match` equal to the resolved validator yields `304`
    /// - a guard-flagged candidate yields `304` whenever the handler succeeded
    ///
    /// Every `304` has an empty body.
    pub fn finalize(
        &self,
        state: &ValidatorState,
        context: &ConditionalContext,
        draft: ResponseDraft<'_>,
    ) -> Finalized {
        let succeeded = draft.status.as_u16() < 400;

        let (resolved, issued) = match (draft.existing_validator, draft.payload) {
            (Some(existing), _) => (Some(existing.to_string()), None),
            (None, Payload::Bytes(bytes)) if succeeded => {
                let validator = self.validator_for(bytes);
                state.replace(validator.clone());
                (Some(validator.as_str().to_string()), Some(validator))
            }
            (None, _) => (None, None),
        };

        let if_none_match_hit = match (context.if_none_match.as_deref(), resolved.as_deref()) {
            (Some(received), Some(resolved)) => received == resolved,
            _ => false,
        };

        let not_modified = if_none_match_hit || (context.not_modified_candidate && succeeded);

        if not_modified {
            Finalized {
                status: StatusCode::NOT_MODIFIED,
                issued,
                strip_body: true,
            }
        } else {
            Finalized {
                status: draft.status,
                issued,
                strip_body: false,
            }
        }
    }
}
