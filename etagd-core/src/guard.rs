//! Conditional request guard.
//!
//! Runs before the resource handler. Rejections are final for the request;
//! a matching `If-None-Match` on a read only flags the exchange as a
//! not-modified candidate, which the generator resolves after the handler
//! has produced its payload.

use http::header::{IF_MATCH, IF_NONE_MATCH};
use http::{HeaderMap, HeaderValue, Method};

use crate::error::PreconditionError;
use crate::validator::Validator;

/// Conditional headers of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preconditions {
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
}

impl Preconditions {
    pub fn new(if_match: Option<&str>, if_none_match: Option<&str>) -> Self {
        Self {
            if_match: if_match.map(str::to_string),
            if_none_match: if_none_match.map(str::to_string),
        }
    }

    /// Extract the conditional headers.
    ///
    /// Values that are not visible ASCII are decoded lossily. They still
    /// count as present but can never equal a generated validator.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            if_match: headers.get(IF_MATCH).map(header_text),
            if_none_match: headers.get(IF_NONE_MATCH).map(header_text),
        }
    }
}

fn header_text(value: &HeaderValue) -> String {
    match value.to_str() {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
    }
}

/// Per-request decision context handed from the guard to the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalContext {
    /// The guard saw `If-None-Match` equal to the live validator.
    pub not_modified_candidate: bool,
    /// `If-None-Match` as sent by the client.
    pub if_none_match: Option<String>,
}

impl ConditionalContext {
    /// Context for a request that carries no conditional state.
    pub fn unconditional() -> Self {
        Self::default()
    }
}

/// Whether `method` may change server state.
pub fn is_unsafe(method: &Method) -> bool {
    !method.is_safe()
}

/// Whether `method` is a read that can be answered with `304`.
pub fn is_cacheable_read(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD)
}

/// Decide whether a request may reach the resource handler.
///
/// Rules, in order:
/// 1. unsafe method without `If-Match` is rejected
/// 2. `If-Match` that differs from an issued validator is rejected
/// 3. a read whose `If-None-Match` equals the issued validator is flagged
/// 4. anything else is admitted
///
/// Before any validator has been issued every `If-Match` value is accepted.
pub fn evaluate_preconditions(
    method: &Method,
    preconditions: &Preconditions,
    current: Option<&Validator>,
) -> Result<ConditionalContext, PreconditionError> {
    let if_match = preconditions.if_match.as_deref();

    if is_unsafe(method) && if_match.is_none() {
        return Err(PreconditionError::PreconditionRequired {
            method: method.to_string(),
        });
    }

    if let (Some(received), Some(validator)) = (if_match, current) {
        if !validator.matches(received) {
            return Err(PreconditionError::PreconditionFailed {
                expected: validator.to_string(),
                received: received.to_string(),
            });
        }
    }

    let not_modified_candidate = is_cacheable_read(method)
        && matches!(
            (preconditions.if_none_match.as_deref(), current),
            (Some(received), Some(validator)) if validator.matches(received)
        );

    Ok(ConditionalContext {
        not_modified_candidate,
        if_none_match: preconditions.if_none_match.clone(),
    })
}
