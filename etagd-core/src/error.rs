//! Error types for etagd-core.

use http::StatusCode;
use thiserror::Error;

/// A precondition stopped the request before the resource handler ran.
///
/// Both variants are client-recoverable and are answered with
/// `412 Precondition Failed` and an empty body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// Unsafe request sent without `If-Match`.
    #[error("If-Match is required for {method} requests")]
    PreconditionRequired { method: String },

    /// `If-Match` does not name the current validator.
    #[error("If-Match {received} does not match current validator {expected}")]
    PreconditionFailed { expected: String, received: String },
}

impl PreconditionError {
    /// HTTP status used for this rejection.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::PRECONDITION_FAILED
    }

    /// Short label used in metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            PreconditionError::PreconditionRequired { .. } => "precondition_required",
            PreconditionError::PreconditionFailed { .. } => "precondition_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_variants_map_to_412() {
        let required = PreconditionError::PreconditionRequired {
            method: "POST".to_string(),
        };
        let failed = PreconditionError::PreconditionFailed {
            expected: "\"aaaaaaaa\"".to_string(),
            received: "\"bbbbbbbb\"".to_string(),
        };
        assert_eq!(required.status_code(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(failed.status_code(), StatusCode::PRECONDITION_FAILED);
    }

    #[test]
    fn test_display_and_outcome() {
        let err = PreconditionError::PreconditionRequired {
            method: "PUT".to_string(),
        };
        assert_eq!(err.to_string(), "If-Match is required for PUT requests");
        assert_eq!(err.outcome(), "precondition_required");

        let err = PreconditionError::PreconditionFailed {
            expected: "\"aaaaaaaa\"".to_string(),
            received: "\"bbbbbbbb\"".to_string(),
        };
        assert!(err.to_string().contains("\"bbbbbbbb\""));
        assert_eq!(err.outcome(), "precondition_failed");
    }
}
