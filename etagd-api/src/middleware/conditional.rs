//! Conditional Request Middleware for etagd API
//!
//! Wraps the resource routes with both halves of the conditional pipeline:
//!
//! 1. Before the handler, `If-Match` / `If-None-Match` are checked against the
//!    live validator. Rejected requests never reach the handler.
//! 2. After the handler, buffered payloads get a fresh `ETag`, which becomes
//!    the live validator, and matching reads are turned into `304`.
//!
//! The resource's exchange gate is held across both stages.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use etagd_api::middleware::conditional_middleware;
//!
//! let app = Router::new()
//!     .route("/", axum::routing::get(read_resource))
//!     .layer(middleware::from_fn_with_state(resource_state.clone(), conditional_middleware))
//!     .with_state(resource_state);
//! ```

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{Request, State},
    http::{
        header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, ETAG},
        Method,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use etagd_core::{Finalized, Payload, PreconditionError, Preconditions, ResponseDraft};

use crate::error::{ApiError, ErrorCode};
use crate::state::ResourceState;
use crate::telemetry::metrics::{outcome, record_conditional};

// ============================================================================
// MIDDLEWARE
// ============================================================================

/// Axum middleware running the conditional pipeline around a resource.
///
/// `HEAD` is dispatched to the handler as `GET` so the validator is computed
/// over the same payload. Its body is dropped afterwards.
pub async fn conditional_middleware(
    State(state): State<ResourceState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ConditionalError> {
    let method = request.method().clone();
    let preconditions = Preconditions::from_headers(request.headers());

    let exchange = state.begin_exchange().await;

    let context = state
        .resource
        .precheck(&method, &preconditions)
        .map_err(|err| {
            tracing::debug!(
                method = %method,
                if_match = ?preconditions.if_match,
                error = %err,
                "Conditional request rejected"
            );
            record_conditional(err.outcome());
            ConditionalError::from(err)
        })?;
    record_conditional(outcome::ADMITTED);

    if method == Method::HEAD {
        *request.method_mut() = Method::GET;
    }

    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();

    let existing = parts
        .headers
        .get(ETAG)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    let (buffered, passthrough) = match body.size_hint().exact() {
        Some(len) if len > 0 && len <= state.max_body_bytes as u64 => {
            let bytes = axum::body::to_bytes(body, state.max_body_bytes)
                .await
                .map_err(|e| ConditionalError::Internal(format!("Failed to read response body: {}", e)))?;
            (Some(bytes), None)
        }
        _ => (None, Some(body)),
    };

    let payload = match &buffered {
        Some(bytes) => Payload::Bytes(bytes),
        None => Payload::Opaque,
    };

    let finalized = state.resource.finalize(
        &context,
        ResponseDraft {
            status: parts.status,
            existing_validator: existing.as_deref(),
            payload,
        },
    );
    drop(exchange);

    record_finalized(&method, &finalized);

    parts.status = finalized.status;
    if let Some(validator) = &finalized.issued {
        let value = HeaderValue::from_str(validator.as_str())
            .map_err(|e| ConditionalError::Internal(format!("Invalid validator header: {}", e)))?;
        parts.headers.insert(ETAG, value);
    }

    let body = if finalized.strip_body {
        parts.headers.remove(CONTENT_LENGTH);
        parts.headers.remove(CONTENT_TYPE);
        Body::empty()
    } else if method == Method::HEAD {
        Body::empty()
    } else {
        restore_body(buffered, passthrough)
    };

    Ok(Response::from_parts(parts, body))
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn restore_body(buffered: Option<Bytes>, passthrough: Option<Body>) -> Body {
    match (buffered, passthrough) {
        (Some(bytes), _) => Body::from(bytes),
        (None, Some(body)) => body,
        (None, None) => Body::empty(),
    }
}

fn record_finalized(method: &Method, finalized: &Finalized) {
    if let Some(validator) = &finalized.issued {
        tracing::debug!(method = %method, etag = %validator, "Validator issued");
        record_conditional(outcome::VALIDATOR_ISSUED);
    }
    if finalized.is_not_modified() {
        tracing::debug!(method = %method, "Answering not modified");
        record_conditional(outcome::NOT_MODIFIED);
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Errors that can occur in the conditional middleware.
#[derive(Debug)]
pub enum ConditionalError {
    /// The request failed its preconditions.
    Precondition(PreconditionError),

    /// Internal error (body buffering, header encoding)
    Internal(String),
}

impl From<PreconditionError> for ConditionalError {
    fn from(err: PreconditionError) -> Self {
        ConditionalError::Precondition(err)
    }
}

impl IntoResponse for ConditionalError {
    fn into_response(self) -> Response {
        match self {
            // Precondition rejections carry no body.
            ConditionalError::Precondition(err) => (err.status_code(), Body::empty()).into_response(),
            ConditionalError::Internal(msg) => {
                tracing::error!(error = %msg, "Conditional middleware internal error");
                ApiError::from_code(ErrorCode::InternalError).into_response()
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
