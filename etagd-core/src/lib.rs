//! etagd Core - Conditional Request Pipeline
//!
//! Owns the single integer resource served by etagd and the strong validator
//! (ETag) that tracks its last successfully sent representation.
//!
//! The pipeline has two stages around every resource handler:
//! - `guard`: admits or rejects a request from its `If-Match` /
//!   `If-None-Match` headers before the handler runs
//! - `generator`: derives the validator from the response payload after the
//!   handler runs and finalizes `304 Not Modified` responses
//!
//! This crate has no HTTP server and performs no I/O. The API crate is
//! responsible for serializing requests through the pipeline.

pub mod error;
pub mod generator;
pub mod guard;
pub mod resource;
pub mod store;
pub mod validator;

pub use error::PreconditionError;
pub use generator::{Finalized, Payload, ResponseDraft, ValidatorGenerator};
pub use guard::{evaluate_preconditions, is_cacheable_read, is_unsafe, ConditionalContext, Preconditions};
pub use resource::ConditionalResource;
pub use store::{minute_of, ResourceStore, ResourceValue, DEFAULT_REFRESH_WINDOW};
pub use validator::{Validator, ValidatorState, DEFAULT_VALIDATOR_HEX_LEN, MAX_VALIDATOR_HEX_LEN};

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
