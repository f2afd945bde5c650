//! etagd API - HTTP Layer
//!
//! Serves the conditional integer resource from `etagd-core` over Axum, with
//! the guard and the validator generator wired in as middleware around the
//! resource routes.

#[macro_use]
pub mod macros;

pub mod config;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, LogFormat};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use middleware::{conditional_middleware, ConditionalError};
pub use openapi::ApiDoc;
pub use routes::{build_router, create_api_router, RESOURCE_PREFIX};
pub use state::{AppState, ResourceState};
pub use types::*;
