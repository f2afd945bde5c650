//! OpenAPI Specification for etagd API
//!
//! Generated with utoipa from the route annotations and body types.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{HealthDetails, HealthResponse, HealthStatus};
use crate::routes::{etag, greet, health};
use crate::telemetry::metrics;
use crate::types::{GreetResponse, ResourceBody};

/// OpenAPI document for etagd API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "etagd API",
        version = "0.1.0",
        description = "Single integer resource guarded by strong validators (ETag / If-Match / If-None-Match)",
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development server"),
    ),
    paths(
        etag::read_resource,
        etag::write_resource,
        etag::replace_resource,
        greet::greet,
        health::ping,
        health::liveness,
        health::readiness,
        metrics::metrics_handler,
    ),
    components(schemas(
        ResourceBody,
        GreetResponse,
        ApiError,
        ErrorCode,
        HealthResponse,
        HealthStatus,
        HealthDetails,
    )),
    tags(
        (name = "Resource", description = "Conditional integer resource"),
        (name = "Greeting", description = "Greeting demo"),
        (name = "Health", description = "Health checks"),
        (name = "Observability", description = "Metrics"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        let openapi = Self::openapi();
        serde_json::to_string_pretty(&openapi)
    }
}
