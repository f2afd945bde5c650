//! REST API Routes Module
//!
//! Includes:
//! - The conditional integer resource at `/etag`
//! - The greeting demo at `/greet`
//! - Health check endpoints (Kubernetes-compatible)
//! - Prometheus metrics and the OpenAPI document
//! - CORS support for the browser UI

pub mod etag;
pub mod greet;
pub mod health;

use std::time::Duration;

use axum::{
    http::{header, Method, Uri},
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::openapi::ApiDoc;
use crate::state::{AppState, ResourceState};
use crate::telemetry::{metrics_handler, observability_middleware};

pub use etag::create_router as etag_router;
pub use greet::create_router as greet_router;
pub use health::create_router as health_router;

/// Mount point of the conditional resource.
pub const RESOURCE_PREFIX: &str = "/etag";

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::route_not_found(uri.path())
}

fn validate_api_config_for_production(config: &ApiConfig) -> ApiResult<()> {
    if config.cors_origins.is_empty() {
        return Err(ApiError::invalid_input(
            "CORS origins not configured for production. Set ETAGD_CORS_ORIGINS.",
        ));
    }
    Ok(())
}

/// CORS for the browser UI. The validator headers must be readable and
/// sendable cross-origin for conditional requests to work from a page.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::IF_MATCH,
            header::IF_NONE_MATCH,
        ])
        .expose_headers([header::ETAG])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<header::HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Assemble the application around existing state.
pub fn build_router(state: AppState, config: &ApiConfig) -> Router {
    let resource: ResourceState = state.resource.clone();

    Router::new()
        .nest(RESOURCE_PREFIX, etag::create_router(resource))
        .nest("/greet", greet::create_router())
        .nest("/health", health::create_router(state))
        .route("/metrics", get(metrics_handler))
        .route("/openapi.json", get(openapi_json))
        .fallback(route_not_found)
        .layer(from_fn(observability_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
}

/// Create the full API router from configuration.
pub fn create_api_router(config: &ApiConfig) -> ApiResult<Router> {
    if config.is_production() {
        validate_api_config_for_production(config)?;
    }
    let state = AppState::new(ResourceState::from_config(config));
    Ok(build_router(state, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_requires_origins() {
        let config = ApiConfig {
            environment: "production".to_string(),
            ..Default::default()
        };
        assert!(create_api_router(&config).is_err());

        let config = ApiConfig {
            environment: "production".to_string(),
            cors_origins: vec!["https://app.example.com".to_string()],
            ..Default::default()
        };
        assert!(create_api_router(&config).is_ok());
    }

    #[test]
    fn test_development_router_builds() {
        assert!(create_api_router(&ApiConfig::default()).is_ok());
    }
}
