//! Conditional Resource Routes
//!
//! `GET` reads the integer resource, `POST` / `PUT` replace it. Every route
//! runs behind the conditional middleware, so writes need a current
//! `If-Match` and reads honor `If-None-Match`.

use axum::{
    extract::{rejection::JsonRejection, State},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};

use crate::error::ApiResult;
use crate::middleware::conditional_middleware;
use crate::state::ResourceState;
use crate::types::ResourceBody;

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /etag - Read the resource
#[utoipa::path(
    get,
    path = "/etag",
    tag = "Resource",
    params(
        ("If-None-Match" = Option<String>, Header, description = "Validator from a previous read"),
    ),
    responses(
        (status = 200, description = "Current value", body = ResourceBody,
            headers(("ETag" = String, description = "Strong validator of the body"))),
        (status = 304, description = "Client copy is current"),
    ),
)]
pub async fn read_resource(State(state): State<ResourceState>) -> Json<ResourceBody> {
    Json(state.resource.read().into())
}

/// POST /etag - Replace the resource
#[utoipa::path(
    post,
    path = "/etag",
    tag = "Resource",
    request_body = ResourceBody,
    params(
        ("If-Match" = String, Header, description = "Validator of the representation being replaced"),
    ),
    responses(
        (status = 200, description = "Stored value", body = ResourceBody,
            headers(("ETag" = String, description = "Strong validator of the body"))),
        (status = 400, description = "Body is not an integer value", body = crate::error::ApiError),
        (status = 412, description = "If-Match missing or stale"),
    ),
)]
pub async fn write_resource(
    State(state): State<ResourceState>,
    payload: Result<Json<ResourceBody>, JsonRejection>,
) -> ApiResult<Json<ResourceBody>> {
    let Json(body) = payload?;
    let stored = state.resource.write(body.value);
    tracing::info!(value = stored.value, "Resource replaced");
    Ok(Json(stored.into()))
}

/// PUT /etag - Replace the resource
#[utoipa::path(
    put,
    path = "/etag",
    tag = "Resource",
    request_body = ResourceBody,
    params(
        ("If-Match" = String, Header, description = "Validator of the representation being replaced"),
    ),
    responses(
        (status = 200, description = "Stored value", body = ResourceBody,
            headers(("ETag" = String, description = "Strong validator of the body"))),
        (status = 400, description = "Body is not an integer value", body = crate::error::ApiError),
        (status = 412, description = "If-Match missing or stale"),
    ),
)]
pub async fn replace_resource(
    state: State<ResourceState>,
    payload: Result<Json<ResourceBody>, JsonRejection>,
) -> ApiResult<Json<ResourceBody>> {
    write_resource(state, payload).await
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the resource router with the conditional pipeline applied.
pub fn create_router(state: ResourceState) -> Router {
    Router::new()
        .route("/", get(read_resource).post(write_resource).put(replace_resource))
        .route_layer(from_fn_with_state(state.clone(), conditional_middleware))
        .with_state(state)
}
