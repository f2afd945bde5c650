//! Property-Based Tests for the Conditional Resource over HTTP
//!
//! For any written value:
//! - the write response carries the validator of its own body
//! - replaying the old validator on a write is rejected
//! - a conditional read with the new validator is `304` with no body
//!
//! For any `If-Match` token other than the live validator, including
//! well-formed validators of other payloads, writes are rejected.

use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use etagd_api::{create_api_router, ApiConfig};
use etagd_test_utils::fixtures::{read_request, resource_body, write_request};
use etagd_test_utils::generators::{arb_header_token, arb_validator, arb_value};
use etagd_test_utils::Validator;
use proptest::prelude::*;
use tokio::runtime::Runtime;
use tower::ServiceExt;

// ============================================================================
// TEST CONFIGURATION
// ============================================================================

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

fn test_app() -> Result<Router, TestCaseError> {
    create_api_router(&ApiConfig::default())
        .map_err(|e| TestCaseError::fail(format!("Failed to build router: {}", e)))
}

struct Reply {
    status: StatusCode,
    etag: Option<String>,
    body: Vec<u8>,
}

async fn send(app: &Router, request: Request<String>) -> Result<Reply, TestCaseError> {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .map_err(|e| TestCaseError::fail(format!("Request failed: {}", e)))?;
    let status = response.status();
    let etag = response
        .headers()
        .get(header::ETAG)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| TestCaseError::fail(format!("Failed to read body: {}", e)))?;
    Ok(Reply {
        status,
        etag,
        body: body.to_vec(),
    })
}

async fn current_etag(app: &Router) -> Result<String, TestCaseError> {
    send(app, read_request(None))
        .await?
        .etag
        .ok_or_else(|| TestCaseError::fail("read did not issue a validator"))
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_write_cycle(value in arb_value()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = test_app()?;
            let v1 = current_etag(&app).await?;

            let written = send(&app, write_request(Method::PUT, value, Some(&v1))).await?;
            prop_assert_eq!(written.status, StatusCode::OK);
            prop_assert_eq!(&written.body, &resource_body(value));

            let v2 = written
                .etag
                .ok_or_else(|| TestCaseError::fail("write did not issue a validator"))?;
            let expected = Validator::from_payload(&resource_body(value));
            prop_assert_eq!(&v2, expected.as_str());

            if v1 != v2 {
                let replay = send(&app, write_request(Method::POST, value ^ 1, Some(&v1))).await?;
                prop_assert_eq!(replay.status, StatusCode::PRECONDITION_FAILED);
            }

            let cached = send(&app, read_request(Some(&v2))).await?;
            prop_assert_eq!(cached.status, StatusCode::NOT_MODIFIED);
            prop_assert!(cached.body.is_empty());
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_foreign_if_match_is_rejected(
        token in prop_oneof![
            arb_header_token(),
            arb_validator().prop_map(Validator::into_inner),
        ]
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = test_app()?;
            let live = current_etag(&app).await?;
            prop_assume!(token != live);

            let reply = send(&app, write_request(Method::POST, 1, Some(&token))).await?;
            prop_assert_eq!(reply.status, StatusCode::PRECONDITION_FAILED);
            prop_assert!(reply.body.is_empty());
            Ok::<(), TestCaseError>(())
        })?;
    }
}
