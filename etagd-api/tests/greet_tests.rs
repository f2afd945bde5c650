//! Tests for `GET /greet`.

use axum::http::{Request, StatusCode};
use axum::Router;
use etagd_api::{create_api_router, ApiConfig, GreetResponse};
use tower::ServiceExt;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn app() -> TestResult<Router> {
    Ok(create_api_router(&ApiConfig::default())?)
}

async fn get(uri: &str) -> TestResult<(StatusCode, Vec<u8>)> {
    let request = Request::builder().uri(uri).body(String::new())?;
    let response = app()?.oneshot(request).await?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, body.to_vec()))
}

async fn greet(uri: &str) -> TestResult<String> {
    let (status, body) = get(uri).await?;
    assert_eq!(status, StatusCode::OK, "{uri}");
    let response: GreetResponse = serde_json::from_slice(&body)?;
    Ok(response.message)
}

#[tokio::test]
async fn test_greets_with_default_greeting() -> TestResult {
    assert_eq!(greet("/greet?name=John").await?, "Hello John!");
    Ok(())
}

#[tokio::test]
async fn test_greets_with_custom_greeting() -> TestResult {
    assert_eq!(greet("/greet?name=John&greeting=Hi").await?, "Hi John!");
    Ok(())
}

#[tokio::test]
async fn test_excited_greeting_is_shouted() -> TestResult {
    assert_eq!(greet("/greet?name=John&excited=true").await?, "HELLO JOHN!!!");
    assert_eq!(greet("/greet?name=John&excited=false").await?, "Hello John!");
    Ok(())
}

#[tokio::test]
async fn test_missing_name_is_bad_request() -> TestResult {
    let (status, body) = get("/greet").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(error["code"], "VALIDATION_FAILED");
    Ok(())
}

#[tokio::test]
async fn test_malformed_excited_is_bad_request() -> TestResult {
    let (status, _) = get("/greet?name=John&excited=maybe").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_greeting_carries_no_validator() -> TestResult {
    let request = Request::builder().uri("/greet?name=John").body(String::new())?;
    let response = app()?.oneshot(request).await?;
    assert!(response.headers().get(axum::http::header::ETAG).is_none());
    Ok(())
}
