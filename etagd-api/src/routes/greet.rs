//! Greeting Route
//!
//! Stateless demo endpoint served next to the conditional resource.

use axum::{
    extract::{rejection::QueryRejection, Query},
    routing::get,
    Json, Router,
};

use crate::error::ApiResult;
use crate::types::{GreetQuery, GreetResponse};

const DEFAULT_GREETING: &str = "Hello";

/// Build the greeting message.
pub fn compose_greeting(query: &GreetQuery) -> String {
    let greeting = query
        .greeting
        .as_deref()
        .filter(|g| !g.is_empty())
        .unwrap_or(DEFAULT_GREETING);
    let message = format!("{} {}!", greeting, query.name);
    if query.excited.unwrap_or(false) {
        format!("{}!!", message.to_uppercase())
    } else {
        message
    }
}

/// GET /greet - Greet someone
#[utoipa::path(
    get,
    path = "/greet",
    tag = "Greeting",
    params(GreetQuery),
    responses(
        (status = 200, description = "Greeting", body = GreetResponse),
        (status = 400, description = "Missing or malformed query", body = crate::error::ApiError),
    ),
)]
pub async fn greet(query: Result<Query<GreetQuery>, QueryRejection>) -> ApiResult<Json<GreetResponse>> {
    let Query(query) = query?;
    Ok(Json(GreetResponse {
        message: compose_greeting(&query),
    }))
}

pub fn create_router() -> Router {
    Router::new().route("/", get(greet))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(name: &str, greeting: Option<&str>, excited: Option<bool>) -> GreetQuery {
        GreetQuery {
            name: name.to_string(),
            greeting: greeting.map(str::to_string),
            excited,
        }
    }

    #[test]
    fn test_default_greeting() {
        assert_eq!(compose_greeting(&query("John", None, None)), "Hello John!");
    }

    #[test]
    fn test_custom_greeting() {
        assert_eq!(compose_greeting(&query("John", Some("Hi"), None)), "Hi John!");
    }

    #[test]
    fn test_empty_greeting_falls_back() {
        assert_eq!(compose_greeting(&query("John", Some(""), None)), "Hello John!");
    }

    #[test]
    fn test_excited_greeting() {
        assert_eq!(compose_greeting(&query("John", None, Some(true))), "HELLO JOHN!!!");
        assert_eq!(compose_greeting(&query("John", None, Some(false))), "Hello John!");
    }
}
