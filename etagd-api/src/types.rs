//! Request and response bodies.

use serde::{Deserialize, Serialize};

/// Body of the conditional resource in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResourceBody {
    pub value: i64,
}

impl From<etagd_core::ResourceValue> for ResourceBody {
    fn from(value: etagd_core::ResourceValue) -> Self {
        Self { value: value.value }
    }
}

/// Query of `GET /greet`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GreetQuery {
    /// Who to greet
    pub name: String,
    /// Greeting word, "Hello" when omitted
    pub greeting: Option<String>,
    /// Shout the greeting
    pub excited: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GreetResponse {
    pub message: String,
}
