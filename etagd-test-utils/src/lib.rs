//! etagd Test Utilities
//!
//! Shared test infrastructure for the etagd workspace:
//! - Proptest generators for payloads, values and validators
//! - Fixtures for deterministic resources and conditional requests
//! - Assertions for validator formatting

pub use etagd_core::{
    ConditionalResource, Preconditions, ResourceValue, Timestamp, Validator,
    DEFAULT_VALIDATOR_HEX_LEN,
};

use chrono::{TimeZone, Utc};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for etagd types.

    use super::*;
    use proptest::prelude::*;

    /// Any value accepted by the resource schema.
    pub fn arb_value() -> impl Strategy<Value = i64> {
        prop_oneof![
            any::<i64>(),
            -1000i64..1000,
            Just(0i64),
            Just(i64::MIN),
            Just(i64::MAX),
        ]
    }

    /// Raw payload bytes.
    pub fn arb_payload() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(any::<u8>(), 0..1024)
    }

    /// JSON body of the resource for a value.
    pub fn arb_resource_body() -> impl Strategy<Value = Vec<u8>> {
        arb_value().prop_map(|value| super::fixtures::resource_body(value))
    }

    /// Validator derived from an arbitrary payload.
    pub fn arb_validator() -> impl Strategy<Value = Validator> {
        arb_payload().prop_map(|payload| Validator::from_payload(&payload))
    }

    /// Header token that may or may not look like a validator.
    pub fn arb_header_token() -> impl Strategy<Value = String> {
        prop_oneof![
            "\"[0-9a-f]{8}\"",
            "W/\"[0-9a-f]{8}\"",
            "[0-9a-f]{8}",
            "[ -~]{0,24}",
            Just("*".to_string()),
        ]
    }

    /// Timestamp between 2020 and 2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common scenarios.

    use super::*;
    use http::header::{CONTENT_TYPE, IF_MATCH, IF_NONE_MATCH};
    use http::{Method, Request};

    /// Path of the conditional resource in the API router.
    pub const RESOURCE_PATH: &str = "/etag";

    /// 2024-05-17T09:12:00Z. Its minute component is 12.
    pub fn fixed_instant() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 12, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Resource whose default value is derived from [`fixed_instant`].
    pub fn resource_at_fixed_instant() -> ConditionalResource {
        ConditionalResource::starting_at(fixed_instant())
    }

    /// Serialized resource body exactly as the API sends it.
    pub fn resource_body(value: i64) -> Vec<u8> {
        serde_json::json!({ "value": value }).to_string().into_bytes()
    }

    /// `GET` on the resource, optionally conditional.
    pub fn read_request(if_none_match: Option<&str>) -> Request<String> {
        let mut builder = Request::builder().method(Method::GET).uri(RESOURCE_PATH);
        if let Some(tag) = if_none_match {
            builder = builder.header(IF_NONE_MATCH, tag);
        }
        builder
            .body(String::new())
            .unwrap_or_else(|_| Request::new(String::new()))
    }

    /// Write (`POST`/`PUT`) of `value`, optionally with `If-Match`.
    pub fn write_request(method: Method, value: i64, if_match: Option<&str>) -> Request<String> {
        let body = serde_json::json!({ "value": value }).to_string();
        write_request_raw(method, body, if_match)
    }

    /// Write with an arbitrary body, for schema validation tests.
    pub fn write_request_raw(
        method: Method,
        body: impl Into<String>,
        if_match: Option<&str>,
    ) -> Request<String> {
        let body = body.into();
        let mut builder = Request::builder()
            .method(method)
            .uri(RESOURCE_PATH)
            .header(CONTENT_TYPE, "application/json");
        if let Some(tag) = if_match {
            builder = builder.header(IF_MATCH, tag);
        }
        builder
            .body(body.clone())
            .unwrap_or_else(|_| Request::new(body))
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for etagd-specific formats.

    /// Panics unless `tag` is a quoted lowercase hex validator of `hex_len`.
    pub fn assert_validator_format(tag: &str, hex_len: usize) {
        assert_eq!(tag.len(), hex_len + 2, "validator {tag} has wrong length");
        assert!(
            tag.starts_with('"') && tag.ends_with('"'),
            "validator {tag} is not quoted"
        );
        assert!(
            tag[1..tag.len() - 1]
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
            "validator {tag} is not lowercase hex"
        );
    }
}
