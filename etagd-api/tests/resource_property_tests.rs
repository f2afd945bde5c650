//! Property-Based Tests for the Conditional Resource Service Object
//!
//! Drives `ConditionalResource` directly, the way the conditional middleware
//! does, with the shared generators and fixtures:
//! - validators are deterministic and well-formed for any payload
//! - a finalized body issues its validator, and a follow-up `If-None-Match`
//!   read with it is answered `304`
//! - the default value is re-derived only once the freshness window elapsed

use axum::http::{Method, StatusCode};
use chrono::Duration;
use etagd_core::{minute_of, Payload, ResponseDraft};
use etagd_test_utils::assertions::assert_validator_format;
use etagd_test_utils::fixtures::{fixed_instant, resource_at_fixed_instant};
use etagd_test_utils::generators::{arb_payload, arb_resource_body, arb_timestamp};
use etagd_test_utils::{Preconditions, Validator, DEFAULT_VALIDATOR_HEX_LEN};
use proptest::prelude::*;

fn ok_draft(payload: &[u8]) -> ResponseDraft<'_> {
    ResponseDraft {
        status: StatusCode::OK,
        existing_validator: None,
        payload: Payload::Bytes(payload),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_validator_is_deterministic(payload in arb_payload()) {
        let first = Validator::from_payload(&payload);
        let second = Validator::from_payload(&payload);
        prop_assert_eq!(&first, &second);
        assert_validator_format(first.as_str(), DEFAULT_VALIDATOR_HEX_LEN);
    }

    #[test]
    fn prop_finalize_issues_payload_validator(payload in arb_payload()) {
        let resource = resource_at_fixed_instant();
        let context = resource
            .precheck(&Method::GET, &Preconditions::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let finalized = resource.finalize(&context, ok_draft(&payload));
        let expected = Validator::from_payload(&payload);
        prop_assert_eq!(finalized.status, StatusCode::OK);
        prop_assert!(!finalized.strip_body);
        prop_assert_eq!(finalized.issued.as_ref(), Some(&expected));
        prop_assert_eq!(resource.current_validator(), Some(expected));
    }

    #[test]
    fn prop_issued_validator_answers_not_modified(body in arb_resource_body()) {
        let resource = resource_at_fixed_instant();
        let first = resource
            .precheck(&Method::GET, &Preconditions::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let issued = resource
            .finalize(&first, ok_draft(&body))
            .issued
            .ok_or_else(|| TestCaseError::fail("body did not issue a validator"))?;

        let conditional = Preconditions::new(None, Some(issued.as_str()));
        let second = resource
            .precheck(&Method::GET, &conditional)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(second.not_modified_candidate);

        let finalized = resource.finalize(&second, ok_draft(&body));
        prop_assert_eq!(finalized.status, StatusCode::NOT_MODIFIED);
        prop_assert!(finalized.strip_body);
        prop_assert_eq!(resource.current_validator(), Some(issued));
    }

    #[test]
    fn prop_default_refreshes_after_window(
        now in prop_oneof![
            arb_timestamp(),
            (-240i64..240).prop_map(|secs| fixed_instant() + Duration::seconds(secs)),
        ]
    ) {
        let resource = resource_at_fixed_instant();
        let elapsed = (now - fixed_instant()).num_seconds();
        let expected = if elapsed > 120 { minute_of(now) } else { 12 };
        prop_assert_eq!(resource.read_at(now).value, expected);
    }
}
