//! Integration tests for rule chains.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::json;
use vouch::assert::{assert_in, assert_string, assert_string_not_empty};
use vouch::parse::{split, to_lower_case, to_upper_case, trim};
use vouch::{Rule, RuleChain, RuleError, Validate};

#[test]
fn test_chain_type_error_skips_transform() {
    let transformed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&transformed);

    let chain = RuleChain::new()
        .assert(assert_string)
        .assert(assert_string_not_empty)
        .transform(move |v| {
            flag.store(true, Ordering::SeqCst);
            to_upper_case(v)
        });

    let error = chain.apply(&json!(123)).unwrap_err();
    assert_eq!(error.name, "E_NOT_STRING");
    assert!(!transformed.load(Ordering::SeqCst));
}

#[test]
fn test_chain_error_is_not_wrapped() {
    let chain = RuleChain::new().transform(trim).assert(assert_string_not_empty);
    let error = chain.apply(&json!("   ")).unwrap_err();
    assert_eq!(error.name, "E_STRING_EMPTY");
    assert!(error.cause.is_none());
}

#[test]
fn test_slug_pipeline() {
    let slug = RuleChain::new()
        .assert(assert_string)
        .transform(trim)
        .transform(to_lower_case)
        .replace(r"[^a-z0-9]+", "-")
        .and_then(|chain| chain.pattern(r"^[a-z0-9-]+$"))
        .unwrap();

    assert_eq!(slug.apply(&json!("  Hello World!! ")).unwrap(), json!("hello-world-"));
}

#[test]
fn test_bound_rule_in_chain() {
    let size = RuleChain::new()
        .transform(to_upper_case)
        .bind(assert_in, vec![json!("S"), json!("M"), json!("L")])
        .unwrap();

    assert_eq!(size.apply(&json!("m")).unwrap(), json!("M"));
    assert_eq!(size.apply(&json!("xl")).unwrap_err().name, "E_VALUE_NOT_ALLOWED");
}

#[test]
fn test_build_time_errors() {
    match RuleChain::new().pattern("[a-") {
        Err(RuleError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "[a-"),
        other => panic!("expected invalid pattern, got {other:?}"),
    }
    assert!(matches!(
        RuleChain::new().bind(assert_in, Vec::new()),
        Err(RuleError::MissingParameters)
    ));
}

#[test]
fn test_chain_reused_across_inputs() {
    let tags = RuleChain::new()
        .assert(assert_string)
        .transform(split(","))
        .then(Rule::transform(|v| Ok(json!(v.as_array().map_or(0, Vec::len)))));

    assert_eq!(tags.apply(&json!("a,b,c")).unwrap(), json!(3));
    assert_eq!(tags.apply(&json!("solo")).unwrap(), json!(1));
}

#[test]
fn test_validate_reports_validation() {
    let chain = RuleChain::new().assert(assert_string);
    assert!(chain.validate(&json!("x")).is_success());
    let error = chain.validate(&json!(1)).into_result().unwrap_err();
    assert_eq!(error.name, "E_NOT_STRING");
}
