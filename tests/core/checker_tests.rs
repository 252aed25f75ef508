//! Tests for the response validation rules engine.
//!
//! Covers the short-circuit order (status code, global blacklist, whitelist,
//! structured assertion) and the exact diagnostic strings the rest of the
//! pipeline records.

use std::sync::Arc;

use proxyvet::config::CheckerOptions;
use proxyvet::core::checker::Checker;
use proxyvet::core::document::{DocumentQuery, QueryError};
use proxyvet::core::types::Rule;

/// Document query that always faults, for pinning the diagnostic conversion
struct FaultingQuery;

impl DocumentQuery for FaultingQuery {
    fn query_first(&self, _body: &str, _expr: &str) -> Result<Option<String>, QueryError> {
        Err(QueryError::Evaluation("document truncated".to_string()))
    }
}

#[test]
fn test_status_code_acceptance() {
    let checker = Checker::default();

    for code in [100u16, 200, 204, 302, 399, 404] {
        assert_eq!(
            checker.check(Some(code), "body", &Rule::none()),
            None,
            "status {} should be accepted",
            code
        );
    }

    for code in [400u16, 403, 405, 500, 502, 999] {
        assert_eq!(
            checker.check(Some(code), "body", &Rule::none()),
            Some(format!("status_code check failed, get {}", code)),
            "status {} should be rejected",
            code
        );
    }
}

#[test]
fn test_absent_status_is_rejected() {
    let checker = Checker::default();
    assert_eq!(
        checker.check(None, "body", &Rule::none()),
        Some("status_code check failed, get none".to_string())
    );
}

#[test]
fn test_status_rejection_preempts_rule() {
    let checker = Checker::default();
    assert_eq!(
        checker.check(Some(500), "status: OK", &Rule::whitelist("OK")),
        Some("status_code check failed, get 500".to_string())
    );
}

#[test]
fn test_blacklist_hit_fails_regardless_of_rule() {
    let checker = Checker::new(CheckerOptions::with_blacklist(["captcha"]));
    let body = "please solve this captcha to continue";

    assert_eq!(
        checker.check(Some(200), body, &Rule::none()),
        Some("global blacklist check failed, get captcha".to_string())
    );
    // A whitelist rule that would pass does not rescue a blacklisted body
    assert_eq!(
        checker.check(Some(200), body, &Rule::whitelist("continue")),
        Some("global blacklist check failed, get captcha".to_string())
    );
}

#[test]
fn test_whitelist_pass() {
    let checker = Checker::default();
    assert_eq!(
        checker.check(Some(200), "status: OK", &Rule::whitelist("OK")),
        None
    );
}

#[test]
fn test_whitelist_miss() {
    let checker = Checker::default();
    assert_eq!(
        checker.check(Some(200), "status: FAIL", &Rule::whitelist("OK")),
        Some("whitelist check failed, OK not found".to_string())
    );
}

#[test]
fn test_blank_assertion_is_skipped() {
    let checker = Checker::default();

    // Blank query
    assert_eq!(
        checker.check(Some(200), "<html></html>", &Rule::assertion("   ", "Home")),
        None
    );
    // Blank expected value
    assert_eq!(
        checker.check(
            Some(200),
            "<html></html>",
            &Rule::assertion("//title/text()", "   ")
        ),
        None
    );
}

#[test]
fn test_query_fault_carries_detail() {
    let checker = Checker::default().with_document(Arc::new(FaultingQuery));

    assert_eq!(
        checker.check(
            Some(200),
            "<html>",
            &Rule::assertion("//title/text()", "Home")
        ),
        Some("xpath check failed, document evaluation failed: document truncated".to_string())
    );
}

#[cfg(feature = "html-query")]
mod structured {
    use super::*;

    #[test]
    fn test_assertion_not_found() {
        let checker = Checker::default();
        let body = "<html><body><p>no title here</p></body></html>";

        assert_eq!(
            checker.check(Some(200), body, &Rule::assertion("//title/text()", "Home")),
            Some("xpath check failed, //title/text() not found".to_string())
        );
    }

    #[test]
    fn test_assertion_value_not_equal() {
        let checker = Checker::default();
        let body = "<html><head><title>Other</title></head></html>";

        assert_eq!(
            checker.check(Some(200), body, &Rule::assertion("//title/text()", "Home")),
            Some("xpath check failed, value not equal".to_string())
        );
    }

    #[test]
    fn test_assertion_pass() {
        let checker = Checker::default();
        let body = "<html><head><title>Home</title></head></html>";

        assert_eq!(
            checker.check(Some(200), body, &Rule::assertion("//title/text()", "Home")),
            None
        );
    }

    #[test]
    fn test_attribute_assertion() {
        let checker = Checker::default();
        let body = r#"<html><body><a href="/next">next</a></body></html>"#;

        assert_eq!(
            checker.check(Some(200), body, &Rule::assertion("//a/@href", "/next")),
            None
        );
    }

    #[test]
    fn test_assertion_fault_becomes_diagnostic() {
        let checker = Checker::default();
        let diagnostic = checker
            .check(Some(200), "<html></html>", &Rule::assertion(":::", "x"))
            .expect("invalid selector should fail the check");

        assert!(diagnostic.starts_with("xpath check failed,"));
    }
}
