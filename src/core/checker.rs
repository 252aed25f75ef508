//! Response validation rules engine
//!
//! Stateless evaluation of one response against one rule, short-circuiting
//! in a fixed order:
//! 1. Status code: present and either exactly 404 or below 400
//! 2. Global blacklist: no configured substring appears in the body
//! 3. Whitelist rule: expected value appears as a body substring
//! 4. Structured assertion: first query result equals the expected value
//!
//! Validation failures are data, not faults: `check` returns a diagnostic
//! string that callers record and report.

use std::sync::Arc;

use crate::config::CheckerOptions;
use crate::core::document::DocumentQuery;
use crate::core::types::{Rule, RuleKind};

#[cfg(feature = "html-query")]
fn default_document() -> Arc<dyn DocumentQuery> {
    Arc::new(crate::core::document::HtmlDocumentQuery::new())
}

#[cfg(not(feature = "html-query"))]
fn default_document() -> Arc<dyn DocumentQuery> {
    Arc::new(crate::core::document::MockDocumentQuery::new())
}

/// Stateless validation rules engine.
///
/// One shared instance serves every pattern; it is a pure function of its
/// inputs plus the injected blacklist and document-query collaborator.
pub struct Checker {
    blacklist: Vec<String>,
    document: Arc<dyn DocumentQuery>,
}

impl Checker {
    pub fn new(options: CheckerOptions) -> Self {
        Self {
            blacklist: options.blacklist,
            document: default_document(),
        }
    }

    /// Replace the document query collaborator
    pub fn with_document(mut self, document: Arc<dyn DocumentQuery>) -> Self {
        self.document = document;
        self
    }

    /// Validate one response against one rule.
    ///
    /// # Arguments
    /// * `status` - HTTP status code, absent when the fetch never produced one
    /// * `text` - response body text
    /// * `rule` - the pattern's rule
    ///
    /// # Returns
    /// * `None` - response passed every applicable check
    /// * `Some(diagnostic)` - first failing check, as a human-readable string
    pub fn check(&self, status: Option<u16>, text: &str, rule: &Rule) -> Option<String> {
        if !Self::status_code_ok(status) {
            return Some(match status {
                Some(code) => format!("status_code check failed, get {}", code),
                None => "status_code check failed, get none".to_string(),
            });
        }

        for word in &self.blacklist {
            if text.contains(word.as_str()) {
                return Some(format!("global blacklist check failed, get {}", word));
            }
        }

        match rule.kind() {
            RuleKind::Whitelist { expected } => {
                if !text.contains(expected) {
                    return Some(format!("whitelist check failed, {} not found", expected));
                }
                None
            }
            RuleKind::Assertion { query, expected } => self.assert_document(text, query, expected),
            RuleKind::None => None,
        }
    }

    /// Informational, success, and redirect statuses are acceptable, plus 404
    /// (a proxy that faithfully relays a 404 is still a working proxy).
    fn status_code_ok(status: Option<u16>) -> bool {
        matches!(status, Some(code) if code == 404 || code < 400)
    }

    /// Evaluate a structured assertion, converting the three query outcomes
    /// into their distinct diagnostics
    fn assert_document(&self, text: &str, query: &str, expected: &str) -> Option<String> {
        match self.document.query_first(text, query) {
            Ok(None) => Some(format!("xpath check failed, {} not found", query)),
            Ok(Some(found)) if found != expected => {
                Some("xpath check failed, value not equal".to_string())
            }
            Ok(Some(_)) => None,
            Err(fault) => Some(format!("xpath check failed, {}", fault)),
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(CheckerOptions::default())
    }
}
