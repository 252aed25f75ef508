// Core types shared across the validation pipeline

use serde::{Deserialize, Serialize};

/// Serialized pattern record - the wire/storage format.
///
/// A JSON object with exactly the fields `pattern`, `rule`, `value`; this is
/// what the remote store hash holds per pattern and what
/// [`Pattern::to_record`](crate::core::pattern::Pattern::to_record)
/// round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub pattern: String,
    pub rule: Option<String>,
    pub value: Option<String>,
}

/// Validation rule carried by a pattern.
///
/// The rule travels as two nullable strings; the effective kind is derived,
/// never stored:
/// - `rule == "whitelist"` - `value` must appear as a substring of the body
/// - `rule` and `value` both non-blank - `rule` is a document query
///   expression, `value` the expected first result
/// - anything else - no rule-specific check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub rule: Option<String>,
    pub value: Option<String>,
}

/// Effective rule kind derived from the nullable `(rule, value)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind<'a> {
    /// Body must contain `expected` as a substring
    Whitelist { expected: &'a str },
    /// First result of `query` against the body must equal `expected`
    Assertion { query: &'a str, expected: &'a str },
    /// No rule-specific check
    None,
}

impl Rule {
    pub fn new(rule: Option<String>, value: Option<String>) -> Self {
        Self { rule, value }
    }

    /// The null rule (sentinel patterns carry this)
    pub fn none() -> Self {
        Self::default()
    }

    /// Whitelist rule expecting `value` as a body substring
    pub fn whitelist(value: impl Into<String>) -> Self {
        Self {
            rule: Some("whitelist".to_string()),
            value: Some(value.into()),
        }
    }

    /// Structured assertion: first result of `query` must equal `expected`
    pub fn assertion(query: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            rule: Some(query.into()),
            value: Some(expected.into()),
        }
    }

    /// Derive the effective kind.
    ///
    /// A whitelist rule with an absent value degrades to an empty expected
    /// substring (vacuous pass) rather than a fault, so one malformed record
    /// cannot poison every check against its pattern. An assertion whose
    /// query or expected value is blank after trimming is skipped entirely.
    pub fn kind(&self) -> RuleKind<'_> {
        match self.rule.as_deref() {
            Some("whitelist") => RuleKind::Whitelist {
                expected: self.value.as_deref().unwrap_or(""),
            },
            Some(query) => {
                let expected = self.value.as_deref().unwrap_or("");
                if !query.trim().is_empty() && !expected.trim().is_empty() {
                    RuleKind::Assertion { query, expected }
                } else {
                    RuleKind::None
                }
            }
            None => RuleKind::None,
        }
    }
}
