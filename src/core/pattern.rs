//! Pattern: a URL-prefix identity paired with a validation rule and its
//! outcome history
//!
//! A Pattern binds the rule to a shared `Checker`, an optional result saver,
//! and a pair of bounded time-bucket counters (success and failure). Pattern
//! identity is its string form; equality and map keys are by this string,
//! never by object identity.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::checker::Checker;
use crate::core::counter::BucketCounter;
use crate::core::response::ProxyResponse;
use crate::core::saver::ResultSaver;
use crate::core::types::{PatternRecord, Rule};

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("response body read failed: {0}")]
    Body(String),
    #[error("result save failed: {0}")]
    Save(String),
}

#[derive(Debug, Default)]
struct Counters {
    success: BucketCounter,
    fail: BucketCounter,
}

pub struct Pattern {
    pattern_str: String,
    rule: Rule,
    checker: Arc<Checker>,
    saver: Option<Arc<dyn ResultSaver>>,
    // Per-pattern lock: concurrent validations of the same pattern must not
    // interleave their increment-and-evict sequence. Different patterns'
    // counters are independent.
    counters: Mutex<Counters>,
}

impl Pattern {
    pub fn new(
        pattern_str: impl Into<String>,
        rule: Rule,
        checker: Arc<Checker>,
        saver: Option<Arc<dyn ResultSaver>>,
    ) -> Self {
        Self {
            pattern_str: pattern_str.into(),
            rule,
            checker,
            saver,
            counters: Mutex::new(Counters::default()),
        }
    }

    /// Reconstruct a pattern from its wire-format record
    pub fn from_record(
        record: PatternRecord,
        checker: Arc<Checker>,
        saver: Option<Arc<dyn ResultSaver>>,
    ) -> Self {
        Self::new(
            record.pattern,
            Rule::new(record.rule, record.value),
            checker,
            saver,
        )
    }

    pub fn pattern(&self) -> &str {
        &self.pattern_str
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Validate `response` against this pattern's rule.
    ///
    /// Reading the body may suspend; a read failure is a genuine fault. A
    /// completed validation returns an empty list (pass) or a one-element
    /// list carrying the failure diagnostic.
    pub async fn check(&self, response: &dyn ProxyResponse) -> Result<Vec<String>, PatternError> {
        let text = response.text().await.map_err(PatternError::Body)?;
        match self.checker.check(response.status(), &text, &self.rule) {
            None => Ok(Vec::new()),
            Some(diagnostic) => Ok(vec![diagnostic]),
        }
    }

    /// Record one validation outcome into the `label` time bucket.
    ///
    /// Safe under concurrent invocation for the same pattern; the
    /// increment-and-evict sequence runs under this pattern's lock.
    pub async fn counter(&self, label: &str, success: bool) {
        let mut counters = self.counters.lock().await;
        if success {
            counters.success.increment(label);
        } else {
            counters.fail.increment(label);
        }
    }

    /// Success and failure tallies for one time bucket
    pub async fn bucket_counts(&self, label: &str) -> (Option<u64>, Option<u64>) {
        let counters = self.counters.lock().await;
        (counters.success.get(label), counters.fail.get(label))
    }

    /// Rolling success rate as parallel label/percentage series.
    ///
    /// For every label in the success counter, in insertion order:
    /// `100 * success / (success + fail)` when the label also exists in the
    /// failure counter, else 100. Labels present only in the failure counter
    /// are not represented; see DESIGN.md on this asymmetry.
    pub async fn success_rate(&self) -> (Vec<String>, Vec<f64>) {
        let counters = self.counters.lock().await;
        let mut labels = Vec::with_capacity(counters.success.len());
        let mut rates = Vec::with_capacity(counters.success.len());
        for (label, successes) in counters.success.iter() {
            let rate = match counters.fail.get(label) {
                Some(failures) => (successes as f64 / (successes + failures) as f64) * 100.0,
                None => 100.0,
            };
            labels.push(label.to_string());
            rates.push(rate);
        }
        (labels, rates)
    }

    /// Forward the detailed result to the saver when one is configured;
    /// no-op otherwise
    pub async fn score_and_save(
        &self,
        proxy: &str,
        response: &dyn ProxyResponse,
    ) -> Result<(), PatternError> {
        if let Some(saver) = &self.saver {
            saver
                .save_result(&self.pattern_str, proxy, response)
                .await
                .map_err(PatternError::Save)?;
        }
        Ok(())
    }

    /// Wire-format record for this pattern
    pub fn to_record(&self) -> PatternRecord {
        PatternRecord {
            pattern: self.pattern_str.clone(),
            rule: self.rule.rule.clone(),
            value: self.rule.value.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_record())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern_str)
    }
}
