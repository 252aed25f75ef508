//! Pattern lifecycle orchestration
//!
//! The manager owns the three views of the pattern registry:
//! - the in-memory index (pattern string -> live `Pattern`)
//! - the prefix trie resolving URLs to their closest pattern
//! - the remote store hash persisting pattern records
//!
//! Every mutation is mirrored to all three. No transaction spans them;
//! `add`/`delete` are best-effort synchronized writes (see DESIGN.md), and
//! `restore_registry` is the recovery hatch when the store diverges.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use crate::config::ManagerOptions;
use crate::core::checker::Checker;
use crate::core::pattern::Pattern;
use crate::core::saver::ResultSaver;
use crate::core::store::{RemoteStore, StoreError};
use crate::core::trie::{PatternTrie, SENTINEL_PATTERN};
use crate::core::types::{PatternRecord, Rule};

/// Minute slots in a status snapshot
const STATUS_WINDOW_MINUTES: i64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("pattern not found: {0}")]
    PatternNotFound(String),
    #[error("malformed pattern record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Ten-slot success-rate series for one pattern, aligned to the snapshot's
/// minute labels
#[derive(Debug, Clone, Serialize)]
pub struct PatternSeries {
    pub pattern: String,
    pub serial: Vec<f64>,
}

/// Aggregated status snapshot across every registered pattern
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Minute labels (`%H:%M`), oldest first, ending at "now"
    pub labels: Vec<String>,
    pub items: Vec<PatternSeries>,
}

pub struct PatternManager {
    store: Arc<dyn RemoteStore>,
    checker: Arc<Checker>,
    saver: Option<Arc<dyn ResultSaver>>,
    patterns: HashMap<String, Arc<Pattern>>,
    trie: PatternTrie,
    registry_key: String,
}

impl PatternManager {
    /// Create an unopened manager against `store`. Call `with_checker` /
    /// `with_saver` before `open` so loaded patterns share the collaborators.
    pub fn new(store: Arc<dyn RemoteStore>, options: ManagerOptions) -> Self {
        Self {
            store,
            checker: Arc::new(Checker::default()),
            saver: None,
            patterns: HashMap::new(),
            trie: PatternTrie::new(),
            registry_key: options.registry_key,
        }
    }

    /// Replace the shared checker
    pub fn with_checker(mut self, checker: Arc<Checker>) -> Self {
        self.checker = checker;
        self
    }

    /// Attach a result saver shared by every pattern
    pub fn with_saver(mut self, saver: Arc<dyn ResultSaver>) -> Self {
        self.saver = Some(saver);
        self
    }

    /// Load every persisted pattern into the trie and the in-memory index,
    /// then ensure the `public_proxies` sentinel exists.
    ///
    /// The store connection is released before returning on any failure past
    /// this point; a failed open never leaks the connection.
    pub async fn open(mut self) -> Result<Self, ManagerError> {
        match self.load().await {
            Ok(()) => Ok(self),
            Err(err) => {
                self.store.close().await;
                Err(err)
            }
        }
    }

    async fn load(&mut self) -> Result<(), ManagerError> {
        let records = self.store.hgetall(&self.registry_key).await?;
        for raw in records.values() {
            let record: PatternRecord = serde_json::from_str(raw)?;
            let pattern = Pattern::from_record(record, self.checker.clone(), self.saver.clone());
            self.trie
                .insert(pattern.pattern(), serde_json::to_string(pattern.rule())?);
            self.patterns
                .insert(pattern.pattern().to_string(), Arc::new(pattern));
        }
        info!(
            "loaded {} patterns from registry {}",
            self.patterns.len(),
            self.registry_key
        );

        if !self.patterns.contains_key(SENTINEL_PATTERN) {
            self.add(SENTINEL_PATTERN, Rule::none()).await?;
        }
        Ok(())
    }

    /// Release the store connection
    pub async fn close(&self) {
        self.store.close().await;
    }

    /// Register a pattern: construct it, insert into the index (overwriting
    /// any existing entry), write its rule payload into the trie, persist
    /// its record to the store
    pub async fn add(&mut self, pattern: &str, rule: Rule) -> Result<(), ManagerError> {
        let built = Pattern::new(pattern, rule, self.checker.clone(), self.saver.clone());
        let record = built.to_json()?;
        let payload = serde_json::to_string(built.rule())?;

        debug!("registering pattern {}", pattern);
        self.patterns.insert(pattern.to_string(), Arc::new(built));
        self.trie.insert(pattern, payload);
        self.store.hset(&self.registry_key, pattern, &record).await?;
        Ok(())
    }

    /// Full replace: recreating the pattern resets its counters. Preserved
    /// behavior; see DESIGN.md.
    pub async fn update(&mut self, pattern: &str, rule: Rule) -> Result<(), ManagerError> {
        self.add(pattern, rule).await
    }

    /// Remove a pattern from trie, index, and store.
    ///
    /// Fails with `PatternNotFound` when the key is absent from the trie or
    /// the index.
    pub async fn delete(&mut self, pattern: &str) -> Result<(), ManagerError> {
        if !self.trie.remove(pattern) || self.patterns.remove(pattern).is_none() {
            return Err(ManagerError::PatternNotFound(pattern.to_string()));
        }
        self.store.hdel(&self.registry_key, pattern).await?;
        info!("deleted pattern {}", pattern);
        Ok(())
    }

    /// In-memory lookup by exact pattern string, no fallback
    pub fn get_pattern(&self, pattern: &str) -> Option<Arc<Pattern>> {
        self.patterns.get(pattern).cloned()
    }

    /// Closest applicable pattern for `url` (trie resolution, with the
    /// sentinel fallback)
    pub fn closest_pattern(&self, url: &str) -> (String, String) {
        self.trie.closest_pattern(url)
    }

    /// Freshly constructed patterns for every record currently persisted in
    /// the store
    pub async fn patterns(&self) -> Result<Vec<Pattern>, ManagerError> {
        let records = self.store.hgetall(&self.registry_key).await?;
        let mut out = Vec::with_capacity(records.len());
        for raw in records.values() {
            let record: PatternRecord = serde_json::from_str(raw)?;
            out.push(Pattern::from_record(
                record,
                self.checker.clone(),
                self.saver.clone(),
            ));
        }
        Ok(out)
    }

    /// Bulk-write every registered pattern's record back to the store hash.
    ///
    /// Recovery hatch for store divergence; see DESIGN.md on multi-store
    /// consistency.
    pub async fn restore_registry(&self) -> Result<(), ManagerError> {
        let mut fields = Vec::with_capacity(self.patterns.len());
        for (name, pattern) in &self.patterns {
            fields.push((name.clone(), pattern.to_json()?));
        }
        self.store.hset_all(&self.registry_key, &fields).await?;
        info!("restored {} patterns to registry {}", fields.len(), self.registry_key);
        Ok(())
    }

    /// Status snapshot over the last 10 minutes.
    ///
    /// Labels run oldest first, ending at "now". Every registered pattern
    /// contributes a 10-slot series aligned to those labels; slots without a
    /// matching success-rate entry stay 0. Read-only.
    pub async fn status(&self) -> StatusReport {
        let now = chrono::Local::now();
        let labels: Vec<String> = (0..STATUS_WINDOW_MINUTES)
            .rev()
            .map(|i| (now - chrono::Duration::minutes(i)).format("%H:%M").to_string())
            .collect();

        let mut items = Vec::with_capacity(self.patterns.len());
        for pattern in self.patterns.values() {
            let (times, rates) = pattern.success_rate().await;
            let mut serial = vec![0.0; labels.len()];
            for (time, rate) in times.iter().zip(rates.iter()) {
                if let Some(slot) = labels.iter().position(|label| label == time) {
                    serial[slot] = *rate;
                }
            }
            items.push(PatternSeries {
                pattern: pattern.pattern().to_string(),
                serial,
            });
        }
        StatusReport { labels, items }
    }

    /// A random member of the store-side set `<pattern>_cookies`; thin
    /// passthrough to the store
    pub async fn get_cookies(&self, pattern: &str) -> Result<Option<String>, ManagerError> {
        Ok(self
            .store
            .srandmember(&format!("{}_cookies", pattern))
            .await?)
    }
}
