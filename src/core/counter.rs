// Bounded time-bucket tally for validation outcomes

use std::collections::VecDeque;

/// Distinct time buckets retained per counter; oldest-inserted evicted first
const MAX_BUCKETS: usize = 10;

/// Insertion-ordered map from time-bucket label to occurrence count.
///
/// Retains at most the 10 most-recently-inserted distinct labels; eviction is
/// FIFO by insertion order, which coincides with chronological order under
/// normal operation since buckets are created in real time.
///
/// Not internally synchronized - the owning `Pattern` guards its counters
/// with a per-pattern lock.
#[derive(Debug, Clone, Default)]
pub struct BucketCounter {
    buckets: VecDeque<(String, u64)>,
}

impl BucketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for `label`, inserting it if new, then evict
    /// oldest-inserted buckets until at most `MAX_BUCKETS` remain
    pub fn increment(&mut self, label: &str) {
        if let Some((_, count)) = self.buckets.iter_mut().find(|(l, _)| l == label) {
            *count += 1;
        } else {
            self.buckets.push_back((label.to_string(), 1));
        }

        while self.buckets.len() > MAX_BUCKETS {
            self.buckets.pop_front();
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.buckets
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Buckets in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.buckets.iter().map(|(l, c)| (l.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
