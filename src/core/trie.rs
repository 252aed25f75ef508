//! Prefix index over normalized pattern strings
//!
//! Maps URL prefixes to their serialized rule payloads and resolves the
//! closest applicable pattern for a URL by longest-prefix match. Matching is
//! purely lexical over the normalized string, never path-segment-aware: a
//! pattern registered for `example.com` matches `example.com/path`.

use std::collections::HashMap;

/// Always-present fallback pattern with a null rule
pub const SENTINEL_PATTERN: &str = "public_proxies";

#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, Node>,
    value: Option<String>,
}

/// Character-level prefix trie over scheme-stripped keys.
///
/// Values are the serialized `{rule, value}` payloads; the key itself is the
/// pattern identity and is not duplicated inside the payload. A node without
/// a stored value is not a match.
#[derive(Debug, Default)]
pub struct PatternTrie {
    root: Node,
    len: usize,
}

impl PatternTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip a leading `http://`/`https://`. Normalization is lexical only.
    pub fn normalize(url: &str) -> &str {
        url.strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url)
    }

    /// Insert `value` under the normalized `key`, overwriting any existing
    /// entry
    pub fn insert(&mut self, key: &str, value: String) {
        let mut node = &mut self.root;
        for ch in Self::normalize(key).chars() {
            node = node.children.entry(ch).or_default();
        }
        if node.value.replace(value).is_none() {
            self.len += 1;
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let mut node = &self.root;
        for ch in Self::normalize(key).chars() {
            node = node.children.get(&ch)?;
        }
        node.value.as_deref()
    }

    /// Remove the entry under the normalized `key`, reporting whether it was
    /// present. Branches left empty by the removal are pruned.
    pub fn remove(&mut self, key: &str) -> bool {
        let path: Vec<char> = Self::normalize(key).chars().collect();
        let removed = Self::remove_at(&mut self.root, &path);
        if removed {
            self.len -= 1;
        }
        removed
    }

    fn remove_at(node: &mut Node, path: &[char]) -> bool {
        let Some((ch, rest)) = path.split_first() else {
            return node.value.take().is_some();
        };
        let Some(child) = node.children.get_mut(ch) else {
            return false;
        };
        let removed = Self::remove_at(child, rest);
        if removed && child.value.is_none() && child.children.is_empty() {
            node.children.remove(ch);
        }
        removed
    }

    /// Longest registered prefix of the normalized `url`, with its payload
    pub fn longest_prefix(&self, url: &str) -> Option<(String, &str)> {
        let url = Self::normalize(url);
        let mut node = &self.root;
        let mut best = node.value.as_deref().map(|v| (0, v));
        let mut depth = 0;
        for ch in url.chars() {
            match node.children.get(&ch) {
                Some(child) => {
                    node = child;
                    depth += ch.len_utf8();
                    if let Some(value) = node.value.as_deref() {
                        best = Some((depth, value));
                    }
                }
                None => break,
            }
        }
        best.map(|(depth, value)| (url[..depth].to_string(), value))
    }

    /// Closest applicable pattern for `url`.
    ///
    /// # Returns
    /// The longest-prefix entry as `(pattern, payload)`, or the
    /// `public_proxies` sentinel with a null rule when nothing matches.
    pub fn closest_pattern(&self, url: &str) -> (String, String) {
        match self.longest_prefix(url) {
            Some((pattern, payload)) => (pattern, payload.to_string()),
            None => (
                SENTINEL_PATTERN.to_string(),
                serde_json::json!({ "rule": null, "value": null }).to_string(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
