//! Checker and manager configuration options

/// Configuration for the validation rules engine
#[derive(Debug, Clone, Default)]
pub struct CheckerOptions {
    /// Substrings that fail validation when found anywhere in a response
    /// body, regardless of the pattern's own rule.
    /// Default: empty (no global blacklist)
    pub blacklist: Vec<String>,
}

impl CheckerOptions {
    /// Create options with the given global blacklist
    pub fn with_blacklist<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blacklist: words.into_iter().map(Into::into).collect(),
        }
    }
}

/// Configuration for the pattern manager
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// Store hash under which pattern records are persisted.
    /// Default: "response_check_pattern" (the registry name the rest of the
    /// pipeline reads)
    pub registry_key: String,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            registry_key: "response_check_pattern".to_string(),
        }
    }
}
