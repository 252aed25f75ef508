//! proxyvet - Response-validation core for proxy health pipelines
//!
//! Given an HTTP response fetched through some proxy for some target URL,
//! decide whether the response indicates the proxy is healthy, and remember
//! that outcome over time so health can be reported as a rolling success
//! rate. Validation rules are registered per URL-prefix and resolved by
//! longest-prefix match with a safe default.
//!
//! The crate performs no network I/O itself: the HTTP fetcher, the remote
//! store, the structured-document query engine, and the result saver are all
//! collaborators behind async traits.

pub mod config;
pub mod core;

// Re-export the primary API surface
pub use crate::config::{CheckerOptions, ManagerOptions};
pub use crate::core::checker::Checker;
pub use crate::core::manager::{ManagerError, PatternManager, PatternSeries, StatusReport};
pub use crate::core::pattern::{Pattern, PatternError};
pub use crate::core::response::{ProxyResponse, StaticResponse};
pub use crate::core::saver::{LogSaver, ResultSaver};
pub use crate::core::store::{MemoryStore, RemoteStore, StoreError};
pub use crate::core::trie::{PatternTrie, SENTINEL_PATTERN};
pub use crate::core::types::{PatternRecord, Rule};
