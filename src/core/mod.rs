pub mod checker;
pub mod counter;
pub mod document;
pub mod manager;
pub mod pattern;
pub mod response;
pub mod saver;
pub mod store;
pub mod trie;
pub mod types;

// Re-export public API
pub use checker::Checker;
pub use counter::BucketCounter;
pub use document::{DocumentQuery, QueryError};
pub use manager::{ManagerError, PatternManager, PatternSeries, StatusReport};
pub use pattern::{Pattern, PatternError};
pub use response::{ProxyResponse, StaticResponse};
pub use saver::{LogSaver, ResultSaver};
pub use store::{MemoryStore, RemoteStore, StoreError};
pub use trie::{PatternTrie, SENTINEL_PATTERN};
pub use types::{PatternRecord, Rule, RuleKind};

// Re-export the document query implementation matching the build
#[cfg(feature = "html-query")]
pub use document::HtmlDocumentQuery;

#[cfg(not(feature = "html-query"))]
pub use document::MockDocumentQuery;
