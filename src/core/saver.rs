//! Result saver seam

use crate::core::response::ProxyResponse;

/// Accepts detailed per-check results for durable logging.
///
/// This is the only point where detailed results leave the core; the saver's
/// storage format is its own concern.
#[async_trait::async_trait]
pub trait ResultSaver: Send + Sync {
    /// Persist the outcome of checking `response` fetched through `proxy`
    /// against the pattern named `pattern`
    async fn save_result(
        &self,
        pattern: &str,
        proxy: &str,
        response: &dyn ProxyResponse,
    ) -> Result<(), String>;
}

/// Saver that records outcomes through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSaver;

impl LogSaver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ResultSaver for LogSaver {
    async fn save_result(
        &self,
        pattern: &str,
        proxy: &str,
        response: &dyn ProxyResponse,
    ) -> Result<(), String> {
        log::info!(
            "check result: pattern={} proxy={} status={}",
            pattern,
            proxy,
            response
                .status()
                .map_or_else(|| "none".to_string(), |code| code.to_string())
        );
        Ok(())
    }
}
