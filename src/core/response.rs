//! Response object seam for the external fetch collaborator

/// Response produced by the component that issues proxied requests.
///
/// Exposes the two things validation needs: an integer-or-absent status code
/// and an asynchronous body-text accessor.
#[async_trait::async_trait]
pub trait ProxyResponse: Send + Sync {
    /// HTTP status code, absent when the fetch never produced one
    fn status(&self) -> Option<u16>;

    /// Response body text. May suspend while the body streams in.
    ///
    /// # Returns
    /// * `Ok(String)` - complete body text
    /// * `Err(String)` - body read failure (a genuine fault, not a
    ///   validation outcome)
    async fn text(&self) -> Result<String, String>;
}

/// Fully buffered response, for tests and for adapting completed fetches
#[derive(Debug, Clone, Default)]
pub struct StaticResponse {
    status: Option<u16>,
    body: String,
}

impl StaticResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: body.into(),
        }
    }

    /// Response whose fetch never produced a status code
    pub fn missing_status(body: impl Into<String>) -> Self {
        Self {
            status: None,
            body: body.into(),
        }
    }
}

#[async_trait::async_trait]
impl ProxyResponse for StaticResponse {
    fn status(&self) -> Option<u16> {
        self.status
    }

    async fn text(&self) -> Result<String, String> {
        Ok(self.body.clone())
    }
}
