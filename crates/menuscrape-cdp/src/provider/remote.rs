//! Provider for a browser someone else already runs.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::error::CdpError;

use super::BrowserProvider;

/// An already-running browser at a fixed endpoint.
///
/// Hosted browser services hand out such an endpoint; this process never owns
/// the browser, so `stop` only forgets the endpoint.
#[derive(Debug, Clone)]
pub struct RemoteBrowser {
    endpoint: String,
    started: bool,
}

impl RemoteBrowser {
    /// Create a provider for `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, CdpError> {
        let endpoint = endpoint.into();
        Url::parse(&endpoint)?;
        Ok(Self {
            endpoint,
            started: false,
        })
    }
}

#[async_trait]
impl BrowserProvider for RemoteBrowser {
    fn name(&self) -> &str {
        "remote"
    }

    async fn start(&mut self) -> Result<(), CdpError> {
        debug!("Using remote browser at {}", self.endpoint);
        self.started = true;
        Ok(())
    }

    fn cdp_endpoint(&self) -> Result<String, CdpError> {
        if !self.started {
            return Err(CdpError::ConnectionFailed(
                "remote browser provider not started".to_string(),
            ));
        }
        Ok(self.endpoint.clone())
    }

    async fn stop(&mut self) -> Result<(), CdpError> {
        self.started = false;
        Ok(())
    }
}
