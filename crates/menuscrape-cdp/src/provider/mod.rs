//! Browser-session providers.
//!
//! A provider owns the lifecycle of a browser that speaks CDP and hands out
//! its connection endpoint. Callers pair every successful `start` with a
//! `stop`, including on error paths.

mod local;
mod remote;

use async_trait::async_trait;

use crate::error::CdpError;

pub use local::{LocalChrome, LocalChromeConfig};
pub use remote::RemoteBrowser;

/// Supplies a running browser reachable over CDP.
#[async_trait]
pub trait BrowserProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Make the browser available. Idempotent.
    async fn start(&mut self) -> Result<(), CdpError>;

    /// Connection endpoint (`http://host:port` or `ws://…`) of the started browser.
    fn cdp_endpoint(&self) -> Result<String, CdpError>;

    /// Release the browser. Safe to call when not started.
    async fn stop(&mut self) -> Result<(), CdpError>;
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
