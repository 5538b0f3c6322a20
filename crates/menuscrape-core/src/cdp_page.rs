//! `MenuPage` over a CDP page session.

use std::time::Duration;

use async_trait::async_trait;
use menuscrape_cdp::{CdpError, PageSession};

use crate::error::ScrapeError;
use crate::page::MenuPage;

/// A DOM node id; invalidated by the browser when the document changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle(pub i64);

/// A CDP page session driven as a `MenuPage`.
pub struct CdpPage {
    session: PageSession,
    navigation_timeout: Duration,
}

impl CdpPage {
    pub fn new(session: PageSession, navigation_timeout: Duration) -> Self {
        Self {
            session,
            navigation_timeout,
        }
    }

    /// Give the session back, e.g. to close its target.
    pub fn into_session(self) -> PageSession {
        self.session
    }
}

#[async_trait]
impl MenuPage for CdpPage {
    type Element = NodeHandle;

    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.session
            .navigate(url, self.navigation_timeout)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                CdpError::Timeout(msg) => ScrapeError::Navigation(format!("{}: {}", url, msg)),
                other => other.into(),
            })
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<NodeHandle, ScrapeError> {
        let node_id = self.session.wait_for_selector(selector, timeout).await?;
        Ok(NodeHandle(node_id))
    }

    async fn scroll_into_view(&self, element: &NodeHandle) -> Result<(), ScrapeError> {
        self.session.scroll_into_view(element.0).await?;
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<NodeHandle>, ScrapeError> {
        let ids = self.session.query_selector_all(selector).await?;
        Ok(ids.into_iter().map(NodeHandle).collect())
    }

    async fn query_all_within(
        &self,
        scope: &NodeHandle,
        selector: &str,
    ) -> Result<Vec<NodeHandle>, ScrapeError> {
        let ids = self
            .session
            .query_selector_all_within(scope.0, selector)
            .await?;
        Ok(ids.into_iter().map(NodeHandle).collect())
    }

    async fn query_within(
        &self,
        scope: &NodeHandle,
        selector: &str,
    ) -> Result<Option<NodeHandle>, ScrapeError> {
        let id = self.session.query_selector_within(scope.0, selector).await?;
        Ok(id.map(NodeHandle))
    }

    async fn inner_text(&self, element: &NodeHandle) -> Result<String, ScrapeError> {
        Ok(self.session.inner_text(element.0).await?)
    }
}

#[cfg(test)]
#[path = "cdp_page_tests.rs"]
mod tests;
