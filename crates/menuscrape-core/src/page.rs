//! The browser-control surface the detector and extractor run against.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScrapeError;

/// A live, externally owned page.
///
/// Elements are only valid for the current document; callers query them
/// fresh on every run. All calls on one page are issued sequentially.
#[async_trait]
pub trait MenuPage: Send + Sync {
    /// Handle to one element of the current document.
    type Element: Clone + fmt::Debug + Send + Sync;

    /// Load `url` and wait for the document to become interactive.
    async fn goto(&self, url: &str) -> Result<(), ScrapeError>;

    /// Wait until `selector` matches, failing with `NotFound` after `timeout`.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<Self::Element, ScrapeError>;

    /// Bring the element into the viewport.
    async fn scroll_into_view(&self, element: &Self::Element) -> Result<(), ScrapeError>;

    /// All document elements matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, ScrapeError>;

    /// All descendants of `scope` matching `selector`, in document order.
    async fn query_all_within(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, ScrapeError>;

    /// First descendant of `scope` matching `selector`.
    async fn query_within(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Option<Self::Element>, ScrapeError>;

    /// Rendered text of the element.
    async fn inner_text(&self, element: &Self::Element) -> Result<String, ScrapeError>;

    /// Number of document elements matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize, ScrapeError> {
        Ok(self.query_all(selector).await?.len())
    }

    /// The `n`th (zero-based) descendant of `scope` matching `selector`.
    async fn nth_within(
        &self,
        scope: &Self::Element,
        selector: &str,
        n: usize,
    ) -> Result<Option<Self::Element>, ScrapeError> {
        Ok(self.query_all_within(scope, selector).await?.into_iter().nth(n))
    }
}
