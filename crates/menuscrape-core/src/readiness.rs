//! Page readiness detection.
//!
//! The storefront renders its item list lazily as the user scrolls. The
//! detector scrolls a terminal anchor (the footer) into view so every
//! preceding item gets materialized, then waits for rendering to settle,
//! either for a fixed delay or until the item count stops changing.

use menuscrape_config::{ReadinessConfig, ReadinessStrategy};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::ScrapeError;
use crate::page::MenuPage;

/// Drives a freshly navigated page to a state where all items exist.
pub struct ReadinessDetector<'a> {
    config: &'a ReadinessConfig,
    container_selector: &'a str,
}

impl<'a> ReadinessDetector<'a> {
    pub fn new(config: &'a ReadinessConfig, container_selector: &'a str) -> Self {
        Self {
            config,
            container_selector,
        }
    }

    /// Bring the page to readiness.
    ///
    /// Fails with `NotFound` when the anchor never appears, and with `Timeout`
    /// when the convergence strategy sees the list keep changing.
    pub async fn wait_until_ready<P: MenuPage>(&self, page: &P) -> Result<(), ScrapeError> {
        let anchor = page
            .wait_for(&self.config.anchor_selector, self.config.anchor_timeout())
            .await?;
        page.scroll_into_view(&anchor).await?;
        debug!("Scrolled {} into view", self.config.anchor_selector);

        match self.config.strategy {
            ReadinessStrategy::FixedDelay => {
                tokio::time::sleep(self.config.settle()).await;
                info!("Page settled after fixed {}ms delay", self.config.settle_ms);
            }
            ReadinessStrategy::Convergence => {
                let count = self.converge(page, &anchor).await?;
                info!(count, "Item list converged");
            }
        }
        Ok(())
    }

    /// Sample the item count until `stable_samples` consecutive reads agree.
    async fn converge<P: MenuPage>(&self, page: &P, anchor: &P::Element) -> Result<usize, ScrapeError> {
        let deadline = Instant::now() + self.config.convergence_timeout();
        let interval = self.config.sample_interval();
        let mut tracker = StabilityTracker::new(self.config.stable_samples);

        loop {
            let count = page.count(self.container_selector).await?;
            match tracker.observe(count) {
                Observation::Stable => return Ok(count),
                Observation::Changed => {
                    debug!(count, "Item count changed, re-scrolling anchor");
                    // More items moved the anchor down; keep it in view.
                    page.scroll_into_view(anchor).await?;
                }
                Observation::Unchanged => {}
            }

            if Instant::now() + interval > deadline {
                return Err(ScrapeError::Timeout(format!(
                    "item count for '{}' still changing after {}ms (last {})",
                    self.container_selector, self.config.convergence_timeout_ms, count
                )));
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Observation {
    /// First sample, or a different count than the previous one.
    Changed,
    /// Same as before but not yet enough agreeing samples.
    Unchanged,
    /// `required` consecutive samples agree.
    Stable,
}

/// Counts consecutive equal samples.
#[derive(Debug)]
struct StabilityTracker {
    required: u32,
    last: Option<usize>,
    streak: u32,
}

impl StabilityTracker {
    fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            last: None,
            streak: 0,
        }
    }

    fn observe(&mut self, count: usize) -> Observation {
        let changed = self.last != Some(count);
        if changed {
            self.last = Some(count);
            self.streak = 1;
        } else {
            self.streak += 1;
        }

        if self.streak >= self.required {
            Observation::Stable
        } else if changed {
            Observation::Changed
        } else {
            Observation::Unchanged
        }
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
