//! Entry points: one extraction run against a page or a browser session.

use std::future::Future;

use menuscrape_cdp::{BrowserProvider, CdpClient};
use menuscrape_config::Config;
use tracing::{info, warn};

use crate::cdp_page::CdpPage;
use crate::error::ScrapeError;
use crate::extractor::ItemExtractor;
use crate::page::MenuPage;
use crate::readiness::ReadinessDetector;
use crate::record::MenuItemRecord;

/// Navigate `page` to `start_url`, wait for readiness, and extract the menu.
pub async fn scrape_page<P: MenuPage>(
    page: &P,
    start_url: &str,
    config: &Config,
) -> Result<Vec<MenuItemRecord>, ScrapeError> {
    page.goto(start_url).await?;
    info!("Loaded {}", start_url);

    ReadinessDetector::new(&config.readiness, &config.selectors.container)
        .wait_until_ready(page)
        .await?;

    ItemExtractor::new(&config.selectors, &config.extraction)
        .extract(page)
        .await
}

/// Retrieve the menu items at `start_url` using a started browser session.
///
/// Opens a fresh tab on the session's browser and closes it afterwards. The
/// session itself is left running; stopping it is the caller's job.
pub async fn retrieve_menu_items(
    session: &dyn BrowserProvider,
    start_url: &str,
    config: &Config,
) -> Result<Vec<MenuItemRecord>, ScrapeError> {
    retrieve_until(session, start_url, config, std::future::pending()).await
}

/// Start `provider`, retrieve the menu, and stop the provider on every path.
///
/// The run is abandoned with `Interrupted` if `shutdown` resolves first; the
/// tab is still closed and the provider still stopped.
pub async fn run_with_session(
    provider: &mut dyn BrowserProvider,
    start_url: &str,
    config: &Config,
    shutdown: impl Future<Output = ()>,
) -> Result<Vec<MenuItemRecord>, ScrapeError> {
    provider.start().await?;
    info!("Browser session '{}' started", provider.name());

    let outcome = retrieve_until(&*provider, start_url, config, shutdown).await;

    match provider.stop().await {
        Ok(()) => info!("Browser session '{}' stopped", provider.name()),
        Err(e) => warn!("Failed to stop browser session: {}", e),
    }
    outcome
}

/// `retrieve_menu_items`, cut short when `shutdown` resolves.
async fn retrieve_until(
    session: &dyn BrowserProvider,
    start_url: &str,
    config: &Config,
    shutdown: impl Future<Output = ()>,
) -> Result<Vec<MenuItemRecord>, ScrapeError> {
    tokio::pin!(shutdown);

    let endpoint = session.cdp_endpoint()?;
    let client = tokio::select! {
        client = CdpClient::connect(&endpoint, config.browser.request_timeout()) => client?,
        _ = &mut shutdown => return Err(interrupted()),
    };
    let page = CdpPage::new(client.new_page().await?, config.browser.navigation_timeout());

    let outcome = tokio::select! {
        outcome = scrape_page(&page, start_url, config) => outcome,
        _ = &mut shutdown => Err(interrupted()),
    };

    if let Err(e) = client.close_page(page.into_session()).await {
        warn!("Failed to close tab: {}", e);
    }
    outcome
}

fn interrupted() -> ScrapeError {
    warn!("Shutdown requested, abandoning run");
    ScrapeError::Interrupted
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
