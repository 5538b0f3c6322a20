//! # menuscrape core
//!
//! Extraction of menu items from a lazily rendered storefront page.
//!
//! A run has two stages:
//!
//! 1. [`ReadinessDetector`] scrolls the page footer into view and waits until
//!    the lazily rendered item list stops changing.
//! 2. [`ItemExtractor`] walks the item containers in document order and turns
//!    each into a normalized [`MenuItemRecord`].
//!
//! Both stages are written against the [`MenuPage`] trait; [`CdpPage`] is the
//! implementation over a Chrome DevTools Protocol session.

mod cdp_page;
mod error;
mod extractor;
pub mod fields;
mod page;
mod readiness;
mod record;
mod runner;

#[cfg(test)]
mod fake;
#[cfg(test)]
mod fake_cdp;

pub use cdp_page::{CdpPage, NodeHandle};
pub use error::{Field, ScrapeError};
pub use extractor::ItemExtractor;
pub use page::MenuPage;
pub use readiness::ReadinessDetector;
pub use record::{normalize_text, MenuItemRecord};
pub use runner::{retrieve_menu_items, run_with_session, scrape_page};
