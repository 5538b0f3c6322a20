//! Field resolution within one item container.
//!
//! The storefront markup carries no semantic field names. Name and price share
//! one structural signature and are told apart by position; the description
//! sits at a fixed depth inside the container's wrapper structure. Each lookup
//! lives in exactly one function so a layout change is a one-place edit.

use std::sync::LazyLock;

use menuscrape_config::SelectorConfig;
use regex::Regex;

use crate::error::ScrapeError;
use crate::page::MenuPage;

const NAME_SLOT: usize = 0;
const PRICE_SLOT: usize = 1;

static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[A-Z]{1,3}\s?)?[$€£¥₹]?\s?\d{1,6}(?:[.,\s]\d{3})*(?:[.,]\d{1,2})?(?:\s?[$€£¥₹]|\s?[A-Z]{3})?\+?$",
    )
    .expect("valid price pattern")
});

/// Raw text of the item name: the first rich-text element.
pub async fn resolve_name<P: MenuPage>(
    page: &P,
    container: &P::Element,
    selectors: &SelectorConfig,
) -> Result<Option<String>, ScrapeError> {
    rich_text_slot(page, container, selectors, NAME_SLOT).await
}

/// Raw text of the item price: the second rich-text element.
pub async fn resolve_price<P: MenuPage>(
    page: &P,
    container: &P::Element,
    selectors: &SelectorConfig,
) -> Result<Option<String>, ScrapeError> {
    rich_text_slot(page, container, selectors, PRICE_SLOT).await
}

async fn rich_text_slot<P: MenuPage>(
    page: &P,
    container: &P::Element,
    selectors: &SelectorConfig,
    slot: usize,
) -> Result<Option<String>, ScrapeError> {
    match page.nth_within(container, &selectors.rich_text, slot).await? {
        Some(element) => Ok(Some(page.inner_text(&element).await?)),
        None => Ok(None),
    }
}

/// Raw text of the item description.
///
/// Descends to the `description_depth`-th `description_wrapper` element of the
/// container and reads its first `description_text` element. `None` when
/// either node is absent.
pub async fn resolve_description<P: MenuPage>(
    page: &P,
    container: &P::Element,
    selectors: &SelectorConfig,
) -> Result<Option<String>, ScrapeError> {
    let Some(wrapper) = page
        .nth_within(
            container,
            &selectors.description_wrapper,
            selectors.description_depth,
        )
        .await?
    else {
        return Ok(None);
    };

    match page
        .query_within(&wrapper, &selectors.description_text)
        .await?
    {
        Some(text) => Ok(Some(page.inner_text(&text).await?)),
        None => Ok(None),
    }
}

/// Whether a normalized price slot reads like a currency amount.
pub fn looks_like_price(text: &str) -> bool {
    PRICE_PATTERN.is_match(text)
}
