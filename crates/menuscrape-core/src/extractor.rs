//! Menu item extraction from a page certified ready.

use menuscrape_config::{ExtractionConfig, MissingFieldPolicy, SelectorConfig};
use tracing::{debug, info, warn};

use crate::error::{Field, ScrapeError};
use crate::fields::{looks_like_price, resolve_description, resolve_name, resolve_price};
use crate::page::MenuPage;
use crate::record::MenuItemRecord;

/// Converts every item container on the page into a `MenuItemRecord`.
pub struct ItemExtractor<'a> {
    selectors: &'a SelectorConfig,
    config: &'a ExtractionConfig,
}

impl<'a> ItemExtractor<'a> {
    pub fn new(selectors: &'a SelectorConfig, config: &'a ExtractionConfig) -> Self {
        Self { selectors, config }
    }

    /// Records for all containers, in document order.
    ///
    /// A page without containers yields an empty list. Items missing a field
    /// abort the run or are skipped, per `on_missing_field`.
    pub async fn extract<P: MenuPage>(&self, page: &P) -> Result<Vec<MenuItemRecord>, ScrapeError> {
        let containers = page.query_all(&self.selectors.container).await?;
        info!(count = containers.len(), "Extracting menu items");

        let mut records = Vec::with_capacity(containers.len());
        for (index, container) in containers.iter().enumerate() {
            match self.extract_item(page, container, index).await {
                Ok(record) => {
                    debug!(index, name = %record.name, "Extracted item");
                    records.push(record);
                }
                Err(ScrapeError::FieldNotFound { index, field })
                    if self.config.on_missing_field == MissingFieldPolicy::Skip =>
                {
                    warn!(index, %field, "Skipping item with missing field");
                }
                Err(e) => return Err(e),
            }
        }

        if records.len() < containers.len() {
            info!(
                extracted = records.len(),
                skipped = containers.len() - records.len(),
                "Extraction finished with skipped items"
            );
        }
        Ok(records)
    }

    async fn extract_item<P: MenuPage>(
        &self,
        page: &P,
        container: &P::Element,
        index: usize,
    ) -> Result<MenuItemRecord, ScrapeError> {
        let missing = |field| ScrapeError::FieldNotFound { index, field };

        let name = resolve_name(page, container, self.selectors)
            .await?
            .ok_or_else(|| missing(Field::Name))?;
        let price = resolve_price(page, container, self.selectors)
            .await?
            .ok_or_else(|| missing(Field::Price))?;
        let description = resolve_description(page, container, self.selectors)
            .await?
            .ok_or_else(|| missing(Field::Description))?;

        let record = MenuItemRecord::from_raw(&name, &price, &description);
        if self.config.validate_price && !looks_like_price(&record.price) {
            warn!(index, price = %record.price, "Price slot does not look like a currency amount");
        }
        Ok(record)
    }
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
