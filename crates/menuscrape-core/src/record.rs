//! Menu item records and text normalization.

use serde::{Deserialize, Serialize};

/// One menu item as displayed by the storefront.
///
/// Identity is positional: records keep page order and duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemRecord {
    pub name: String,
    /// Displayed currency string, not parsed.
    pub price: String,
    pub description: String,
}

impl MenuItemRecord {
    /// Build a record from raw inner text, normalizing every field.
    pub fn from_raw(name: &str, price: &str, description: &str) -> Self {
        Self {
            name: normalize_text(name),
            price: normalize_text(price),
            description: normalize_text(description),
        }
    }
}

/// Trim surrounding whitespace and turn each line break into one space.
pub fn normalize_text(raw: &str) -> String {
    raw.trim().replace("\r\n", " ").replace(['\r', '\n'], " ")
}
