//! Scrape error kinds.

use std::fmt;

use menuscrape_cdp::CdpError;
use thiserror::Error;

/// A field of a menu item record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Price,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Description => "description",
        })
    }
}

/// Errors that end an extraction run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The browser could not be reached or the connection dropped.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The start URL failed to load.
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// The readiness anchor never appeared.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A required field is missing from one item.
    #[error("Item {index}: {field} not found")]
    FieldNotFound { index: usize, field: Field },

    /// The item list did not stop changing in time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The run was cancelled before it finished.
    #[error("Interrupted")]
    Interrupted,

    /// Any other browser-side failure.
    #[error("Browser error: {0}")]
    Browser(String),
}

impl From<CdpError> for ScrapeError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg)
            | CdpError::BrowserNotAvailable(msg)
            | CdpError::WebSocket(msg)
            | CdpError::Http(msg)
            | CdpError::LaunchFailed(msg) => ScrapeError::Connection(msg),
            CdpError::ChromeNotFound | CdpError::SessionClosed => {
                ScrapeError::Connection(e.to_string())
            }
            CdpError::NavigationFailed(msg) => ScrapeError::Navigation(msg),
            CdpError::ElementNotFound(msg) => ScrapeError::NotFound(msg),
            CdpError::Timeout(msg) => ScrapeError::Timeout(msg),
            _ => ScrapeError::Browser(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_display() {
        let err = ScrapeError::FieldNotFound {
            index: 3,
            field: Field::Description,
        };
        assert_eq!(err.to_string(), "Item 3: description not found");
    }

    #[test]
    fn test_cdp_error_mapping() {
        let err: ScrapeError = CdpError::BrowserNotAvailable("http://localhost:9222".into()).into();
        assert!(matches!(err, ScrapeError::Connection(_)));

        let err: ScrapeError = CdpError::NavigationFailed("net::ERR_NAME_NOT_RESOLVED".into()).into();
        assert!(matches!(err, ScrapeError::Navigation(_)));

        let err: ScrapeError = CdpError::ElementNotFound("#footer".into()).into();
        assert!(matches!(err, ScrapeError::NotFound(_)));

        let err: ScrapeError = CdpError::SessionClosed.into();
        assert!(matches!(err, ScrapeError::Connection(_)));

        let err: ScrapeError = CdpError::JavaScript("boom".into()).into();
        assert!(matches!(err, ScrapeError::Browser(_)));
    }
}
