//! # menuscrape config
//!
//! Configuration for the menuscrape extractor: which browser to use, how to
//! decide the page has finished lazy-loading, and where menu fields live in
//! the storefront markup.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
