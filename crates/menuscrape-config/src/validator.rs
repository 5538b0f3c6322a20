//! Configuration validation.

use url::Url;

use crate::error::ConfigError;
use crate::schema::{Config, ProviderKind, ReadinessStrategy};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a `ConfigError`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(e) => Err(ConfigError::InvalidValue {
                field: e.path,
                message: e.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_readiness(config, &mut result);
        Self::validate_selectors(config, &mut result);

        result
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;

        match (&browser.provider, &browser.endpoint) {
            (ProviderKind::Remote, None) => {
                result.add_error(ValidationError::new(
                    "browser.endpoint",
                    "Remote provider requires an endpoint",
                ));
            }
            (_, Some(endpoint)) => match Url::parse(endpoint) {
                Ok(url) if matches!(url.scheme(), "http" | "https" | "ws" | "wss") => {}
                Ok(url) => result.add_error(ValidationError::new(
                    "browser.endpoint",
                    format!("Unsupported scheme '{}'", url.scheme()),
                )),
                Err(e) => result.add_error(ValidationError::new(
                    "browser.endpoint",
                    format!("Invalid URL: {}", e),
                )),
            },
            _ => {}
        }

        if browser.provider == ProviderKind::Local && browser.endpoint.is_some() {
            result.add_warning(ValidationWarning::new(
                "browser.endpoint",
                "endpoint is ignored by the local provider",
            ));
        }

        if browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if browser.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }

        if browser.navigation_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.navigation_timeout_secs",
                "navigation_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_readiness(config: &Config, result: &mut ValidationResult) {
        let readiness = &config.readiness;

        if readiness.anchor_selector.trim().is_empty() {
            result.add_error(ValidationError::new(
                "readiness.anchor_selector",
                "Anchor selector cannot be empty",
            ));
        }

        match readiness.strategy {
            ReadinessStrategy::FixedDelay => {
                if readiness.settle_ms < 500 {
                    result.add_warning(ValidationWarning::new(
                        "readiness.settle_ms",
                        "settle_ms below 500 is unlikely to cover lazy rendering",
                    ));
                }
            }
            ReadinessStrategy::Convergence => {
                if readiness.stable_samples < 2 {
                    result.add_error(ValidationError::new(
                        "readiness.stable_samples",
                        "stable_samples must be at least 2",
                    ));
                }

                if readiness.sample_interval_ms == 0 {
                    result.add_error(ValidationError::new(
                        "readiness.sample_interval_ms",
                        "sample_interval_ms must be greater than 0",
                    ));
                }

                let minimum = readiness
                    .sample_interval_ms
                    .saturating_mul(u64::from(readiness.stable_samples));
                if readiness.convergence_timeout_ms < minimum {
                    result.add_error(ValidationError::new(
                        "readiness.convergence_timeout_ms",
                        format!(
                            "convergence_timeout_ms must be at least sample_interval_ms * stable_samples ({})",
                            minimum
                        ),
                    ));
                }
            }
        }
    }

    fn validate_selectors(config: &Config, result: &mut ValidationResult) {
        let selectors = &config.selectors;

        for (path, value) in [
            ("selectors.container", &selectors.container),
            ("selectors.rich_text", &selectors.rich_text),
            ("selectors.description_wrapper", &selectors.description_wrapper),
            ("selectors.description_text", &selectors.description_text),
        ] {
            if value.trim().is_empty() {
                result.add_error(ValidationError::new(path, "Selector cannot be empty"));
            }
        }

        if selectors.description_depth > 64 {
            result.add_warning(ValidationWarning::new(
                "selectors.description_depth",
                "description_depth is very deep, check it against the page markup",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
