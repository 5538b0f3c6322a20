//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub readiness: ReadinessConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Where the browser comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Launch (or reuse) Chrome on this machine.
    #[default]
    Local,
    /// Connect to an already-running browser at `endpoint`.
    Remote,
}

/// Browser connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// CDP endpoint for the remote provider: `http(s)://host:port` or `ws(s)://…`.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default)]
    pub profile_dir: Option<String>,

    /// Upper bound on any single CDP round-trip.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_launch_timeout")]
    pub launch_timeout_secs: u64,

    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            endpoint: None,
            debug_port: default_debug_port(),
            headless: true,
            profile_dir: None,
            request_timeout_secs: default_request_timeout(),
            launch_timeout_secs: default_launch_timeout(),
            navigation_timeout_secs: default_navigation_timeout(),
        }
    }
}

impl BrowserConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(self.launch_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_debug_port() -> u16 {
    9222
}

fn default_request_timeout() -> u64 {
    30
}

fn default_launch_timeout() -> u64 {
    6
}

fn default_navigation_timeout() -> u64 {
    30
}

/// How the detector decides lazy loading has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStrategy {
    /// Sleep for `settle_ms` after scrolling the anchor into view.
    FixedDelay,
    /// Sample the item count until it holds steady for `stable_samples` reads.
    #[default]
    Convergence,
}

/// Page readiness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Element that only exists once the whole list has rendered.
    #[serde(default = "default_anchor_selector")]
    pub anchor_selector: String,

    #[serde(default = "default_anchor_timeout")]
    pub anchor_timeout_ms: u64,

    #[serde(default)]
    pub strategy: ReadinessStrategy,

    #[serde(default = "default_settle")]
    pub settle_ms: u64,

    #[serde(default = "default_sample_interval")]
    pub sample_interval_ms: u64,

    #[serde(default = "default_stable_samples")]
    pub stable_samples: u32,

    #[serde(default = "default_convergence_timeout")]
    pub convergence_timeout_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            anchor_selector: default_anchor_selector(),
            anchor_timeout_ms: default_anchor_timeout(),
            strategy: ReadinessStrategy::default(),
            settle_ms: default_settle(),
            sample_interval_ms: default_sample_interval(),
            stable_samples: default_stable_samples(),
            convergence_timeout_ms: default_convergence_timeout(),
        }
    }
}

impl ReadinessConfig {
    pub fn anchor_timeout(&self) -> Duration {
        Duration::from_millis(self.anchor_timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn convergence_timeout(&self) -> Duration {
        Duration::from_millis(self.convergence_timeout_ms)
    }
}

fn default_anchor_selector() -> String {
    "#footer".to_string()
}

fn default_anchor_timeout() -> u64 {
    30_000
}

fn default_settle() -> u64 {
    2_000
}

fn default_sample_interval() -> u64 {
    500
}

fn default_stable_samples() -> u32 {
    3
}

fn default_convergence_timeout() -> u64 {
    20_000
}

/// Structural signatures of the storefront markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// One element per menu item.
    #[serde(default = "default_container")]
    pub container: String,

    /// Shared by the name (first match) and price (second match).
    #[serde(default = "default_rich_text")]
    pub rich_text: String,

    /// Element type counted when descending to the description wrapper.
    #[serde(default = "default_description_wrapper")]
    pub description_wrapper: String,

    /// Zero-based index of the wrapper among the container's matching descendants.
    #[serde(default = "default_description_depth")]
    pub description_depth: usize,

    /// First match inside the wrapper holds the description text.
    #[serde(default = "default_description_text")]
    pub description_text: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: default_container(),
            rich_text: default_rich_text(),
            description_wrapper: default_description_wrapper(),
            description_depth: default_description_depth(),
            description_text: default_description_text(),
        }
    }
}

fn default_container() -> String {
    r#"li[data-testid^="store-item"]"#.to_string()
}

fn default_rich_text() -> String {
    r#"span[data-testid="rich-text"]"#.to_string()
}

fn default_description_wrapper() -> String {
    "div".to_string()
}

fn default_description_depth() -> usize {
    7
}

fn default_description_text() -> String {
    "span".to_string()
}

/// What to do when one item lacks a required field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Drop the item and keep going.
    Skip,
}

/// Extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub on_missing_field: MissingFieldPolicy,

    /// Warn when the price slot does not look like a currency amount.
    #[serde(default = "default_true")]
    pub validate_price: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            on_missing_field: MissingFieldPolicy::default(),
            validate_price: true,
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
