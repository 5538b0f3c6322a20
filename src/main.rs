//! menuscrape - storefront menu extraction
//!
//! Loads a storefront page in a CDP-controlled browser, waits for its lazily
//! rendered item list to settle, and prints the menu items as JSON.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use menuscrape_cdp::{BrowserProvider, LocalChrome, LocalChromeConfig, RemoteBrowser};
use menuscrape_config::{
    Config, ConfigLoader, ConfigValidator, MissingFieldPolicy, ProviderKind,
};
use menuscrape_core::run_with_session;

/// menuscrape CLI.
#[derive(Parser)]
#[command(name = "menuscrape")]
#[command(about = "Extract menu items from a lazily rendered storefront page")]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults apply when it does not exist)
    #[arg(short, long, default_value = "menuscrape.toml", global = true)]
    config: PathBuf,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the menu at URL and print it as JSON
    Scrape {
        /// Store page URL
        url: String,

        /// Connect to an already-running browser instead of launching Chrome
        #[arg(long, env = "MENUSCRAPE_CDP_URL")]
        cdp_url: Option<String>,

        /// Drop items with a missing field instead of failing the run
        #[arg(long)]
        skip_missing: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate the configuration file and print the effective settings
    CheckConfig,
}

fn init_tracing(log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the JSON result, so console logs go to stderr.
    let console = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let file = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("menuscrape")
                .filename_suffix("log")
                .build(dir)
                .context("building log file appender")?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            // Keep the writer alive for the program duration.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = ConfigLoader::load_or_default(path)
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(config)
}

fn validate(config: &Config) -> anyhow::Result<()> {
    let warnings = ConfigValidator::validate(config).into_result()?;
    for warning in warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    Ok(())
}

fn build_provider(config: &Config) -> anyhow::Result<Box<dyn BrowserProvider>> {
    let browser = &config.browser;
    match browser.provider {
        ProviderKind::Remote => {
            let Some(endpoint) = browser.endpoint.clone() else {
                bail!("browser.endpoint is required for the remote provider");
            };
            Ok(Box::new(RemoteBrowser::new(endpoint)?))
        }
        ProviderKind::Local => Ok(Box::new(LocalChrome::new(LocalChromeConfig {
            debug_port: browser.debug_port,
            profile_dir: browser.profile_dir.as_ref().map(PathBuf::from),
            headless: browser.headless,
            launch_timeout: browser.launch_timeout(),
        }))),
    }
}

async fn scrape(
    mut config: Config,
    url: String,
    cdp_url: Option<String>,
    skip_missing: bool,
    pretty: bool,
) -> anyhow::Result<()> {
    if let Some(endpoint) = cdp_url {
        config.browser.provider = ProviderKind::Remote;
        config.browser.endpoint = Some(endpoint);
    }
    if skip_missing {
        config.extraction.on_missing_field = MissingFieldPolicy::Skip;
    }
    validate(&config)?;

    let mut provider = build_provider(&config)?;
    info!("Scraping {} via {} browser", url, provider.name());

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let records = run_with_session(provider.as_mut(), &url, &config, shutdown)
        .await
        .with_context(|| format!("scraping {}", url))?;

    info!("Extracted {} menu items", records.len());
    let output = if pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_dir.as_deref())?;

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Scrape {
            url,
            cdp_url,
            skip_missing,
            pretty,
        } => scrape(config, url, cdp_url, skip_missing, pretty).await,
        Commands::CheckConfig => {
            validate(&config)?;
            println!("{}", config_summary(&config));
            Ok(())
        }
    }
}

/// Human-readable summary of the effective configuration.
fn config_summary(config: &Config) -> String {
    let browser = &config.browser;
    let readiness = &config.readiness;
    format!(
        "provider = {:?}\nendpoint = {}\nanchor = {}\nstrategy = {:?}\ncontainer = {}\non_missing_field = {:?}",
        browser.provider,
        browser.endpoint.as_deref().unwrap_or("-"),
        readiness.anchor_selector,
        readiness.strategy,
        config.selectors.container,
        config.extraction.on_missing_field,
    )
}
