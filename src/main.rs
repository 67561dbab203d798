//! # Mars Scrape
//!
//! Collects a fixed set of Mars facts from four mirror sites into a single
//! JSON record:
//!
//! - the latest news headline and teaser
//! - the featured full-size image URL
//! - a Mars/Earth comparison table as an HTML fragment
//! - the four hemisphere images with their titles
//!
//! ## Usage
//!
//! ```sh
//! mars_scrape --pretty
//! ```
//!
//! ## Architecture
//!
//! One run is a straight line:
//! 1. **Provisioning**: start `chromedriver` (unless a WebDriver URL is given)
//! 2. **Scraping**: open one primary Chrome session and run the four scrapers
//!    in order; hemisphere detail pages get their own short-lived sessions
//! 3. **Output**: print the record as JSON, optionally store it on disk

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod browser;
mod cli;
mod config;
mod error;
mod models;
mod orchestrator;
mod outputs;
mod scrapers;
mod utils;

use browser::{ChromeDriverService, WebDriverFactory};
use cli::Cli;
use config::Config;
use outputs::json;
use scrapers::SiteExtractors;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (stderr; stdout carries the JSON) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("mars_scrape starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => Config::load(path).await?,
        None => Config::default(),
    };
    let config = args.apply(config);

    // ---- Provision the WebDriver server ----
    let (server_url, service) = match &args.webdriver_url {
        Some(url) => {
            info!(%url, "Using external WebDriver server");
            (url.clone(), None)
        }
        None => {
            let service = ChromeDriverService::start(
                &args.chromedriver,
                args.driver_port,
                config.browser.startup_timeout(),
            )
            .await?;
            (service.url(), Some(service))
        }
    };

    let factory = WebDriverFactory::new(server_url, &config.browser);
    let extractors = SiteExtractors::new(
        config.sites.clone(),
        Client::new(),
        config.browser.news_wait(),
    );

    let outcome = orchestrator::scrape_all(&factory, &extractors).await;
    if let Some(service) = service {
        service.stop().await;
    }
    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Scrape aborted");
            return Err(e.into());
        }
    };

    // ---- Output ----
    println!("{}", json::to_json(&result, args.pretty)?);

    if let Some(dir) = &args.json_output_dir {
        json::write_result(&result, dir).await?;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
