//! Command-line interface definitions.
//!
//! Every option is optional: with no arguments the scraper starts a local
//! `chromedriver`, scrapes the default sites headless, and prints JSON to
//! stdout.

use clap::Parser;

use crate::config::Config;

/// Command-line arguments for the Mars scraper.
///
/// # Examples
///
/// ```sh
/// # Defaults: local chromedriver on port 9515, headless Chrome
/// mars_scrape
///
/// # Use an already running WebDriver server and keep a copy of the result
/// mars_scrape --webdriver-url http://localhost:4444 -j ./json --pretty
///
/// # Watch the browser work
/// mars_scrape --headed --chromedriver /opt/chromedriver
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Connect to this WebDriver server instead of starting chromedriver
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// chromedriver binary to start when no WebDriver URL is given
    #[arg(long, env = "CHROMEDRIVER_PATH", default_value = "chromedriver")]
    pub chromedriver: String,

    /// Port for the local chromedriver
    #[arg(long, default_value_t = 9515)]
    pub driver_port: u16,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// Also write the result under this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Pretty-print the JSON written to stdout
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply(&self, mut config: Config) -> Config {
        if self.headed {
            config.browser.headless = false;
        }
        config
    }
}
