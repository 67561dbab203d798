//! Runtime configuration.
//!
//! Every setting has a default, so the scraper runs without a config file
//! against the four fixed mirror sites. An optional YAML file can override
//! any of them:
//!
//! ```yaml
//! sites:
//!   news: https://redplanetscience.com
//!   images: https://spaceimages-mars.com
//!   facts: https://galaxyfacts-mars.com
//!   hemispheres: https://marshemispheres.com
//! browser:
//!   headless: true
//!   chrome_args: ["--no-sandbox"]
//!   startup_timeout_secs: 20
//!   news_wait_ms: 1000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, instrument};
use url::Url;

use crate::error::ScrapeError;

pub const NEWS_URL: &str = "https://redplanetscience.com";
pub const IMAGES_URL: &str = "https://spaceimages-mars.com";
pub const FACTS_URL: &str = "https://galaxyfacts-mars.com";
pub const HEMISPHERES_URL: &str = "https://marshemispheres.com";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sites: Sites,
    pub browser: BrowserConfig,
}

/// Base URLs of the four source sites.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Sites {
    pub news: String,
    pub images: String,
    pub facts: String,
    pub hemispheres: String,
}

impl Default for Sites {
    fn default() -> Self {
        Self {
            news: NEWS_URL.to_string(),
            images: IMAGES_URL.to_string(),
            facts: FACTS_URL.to_string(),
            hemispheres: HEMISPHERES_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    /// Extra Chrome command-line arguments.
    pub chrome_args: Vec<String>,
    /// How long to wait for a local chromedriver to accept connections.
    pub startup_timeout_secs: u64,
    /// Grace period for the news listing to render.
    pub news_wait_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_args: Vec::new(),
            startup_timeout_secs: 20,
            news_wait_ms: 1000,
        }
    }
}

impl BrowserConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    pub fn news_wait(&self) -> Duration {
        Duration::from_millis(self.news_wait_ms)
    }
}

impl Config {
    /// Parse a YAML document and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScrapeError> {
        let config: Config =
            serde_yaml::from_str(yaml).map_err(|e| ScrapeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the YAML file at `path`.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ScrapeError> {
        let yaml = tokio::fs::read_to_string(path.as_ref()).await?;
        let config = Self::from_yaml(&yaml)?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// Every site URL must be an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        let sites = [
            ("news", &self.sites.news),
            ("images", &self.sites.images),
            ("facts", &self.sites.facts),
            ("hemispheres", &self.sites.hemispheres),
        ];
        for (name, raw) in sites {
            let parsed = Url::parse(raw)
                .map_err(|e| ScrapeError::Config(format!("sites.{name} {raw:?}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ScrapeError::Config(format!(
                    "sites.{name} {raw:?}: unsupported scheme {}",
                    parsed.scheme()
                )));
            }
        }
        Ok(())
    }
}
