//! Chrome sessions over the WebDriver protocol.

use std::time::Duration;

use thirtyfour::prelude::*;
use thirtyfour::{ChromeCapabilities, ChromiumLikeCapabilities};
use tracing::{debug, instrument};

use super::{Session, SessionFactory};
use crate::config::BrowserConfig;
use crate::error::ScrapeError;

/// Poll interval for [`Session::wait_for_css`].
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A single Chrome session.
pub struct WebDriverSession {
    driver: WebDriver,
}

impl Session for WebDriverSession {
    #[instrument(level = "debug", skip(self))]
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.driver.goto(url).await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn wait_for_css(&self, css: &str, timeout: Duration) -> Result<bool, ScrapeError> {
        let found = self
            .driver
            .query(By::Css(css))
            .wait(timeout, WAIT_POLL_INTERVAL)
            .exists()
            .await?;
        debug!(found, "Waited for selector");
        Ok(found)
    }

    async fn html(&self) -> Result<String, ScrapeError> {
        Ok(self.driver.source().await?)
    }

    #[instrument(level = "debug", skip(self))]
    async fn click_nth_by_tag(&self, tag: &str, index: usize) -> Result<(), ScrapeError> {
        let elements = self.driver.find_all(By::Tag(tag)).await?;
        let found = elements.len();
        let element = elements
            .into_iter()
            .nth(index)
            .ok_or_else(|| ScrapeError::ElementIndex {
                tag: tag.to_string(),
                index,
                found,
            })?;
        element.click().await?;
        Ok(())
    }

    async fn back(&self) -> Result<(), ScrapeError> {
        self.driver.back().await?;
        Ok(())
    }

    async fn quit(self) -> Result<(), ScrapeError> {
        self.driver.quit().await?;
        Ok(())
    }
}

/// Opens Chrome sessions against a WebDriver server.
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    server_url: String,
    headless: bool,
    chrome_args: Vec<String>,
}

impl WebDriverFactory {
    pub fn new(server_url: impl Into<String>, browser: &BrowserConfig) -> Self {
        Self {
            server_url: server_url.into(),
            headless: browser.headless,
            chrome_args: browser.chrome_args.clone(),
        }
    }

    fn capabilities(&self) -> Result<ChromeCapabilities, ScrapeError> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless()?;
        }
        for arg in &self.chrome_args {
            caps.add_arg(arg)?;
        }
        Ok(caps)
    }
}

impl SessionFactory for WebDriverFactory {
    type Session = WebDriverSession;

    #[instrument(level = "debug", skip_all, fields(server = %self.server_url, headless = self.headless))]
    async fn open(&self) -> Result<WebDriverSession, ScrapeError> {
        let driver = WebDriver::new(&self.server_url, self.capabilities()?).await?;
        debug!("Opened browser session");
        Ok(WebDriverSession { driver })
    }
}
