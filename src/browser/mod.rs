//! Browser session abstraction.
//!
//! The scrapers never talk to a WebDriver directly. They receive a
//! [`Session`] handle (and, for the hemisphere pages, a [`SessionFactory`]
//! to open short-lived secondary sessions) as explicit parameters.
//!
//! # Implementations
//!
//! | Type | Module | Notes |
//! |------|--------|-------|
//! | [`webdriver::WebDriverSession`] / [`WebDriverFactory`] | [`webdriver`] | Chrome over WebDriver via `thirtyfour` |
//! | `FixtureBrowser` | `fixture` | In-memory pages for tests |
//!
//! [`driver`] provisions a local `chromedriver` process when no remote
//! WebDriver URL is configured.

pub mod driver;
#[cfg(test)]
pub mod fixture;
pub mod webdriver;

use std::time::Duration;

use crate::error::ScrapeError;

pub use driver::ChromeDriverService;
pub use webdriver::WebDriverFactory;

/// A live, stateful browser handle.
///
/// Every method acts on the session's current page. `quit` consumes the
/// handle, so a closed session cannot be used again.
pub trait Session {
    /// Navigate to `url` and wait for the load to finish.
    async fn goto(&self, url: &str) -> Result<(), ScrapeError>;

    /// Poll until an element matching `css` exists or `timeout` elapses.
    ///
    /// Returns `false` on timeout; that is not an error.
    async fn wait_for_css(&self, css: &str, timeout: Duration) -> Result<bool, ScrapeError>;

    /// The current rendered page markup.
    async fn html(&self) -> Result<String, ScrapeError>;

    /// Click the `index`-th element (zero-based, document order) with tag `tag`.
    ///
    /// Fails with [`ScrapeError::ElementIndex`] if there are not enough elements.
    async fn click_nth_by_tag(&self, tag: &str, index: usize) -> Result<(), ScrapeError>;

    /// Go back one entry in the session history.
    async fn back(&self) -> Result<(), ScrapeError>;

    /// Close the session and release the browser.
    async fn quit(self) -> Result<(), ScrapeError>;
}

/// Opens new, independent browser sessions.
pub trait SessionFactory {
    type Session: Session;

    async fn open(&self) -> Result<Self::Session, ScrapeError>;
}
