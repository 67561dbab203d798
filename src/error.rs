//! Error types and the per-routine failure policy.
//!
//! Every routine distinguishes two outcomes that are *not* success:
//!
//! - **Selector miss**: an expected element is absent. This is reported as
//!   `Ok(None)` and is never an error.
//! - **Everything else** (driver, network, parse, table shape, ...): a
//!   [`ScrapeError`]. What happens next is decided by the routine's
//!   [`FailurePolicy`].

use thiserror::Error;
use tracing::warn;

/// Errors raised while driving the browser, fetching pages or parsing them.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid CSS selector {0:?}")]
    Selector(String),

    #[error("Missing element {selector:?} in {context}")]
    MissingElement {
        context: &'static str,
        selector: &'static str,
    },

    #[error("No <{tag}> at index {index} (found {found})")]
    ElementIndex {
        tag: String,
        index: usize,
        found: usize,
    },

    #[error("Unexpected table shape: {0}")]
    TableShape(String),

    #[error("WebDriver service failed to start: {0}")]
    DriverStartup(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// How a routine reacts to an error that is not a selector miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Collapse any error to an absent result for the routine.
    FailClosed,
    /// Let the error abort the whole run.
    FailOpen,
}

impl FailurePolicy {
    /// Apply the policy to a routine's raw outcome.
    ///
    /// `FailClosed` turns `Err` into `Ok(None)` and logs it; `FailOpen`
    /// returns the outcome untouched.
    pub fn apply<T>(
        self,
        routine: &'static str,
        outcome: Result<Option<T>, ScrapeError>,
    ) -> Result<Option<T>, ScrapeError> {
        match (self, outcome) {
            (FailurePolicy::FailClosed, Err(e)) => {
                warn!(routine, error = %e, "Routine failed; recording as absent");
                Ok(None)
            }
            (_, outcome) => outcome,
        }
    }
}
