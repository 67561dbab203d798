//! In-memory browser for tests.
//!
//! Pages are plain HTML strings keyed by URL. Clicks are scripted as
//! `(page url, tag, index) -> target url`. The browser counts how many
//! sessions were opened and closed, logs each session's open/back/quit in
//! order, and tracks the most sessions alive at once, so tests can check
//! release on every path.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scraper::Html;

use super::{Session, SessionFactory};
use crate::error::ScrapeError;
use crate::utils::selector;

#[derive(Debug, Default)]
struct State {
    pages: HashMap<String, String>,
    clicks: HashMap<(String, String, usize), String>,
    unreachable: HashSet<String>,
    fail_open_after: Option<usize>,
    opened: usize,
    closed: usize,
    alive: usize,
    peak_alive: usize,
    events: Vec<&'static str>,
    visits: Vec<String>,
}

/// Shared fixture state; clones refer to the same pages and counters.
#[derive(Debug, Clone, Default)]
pub struct FixtureBrowser {
    state: Arc<Mutex<State>>,
}

impl FixtureBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.lock().pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Clicking the `index`-th `tag` on `page` navigates to `target`.
    pub fn with_click(self, page: &str, tag: &str, index: usize, target: &str) -> Self {
        self.lock().clicks.insert(
            (page.to_string(), tag.to_string(), index),
            target.to_string(),
        );
        self
    }

    /// Navigating to `url` fails as a network error would.
    pub fn with_unreachable(self, url: &str) -> Self {
        self.lock().unreachable.insert(url.to_string());
        self
    }

    /// Opening more than `n` sessions fails.
    pub fn with_session_limit(self, n: usize) -> Self {
        self.lock().fail_open_after = Some(n);
        self
    }

    pub fn opened(&self) -> usize {
        self.lock().opened
    }

    pub fn closed(&self) -> usize {
        self.lock().closed
    }

    /// Most sessions alive at the same time, including ones from [`Self::session`].
    pub fn peak_alive(&self) -> usize {
        self.lock().peak_alive
    }

    /// `"open"`, `"back"` and `"quit"` calls on factory sessions, in order.
    pub fn events(&self) -> Vec<&'static str> {
        self.lock().events.clone()
    }

    /// Every URL navigated to, across all sessions, in order.
    pub fn visits(&self) -> Vec<String> {
        self.lock().visits.clone()
    }

    /// A session that is not counted as opened by the factory.
    pub fn session(&self) -> FixtureSession {
        {
            let mut state = self.lock();
            state.alive += 1;
            state.peak_alive = state.peak_alive.max(state.alive);
        }
        FixtureSession {
            browser: self.clone(),
            history: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

impl SessionFactory for FixtureBrowser {
    type Session = FixtureSession;

    async fn open(&self) -> Result<FixtureSession, ScrapeError> {
        {
            let mut state = self.lock();
            if state.fail_open_after.is_some_and(|n| state.opened >= n) {
                return Err(ScrapeError::DriverStartup("session limit reached".to_string()));
            }
            state.opened += 1;
            state.events.push("open");
        }
        Ok(self.session())
    }
}

/// One fixture session with its own history.
#[derive(Debug)]
pub struct FixtureSession {
    browser: FixtureBrowser,
    history: Mutex<Vec<String>>,
}

impl FixtureSession {
    fn current_url(&self) -> Option<String> {
        self.history.lock().unwrap().last().cloned()
    }

    fn current_html(&self) -> String {
        self.current_url()
            .and_then(|url| self.browser.lock().pages.get(&url).cloned())
            .unwrap_or_default()
    }
}

impl Session for FixtureSession {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        {
            let mut state = self.browser.lock();
            state.visits.push(url.to_string());
            if state.unreachable.contains(url) || !state.pages.contains_key(url) {
                return Err(ScrapeError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                });
            }
        }
        self.history.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn wait_for_css(&self, css: &str, _timeout: Duration) -> Result<bool, ScrapeError> {
        let sel = selector(css)?;
        let doc = Html::parse_document(&self.current_html());
        let found = doc.select(&sel).next().is_some();
        Ok(found)
    }

    async fn html(&self) -> Result<String, ScrapeError> {
        Ok(self.current_html())
    }

    async fn click_nth_by_tag(&self, tag: &str, index: usize) -> Result<(), ScrapeError> {
        let sel = selector(tag)?;
        let found = Html::parse_document(&self.current_html())
            .select(&sel)
            .count();
        if index >= found {
            return Err(ScrapeError::ElementIndex {
                tag: tag.to_string(),
                index,
                found,
            });
        }
        let page = self.current_url().unwrap_or_default();
        let target = self
            .browser
            .lock()
            .clicks
            .get(&(page, tag.to_string(), index))
            .cloned();
        match target {
            Some(url) => self.goto(&url).await,
            None => Ok(()),
        }
    }

    async fn back(&self) -> Result<(), ScrapeError> {
        self.browser.lock().events.push("back");
        let mut history = self.history.lock().unwrap();
        if history.len() > 1 {
            history.pop();
        }
        Ok(())
    }

    async fn quit(self) -> Result<(), ScrapeError> {
        let mut state = self.browser.lock();
        state.closed += 1;
        state.alive = state.alive.saturating_sub(1);
        state.events.push("quit");
        Ok(())
    }
}
