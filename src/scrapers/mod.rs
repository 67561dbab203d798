//! Per-site scrapers.
//!
//! Each submodule scrapes one of the four mirror sites and follows the same
//! pipeline: navigate, wait, parse, locate, extract, resolve URLs.
//!
//! # Sources
//!
//! | Data | Module | Method | Failure policy |
//! |------|--------|--------|----------------|
//! | Latest headline + teaser | [`news`] | Browser | fail-open |
//! | Featured image | [`featured_image`] | Browser, one click | fail-open |
//! | Mars/Earth facts | [`facts`] | Plain HTTP | fail-closed |
//! | Hemisphere images | [`hemispheres`] | Browser, one session per tile | fail-closed |
//!
//! Fail-open routines let unexpected errors abort the run; fail-closed ones
//! report an absent result instead. A missing element is always an absent
//! result, never an error.

pub mod facts;
pub mod featured_image;
pub mod hemispheres;
pub mod news;

use std::time::Duration;

use reqwest::Client;

use crate::browser::SessionFactory;
use crate::config::Sites;
use crate::error::ScrapeError;
use crate::models::{HemisphereEntry, NewsTeaser};

/// The four scraping routines, as seen by the orchestrator.
pub trait Extractors<F: SessionFactory> {
    async fn news(&self, session: &F::Session) -> Result<Option<NewsTeaser>, ScrapeError>;

    async fn featured_image(&self, session: &F::Session) -> Result<Option<String>, ScrapeError>;

    async fn facts(&self) -> Result<Option<String>, ScrapeError>;

    async fn hemispheres(
        &self,
        session: &F::Session,
        factory: &F,
    ) -> Result<Option<Vec<HemisphereEntry>>, ScrapeError>;
}

/// Scrapes the real sites.
#[derive(Debug, Clone)]
pub struct SiteExtractors {
    sites: Sites,
    client: Client,
    news_wait: Duration,
}

impl SiteExtractors {
    pub fn new(sites: Sites, client: Client, news_wait: Duration) -> Self {
        Self {
            sites,
            client,
            news_wait,
        }
    }
}

impl<F: SessionFactory> Extractors<F> for SiteExtractors {
    async fn news(&self, session: &F::Session) -> Result<Option<NewsTeaser>, ScrapeError> {
        news::mars_news(session, &self.sites.news, self.news_wait).await
    }

    async fn featured_image(&self, session: &F::Session) -> Result<Option<String>, ScrapeError> {
        featured_image::featured_image(session, &self.sites.images).await
    }

    async fn facts(&self) -> Result<Option<String>, ScrapeError> {
        facts::mars_facts(&self.client, &self.sites.facts).await
    }

    async fn hemispheres(
        &self,
        session: &F::Session,
        factory: &F,
    ) -> Result<Option<Vec<HemisphereEntry>>, ScrapeError> {
        hemispheres::hemispheres(session, factory, &self.sites.hemispheres).await
    }
}
