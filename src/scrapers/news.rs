//! Latest Mars news headline.
//!
//! Loads the news listing, polls briefly for the first item to render, and
//! reads the title and teaser out of the first `div.list_text`.
//!
//! A missing item or sub-element is an absent result. Any other failure
//! propagates ([`FailurePolicy::FailOpen`]).

use std::time::Duration;

use scraper::Html;
use tracing::{debug, info, instrument};

use crate::browser::Session;
use crate::error::{FailurePolicy, ScrapeError};
use crate::models::NewsTeaser;
use crate::utils::{element_text, selector};

pub const POLICY: FailurePolicy = FailurePolicy::FailOpen;

const LIST_ITEM: &str = "div.list_text";
const TITLE: &str = "div.content_title";
const TEASER: &str = "div.article_teaser_body";

/// Scrape the newest headline and teaser from the listing at `url`.
///
/// `wait` bounds how long to poll for the first list item before reading
/// the page anyway.
#[instrument(level = "info", skip(session, wait))]
pub async fn mars_news<S: Session>(
    session: &S,
    url: &str,
    wait: Duration,
) -> Result<Option<NewsTeaser>, ScrapeError> {
    let outcome = scrape_news(session, url, wait).await;
    let news = POLICY.apply("news", outcome)?;
    match &news {
        Some(n) => info!(title = %n.title, "Scraped latest news"),
        None => info!("No news item found"),
    }
    Ok(news)
}

async fn scrape_news<S: Session>(
    session: &S,
    url: &str,
    wait: Duration,
) -> Result<Option<NewsTeaser>, ScrapeError> {
    session.goto(url).await?;
    let rendered = session.wait_for_css(LIST_ITEM, wait).await?;
    debug!(rendered, "Polled for first list item");
    let html = session.html().await?;
    parse_news(&html)
}

/// Extract the first list item's title and teaser, verbatim.
pub fn parse_news(html: &str) -> Result<Option<NewsTeaser>, ScrapeError> {
    let document = Html::parse_document(html);
    let item_sel = selector(LIST_ITEM)?;
    let title_sel = selector(TITLE)?;
    let teaser_sel = selector(TEASER)?;

    let Some(item) = document.select(&item_sel).next() else {
        return Ok(None);
    };
    let (Some(title), Some(teaser)) = (
        item.select(&title_sel).next(),
        item.select(&teaser_sel).next(),
    ) else {
        return Ok(None);
    };

    Ok(Some(NewsTeaser {
        title: element_text(title),
        paragraph: element_text(teaser),
    }))
}
