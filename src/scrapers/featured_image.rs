//! Featured full-size image.
//!
//! Opens the image gallery, clicks through to the full-size view and reads
//! the `src` of `img.fancybox-image`, resolved against the gallery's base URL.
//!
//! A missing image element is an absent result. A missing button, like any
//! other failure, propagates ([`FailurePolicy::FailOpen`]).

use scraper::Html;
use tracing::{info, instrument};

use crate::browser::Session;
use crate::error::{FailurePolicy, ScrapeError};
use crate::utils::{absolute_url, selector};

pub const POLICY: FailurePolicy = FailurePolicy::FailOpen;

/// Zero-based index of the "full image" button among the page's `<button>`s.
///
/// Fragile: this relies on the gallery's current button order and has no
/// semantic anchor on the page.
pub const FULL_IMAGE_BUTTON_INDEX: usize = 1;

const FULL_IMAGE: &str = "img.fancybox-image";

/// Scrape the featured image URL from the gallery at `base_url`.
#[instrument(level = "info", skip(session))]
pub async fn featured_image<S: Session>(
    session: &S,
    base_url: &str,
) -> Result<Option<String>, ScrapeError> {
    let outcome = scrape_featured_image(session, base_url).await;
    let image = POLICY.apply("featured_image", outcome)?;
    match &image {
        Some(url) => info!(%url, "Scraped featured image"),
        None => info!("No featured image found"),
    }
    Ok(image)
}

async fn scrape_featured_image<S: Session>(
    session: &S,
    base_url: &str,
) -> Result<Option<String>, ScrapeError> {
    session.goto(base_url).await?;
    session
        .click_nth_by_tag("button", FULL_IMAGE_BUTTON_INDEX)
        .await?;
    let html = session.html().await?;
    Ok(parse_full_image_path(&html)?.map(|rel| absolute_url(base_url, &rel)))
}

/// The site-relative path of the full-size image, if present.
pub fn parse_full_image_path(html: &str) -> Result<Option<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let image_sel = selector(FULL_IMAGE)?;
    Ok(document
        .select(&image_sel)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string))
}
