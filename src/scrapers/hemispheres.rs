//! Hemisphere images.
//!
//! The index page lists one `div.item` tile per hemisphere. For each tile,
//! in document order, a fresh browser session visits the tile's detail page
//! to read the full-resolution image link; the primary session stays on the
//! index page throughout.
//!
//! The result is all or nothing: if any tile fails, every entry collected so
//! far is discarded and the whole list is absent
//! ([`FailurePolicy::FailClosed`]).

use scraper::{ElementRef, Html};
use tracing::{debug, info, instrument, warn};

use crate::browser::{Session, SessionFactory};
use crate::error::{FailurePolicy, ScrapeError};
use crate::models::HemisphereEntry;
use crate::utils::{absolute_url, element_text, selector};

pub const POLICY: FailurePolicy = FailurePolicy::FailClosed;

const TILE: &str = "div.item";
const TILE_LINK: &str = "a.itemLink";
const TILE_TITLE: &str = "h3";
const DOWNLOADS: &str = "div.downloads";
const FULL_RES_LINK: &str = "a[target=\"_blank\"]";

/// A tile on the index page, before its detail page is visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub detail_url: String,
    pub title: String,
}

/// Scrape every hemisphere tile under `base_url`.
///
/// # Arguments
///
/// * `session` - The primary session, used for the index page
/// * `factory` - Opens one short-lived session per tile detail page
/// * `base_url` - Site root; index page and relative links resolve against it
///
/// # Returns
///
/// `Some` with one entry per tile in document order, or `None` if any step
/// failed. A partial list is never returned.
///
/// # Errors
///
/// None in practice: this routine is fail-closed, so every failure becomes
/// `Ok(None)`.
#[instrument(level = "info", skip(session, factory))]
pub async fn hemispheres<S, F>(
    session: &S,
    factory: &F,
    base_url: &str,
) -> Result<Option<Vec<HemisphereEntry>>, ScrapeError>
where
    S: Session,
    F: SessionFactory,
{
    let outcome = scrape_hemispheres(session, factory, base_url).await.map(Some);
    let entries = POLICY.apply("hemispheres", outcome)?;
    match &entries {
        Some(list) => info!(count = list.len(), "Scraped hemisphere images"),
        None => info!("Hemisphere images absent"),
    }
    Ok(entries)
}

async fn scrape_hemispheres<S, F>(
    session: &S,
    factory: &F,
    base_url: &str,
) -> Result<Vec<HemisphereEntry>, ScrapeError>
where
    S: Session,
    F: SessionFactory,
{
    session.goto(base_url).await?;
    let html = session.html().await?;
    let tiles = parse_tiles(&html, base_url)?;
    debug!(tiles = tiles.len(), "Found hemisphere tiles");

    let mut entries = Vec::with_capacity(tiles.len());
    for tile in tiles {
        let img_url = full_resolution_url(factory, &tile.detail_url, base_url).await?;
        entries.push(HemisphereEntry {
            img_url,
            title: tile.title,
        });
    }
    Ok(entries)
}

/// Visit `detail_url` in a dedicated session and read the image link.
///
/// The session is closed on every path once it has been opened.
async fn full_resolution_url<F: SessionFactory>(
    factory: &F,
    detail_url: &str,
    base_url: &str,
) -> Result<String, ScrapeError> {
    let detail = factory.open().await?;
    debug!(%detail_url, "Opened detail session");

    let outcome = read_detail_page(&detail, detail_url, base_url).await;
    let closed = detail.quit().await;
    debug!(%detail_url, "Closed detail session");

    match (outcome, closed) {
        (Ok(url), Ok(())) => Ok(url),
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "Failed to close detail session");
            }
            Err(e)
        }
        (Ok(_), Err(e)) => Err(e),
    }
}

async fn read_detail_page<S: Session>(
    detail: &S,
    detail_url: &str,
    base_url: &str,
) -> Result<String, ScrapeError> {
    detail.goto(detail_url).await?;
    let html = detail.html().await?;
    let rel = parse_full_resolution_path(&html)?;
    detail.back().await?;
    Ok(absolute_url(base_url, &rel))
}

/// The tiles of the index page, in document order.
pub fn parse_tiles(html: &str, base_url: &str) -> Result<Vec<Tile>, ScrapeError> {
    let document = Html::parse_document(html);
    let tile_sel = selector(TILE)?;
    let link_sel = selector(TILE_LINK)?;
    let title_sel = selector(TILE_TITLE)?;

    document
        .select(&tile_sel)
        .map(|tile| -> Result<Tile, ScrapeError> {
            let href = first_attr(tile, &link_sel, "href").ok_or(ScrapeError::MissingElement {
                context: "hemisphere tile",
                selector: TILE_LINK,
            })?;
            let title = tile
                .select(&title_sel)
                .next()
                .map(element_text)
                .ok_or(ScrapeError::MissingElement {
                    context: "hemisphere tile",
                    selector: TILE_TITLE,
                })?;
            Ok(Tile {
                detail_url: absolute_url(base_url, href),
                title,
            })
        })
        .collect()
}

/// The site-relative full-resolution image path on a detail page.
pub fn parse_full_resolution_path(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let downloads_sel = selector(DOWNLOADS)?;
    let link_sel = selector(FULL_RES_LINK)?;

    let downloads = document
        .select(&downloads_sel)
        .next()
        .ok_or(ScrapeError::MissingElement {
            context: "hemisphere detail page",
            selector: DOWNLOADS,
        })?;
    first_attr(downloads, &link_sel, "href")
        .map(str::to_string)
        .ok_or(ScrapeError::MissingElement {
            context: "hemisphere downloads",
            selector: FULL_RES_LINK,
        })
}

fn first_attr<'a>(
    scope: ElementRef<'a>,
    sel: &scraper::Selector,
    attr: &str,
) -> Option<&'a str> {
    scope.select(sel).next().and_then(|e| e.value().attr(attr))
}
