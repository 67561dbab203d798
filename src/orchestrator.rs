//! Runs the four scrapers against one primary browser session.
//!
//! The routines run strictly one after another in a fixed order: news,
//! featured image, facts, hemispheres. The primary session is closed on every
//! exit path, including when a fail-open routine aborts the run.

use chrono::Local;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::browser::{Session, SessionFactory};
use crate::error::ScrapeError;
use crate::models::ScrapeResult;
use crate::scrapers::Extractors;

/// Open a primary session, run every scraper and assemble the result.
///
/// # Arguments
///
/// * `factory` - Opens the primary session; also handed to the hemisphere
///   scraper for its detail-page sessions
/// * `extractors` - The four scraping routines to run, in order
///
/// # Returns
///
/// A [`ScrapeResult`] whose fields are absent where a fail-closed routine
/// found nothing, stamped with the local time the routines finished.
///
/// # Errors
///
/// The first error a fail-open routine propagates, or the session open
/// failure. The primary session is closed in either case; its own close
/// failure is returned only when every routine succeeded.
#[instrument(level = "info", skip_all)]
pub async fn scrape_all<F, E>(factory: &F, extractors: &E) -> Result<ScrapeResult, ScrapeError>
where
    F: SessionFactory,
    E: Extractors<F>,
{
    let t0 = Instant::now();
    let session = factory.open().await?;
    info!("Primary browser session open");

    let outcome = run_extractors(&session, factory, extractors).await;
    let closed = session.quit().await;
    info!("Primary browser session closed");

    let result = match (outcome, closed) {
        (Ok(result), Ok(())) => result,
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "Failed to close primary session");
            }
            return Err(e);
        }
        (Ok(_), Err(e)) => return Err(e),
    };

    info!(
        elapsed_ms = t0.elapsed().as_millis() as u64,
        news = result.news_title.is_some(),
        featured_image = result.featured_image.is_some(),
        facts = result.facts.is_some(),
        hemispheres = result.hemisphere_image_urls.as_ref().map(Vec::len),
        "Scrape complete"
    );
    Ok(result)
}

async fn run_extractors<F, E>(
    session: &F::Session,
    factory: &F,
    extractors: &E,
) -> Result<ScrapeResult, ScrapeError>
where
    F: SessionFactory,
    E: Extractors<F>,
{
    let news = extractors.news(session).await?;
    let featured_image = extractors.featured_image(session).await?;
    let facts = extractors.facts().await?;
    let hemisphere_image_urls = extractors.hemispheres(session, factory).await?;

    let (news_title, news_paragraph) = match news {
        Some(n) => (Some(n.title), Some(n.paragraph)),
        None => (None, None),
    };

    Ok(ScrapeResult {
        news_title,
        news_paragraph,
        featured_image,
        facts,
        last_modified: Local::now(),
        hemisphere_image_urls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fixture::FixtureBrowser;
    use crate::models::{HemisphereEntry, NewsTeaser};
    use std::sync::Mutex;

    /// Fixed answers, optionally failing in one routine, recording call order.
    #[derive(Default)]
    struct CannedExtractors {
        fail_in: Option<&'static str>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl CannedExtractors {
        fn failing_in(routine: &'static str) -> Self {
            Self {
                fail_in: Some(routine),
                ..Self::default()
            }
        }

        fn record(&self, routine: &'static str) -> Result<(), ScrapeError> {
            self.calls.lock().unwrap().push(routine);
            if self.fail_in == Some(routine) {
                return Err(ScrapeError::DriverStartup(format!("{routine} exploded")));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn canned_hemispheres() -> Vec<HemisphereEntry> {
        vec![HemisphereEntry {
            img_url: "https://marshemispheres.com/images/valles.tif".to_string(),
            title: "Valles Marineris Hemisphere Enhanced".to_string(),
        }]
    }

    impl Extractors<FixtureBrowser> for CannedExtractors {
        async fn news(
            &self,
            _session: &<FixtureBrowser as SessionFactory>::Session,
        ) -> Result<Option<NewsTeaser>, ScrapeError> {
            self.record("news")?;
            Ok(Some(NewsTeaser {
                title: "Dust storm".to_string(),
                paragraph: "A big one.".to_string(),
            }))
        }

        async fn featured_image(
            &self,
            _session: &<FixtureBrowser as SessionFactory>::Session,
        ) -> Result<Option<String>, ScrapeError> {
            self.record("featured_image")?;
            Ok(Some("https://spaceimages-mars.com/img/full.jpg".to_string()))
        }

        async fn facts(&self) -> Result<Option<String>, ScrapeError> {
            self.record("facts")?;
            Ok(Some("<table></table>".to_string()))
        }

        async fn hemispheres(
            &self,
            _session: &<FixtureBrowser as SessionFactory>::Session,
            _factory: &FixtureBrowser,
        ) -> Result<Option<Vec<HemisphereEntry>>, ScrapeError> {
            self.record("hemispheres")?;
            Ok(Some(canned_hemispheres()))
        }
    }

    #[tokio::test]
    async fn test_scrape_all_assembles_fixed_values() {
        let browser = FixtureBrowser::new();
        let extractors = CannedExtractors::default();

        let before = Local::now();
        let result = scrape_all(&browser, &extractors).await.unwrap();
        let after = Local::now();

        assert_eq!(result.news_title.as_deref(), Some("Dust storm"));
        assert_eq!(result.news_paragraph.as_deref(), Some("A big one."));
        assert_eq!(
            result.featured_image.as_deref(),
            Some("https://spaceimages-mars.com/img/full.jpg")
        );
        assert_eq!(result.facts.as_deref(), Some("<table></table>"));
        assert_eq!(result.hemisphere_image_urls, Some(canned_hemispheres()));
        assert!(before <= result.last_modified && result.last_modified <= after);

        assert_eq!(
            extractors.calls(),
            vec!["news", "featured_image", "facts", "hemispheres"]
        );
        assert_eq!(browser.opened(), 1);
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_primary_session_closed_once_when_routine_fails() {
        for routine in ["news", "featured_image", "facts", "hemispheres"] {
            let browser = FixtureBrowser::new();
            let extractors = CannedExtractors::failing_in(routine);

            let err = scrape_all(&browser, &extractors).await.unwrap_err();

            assert!(err.to_string().contains(routine));
            assert_eq!(browser.opened(), 1, "{routine}");
            assert_eq!(browser.closed(), 1, "{routine}");
        }
    }

    #[tokio::test]
    async fn test_failure_stops_later_routines() {
        let browser = FixtureBrowser::new();
        let extractors = CannedExtractors::failing_in("featured_image");
        scrape_all(&browser, &extractors).await.unwrap_err();
        assert_eq!(extractors.calls(), vec!["news", "featured_image"]);
    }

    #[tokio::test]
    async fn test_primary_session_open_failure() {
        let browser = FixtureBrowser::new().with_session_limit(0);
        let extractors = CannedExtractors::default();
        let err = scrape_all(&browser, &extractors).await.unwrap_err();
        assert!(matches!(err, ScrapeError::DriverStartup(_)));
        assert!(extractors.calls().is_empty());
        assert_eq!(browser.closed(), 0);
    }

    #[tokio::test]
    async fn test_scrape_all_against_fixture_sites() {
        use crate::config::Sites;
        use crate::scrapers::SiteExtractors;
        use reqwest::Client;
        use std::time::Duration;

        let sites = Sites {
            news: "http://news.test".to_string(),
            images: "http://images.test".to_string(),
            facts: "http://127.0.0.1:9".to_string(),
            hemispheres: "http://hemispheres.test".to_string(),
        };
        let browser = FixtureBrowser::new()
            .with_page(
                "http://news.test",
                r#"<div class="list_text"><div class="content_title">T</div><div class="article_teaser_body">P</div></div>"#,
            )
            .with_page(
                "http://images.test",
                "<button>a</button><button>b</button>",
            )
            .with_page(
                "http://images.test/full",
                r#"<img class="fancybox-image" src="image/featured/mars2.jpg">"#,
            )
            .with_click("http://images.test", "button", 1, "http://images.test/full")
            .with_page(
                "http://hemispheres.test",
                r#"<div class="item"><a class="itemLink" href="a.html"><h3>A</h3></a></div>"#,
            )
            .with_page(
                "http://hemispheres.test/a.html",
                r#"<div class="downloads"><a target="_blank" href="images/a.tif">Sample</a></div>"#,
            );
        let extractors = SiteExtractors::new(sites, Client::new(), Duration::from_millis(1));

        let result = scrape_all(&browser, &extractors).await.unwrap();

        assert_eq!(result.news_title.as_deref(), Some("T"));
        assert_eq!(result.news_paragraph.as_deref(), Some("P"));
        assert_eq!(
            result.featured_image.as_deref(),
            Some("http://images.test/image/featured/mars2.jpg")
        );
        // Nothing listens on the facts port: that field alone is absent.
        assert_eq!(result.facts, None);
        assert_eq!(
            result.hemisphere_image_urls,
            Some(vec![HemisphereEntry {
                img_url: "http://hemispheres.test/images/a.tif".to_string(),
                title: "A".to_string(),
            }])
        );
        assert_eq!(browser.opened(), 2);
        assert_eq!(browser.closed(), 2);
    }
}
