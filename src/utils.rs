//! Small helpers shared by the scrapers and output writers.
//!
//! - URL joining against a site's base URL
//! - CSS selector compilation with a typed error
//! - HTML text escaping for serialized fragments
//! - String truncation for log previews
//! - Output directory validation

use scraper::{ElementRef, Selector};
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::ScrapeError;

/// Join a site-relative path onto a base URL.
///
/// This is plain concatenation with exactly one `/` between the parts; the
/// paths scraped from the mirror sites are always rooted at the site.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(absolute_url("https://a.com", "/img/x.jpg"), "https://a.com/img/x.jpg");
/// assert_eq!(absolute_url("https://a.com/", "img/x.jpg"), "https://a.com/img/x.jpg");
/// ```
pub fn absolute_url(base: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Compile a CSS selector, mapping parse failures to [`ScrapeError::Selector`].
pub fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css.to_string()))
}

/// Concatenate every text node below `element`, untouched.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Escape `&`, `<` and `>` for inclusion in HTML element content; quotes pass through.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary)
/// with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), ScrapeError> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
