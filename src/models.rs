//! Data models for the scraped Mars record.
//!
//! - [`ScrapeResult`]: the single record produced by one run
//! - [`HemisphereEntry`]: one hemisphere image and its title
//! - [`NewsTeaser`]: the latest headline and its teaser paragraph
//! - [`FactsTable`]: the Mars/Earth comparison table, re-serialized as HTML
//!
//! Every content field of [`ScrapeResult`] is independently optional; only
//! `last_modified` is always present.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::utils::escape_html;

/// The aggregate produced by one scrape run.
///
/// Built once by the orchestrator and never modified afterwards. Field names
/// are part of the JSON output consumed by downstream presentation layers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScrapeResult {
    /// Headline of the most recent news item.
    pub news_title: Option<String>,
    /// Teaser paragraph of the most recent news item.
    pub news_paragraph: Option<String>,
    /// Absolute URL of the featured full-size image.
    pub featured_image: Option<String>,
    /// Facts table as an embeddable HTML fragment.
    pub facts: Option<String>,
    /// Time the record was assembled.
    pub last_modified: DateTime<Local>,
    /// Hemisphere images in page order, or `None` if any tile failed.
    pub hemisphere_image_urls: Option<Vec<HemisphereEntry>>,
}

/// One hemisphere tile: full-resolution image URL and title.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HemisphereEntry {
    pub img_url: String,
    pub title: String,
}

/// The first item of the news listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsTeaser {
    pub title: String,
    pub paragraph: String,
}

/// A single row of the facts table, keyed by its description label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactRow {
    pub description: String,
    pub mars: String,
    pub earth: String,
}

/// The Mars/Earth comparison table with columns relabeled to
/// `description`, `Mars`, `Earth` and `description` used as the row key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactsTable {
    pub rows: Vec<FactRow>,
}

impl FactsTable {
    /// Serialize the table as a dataframe-style HTML fragment.
    ///
    /// The header carries the value columns on the first row and the index
    /// name on the second; each body row leads with its key as a `<th>`.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<table border=\"1\" class=\"dataframe\">\n");
        html.push_str("  <thead>\n");
        html.push_str("    <tr style=\"text-align: right;\">\n");
        html.push_str("      <th></th>\n");
        html.push_str("      <th>Mars</th>\n");
        html.push_str("      <th>Earth</th>\n");
        html.push_str("    </tr>\n");
        html.push_str("    <tr>\n");
        html.push_str("      <th>description</th>\n");
        html.push_str("      <th></th>\n");
        html.push_str("      <th></th>\n");
        html.push_str("    </tr>\n");
        html.push_str("  </thead>\n");
        html.push_str("  <tbody>\n");
        for row in &self.rows {
            // Writing into a String cannot fail.
            let _ = write!(
                html,
                "    <tr>\n      <th>{}</th>\n      <td>{}</td>\n      <td>{}</td>\n    </tr>\n",
                escape_html(&row.description),
                escape_html(&row.mars),
                escape_html(&row.earth),
            );
        }
        html.push_str("  </tbody>\n");
        html.push_str("</table>");
        html
    }
}
