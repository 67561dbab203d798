//! Mars/Earth comparison table.
//!
//! The facts page is static, so no browser is involved: the page is fetched
//! over HTTP, the first `<table>` is read into a [`FactsTable`] and written
//! back out as an HTML fragment.
//!
//! Any failure (network, HTTP status, no table, wrong column count) yields
//! an absent result ([`FailurePolicy::FailClosed`]).

use reqwest::Client;
use scraper::{ElementRef, Html};
use tracing::{debug, info, instrument};

use crate::error::{FailurePolicy, ScrapeError};
use crate::models::{FactRow, FactsTable};
use crate::utils::{selector, truncate_for_log};

pub const POLICY: FailurePolicy = FailurePolicy::FailClosed;

const COLUMNS: usize = 3;

/// Fetch the facts page at `url` and return the table as an HTML fragment.
///
/// # Arguments
///
/// * `client` - HTTP client for the plain GET; no browser is involved
/// * `url` - The facts page
///
/// # Returns
///
/// The first table relabeled to `Mars`/`Earth` columns and rendered by
/// [`FactsTable::to_html`], or `None` when the page cannot be fetched or
/// holds no usable table.
///
/// # Errors
///
/// None in practice: this routine is fail-closed, so every failure becomes
/// `Ok(None)`.
#[instrument(level = "info", skip(client))]
pub async fn mars_facts(client: &Client, url: &str) -> Result<Option<String>, ScrapeError> {
    let outcome = scrape_facts(client, url).await.map(Some);
    let facts = POLICY.apply("facts", outcome)?;
    info!(present = facts.is_some(), "Scraped facts table");
    Ok(facts)
}

async fn scrape_facts(client: &Client, url: &str) -> Result<String, ScrapeError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text().await?;
    debug!(bytes = body.len(), preview = %truncate_for_log(&body, 120), "Fetched facts page");
    let table = parse_facts_table(&body)?;
    info!(rows = table.rows.len(), "Parsed facts table");
    Ok(table.to_html())
}

/// Read the first table of `html` into description/Mars/Earth rows.
///
/// Leading rows made only of `<th>` cells are the source header and are
/// dropped. Every other row must have exactly three cells.
pub fn parse_facts_table(html: &str) -> Result<FactsTable, ScrapeError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScrapeError::TableShape("no tables found".to_string()))?;

    let mut rows = Vec::new();
    let mut in_header = true;
    for (i, tr) in table.select(&row_sel).enumerate() {
        // Rows of a nested table belong to that table.
        if !belongs_to(tr, table) {
            continue;
        }
        let cells: Vec<ElementRef<'_>> = tr.select(&cell_sel).collect();
        if in_header && !cells.is_empty() && cells.iter().all(|c| c.value().name() == "th") {
            continue;
        }
        in_header = false;
        if cells.len() != COLUMNS {
            return Err(ScrapeError::TableShape(format!(
                "row {i} has {} cells, expected {COLUMNS}",
                cells.len()
            )));
        }
        let text: Vec<String> = cells.iter().map(|c| cell_text(*c)).collect();
        rows.push(FactRow {
            description: text[0].clone(),
            mars: text[1].clone(),
            earth: text[2].clone(),
        });
    }

    Ok(FactsTable { rows })
}

fn belongs_to(tr: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
        .is_some_and(|owner| owner.id() == table.id())
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}
