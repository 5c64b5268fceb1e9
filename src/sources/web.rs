//! Stats-site scraper.
//!
//! Fetches one season summary page per request and extracts the first table
//! carrying both a team column and a wins column. The page markup changes
//! from time to time, so table selection is by header content, not by
//! element id.

use scraper::{Html, Selector};
use tracing::{debug, info, instrument};

use crate::common::error::{OracleError, Result};
use crate::domain::RawRow;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Required header columns for a table to count as the team-stats table.
const REQUIRED_COLUMNS: [&str; 2] = ["Team", "W"];

pub fn season_url(base_url: &str, season: u16) -> String {
    format!("{}/leagues/NBA_{}.html", base_url.trim_end_matches('/'), season)
}

/// Fetch one season page and return its team-stats rows.
#[instrument(skip(client, base_url))]
pub async fn fetch_season(
    client: &reqwest::Client,
    base_url: &str,
    season: u16,
) -> Result<Vec<RawRow>> {
    let url = season_url(base_url, season);
    info!(%url, "fetching season page");
    let response = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?;
    let body = response.text().await?;
    debug!(bytes = body.len(), "fetched season page");
    parse_team_table(&body)
}

/// Parse the HTML document and pull rows from the first table whose header
/// contains all of `REQUIRED_COLUMNS`.
pub fn parse_team_table(html: &str) -> Result<Vec<RawRow>> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").expect("static selector");
    let row_selector = Selector::parse("tr").expect("static selector");
    let cell_selector = Selector::parse("th, td").expect("static selector");

    for table in document.select(&table_selector) {
        let mut rows = table.select(&row_selector);

        // Header: the first row whose cells include every required column.
        // Summary pages stack grouping rows above the real header.
        let headers = loop {
            let Some(row) = rows.next() else {
                break None;
            };
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();
            if REQUIRED_COLUMNS.iter().all(|c| cells.iter().any(|h| h == c)) {
                break Some(cells);
            }
        };
        let Some(headers) = headers else {
            continue;
        };

        let mut raw_rows = Vec::new();
        for row in rows {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();
            if cells.is_empty() {
                continue;
            }
            let raw: RawRow = headers.iter().cloned().zip(cells).collect();
            if !raw.is_empty() {
                raw_rows.push(raw);
            }
        }
        debug!(rows = raw_rows.len(), "extracted team-stats table");
        return Ok(raw_rows);
    }

    Err(OracleError::MissingField(
        "no table with Team and W columns found in page".to_string(),
    ))
}
