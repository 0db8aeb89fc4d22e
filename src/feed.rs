//! Spreadsheet feed loader: one GET against the public worksheet feed,
//! decoded from its `{feed: {entry: [...]}}` JSON shape. Any failure (HTTP
//! status, transport, undecodable body) degrades to zero records; the rest
//! of the pipeline tolerates an empty dataset.

use serde::Deserialize;
use tracing::{info, warn};

/// One `{"$t": "..."}` cell from the worksheet feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cell {
    #[serde(rename = "$t")]
    pub t: String,
}

/// One pericope row. Column keys are fixed by the worksheet schema,
/// including the literal dot in `gsx$no.`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedRecord {
    #[serde(rename = "gsx$no.")]
    pub no: Cell,
    #[serde(rename = "gsx$pericope")]
    pub pericope: Cell,
    #[serde(rename = "gsx$section")]
    pub section: Cell,
    #[serde(rename = "gsx$matthew")]
    pub matthew: Cell,
    #[serde(rename = "gsx$mark")]
    pub mark: Cell,
    #[serde(rename = "gsx$luke")]
    pub luke: Cell,
    #[serde(rename = "gsx$john")]
    pub john: Cell,
}

#[derive(Debug, Deserialize)]
struct FeedDoc {
    feed: Feed,
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    entry: Vec<FeedRecord>,
}

/// Fetch the dataset. Never fails; a bad response yields an empty list.
pub async fn fetch_records(client: &reqwest::Client, feed_url: &str) -> Vec<FeedRecord> {
    info!("Fetching pericope feed: {}", feed_url);
    let response = match client.get(feed_url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("Feed fetch failed: {}", e);
            return Vec::new();
        }
    };
    if !response.status().is_success() {
        warn!("Feed fetch returned {}", response.status());
        return Vec::new();
    }
    let body = match response.text().await {
        Ok(b) => b,
        Err(e) => {
            warn!("Feed body unreadable: {}", e);
            return Vec::new();
        }
    };
    parse_feed(&body)
}

/// Decode the feed JSON; undecodable input yields an empty list.
pub fn parse_feed(body: &str) -> Vec<FeedRecord> {
    match serde_json::from_str::<FeedDoc>(body) {
        Ok(doc) => {
            info!("Feed returned {} records", doc.feed.entry.len());
            doc.feed.entry
        }
        Err(e) => {
            warn!("Feed body undecodable: {}", e);
            Vec::new()
        }
    }
}

// ── Tests ──
