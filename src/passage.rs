//! Passage fetching: one GET per reference occurrence against the ESV
//! passage API, body sanitized into an embeddable fragment. A failed fetch
//! degrades to an empty fragment; the run never aborts on a bad reference.

use std::sync::{Arc, LazyLock};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::config::{Config, RenderStyle};
use crate::entry::Entry;
use crate::markup;

const CONCURRENCY: usize = 8;

/// Inline "verse 1 of chapter N" labels the API emits even with verse
/// numbers suppressed. Removed as a blunt textual substitution before any
/// parsing happens.
static CHAPTER_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+:1&nbsp;").unwrap());

pub struct PassageClient {
    http: reqwest::Client,
    api_key: String,
    passage_url: String,
    style: RenderStyle,
}

impl PassageClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        PassageClient {
            http,
            api_key: config.api_key.clone(),
            passage_url: config.passage_url.clone(),
            style: config.style,
        }
    }

    /// Fetch one reference and return its sanitized fragment. Transport
    /// errors and non-200 responses yield an empty fragment.
    pub async fn fetch(&self, reference: &str) -> String {
        let body = self.fetch_body(reference).await;
        let body = CHAPTER_LABEL_RE.replace_all(&body, "");
        markup::sanitize(&body, self.style)
    }

    async fn fetch_body(&self, reference: &str) -> String {
        let url = build_url(&self.passage_url, &self.api_key, reference);
        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Passage fetch failed for {}: {}", reference, e);
                return String::new();
            }
        };
        if response.status() != reqwest::StatusCode::OK {
            warn!(
                "Passage fetch for {} returned {}",
                reference,
                response.status()
            );
            return String::new();
        }
        match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Passage body unreadable for {}: {}", reference, e);
                String::new()
            }
        }
    }
}

/// Query-parameter form of a reference: whitespace becomes `+`, colons
/// become `%3A`.
pub fn encode_reference(reference: &str) -> String {
    let mut out = String::with_capacity(reference.len());
    for c in reference.chars() {
        if c.is_whitespace() {
            out.push('+');
        } else if c == ':' {
            out.push_str("%3A");
        } else {
            out.push(c);
        }
    }
    out
}

fn build_url(passage_url: &str, api_key: &str, reference: &str) -> String {
    format!(
        "{}?key={}&passage={}\
         &include-passage-references=false\
         &include-first-verse-numbers=false\
         &include-verse-numbers=false\
         &include-footnotes=false\
         &include-short-copyright=false\
         &include-headings=false\
         &include-subheadings=false",
        passage_url,
        api_key,
        encode_reference(reference)
    )
}

/// Fetch every reference of every entry with bounded concurrency, returning
/// fragments in exactly the entry/reference order the renderer will walk.
/// Each occurrence is fetched fresh; repeated reference strings are not
/// deduplicated.
pub async fn prefetch_fragments(
    client: &Arc<PassageClient>,
    entries: &[Entry],
) -> Result<Vec<Vec<String>>> {
    let total: usize = entries.iter().map(|e| e.references.all.len()).sum();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let semaphore = Arc::new(Semaphore::new(CONCURRENCY));
    let mut handles = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut entry_handles = Vec::with_capacity(entry.references.all.len());
        for reference in &entry.references.all {
            let client = Arc::clone(client);
            let sem = Arc::clone(&semaphore);
            let reference = reference.clone();
            entry_handles.push(tokio::spawn(async move {
                let _permit = sem.acquire().await.expect("semaphore closed");
                client.fetch(&reference).await
            }));
        }
        handles.push(entry_handles);
    }

    // Awaiting in submission order keeps fragments aligned with render order.
    let mut fragments = Vec::with_capacity(handles.len());
    for entry_handles in handles {
        let mut list = Vec::with_capacity(entry_handles.len());
        for handle in entry_handles {
            list.push(handle.await.unwrap_or_default());
            pb.inc(1);
        }
        fragments.push(list);
    }

    pb.finish_and_clear();
    Ok(fragments)
}

// ── Tests ──
