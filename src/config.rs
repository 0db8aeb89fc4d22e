//! Run configuration. Everything the fetchers and renderer need is carried
//! explicitly so tests can point them at stub endpoints instead of the live
//! services.

use anyhow::{Context, Result};
use clap::ValueEnum;

pub const FEED_URL: &str = "https://spreadsheets.google.com/feeds/list/0Ap3gNqa5sPMqdF8tVXZNcGViOFQxTm5tUFM5ZXcyZ1E/od6/public/values?alt=json";
pub const PASSAGE_URL: &str = "http://www.esvapi.org/v2/rest/passageQuery";

/// How fetched passage markup is embedded in the output document. The source
/// material contains both variants side by side; neither is canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderStyle {
    /// Unwrap `esv-text` wrappers, drop chapter numbers, and re-indent every
    /// fragment line by four spaces so it nests inside the enclosing
    /// markdown block.
    IndentedEmbed,
    /// Keep chapter numbers and emit the fragment unindented.
    FlatEmbed,
}

/// Pericope title capitalization variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TitleStyle {
    /// Word-by-word capitalization plus upper-casing the character after the
    /// first opening parenthesis ("foo(bar" → "Foo(Bar").
    ParenAware,
    /// Word-by-word capitalization only.
    Plain,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub feed_url: String,
    pub passage_url: String,
    pub style: RenderStyle,
    pub title_style: TitleStyle,
    /// Truncate the dataset after this many entries.
    pub limit: Option<usize>,
}

impl Config {
    /// Read the API key from the environment. The key is a secret; it never
    /// appears in the source or the CLI surface.
    pub fn api_key_from_env() -> Result<String> {
        std::env::var("ESV_API_KEY")
            .context("ESV_API_KEY environment variable must be set")
    }
}
