//! Entry model: one pericope row combined with its parsed references and
//! the anchor identifiers the renderer links on.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::TitleStyle;
use crate::feed::FeedRecord;
use crate::refs::{self, ReferenceSet};

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

#[derive(Debug, Clone)]
pub struct Entry {
    /// Ordinal from the dataset. Opaque: only ever displayed and used in
    /// anchors, never treated as a number.
    pub num: String,
    pub pericope: String,
    pub section: String,
    pub references: ReferenceSet,
}

impl Entry {
    /// Build an entry from a feed record. Citation cells are trimmed here;
    /// the reference parser itself never trims a lone token. Books are
    /// processed in the fixed worksheet order.
    pub fn from_record(record: &FeedRecord, title_style: TitleStyle) -> Self {
        let mut references = ReferenceSet::default();
        for (book, cell) in [
            ("Matthew", &record.matthew),
            ("Mark", &record.mark),
            ("Luke", &record.luke),
            ("John", &record.john),
        ] {
            refs::parse_cell(book, cell.t.trim(), &mut references);
        }

        Entry {
            num: record.no.t.clone(),
            pericope: normalize_title(&record.pericope.t, title_style),
            section: record.section.t.clone(),
            references,
        }
    }

    pub fn anchor(&self) -> String {
        format!("entry-{}", self.num)
    }

    pub fn toc_anchor(&self) -> String {
        format!("entry-{}-toc", self.num)
    }

    pub fn section_anchor(&self) -> String {
        format!("section-{}", slug(&self.section))
    }

    pub fn section_toc_anchor(&self) -> String {
        format!("section-{}-toc", slug(&self.section))
    }
}

/// URL-safe form of a section label: lowercase, non-alphanumeric runs
/// collapsed to single hyphens, edges trimmed.
pub fn slug(s: &str) -> String {
    let lower = s.to_lowercase();
    SLUG_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Capitalize a title word by word (first char upper, rest lower). The
/// paren-aware variant additionally upper-cases the character after the
/// first opening parenthesis, which word splitting misses when the paren
/// is not preceded by whitespace.
pub fn normalize_title(raw: &str, style: TitleStyle) -> String {
    let mut title = raw
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if style == TitleStyle::ParenAware {
        if let Some(pos) = title.find('(') {
            let rest = &title[pos + 1..];
            if let Some(c) = rest.chars().next() {
                let upper: String = c.to_uppercase().collect();
                title = format!("{}({}{}", &title[..pos], upper, &rest[c.len_utf8()..]);
            }
        }
    }

    title
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

// ── Tests ──
