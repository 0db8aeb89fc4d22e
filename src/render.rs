//! Markdown assembly: header, table of contents, and body. Section headings
//! are emitted once per consecutive run of entries sharing a section name;
//! a section name recurring later in the list gets a second heading, since
//! detection only compares against the immediately preceding entry.

use crate::entry::Entry;

const SEARCH_QUERY: &str = "http://www.esvbible.org/";

/// Full document: header, TOC, body. `fragments` holds one sanitized
/// passage per reference, aligned with each entry's `references.all`.
pub fn render(entries: &[Entry], fragments: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&header());
    out.push_str(&toc(entries));
    out.push_str(&body(entries, fragments));
    out
}

pub fn header() -> String {
    let mut out = String::new();
    out.push_str("# A Harmony of the Gospel\n\n");
    out.push_str("Derived from _Synopsis Quattuor Evangeliorum_ by **Kurt Aland**.\n");
    out
}

pub fn toc(entries: &[Entry]) -> String {
    let mut out = String::new();
    out.push_str("\n<div id=\"table-of-contents\" markdown=\"1\">\n\n");
    out.push_str("## <a name=\"toc\"></a>Table of Contents\n\n");

    let mut current_section = String::new();
    for entry in entries {
        if entry.section != current_section {
            out.push_str(&format!(
                "+ <a name=\"{}\"></a>[{}](#{})\n",
                entry.section_toc_anchor(),
                entry.section,
                entry.section_anchor()
            ));
            current_section = entry.section.clone();
        }
        out.push_str(&format!(
            "    + <a name=\"{}\"></a>[{}. {}](#{})\n",
            entry.toc_anchor(),
            entry.num,
            entry.pericope,
            entry.anchor()
        ));
    }

    out.push_str("\n</div>\n");
    out
}

pub fn body(entries: &[Entry], fragments: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str("\n<div id=\"gospel-synopsis\" markdown=\"1\">\n\n");
    out.push_str("## Gospel Synopsis\n");

    let mut current_section = String::new();
    for (entry, entry_fragments) in entries.iter().zip(fragments) {
        if entry.section != current_section {
            out.push_str(&format!(
                "\n### <a name=\"{}\"></a>{} <span class=\"toc-jump\">[&and;](#{} \"Go to the Table of Contents\")</span>\n",
                entry.section_anchor(),
                entry.section,
                entry.section_toc_anchor()
            ));
            current_section = entry.section.clone();
        }
        out.push_str(&entry_markdown(entry, entry_fragments));
        out.push('\n');
    }

    out.push_str("\n</div>\n");
    out
}

fn entry_markdown(entry: &Entry, fragments: &[String]) -> String {
    let refs = &entry.references;
    let mut out = format!(
        "\n+ #### <a name=\"{}\"></a>{}. {} <span class=\"toc-jump\">[&and;](#{} \"Go to the Table of Contents\")</span>",
        entry.anchor(),
        entry.num,
        entry.pericope,
        entry.toc_anchor()
    );
    out.push_str("\n\n    <p class=\"entry-references\" markdown=\"1\">");

    // The essential list only prints when both classifications are present;
    // otherwise the final list covers everything on its own.
    if !refs.essential.is_empty() && !refs.additional.is_empty() {
        out.push_str("\n    Essential Verses:");
        push_link_list(&mut out, &refs.essential, "essential verses");
        out.push_str("  ");
    }

    if !refs.additional.is_empty() {
        out.push_str("\n    Additional Verses:");
        push_link_list(&mut out, &refs.additional, "additional verses");
        out.push_str("  ");
    }

    if refs.additional.is_empty() {
        out.push_str("\n    Verses:");
    } else {
        out.push_str("\n    All Verses:");
    }
    push_link_list(&mut out, &refs.all, "all verses");
    out.push_str("\n    </p>");

    out.push_str("\n\n    <div class=\"entry-verses\">");
    for (reference, fragment) in refs.all.iter().zip(fragments) {
        out.push_str(&format!("\n\n    <h5>{}</h5>", reference));
        out.push('\n');
        out.push_str(fragment);
    }
    out.push_str("\n\n    </div>");

    out
}

/// One link per reference, semicolon-separated, with an aggregate "All"
/// link once the list has more than one member.
fn push_link_list(out: &mut String, references: &[String], aggregate_label: &str) {
    for reference in references {
        out.push_str(&format!(
            " [{}]({}{} \"Read {} on esvbible.org\");",
            reference,
            SEARCH_QUERY,
            escape(reference),
            reference
        ));
    }
    out.pop(); // trailing semicolon
    if references.len() > 1 {
        out.push_str(&format!(
            " &mdash; [All]({}{} \"Read {} on esvbible.org\")",
            SEARCH_QUERY,
            escape(&references.join("; ")),
            aggregate_label
        ));
    }
}

/// Spaces are the only character in a reference outside the URI-safe set.
fn escape(reference: &str) -> String {
    reference.replace(' ', "%20")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::ReferenceSet;

    fn entry(num: &str, pericope: &str, section: &str, refs: ReferenceSet) -> Entry {
        Entry {
            num: num.to_string(),
            pericope: pericope.to_string(),
            section: section.to_string(),
            references: refs,
        }
    }

    fn refs(essential: &[&str], additional: &[&str]) -> ReferenceSet {
        let mut set = ReferenceSet::default();
        for r in essential {
            set.all.push(r.to_string());
            set.essential.push(r.to_string());
        }
        for r in additional {
            set.all.push(r.to_string());
            set.additional.push(r.to_string());
        }
        set
    }

    fn empty_fragments(entries: &[Entry]) -> Vec<Vec<String>> {
        entries
            .iter()
            .map(|e| vec![String::new(); e.references.all.len()])
            .collect()
    }

    #[test]
    fn section_heading_once_per_consecutive_run() {
        let entries = vec![
            entry("1", "A", "Infancy", refs(&["Matthew 1:1"], &[])),
            entry("2", "B", "Infancy", refs(&["Matthew 1:2"], &[])),
            entry("3", "C", "Ministry", refs(&["Mark 1:1"], &[])),
        ];
        let toc = toc(&entries);
        assert_eq!(toc.matches("[Infancy]").count(), 1);
        assert_eq!(toc.matches("[Ministry]").count(), 1);

        let body = body(&entries, &empty_fragments(&entries));
        assert_eq!(body.matches("### <a name=\"section-infancy\">").count(), 1);
        assert_eq!(body.matches("### <a name=\"section-ministry\">").count(), 1);
    }

    #[test]
    fn recurring_section_prints_twice() {
        let entries = vec![
            entry("1", "A", "Infancy", refs(&["Matthew 1:1"], &[])),
            entry("2", "B", "Ministry", refs(&["Mark 1:1"], &[])),
            entry("3", "C", "Infancy", refs(&["Luke 1:1"], &[])),
        ];
        let toc = toc(&entries);
        assert_eq!(toc.matches("[Infancy]").count(), 2);
        let body = body(&entries, &empty_fragments(&entries));
        assert_eq!(body.matches("### <a name=\"section-infancy\">").count(), 2);
    }

    #[test]
    fn toc_links_match_body_anchors() {
        let entries = vec![entry(
            "7",
            "The Baptism",
            "The Beginnings",
            refs(&["Mark 1:9-11"], &[]),
        )];
        let toc = toc(&entries);
        let body = body(&entries, &empty_fragments(&entries));
        assert!(toc.contains("](#entry-7)"));
        assert!(body.contains("<a name=\"entry-7\">"));
        assert!(toc.contains("<a name=\"entry-7-toc\">"));
        assert!(body.contains("](#entry-7-toc"));
        assert!(toc.contains("](#section-the-beginnings)"));
        assert!(body.contains("<a name=\"section-the-beginnings\">"));
    }

    #[test]
    fn essential_line_needs_both_classifications() {
        let only_essential = vec![entry("1", "A", "S", refs(&["Matthew 1:1"], &[]))];
        let body_one = body(&only_essential, &empty_fragments(&only_essential));
        assert!(!body_one.contains("Essential Verses:"));
        assert!(body_one.contains("\n    Verses:"));

        let both = vec![entry(
            "1",
            "A",
            "S",
            refs(&["Matthew 1:1"], &["Mark 1:1"]),
        )];
        let body_both = body(&both, &empty_fragments(&both));
        assert!(body_both.contains("Essential Verses:"));
        assert!(body_both.contains("Additional Verses:"));
        assert!(body_both.contains("All Verses:"));
    }

    #[test]
    fn aggregate_link_only_for_multiple_references() {
        let one = vec![entry("1", "A", "S", refs(&["Matthew 1:1"], &[]))];
        assert!(!body(&one, &empty_fragments(&one)).contains("&mdash; [All]"));

        let two = vec![entry(
            "1",
            "A",
            "S",
            refs(&["Matthew 1:1", "Mark 1:1"], &[]),
        )];
        let out = body(&two, &empty_fragments(&two));
        assert!(out.contains(
            "&mdash; [All](http://www.esvbible.org/Matthew%201:1;%20Mark%201:1 \"Read all verses on esvbible.org\")"
        ));
    }

    #[test]
    fn reference_links_escape_spaces_only() {
        let entries = vec![entry("1", "A", "S", refs(&["Matthew 5:1-12"], &[]))];
        let out = body(&entries, &empty_fragments(&entries));
        assert!(out.contains(
            "[Matthew 5:1-12](http://www.esvbible.org/Matthew%205:1-12 \"Read Matthew 5:1-12 on esvbible.org\")"
        ));
    }

    #[test]
    fn fragments_embed_under_reference_headings() {
        let entries = vec![entry(
            "1",
            "A",
            "S",
            refs(&["Matthew 1:1", "Mark 1:1"], &[]),
        )];
        let fragments = vec![vec![
            "    <p>first</p>".to_string(),
            "    <p>second</p>".to_string(),
        ]];
        let out = body(&entries, &fragments);
        let h5_first = out.find("<h5>Matthew 1:1</h5>").unwrap();
        let frag_first = out.find("<p>first</p>").unwrap();
        let h5_second = out.find("<h5>Mark 1:1</h5>").unwrap();
        let frag_second = out.find("<p>second</p>").unwrap();
        assert!(h5_first < frag_first && frag_first < h5_second && h5_second < frag_second);
        assert!(out.contains("<div class=\"entry-verses\">"));
    }

    #[test]
    fn zero_entries_still_render_scaffolding() {
        let out = render(&[], &[]);
        assert!(out.contains("# A Harmony of the Gospel"));
        assert!(out.contains("Table of Contents"));
        assert!(out.contains("## Gospel Synopsis"));
    }
}
