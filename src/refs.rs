//! Citation-cell parsing: one spreadsheet cell per book, e.g. "5:1-12*; 6:20-49",
//! split into classified verse references.

/// References for one entry, partitioned by the `*` marker in the source data.
/// Order within each list follows per-book cell order; `all` is not a merge
/// of the other two, just every reference in encounter order.
#[derive(Debug, Default, Clone)]
pub struct ReferenceSet {
    pub all: Vec<String>,
    pub essential: Vec<String>,
    pub additional: Vec<String>,
}

impl ReferenceSet {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Parse one citation cell for `book` and append its references to `set`.
///
/// A cell starting with "1 Cor." is a cross-reference to a non-Gospel book:
/// the whole cell is taken verbatim as a single essential reference, with no
/// book prefix and no splitting. Everything else splits on `;`; a token
/// containing `*` is essential (marker assumed to be the last character and
/// stripped as such), any other token is additional.
pub fn parse_cell(book: &str, cell: &str, set: &mut ReferenceSet) {
    if cell.starts_with("1 Cor.") {
        set.all.push(cell.to_string());
        set.essential.push(cell.to_string());
        return;
    }

    let mut tokens: Vec<String> = cell.split(';').map(str::to_string).collect();
    // Trailing empty tokens are dropped (so an empty cell yields nothing and
    // "5:1-12;" yields one token); interior empties are kept as-is.
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    // Tokens are only trimmed when the cell held more than one. A lone token
    // keeps its surrounding whitespace untouched.
    if tokens.len() > 1 {
        for t in &mut tokens {
            *t = t.trim().to_string();
        }
    }

    for token in tokens {
        if token.contains('*') {
            // Strip exactly the last character, wherever the marker sits.
            let mut stripped = token;
            stripped.pop();
            let reference = format!("{} {}", book, stripped);
            set.all.push(reference.clone());
            set.essential.push(reference);
        } else {
            let reference = format!("{} {}", book, token);
            set.all.push(reference.clone());
            set.additional.push(reference);
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(cell: &str) -> ReferenceSet {
        let mut set = ReferenceSet::default();
        parse_cell("Matthew", cell, &mut set);
        set
    }

    #[test]
    fn essential_marker_stripped() {
        let set = parse("5:1-12*");
        assert_eq!(set.essential, vec!["Matthew 5:1-12"]);
        assert_eq!(set.all, vec!["Matthew 5:1-12"]);
        assert!(set.additional.is_empty());
    }

    #[test]
    fn additional_verbatim() {
        let set = parse("6:1-2");
        assert_eq!(set.additional, vec!["Matthew 6:1-2"]);
        assert!(set.essential.is_empty());
    }

    #[test]
    fn single_token_not_trimmed() {
        let set = parse(" 5:1-12 ");
        assert_eq!(set.all, vec!["Matthew  5:1-12 "]);
    }

    #[test]
    fn multiple_tokens_trimmed() {
        let set = parse("5:1-12; 6:1-2 ");
        assert_eq!(set.all, vec!["Matthew 5:1-12", "Matthew 6:1-2"]);
    }

    #[test]
    fn mixed_classification() {
        let set = parse("5:1-12*; 6:20-49");
        assert_eq!(set.essential, vec!["Matthew 5:1-12"]);
        assert_eq!(set.additional, vec!["Matthew 6:20-49"]);
        assert_eq!(set.all, vec!["Matthew 5:1-12", "Matthew 6:20-49"]);
    }

    #[test]
    fn corinthians_bypasses_prefix_and_split() {
        let set = parse("1 Cor. 11:23-25");
        assert_eq!(set.all, vec!["1 Cor. 11:23-25"]);
        assert_eq!(set.essential, vec!["1 Cor. 11:23-25"]);
        assert!(set.additional.is_empty());
    }

    #[test]
    fn corinthians_internal_semicolon_kept() {
        let set = parse("1 Cor. 11:23-25; 15:3-8");
        assert_eq!(set.all, vec!["1 Cor. 11:23-25; 15:3-8"]);
    }

    #[test]
    fn empty_cell_yields_nothing() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn trailing_semicolon_single_token() {
        let set = parse("5:1-12;");
        assert_eq!(set.all, vec!["Matthew 5:1-12"]);
    }

    #[test]
    fn lone_token_marker_mid_string_strips_last_char() {
        // The marker is assumed to be last; a stray trailing space on a lone
        // token means the space is what gets stripped.
        let set = parse("5:1-12* ");
        assert_eq!(set.essential, vec!["Matthew 5:1-12*"]);
    }

    #[test]
    fn aggregate_order_preserved() {
        let mut set = ReferenceSet::default();
        parse_cell("Matthew", "3:1-6", &mut set);
        parse_cell("Mark", "1:2-6*", &mut set);
        parse_cell("Luke", "3:1-6", &mut set);
        assert_eq!(
            set.all,
            vec!["Matthew 3:1-6", "Mark 1:2-6", "Luke 3:1-6"]
        );
    }
}
