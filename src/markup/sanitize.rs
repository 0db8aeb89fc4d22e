//! Structural transforms that normalize a fetched passage fragment into an
//! embeddable form. The transform order is a contract: block-indent
//! replacement runs before unwrapping, deletions run before the global
//! attribute strip, and the root class is assigned last.

use crate::config::RenderStyle;

use super::tree::{self, Document, Element, Node};

/// Sanitize one fetched passage body for embedding.
///
/// Both styles replace `block-indent` elements with blockquotes, delete
/// `indent` markers, and strip every `class`/`id` attribute. IndentedEmbed
/// additionally unwraps `esv-text` wrappers, deletes `chapter-num` markers,
/// and re-indents each output line by four spaces for nesting inside an
/// enclosing markdown block; FlatEmbed keeps chapter numbers and emits the
/// serialized markup as-is.
///
/// Empty or malformed input produces an empty fragment. Running the
/// sanitizer on its own output is a no-op: nothing it matches on survives
/// a first pass.
pub fn sanitize(body: &str, style: RenderStyle) -> String {
    let mut doc = tree::parse(body);

    replace_block_indent(&mut doc.children);
    if style == RenderStyle::IndentedEmbed {
        // Unwrap applies to descendants only: the root keeps the esv-text
        // class assigned below, so sanitized output must survive a second
        // pass without the root itself being unwrapped.
        for node in doc.children.iter_mut() {
            if let Node::Element(el) = node {
                unwrap_class(&mut el.children, "esv-text");
            }
        }
    }
    match style {
        RenderStyle::IndentedEmbed => remove_classes(&mut doc.children, &["indent", "chapter-num"]),
        RenderStyle::FlatEmbed => remove_classes(&mut doc.children, &["indent"]),
    }
    strip_class_and_id(&mut doc.children);
    if let Some(root) = doc.root_element_mut() {
        root.set_attr("class", "esv-text");
    }

    let serialized = tree::serialize(&doc);
    match style {
        RenderStyle::IndentedEmbed => indent_lines(&serialized),
        RenderStyle::FlatEmbed => serialized,
    }
}

fn has_class(el: &Element, token: &str) -> bool {
    el.attr("class")
        .map(|c| c.split_whitespace().any(|t| t == token))
        .unwrap_or(false)
}

/// `block-indent` elements become attribute-less blockquotes around the
/// same children.
fn replace_block_indent(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            if has_class(el, "block-indent") {
                let children = std::mem::take(&mut el.children);
                *el = Element {
                    name: "blockquote".to_string(),
                    attrs: Vec::new(),
                    children,
                };
            }
            replace_block_indent(&mut el.children);
        }
    }
}

/// Splice each matching element's children into its parent, discarding the
/// wrapper. Children are processed before the splice so nested wrappers
/// unwrap too.
fn unwrap_class(nodes: &mut Vec<Node>, token: &str) {
    let mut i = 0;
    while i < nodes.len() {
        if let Node::Element(el) = &mut nodes[i] {
            unwrap_class(&mut el.children, token);
            if has_class(el, token) {
                let children = std::mem::take(&mut el.children);
                nodes.splice(i..=i, children);
                continue;
            }
        }
        i += 1;
    }
}

/// Delete matching elements entirely, descendants included.
fn remove_classes(nodes: &mut Vec<Node>, tokens: &[&str]) {
    nodes.retain(|n| {
        !matches!(n, Node::Element(el) if tokens.iter().any(|t| has_class(el, t)))
    });
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            remove_classes(&mut el.children, tokens);
        }
    }
}

fn strip_class_and_id(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            el.attrs.retain(|(k, _)| k != "class" && k != "id");
            strip_class_and_id(&mut el.children);
        }
    }
}

/// Prefix every non-blank line with four spaces, replacing any existing
/// leading whitespace; lines that are just "\n" are dropped.
fn indent_lines(s: &str) -> String {
    let mut out = String::new();
    for line in s.split_inclusive('\n') {
        if line == "\n" {
            continue;
        }
        out.push_str("    ");
        out.push_str(line.trim_start());
    }
    out
}

// ── Tests ──
