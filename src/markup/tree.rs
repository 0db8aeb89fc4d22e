//! A small owned markup tree over quick-xml events.
//!
//! The passage API returns XML-ish HTML fragments. Parsing must tolerate
//! anything the API sends back: an empty or malformed body parses to an
//! empty document rather than an error, so a failed fetch upstream still
//! renders. Text is kept raw (entities like `&nbsp;` pass through verbatim,
//! never decoded) and serialization writes it back untouched.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Element {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key` to `value`, replacing an existing attribute of that name.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value.to_string();
        } else {
            self.attrs.push((key.to_string(), value.to_string()));
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    /// First top-level element, if any. The passage API wraps its output in
    /// one root `<div>`, but nothing here depends on that.
    pub fn root_element_mut(&mut self) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }
}

/// Parse a fragment into a tree. Never fails: any reader error yields an
/// empty document, stray end tags are ignored, unclosed elements are closed
/// at end of input.
pub fn parse(input: &str) -> Document {
    let mut reader = Reader::from_str(input);
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;

    let mut doc = Document::default();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(element_from(&e)),
            Ok(Event::Empty(e)) => {
                let el = element_from(&e);
                attach(&mut doc, &mut stack, Node::Element(el));
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if let Some(pos) = stack.iter().rposition(|el| el.name == name) {
                    // Anything opened above the match was left unclosed;
                    // fold it into its parent on the way down.
                    while stack.len() > pos + 1 {
                        let el = stack.pop().unwrap();
                        attach(&mut doc, &mut stack, Node::Element(el));
                    }
                    let el = stack.pop().unwrap();
                    attach(&mut doc, &mut stack, Node::Element(el));
                }
            }
            Ok(Event::Text(e)) => {
                let raw = String::from_utf8_lossy(&e).into_owned();
                attach(&mut doc, &mut stack, Node::Text(raw));
            }
            Ok(Event::CData(e)) => {
                let raw = String::from_utf8_lossy(&e).into_owned();
                attach(&mut doc, &mut stack, Node::Text(raw));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {} // declarations, comments, PIs: dropped
            Err(_) => return Document::default(),
        }
    }

    while let Some(el) = stack.pop() {
        attach(&mut doc, &mut stack, Node::Element(el));
    }

    doc
}

fn element_from(e: &BytesStart) -> Element {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut el = Element::new(&name);
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        el.attrs.push((key, value));
    }
    el
}

fn attach(doc: &mut Document, stack: &mut Vec<Element>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => doc.children.push(node),
    }
}

/// Serialize back to markup text. Empty elements self-close.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    for node in &doc.children {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(t) => out.push_str(t),
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (k, v) in &el.attrs {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(v);
                out.push('"');
            }
            if el.children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in &el.children {
                    write_node(out, child);
                }
                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
        }
    }
}

// ── Tests ──
