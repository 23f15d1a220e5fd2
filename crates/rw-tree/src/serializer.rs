//! XHTML serializer for [`Element`] trees.

use std::fmt::Write;

use crate::element::Element;

/// Elements that are never written in self-closing form.
///
/// Browsers parsing the output as HTML would otherwise treat `<p />`
/// as an open tag.
const CONTAINER_TAGS: &[&str] = &[
    "a",
    "blockquote",
    "div",
    "em",
    "figcaption",
    "figure",
    "li",
    "ol",
    "p",
    "pre",
    "section",
    "span",
    "strong",
    "table",
    "tbody",
    "td",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Serialize the children of `root`, dropping the wrapper element itself.
///
/// This is the inverse of [`parse_xhtml`](crate::parse_xhtml).
#[must_use]
pub fn serialize(root: &Element) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(&escape_text(&root.text));
    for child in &root.children {
        serialize_node(child, &mut out);
    }
    out
}

/// Serialize a single element (including its tail).
#[must_use]
pub fn serialize_element(element: &Element) -> String {
    let mut out = String::new();
    serialize_node(element, &mut out);
    out
}

fn serialize_node(node: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);

    for (key, value) in &node.attrs {
        let _ = write!(out, r#" {}="{}""#, key, escape_attr(value));
    }

    if node.children.is_empty()
        && node.text.is_empty()
        && !CONTAINER_TAGS.contains(&node.tag.as_str())
    {
        out.push_str(" />");
    } else {
        out.push('>');
        out.push_str(&escape_text(&node.text));
        for child in &node.children {
            serialize_node(child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }

    out.push_str(&escape_text(&node.tail));
}

fn escape_text(text: &str) -> String {
    escape_xml(text, false)
}

fn escape_attr(text: &str) -> String {
    escape_xml(text, true)
}

fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            '\'' if escape_quotes => result.push_str("&apos;"),
            _ => result.push(ch),
        }
    }
    result
}
