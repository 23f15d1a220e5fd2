//! XHTML parser producing [`Element`] trees.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::element::Element;
use crate::entities::{convert_html_entities, decode_entity};
use crate::error::TreeError;

/// Tag of the synthetic wrapper element returned by the parser.
pub const ROOT_TAG: &str = "root";

/// Parse an XHTML fragment into a tree.
///
/// Shorthand for [`XhtmlParser::parse`].
///
/// # Errors
///
/// Returns an error if the fragment is not well-formed XML.
pub fn parse_xhtml(html: &str) -> Result<Element, TreeError> {
    XhtmlParser::new().parse(html)
}

/// Parser for XHTML fragments.
pub struct XhtmlParser;

impl XhtmlParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse an XHTML fragment.
    ///
    /// The fragment is wrapped in a synthetic [`ROOT_TAG`] element so that
    /// multiple top-level nodes and leading text are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment is not well-formed XML.
    pub fn parse(&self, html: &str) -> Result<Element, TreeError> {
        let html = convert_html_entities(html);
        let wrapped = format!("<{ROOT_TAG}>{html}</{ROOT_TAG}>");

        let mut reader = Reader::from_str(&wrapped);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let tag = self.decode_tag(&reader, &e)?;
                    let mut root = self.parse_children(&mut reader, &tag)?;
                    root.tag = tag;
                    return Ok(root);
                }
                Event::Eof => return Ok(Element::new(ROOT_TAG)),
                _ => {}
            }
            buf.clear();
        }
    }

    fn parse_children<R: BufRead>(
        &self,
        reader: &mut Reader<R>,
        parent_tag: &str,
    ) -> Result<Element, TreeError> {
        let mut buf = Vec::new();
        let mut node = Element::default();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let child_tag = self.decode_tag(reader, &e)?;
                    let child_attrs = self.decode_attrs(reader, &e)?;
                    let mut child = self.parse_children(reader, &child_tag)?;
                    child.tag = child_tag;
                    child.attrs = child_attrs;
                    node.children.push(child);
                }
                Event::Empty(e) => {
                    let child = Element {
                        tag: self.decode_tag(reader, &e)?,
                        attrs: self.decode_attrs(reader, &e)?,
                        ..Default::default()
                    };
                    node.children.push(child);
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?;
                    append_text(&mut node, &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?;
                    append_text(&mut node, &decode_entity(&entity));
                }
                Event::CData(e) => {
                    append_text(&mut node, &String::from_utf8_lossy(&e));
                }
                Event::End(_) => return Ok(node),
                Event::Eof => {
                    return Err(TreeError::UnexpectedEnd {
                        tag: parent_tag.to_owned(),
                    });
                }
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }
    }

    fn decode_tag<R: BufRead>(
        &self,
        reader: &Reader<R>,
        e: &BytesStart,
    ) -> Result<String, TreeError> {
        Ok(reader.decoder().decode(e.name().as_ref())?.into_owned())
    }

    fn decode_attrs<R: BufRead>(
        &self,
        reader: &Reader<R>,
        e: &BytesStart,
    ) -> Result<std::collections::BTreeMap<String, String>, TreeError> {
        let mut attrs = std::collections::BTreeMap::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            );
            attrs.insert(key, value);
        }
        Ok(attrs)
    }
}

impl Default for XhtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Append text to the node's text or its last child's tail.
fn append_text(node: &mut Element, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}
