//! Element node with ElementTree-style `text` / `tail` slots.

use std::collections::BTreeMap;

/// Node in a rendered document tree.
///
/// Text preceding the first child lives in [`text`](Self::text); text that
/// follows this element inside its parent lives in [`tail`](Self::tail).
/// An empty string means "no text".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Element tag name.
    pub tag: String,
    /// Text before the first child.
    pub text: String,
    /// Text after the element, inside its parent.
    pub tail: String,
    /// Element attributes, ordered by key.
    pub attrs: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Set a single attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Check whether an attribute is present.
    #[must_use]
    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Remove an attribute, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.attrs.remove(key)
    }

    /// Append a child element.
    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Insert a child element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > children.len()`.
    pub fn insert(&mut self, index: usize, child: Element) {
        self.children.insert(index, child);
    }

    /// Remove and return the child at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_child(&mut self, index: usize) -> Element {
        self.children.remove(index)
    }

    /// Mutable access to the last child, if any.
    pub fn last_child_mut(&mut self) -> Option<&mut Element> {
        self.children.last_mut()
    }

    /// First direct child with the given tag.
    #[must_use]
    pub fn find_child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Whether any direct child has the given tag.
    #[must_use]
    pub fn has_child(&self, tag: &str) -> bool {
        self.children.iter().any(|child| child.tag == tag)
    }

    /// Iterate over this element and all descendants in document order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Concatenated text of this element and its descendants.
    ///
    /// The element's own tail is not included.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    out.push_str(&element.text);
    for child in &element.children {
        collect_text(child, out);
        out.push_str(&child.tail);
    }
}

/// Pre-order iterator over an element subtree.
pub struct Iter<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}
