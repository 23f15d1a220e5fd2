//! Block argument and option parsing.
//!
//! A block carries a free-form leading argument plus a map of named
//! options. The generic `attrs` option uses the `{#id .class key="value"}`
//! syntax and is applied to the block's output node by the host.

use std::collections::BTreeMap;

use rw_tree::Element;

/// Name of the generic attribute option accepted by every block.
pub const ATTRS_OPTION: &str = "attrs";

/// Parsed arguments of a single block.
///
/// # Example
///
/// ```
/// use rw_blocks::BlockArgs;
///
/// let args = BlockArgs::new("< 2").with_option("type", "table-caption");
/// assert_eq!(args.argument, "< 2");
/// assert_eq!(args.option("type"), Some("table-caption"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlockArgs {
    /// Leading argument, trimmed.
    pub argument: String,
    /// Named options (excluding `name` and `argument`).
    pub options: BTreeMap<String, String>,
}

impl BlockArgs {
    /// Create arguments with the given leading argument and no options.
    #[must_use]
    pub fn new(argument: &str) -> Self {
        Self {
            argument: argument.trim().to_owned(),
            options: BTreeMap::new(),
        }
    }

    /// Add an option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Get an option value by name.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Return the first option name that is neither generic nor in `accepted`.
    #[must_use]
    pub fn unknown_option<'a>(&'a self, accepted: &[&str]) -> Option<&'a str> {
        self.options
            .keys()
            .map(String::as_str)
            .find(|key| *key != ATTRS_OPTION && !accepted.contains(key))
    }

    /// Parsed `attrs` option, if present.
    #[must_use]
    pub fn attrs(&self) -> Option<BlockAttrs> {
        self.option(ATTRS_OPTION).map(BlockAttrs::parse)
    }
}

/// Attributes from the `{#id .class key="value"}` syntax.
///
/// # Example
///
/// ```
/// use rw_blocks::BlockAttrs;
///
/// let attrs = BlockAttrs::parse(r#"{#fig-map .wide data-src="map.svg"}"#);
/// assert_eq!(attrs.id, Some("fig-map".to_owned()));
/// assert_eq!(attrs.classes, vec!["wide"]);
/// assert_eq!(attrs.attrs.get("data-src").map(String::as_str), Some("map.svg"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlockAttrs {
    /// ID from `#id`.
    pub id: Option<String>,
    /// Classes from `.class`.
    pub classes: Vec<String>,
    /// Key-value pairs from `key="value"`, `key='value'` or `key=value`.
    pub attrs: BTreeMap<String, String>,
}

impl BlockAttrs {
    /// Parse an attribute list; surrounding braces are optional.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut parsed = Self::default();

        let trimmed = input.trim();
        let mut remaining = trimmed
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(trimmed);

        while !remaining.is_empty() {
            remaining = remaining.trim_start();
            if remaining.is_empty() {
                break;
            }

            if let Some(rest) = remaining.strip_prefix('#') {
                let (name, rest) = split_name(rest);
                if !name.is_empty() {
                    parsed.id = Some(name.to_owned());
                }
                remaining = rest;
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let (name, rest) = split_name(rest);
                if !name.is_empty() {
                    parsed.classes.push(name.to_owned());
                }
                remaining = rest;
            } else if let Some((key, value, rest)) = parse_key_value(remaining) {
                parsed.attrs.insert(key.to_owned(), value.to_owned());
                remaining = rest;
            } else {
                // Skip unrecognized character
                let mut chars = remaining.chars();
                chars.next();
                remaining = chars.as_str();
            }
        }

        parsed
    }

    /// Whether nothing was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    /// Apply the attributes to an element.
    ///
    /// The id replaces any existing one, classes are appended to the
    /// existing `class` attribute, and other pairs are set verbatim.
    pub fn apply(&self, element: &mut Element) {
        if let Some(id) = &self.id {
            element.set("id", id.as_str());
        }

        if !self.classes.is_empty() {
            let mut classes: Vec<&str> = element
                .get("class")
                .map(|c| c.split_whitespace().collect())
                .unwrap_or_default();
            for class in &self.classes {
                if !classes.contains(&class.as_str()) {
                    classes.push(class);
                }
            }
            let joined = classes.join(" ");
            element.set("class", joined);
        }

        for (key, value) in &self.attrs {
            element.set(key.as_str(), value.as_str());
        }
    }
}

/// Split an `#id` / `.class` name off the front of `s`.
fn split_name(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len());
    s.split_at(end)
}

/// Parse a key-value pair: `key="value"`, `key='value'` or `key=value`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();

    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_trimmed() {
        let args = BlockArgs::new("  > 1.2  ");
        assert_eq!(args.argument, "> 1.2");
    }

    #[test]
    fn test_unknown_option() {
        let args = BlockArgs::new("")
            .with_option("type", "figure")
            .with_option("attrs", ".wide")
            .with_option("colour", "red");
        assert_eq!(args.unknown_option(&["type"]), Some("colour"));
        assert_eq!(args.unknown_option(&["type", "colour"]), None);
    }

    #[test]
    fn test_attrs_absent() {
        assert!(BlockArgs::new("").attrs().is_none());
    }

    #[test]
    fn test_parse_id_and_classes() {
        let attrs = BlockAttrs::parse("#my-id .foo .bar");
        assert_eq!(attrs.id, Some("my-id".to_owned()));
        assert_eq!(attrs.classes, vec!["foo", "bar"]);
    }

    #[test]
    fn test_parse_compact_classes() {
        let attrs = BlockAttrs::parse("{#id.foo.bar}");
        assert_eq!(attrs.id, Some("id".to_owned()));
        assert_eq!(attrs.classes, vec!["foo", "bar"]);
    }

    #[test]
    fn test_parse_key_values() {
        let attrs = BlockAttrs::parse(r#"title="Hello World" width=560 alt=''"#);
        assert_eq!(attrs.attrs.get("title").unwrap(), "Hello World");
        assert_eq!(attrs.attrs.get("width").unwrap(), "560");
        assert_eq!(attrs.attrs.get("alt").unwrap(), "");
    }

    #[test]
    fn test_parse_empty() {
        assert!(BlockAttrs::parse("").is_empty());
        assert!(BlockAttrs::parse("{}").is_empty());
    }

    #[test]
    fn test_apply_merges_classes() {
        let mut el = Element::new("figure").with_attr("class", "existing wide");
        BlockAttrs::parse("#fig .wide .dark lang=en").apply(&mut el);

        assert_eq!(el.get("id"), Some("fig"));
        assert_eq!(el.get("class"), Some("existing wide dark"));
        assert_eq!(el.get("lang"), Some("en"));
    }
}
