//! HTML entity to Unicode conversion.
//!
//! Rendered HTML may carry named entities that XML does not know about.
//! Standard XML entities (amp, lt, gt, quot, apos) are left for the XML
//! reader to decode.

use std::sync::LazyLock;

use regex::Regex;

static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z]+);").expect("invalid entity regex"));

/// Named entities outside the XML set, sorted by name.
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("bull", '\u{2022}'),
    ("copy", '\u{00a9}'),
    ("deg", '\u{00b0}'),
    ("hellip", '\u{2026}'),
    ("laquo", '\u{00ab}'),
    ("larr", '\u{2190}'),
    ("ldquo", '\u{201c}'),
    ("lsquo", '\u{2018}'),
    ("mdash", '\u{2014}'),
    ("middot", '\u{00b7}'),
    ("nbsp", '\u{00a0}'),
    ("ndash", '\u{2013}'),
    ("para", '\u{00b6}'),
    ("raquo", '\u{00bb}'),
    ("rarr", '\u{2192}'),
    ("rdquo", '\u{201d}'),
    ("reg", '\u{00ae}'),
    ("rsquo", '\u{2019}'),
    ("sect", '\u{00a7}'),
    ("times", '\u{00d7}'),
    ("trade", '\u{2122}'),
];

/// Replace named HTML entities (`&nbsp;`, `&mdash;`, ...) with Unicode.
///
/// XML entities and unknown names are kept for the XML reader.
pub(crate) fn convert_html_entities(html: &str) -> String {
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures| match named_entity(&caps[1]) {
            Some(c) => c.to_string(),
            None => caps[0].to_owned(),
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    NAMED_ENTITIES
        .binary_search_by_key(&name, |&(entity, _)| entity)
        .ok()
        .map(|idx| NAMED_ENTITIES[idx].1)
}

/// Decode an XML entity reference body (`lt`, `#x41`, ...) to text.
///
/// Unknown entities are preserved as written.
pub(crate) fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_named_entities() {
        assert_eq!(
            convert_html_entities("Figure&nbsp;1&mdash;overview"),
            "Figure\u{00a0}1\u{2014}overview"
        );
    }

    #[test]
    fn test_xml_entities_preserved() {
        assert_eq!(convert_html_entities("a &amp; b &lt; c"), "a &amp; b &lt; c");
    }

    #[test]
    fn test_entity_table_sorted() {
        assert!(NAMED_ENTITIES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_unknown_entity_preserved() {
        assert_eq!(convert_html_entities("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entity("#65"), "A");
        assert_eq!(decode_entity("#x41"), "A");
        assert_eq!(decode_entity("#xZZ"), "&#xZZ;");
    }

    #[test]
    fn test_decode_xml_entities() {
        assert_eq!(decode_entity("lt"), "<");
        assert_eq!(decode_entity("amp"), "&");
        assert_eq!(decode_entity("nope"), "&nope;");
    }
}
