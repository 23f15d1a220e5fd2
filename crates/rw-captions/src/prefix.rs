//! Figure id and caption prefix injection.

use rw_tree::Element;

use crate::Ordinal;
use crate::types::format_prefix;

/// Tag of figure elements.
pub const FIGURE_TAG: &str = "figure";
/// Tag of caption elements.
pub const CAPTION_TAG: &str = "figcaption";
/// Class of the injected prefix span.
pub const PREFIX_CLASS: &str = "caption-prefix";

const PARAGRAPH_TAG: &str = "p";

/// Stamp a figure with its id and caption prefix.
///
/// The id `__{figure_type}_{ordinal}` (dots replaced by underscores) is set
/// only when the figure has no id yet. A `<span class="caption-prefix">`
/// holding the formatted prefix is placed at the start of the figure's
/// caption: the first `figcaption` child when `prepend` is set, otherwise
/// the last one. Callers skip types with an empty template.
pub fn apply_numbering(
    figure: &mut Element,
    figure_type: &str,
    ordinal: &Ordinal,
    template: &str,
    prepend: bool,
) {
    if !figure.has_attr("id") {
        figure.set("id", format!("__{figure_type}_{}", ordinal.id_suffix()));
    }

    let mut captions = figure
        .children
        .iter()
        .enumerate()
        .filter(|(_, c)| c.tag == CAPTION_TAG)
        .map(|(idx, _)| idx);
    let position = if prepend {
        captions.next()
    } else {
        captions.last()
    };

    let Some(idx) = position else {
        tracing::debug!(figure_type, %ordinal, "Figure has no caption to prefix");
        return;
    };

    let prefix = format_prefix(template, &ordinal.to_string());
    inject_prefix(&mut figure.children[idx], prefix);
}

fn inject_prefix(caption: &mut Element, prefix: String) {
    let mut span = Element::new("span")
        .with_attr("class", PREFIX_CLASS)
        .with_text(prefix);

    let starts_with_paragraph = caption
        .children
        .first()
        .is_some_and(|c| c.tag == PARAGRAPH_TAG);

    if starts_with_paragraph {
        let paragraph = &mut caption.children[0];
        let text = std::mem::take(&mut paragraph.text);
        if !text.is_empty() {
            span.tail = format!(" {text}");
        }
        paragraph.insert(0, span);
    } else {
        let mut paragraph = Element::new(PARAGRAPH_TAG);
        paragraph.append(span);
        paragraph.tail = std::mem::take(&mut caption.text);
        caption.insert(0, paragraph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rw_tree::{parse_xhtml, serialize_element};

    fn figure(html: &str) -> Element {
        let mut root = parse_xhtml(html).unwrap();
        root.children.remove(0)
    }

    fn ordinal(value: &str) -> Ordinal {
        value.parse().unwrap()
    }

    #[test]
    fn test_prefix_into_existing_paragraph() {
        let mut fig = figure("<figure><img /><figcaption><p>A map</p></figcaption></figure>");
        apply_numbering(&mut fig, "figure", &ordinal("2.1"), "Figure {}.", false);
        assert_eq!(
            serialize_element(&fig),
            concat!(
                r#"<figure id="__figure_2_1"><img />"#,
                r#"<figcaption><p><span class="caption-prefix">Figure 2.1.</span> A map</p></figcaption>"#,
                "</figure>"
            )
        );
    }

    #[test]
    fn test_prefix_creates_paragraph() {
        let mut fig = figure("<figure><img /><figcaption>Loose text</figcaption></figure>");
        apply_numbering(&mut fig, "figure", &ordinal("3"), "Figure {}.", false);
        assert_eq!(
            serialize_element(&fig),
            concat!(
                r#"<figure id="__figure_3"><img />"#,
                r#"<figcaption><p><span class="caption-prefix">Figure 3.</span></p>Loose text</figcaption>"#,
                "</figure>"
            )
        );
    }

    #[test]
    fn test_prefix_before_non_paragraph_child() {
        let mut fig = figure("<figure><figcaption><ul><li>x</li></ul></figcaption></figure>");
        apply_numbering(&mut fig, "t", &ordinal("1"), "T{}", true);
        let caption = &fig.children[0];
        assert_eq!(caption.children[0].tag, "p");
        assert_eq!(caption.children[0].children[0].text, "T1");
        assert_eq!(caption.children[1].tag, "ul");
    }

    #[test]
    fn test_existing_id_preserved() {
        let mut fig =
            figure(r#"<figure id="custom"><figcaption><p>x</p></figcaption></figure>"#);
        apply_numbering(&mut fig, "figure", &ordinal("1"), "Figure {}.", false);
        assert_eq!(fig.get("id"), Some("custom"));
        assert_eq!(fig.children[0].children[0].children[0].text, "Figure 1.");
    }

    #[test]
    fn test_caption_choice_follows_direction() {
        let html = "<figure><figcaption><p>first</p></figcaption><figcaption><p>last</p></figcaption></figure>";

        let mut appended = figure(html);
        apply_numbering(&mut appended, "f", &ordinal("1"), "F{}", false);
        assert_eq!(appended.children[0].children[0].children.len(), 0);
        assert_eq!(appended.children[1].children[0].children[0].text, "F1");

        let mut prepended = figure(html);
        apply_numbering(&mut prepended, "f", &ordinal("1"), "F{}", true);
        assert_eq!(prepended.children[0].children[0].children[0].text, "F1");
        assert_eq!(prepended.children[1].children[0].children.len(), 0);
    }

    #[test]
    fn test_figure_without_caption_gets_id() {
        let mut fig = figure("<figure><img /></figure>");
        apply_numbering(&mut fig, "figure", &ordinal("1"), "Figure {}.", false);
        assert_eq!(serialize_element(&fig), r#"<figure id="__figure_1"><img /></figure>"#);
    }
}
