//! Caption blocks: bind a caption to the preceding content as a figure.

use std::sync::Arc;

use rw_blocks::{Block, BlockArgs, BlockKind};
use rw_tree::Element;

use crate::prefix::{CAPTION_TAG, FIGURE_TAG, apply_numbering};
use crate::types::is_type_identifier;
use crate::{CaptionArgument, CaptionOptions, Ordinal};

/// Transient attribute: figure type, read by the numberer.
pub const TYPE_ATTR: &str = "__figure_type";
/// Transient attribute: explicit nesting level.
pub const LEVEL_ATTR: &str = "__figure_level";
/// Transient attribute: manual number.
pub const NUMBER_ATTR: &str = "__figure_num";
/// Transient attribute: caption was prepended.
pub const PREPEND_ATTR: &str = "__figure_prepend";

/// Option overriding the figure type produced by a caption block.
pub const TYPE_OPTION: &str = "type";

/// Block kind for one registered figure type.
pub struct CaptionKind {
    name: String,
    options: Arc<CaptionOptions>,
}

impl CaptionKind {
    /// Create a caption kind named after a figure type.
    #[must_use]
    pub fn new(name: impl Into<String>, options: Arc<CaptionOptions>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

impl BlockKind for CaptionKind {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &[&str] {
        &[TYPE_OPTION]
    }

    fn on_init(&self) -> Box<dyn Block> {
        Box::new(CaptionBlock::new(&self.name, Arc::clone(&self.options)))
    }
}

/// One caption block occurrence.
pub struct CaptionBlock {
    figure_type: String,
    options: Arc<CaptionOptions>,
    argument: CaptionArgument,
    caption_index: usize,
}

impl CaptionBlock {
    fn new(name: &str, options: Arc<CaptionOptions>) -> Self {
        Self {
            figure_type: name.to_owned(),
            options,
            argument: CaptionArgument::default(),
            caption_index: 0,
        }
    }

    /// Manual-mode ordinal: a level yields `1.1...`, a number is used as is.
    fn manual_ordinal(&self) -> Option<Ordinal> {
        match (&self.argument.level, &self.argument.number) {
            (Some(level), _) => Ordinal::ones(*level),
            (None, Some(number)) => Some(number.clone()),
            (None, None) => None,
        }
    }
}

impl Block for CaptionBlock {
    fn on_validate(&mut self, args: &BlockArgs) -> bool {
        if let Some(figure_type) = args.option(TYPE_OPTION) {
            if !is_type_identifier(figure_type) {
                return false;
            }
            figure_type.clone_into(&mut self.figure_type);
        }

        match CaptionArgument::parse(&args.argument, self.options.prepend) {
            Some(argument) => {
                self.argument = argument;
                true
            }
            None => false,
        }
    }

    fn on_create(&mut self, parent: &mut Element) -> usize {
        let reuse = parent
            .children
            .last()
            .is_some_and(|c| c.tag == FIGURE_TAG && !c.has_child(CAPTION_TAG));

        if !reuse {
            let mut figure = Element::new(FIGURE_TAG);
            if let Some(previous) = parent.children.pop() {
                figure.append(previous);
            }
            parent.append(figure);
        }

        let index = parent.children.len() - 1;
        let figure = &mut parent.children[index];

        if self.options.auto {
            figure.set(TYPE_ATTR, self.figure_type.as_str());
            if let Some(level) = self.argument.level {
                figure.set(LEVEL_ATTR, level.to_string());
            }
            if let Some(number) = &self.argument.number {
                figure.set(NUMBER_ATTR, number.to_string());
            }
            if self.argument.prepend {
                figure.set(PREPEND_ATTR, "1");
            }
        }

        let caption = Element::new(CAPTION_TAG);
        if self.argument.prepend {
            figure.insert(0, caption);
            self.caption_index = 0;
        } else {
            figure.append(caption);
            self.caption_index = figure.children.len() - 1;
        }

        tracing::debug!(
            figure_type = %self.figure_type,
            reused = reuse,
            prepend = self.argument.prepend,
            "Caption bound to figure"
        );
        index
    }

    fn on_add<'a>(&mut self, block: &'a mut Element) -> &'a mut Element {
        &mut block.children[self.caption_index]
    }

    fn on_end(&mut self, block: &mut Element) {
        if self.options.auto {
            return;
        }

        let Some(ordinal) = self.manual_ordinal() else {
            return;
        };
        if let Some(template) = self.options.types.get(&self.figure_type)
            && !template.is_empty()
        {
            apply_numbering(
                block,
                &self.figure_type,
                &ordinal,
                template,
                self.argument.prepend,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rw_blocks::BlockHost;
    use rw_tree::{parse_xhtml, serialize};

    use crate::FigureTypes;

    fn run(options: CaptionOptions, html: &str) -> (String, Vec<String>) {
        let options = Arc::new(options);
        let mut host = BlockHost::new();
        for figure_type in options.types.iter() {
            host.register(Box::new(CaptionKind::new(
                figure_type.name.clone(),
                Arc::clone(&options),
            )));
        }
        let mut tree = parse_xhtml(html).unwrap();
        host.run(&mut tree);
        (serialize(&tree), host.into_warnings())
    }

    fn manual() -> CaptionOptions {
        CaptionOptions::default()
            .with_types(FigureTypes::new().with_type("figure", "Figure {}."))
            .with_auto(false)
    }

    #[test]
    fn test_wraps_preceding_sibling() {
        let (html, warnings) = run(
            CaptionOptions::default(),
            r#"<p>Body</p><rw-block name="figure-caption"><p>Cap</p></rw-block>"#,
        );
        assert_eq!(
            html,
            concat!(
                r#"<figure __figure_type="figure-caption">"#,
                "<p>Body</p><figcaption><p>Cap</p></figcaption></figure>"
            )
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_prepend_marks_figure() {
        let (html, _) = run(
            CaptionOptions::default(),
            r#"<p>Body</p><rw-block name="table-caption" argument="&lt;"><p>Cap</p></rw-block>"#,
        );
        assert_eq!(
            html,
            concat!(
                r#"<figure __figure_prepend="1" __figure_type="table-caption">"#,
                "<figcaption><p>Cap</p></figcaption><p>Body</p></figure>"
            )
        );
    }

    #[test]
    fn test_reuses_figure_without_caption() {
        let (html, _) = run(
            CaptionOptions::default(),
            r#"<figure><img /></figure><rw-block name="caption">Cap</rw-block>"#,
        );
        assert_eq!(
            html,
            r#"<figure __figure_type="caption"><img /><figcaption>Cap</figcaption></figure>"#
        );
    }

    #[test]
    fn test_captioned_figure_is_wrapped() {
        let (html, _) = run(
            CaptionOptions::default(),
            concat!(
                "<figure><img /><figcaption>Old</figcaption></figure>",
                r#"<rw-block name="caption">New</rw-block>"#
            ),
        );
        assert_eq!(
            html,
            concat!(
                r#"<figure __figure_type="caption">"#,
                "<figure><img /><figcaption>Old</figcaption></figure>",
                "<figcaption>New</figcaption></figure>"
            )
        );
    }

    #[test]
    fn test_empty_parent_gets_bare_figure() {
        let (html, _) = run(
            CaptionOptions::default(),
            r#"<rw-block name="caption">Alone</rw-block>"#,
        );
        assert_eq!(
            html,
            r#"<figure __figure_type="caption"><figcaption>Alone</figcaption></figure>"#
        );
    }

    #[test]
    fn test_transient_number_and_level() {
        let (html, _) = run(
            CaptionOptions::default(),
            concat!(
                r#"<p>A</p><rw-block name="caption" argument="2.1">a</rw-block>"#,
                r#"<p>B</p><rw-block name="caption" argument="^1">b</rw-block>"#
            ),
        );
        assert_eq!(
            html,
            concat!(
                r#"<figure __figure_num="2.1" __figure_type="caption"><p>A</p><figcaption>a</figcaption></figure>"#,
                r#"<figure __figure_level="1" __figure_type="caption"><p>B</p><figcaption>b</figcaption></figure>"#
            )
        );
    }

    #[test]
    fn test_type_option_overrides_type() {
        let (html, warnings) = run(
            CaptionOptions::default(),
            r#"<p>x</p><rw-block name="caption" type="table-caption">c</rw-block>"#,
        );
        assert!(html.starts_with(r#"<figure __figure_type="table-caption">"#));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_invalid_type_option_rejected() {
        let input = r#"<rw-block name="caption" type="9 bad">c</rw-block>"#;
        let (html, warnings) = run(CaptionOptions::default(), input);
        assert_eq!(html, input);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_leftover_argument_rejected() {
        let input = r#"<p>x</p><rw-block argument="1 extra" name="caption">c</rw-block>"#;
        let (html, warnings) = run(CaptionOptions::default(), input);
        assert_eq!(html, input);
        assert_eq!(
            warnings,
            vec!["block 'caption': invalid argument '1 extra'".to_owned()]
        );
    }

    #[test]
    fn test_manual_mode_number() {
        let (html, _) = run(
            manual(),
            r#"<p>x</p><rw-block name="figure" argument="2.3"><p>Map</p></rw-block>"#,
        );
        assert_eq!(
            html,
            concat!(
                r#"<figure id="__figure_2_3"><p>x</p>"#,
                r#"<figcaption><p><span class="caption-prefix">Figure 2.3.</span> Map</p></figcaption>"#,
                "</figure>"
            )
        );
    }

    #[test]
    fn test_manual_mode_level() {
        let (html, _) = run(
            manual(),
            r#"<p>x</p><rw-block name="figure" argument="^2"><p>Map</p></rw-block>"#,
        );
        assert!(html.starts_with(r#"<figure id="__figure_1_1">"#));
        assert!(html.contains("Figure 1.1."));
    }

    #[test]
    fn test_manual_mode_empty_template_untouched() {
        let options = manual().with_types(FigureTypes::new().with_type("caption", ""));
        let (html, _) = run(
            options,
            r#"<p>x</p><rw-block name="caption" argument="3"><p>Note</p></rw-block>"#,
        );
        assert_eq!(
            html,
            "<figure><p>x</p><figcaption><p>Note</p></figcaption></figure>"
        );
    }

    #[test]
    fn test_manual_mode_without_number_untouched() {
        let (html, _) = run(
            manual(),
            r#"<p>x</p><rw-block name="figure"><p>Map</p></rw-block>"#,
        );
        assert_eq!(
            html,
            "<figure><p>x</p><figcaption><p>Map</p></figcaption></figure>"
        );
    }
}
