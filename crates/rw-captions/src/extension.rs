//! Caption extension: registers caption blocks and runs the numberer.

use std::sync::Arc;

use rw_blocks::BlockHost;
use rw_tree::{Element, TreeError, parse_xhtml, serialize};

use crate::{CaptionKind, CaptionNumberer, FigureTypes, NumberingReport};

/// Caption extension options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionOptions {
    /// Figure types; each registers a block of the same name.
    pub types: FigureTypes,
    /// Number figures with a whole-tree pass after blocks are built.
    pub auto: bool,
    /// Prepend captions unless a block says otherwise.
    pub prepend: bool,
    /// Maximum numbered depth; `0` means unlimited.
    pub auto_level: usize,
}

impl Default for CaptionOptions {
    fn default() -> Self {
        Self {
            types: FigureTypes::default(),
            auto: true,
            prepend: false,
            auto_level: 0,
        }
    }
}

impl CaptionOptions {
    /// Replace the figure types.
    #[must_use]
    pub fn with_types(mut self, types: FigureTypes) -> Self {
        self.types = types;
        self
    }

    /// Enable or disable automatic numbering.
    #[must_use]
    pub fn with_auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    /// Set the default caption direction.
    #[must_use]
    pub fn with_prepend(mut self, prepend: bool) -> Self {
        self.prepend = prepend;
        self
    }

    /// Set the maximum numbered depth.
    #[must_use]
    pub fn with_auto_level(mut self, auto_level: usize) -> Self {
        self.auto_level = auto_level;
        self
    }
}

/// Outcome of processing one document.
#[derive(Debug, Default)]
pub struct CaptionOutcome {
    /// Caption blocks built.
    pub blocks: usize,
    /// Numbering report, when automatic numbering ran.
    pub numbering: Option<NumberingReport>,
    /// Rejected or unknown blocks.
    pub warnings: Vec<String>,
}

/// Figure captions for rendered documents.
///
/// # Example
///
/// ```
/// use rw_captions::{CaptionExtension, CaptionOptions};
///
/// let extension = CaptionExtension::new(CaptionOptions::default());
/// let (html, outcome) = extension
///     .process_html(r#"<p>Chart</p><rw-block name="figure-caption"><p>Sales</p></rw-block>"#)
///     .unwrap();
///
/// assert_eq!(outcome.blocks, 1);
/// assert!(html.starts_with(r#"<figure id="__figure-caption_1">"#));
/// assert!(html.contains("Figure 1."));
/// ```
pub struct CaptionExtension {
    options: Arc<CaptionOptions>,
}

impl CaptionExtension {
    /// Create the extension.
    #[must_use]
    pub fn new(options: CaptionOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    /// Extension options.
    #[must_use]
    pub fn options(&self) -> &CaptionOptions {
        &self.options
    }

    /// Register one caption block per figure type.
    pub fn register(&self, host: &mut BlockHost) {
        for figure_type in self.options.types.iter() {
            host.register(Box::new(CaptionKind::new(
                figure_type.name.as_str(),
                Arc::clone(&self.options),
            )));
        }
    }

    /// Numberer for the tree pass, when automatic numbering is enabled.
    #[must_use]
    pub fn numberer(&self) -> Option<CaptionNumberer> {
        self.options.auto.then(|| {
            CaptionNumberer::new(self.options.types.clone())
                .with_auto_level(self.options.auto_level)
        })
    }

    /// Build caption blocks in `root`, then number figures.
    pub fn process(&self, root: &mut Element) -> CaptionOutcome {
        let mut host = BlockHost::new();
        self.register(&mut host);

        let blocks = host.run(root);
        let numbering = self.numberer().map(|numberer| numberer.run(root));

        CaptionOutcome {
            blocks,
            numbering,
            warnings: host.into_warnings(),
        }
    }

    /// Parse an XHTML fragment, process it, and serialize the result.
    pub fn process_html(&self, html: &str) -> Result<(String, CaptionOutcome), TreeError> {
        let mut root = parse_xhtml(html)?;
        let outcome = self.process(&mut root);
        Ok((serialize(&root), outcome))
    }
}
