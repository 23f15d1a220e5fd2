//! Whole-tree figure numbering.
//!
//! Runs after every caption block is built. Figures marked with a
//! transient `__figure_type` attribute are visited in document order and
//! receive hierarchical ordinals:
//!
//! - a figure nested inside a figure of the same type is one level deeper,
//! - `^N` overrides the starting level of a figure,
//! - a manual number is adopted when it does not move the counter backwards,
//! - figures deeper than `auto_level` (when non-zero) are skipped together
//!   with their descendants.
//!
//! Transient attributes are removed from every visited figure afterwards,
//! so running the numberer twice is a no-op.

use std::collections::HashMap;

use rw_tree::Element;

use crate::binder::{LEVEL_ATTR, NUMBER_ATTR, PREPEND_ATTR, TYPE_ATTR};
use crate::prefix::{FIGURE_TAG, apply_numbering};
use crate::{FigureTypes, Ordinal};

/// A figure that received an ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedFigure {
    /// Figure type.
    pub figure_type: String,
    /// Assigned ordinal.
    pub ordinal: Ordinal,
    /// Final element id (the generated one unless an id was already set).
    pub id: String,
}

/// Result of a numbering pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberingReport {
    /// Numbered figures in document order.
    pub numbered: Vec<NumberedFigure>,
    /// Figures that carried a type but were left unnumbered.
    pub skipped: usize,
}

/// Per-type counter: last depth and the running ordinal.
///
/// `counter.len()` is always `last + 1`.
#[derive(Debug)]
struct TypeCounter {
    last: usize,
    counter: Vec<u32>,
}

impl TypeCounter {
    fn new() -> Self {
        Self {
            last: 0,
            counter: vec![0],
        }
    }

    /// Move the counter to `depth`.
    ///
    /// Deeper levels start at 1, the same level increments, and a shallower
    /// level truncates and increments. Increments saturate at `u32::MAX`.
    fn advance(&mut self, depth: usize) {
        if depth > self.last {
            self.counter.resize(depth + 1, 1);
        } else {
            self.counter.truncate(depth + 1);
            if let Some(slot) = self.counter.last_mut() {
                *slot = slot.saturating_add(1);
            }
        }
        self.last = depth;
    }

    /// Adopt a manual number when no component of the counter exceeds it.
    fn adopt(&mut self, manual: &Ordinal) -> bool {
        let fits = self
            .counter
            .iter()
            .zip(manual.parts())
            .all(|(current, requested)| current <= requested);
        if fits {
            manual.parts().clone_into(&mut self.counter);
        }
        fits
    }

    fn ordinal(&self) -> Option<Ordinal> {
        Ordinal::new(self.counter.clone())
    }
}

/// Mutable state of one numbering pass.
#[derive(Debug, Default)]
pub struct NumberingContext {
    counters: HashMap<String, TypeCounter>,
    report: NumberingReport,
}

impl NumberingContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the context and return its report.
    #[must_use]
    pub fn into_report(self) -> NumberingReport {
        self.report
    }

    fn counter(&mut self, figure_type: &str) -> &mut TypeCounter {
        self.counters
            .entry(figure_type.to_owned())
            .or_insert_with(TypeCounter::new)
    }
}

/// Snapshot of an enclosing figure, taken after it was processed.
#[derive(Debug)]
struct AncestorFigure {
    figure_type: Option<String>,
    level: Option<usize>,
}

impl AncestorFigure {
    fn of(figure: &Element) -> Self {
        Self {
            figure_type: figure.get(TYPE_ATTR).map(str::to_owned),
            level: level_attr(figure),
        }
    }
}

/// Numbers figures across a whole tree.
///
/// # Example
///
/// ```
/// use rw_captions::{CaptionNumberer, FigureTypes};
/// use rw_tree::{parse_xhtml, serialize};
///
/// let mut tree = parse_xhtml(concat!(
///     r#"<figure __figure_type="figure"><figcaption><p>A</p></figcaption></figure>"#,
///     r#"<figure __figure_type="figure"><figcaption><p>B</p></figcaption></figure>"#,
/// ))
/// .unwrap();
///
/// let numberer = CaptionNumberer::new(FigureTypes::new().with_type("figure", "Fig. {}"));
/// let report = numberer.run(&mut tree);
///
/// assert_eq!(report.numbered.len(), 2);
/// assert_eq!(report.numbered[1].id, "__figure_2");
/// assert!(serialize(&tree).contains("Fig. 2"));
/// ```
#[derive(Debug, Clone)]
pub struct CaptionNumberer {
    types: FigureTypes,
    auto_level: usize,
}

impl CaptionNumberer {
    /// Create a numberer for the given figure types.
    #[must_use]
    pub fn new(types: FigureTypes) -> Self {
        Self {
            types,
            auto_level: 0,
        }
    }

    /// Limit numbering depth; `0` means unlimited.
    #[must_use]
    pub fn with_auto_level(mut self, auto_level: usize) -> Self {
        self.auto_level = auto_level;
        self
    }

    /// Number every marked figure under `root` and strip transient attributes.
    pub fn run(&self, root: &mut Element) -> NumberingReport {
        let mut ctx = NumberingContext::new();
        let mut ancestors = Vec::new();
        self.visit(root, &mut ctx, &mut ancestors);
        strip_transient(root);

        let report = ctx.into_report();
        tracing::info!(
            numbered = report.numbered.len(),
            skipped = report.skipped,
            "Figures numbered"
        );
        report
    }

    fn visit(
        &self,
        element: &mut Element,
        ctx: &mut NumberingContext,
        ancestors: &mut Vec<AncestorFigure>,
    ) {
        let is_figure = element.tag == FIGURE_TAG;
        if is_figure {
            self.number_figure(element, ctx, ancestors);
            ancestors.push(AncestorFigure::of(element));
        }

        for child in &mut element.children {
            self.visit(child, ctx, ancestors);
        }

        if is_figure {
            ancestors.pop();
        }
    }

    fn number_figure(
        &self,
        figure: &mut Element,
        ctx: &mut NumberingContext,
        ancestors: &[AncestorFigure],
    ) {
        let Some(figure_type) = figure.get(TYPE_ATTR).map(str::to_owned) else {
            return;
        };

        let Some(template) = self.types.get(&figure_type).filter(|t| !t.is_empty()) else {
            tracing::debug!(figure_type = %figure_type, "Skipping figure without a prefix template");
            ctx.report.skipped += 1;
            return;
        };

        let prepend = figure.has_attr(PREPEND_ATTR);
        let manual = figure
            .get(NUMBER_ATTR)
            .and_then(|number| number.parse::<Ordinal>().ok());

        let depth = if let Some(manual) = &manual {
            figure.set(LEVEL_ATTR, manual.len().to_string());
            Some(manual.depth())
        } else {
            self.nesting_depth(figure, &figure_type, ancestors)
        };

        let Some(depth) = depth else {
            tracing::debug!(
                figure_type = %figure_type,
                auto_level = self.auto_level,
                "Figure beyond auto level"
            );
            ctx.report.skipped += 1;
            return;
        };

        let counter = ctx.counter(&figure_type);
        counter.advance(depth);
        if let Some(manual) = &manual
            && !counter.adopt(manual)
        {
            tracing::debug!(figure_type = %figure_type, %manual, "Manual number behind counter, ignored");
        }
        let Some(ordinal) = counter.ordinal() else {
            return;
        };

        apply_numbering(figure, &figure_type, &ordinal, template, prepend);

        let id = figure.get("id").unwrap_or_default().to_owned();
        tracing::debug!(figure_type = %figure_type, %ordinal, id = %id, "Numbered figure");
        ctx.report.numbered.push(NumberedFigure {
            figure_type,
            ordinal,
            id,
        });
    }

    /// Depth from the level override plus enclosing figures of the same type.
    ///
    /// A same-type ancestor with a recorded level contributes `level + 1`,
    /// records the accumulated depth plus one on this figure, and ends the
    /// climb. Other same-type ancestors contribute one level each. Returns
    /// `None` when the figure lies beyond `auto_level`.
    fn nesting_depth(
        &self,
        figure: &mut Element,
        figure_type: &str,
        ancestors: &[AncestorFigure],
    ) -> Option<usize> {
        let mut depth = 0;

        if let Some(level) = level_attr(figure) {
            depth = level;
            if self.auto_level > 0 && depth >= self.auto_level - 1 {
                return None;
            }
        }

        for ancestor in ancestors.iter().rev() {
            if ancestor.figure_type.as_deref() != Some(figure_type) {
                continue;
            }

            if let Some(level) = ancestor.level {
                depth += level + 1;
                figure.set(LEVEL_ATTR, (depth + 1).to_string());
            } else {
                depth += 1;
            }

            if self.auto_level > 0 && depth >= self.auto_level {
                return None;
            }

            if ancestor.level.is_some() {
                break;
            }
        }

        Some(depth)
    }
}

fn level_attr(figure: &Element) -> Option<usize> {
    figure.get(LEVEL_ATTR).and_then(|level| level.parse().ok())
}

/// Remove transient attributes from every marked figure.
fn strip_transient(element: &mut Element) {
    if element.tag == FIGURE_TAG && element.remove(TYPE_ATTR).is_some() {
        for attr in [LEVEL_ATTR, NUMBER_ATTR, PREPEND_ATTR] {
            element.remove(attr);
        }
    }
    for child in &mut element.children {
        strip_transient(child);
    }
}
