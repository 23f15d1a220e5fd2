//! Figure captions for RW documents.
//!
//! Two stages cooperate:
//!
//! 1. **Caption blocks.** Each registered figure type (`figure-caption`,
//!    `table-caption`, ...) is a block. A block binds its content as a
//!    `<figcaption>` to the preceding sibling, wrapping it in a `<figure>`
//!    unless it already is an uncaptioned figure.
//! 2. **Numbering.** A whole-tree pass assigns hierarchical ordinals such as
//!    `2.1`, stamps ids like `__figure-caption_2_1`, and injects a
//!    `<span class="caption-prefix">Figure 2.1.</span>` into the caption.
//!
//! With `auto` disabled, only blocks carrying an explicit number or level
//! are stamped, directly when the block ends.
//!
//! # Block arguments
//!
//! | Argument | Meaning                               |
//! |----------|---------------------------------------|
//! | `>`      | Append the caption (default)          |
//! | `<`      | Prepend the caption                   |
//! | `1.2`    | Manual number                         |
//! | `^2`     | Start at nesting level 2              |
//!
//! The generic `attrs` option and a `type` option (overriding the figure
//! type) are also accepted.

mod argument;
mod binder;
mod extension;
mod numberer;
mod ordinal;
mod prefix;
mod types;

pub use argument::CaptionArgument;
pub use binder::{
    CaptionBlock, CaptionKind, LEVEL_ATTR, NUMBER_ATTR, PREPEND_ATTR, TYPE_ATTR, TYPE_OPTION,
};
pub use extension::{CaptionExtension, CaptionOptions, CaptionOutcome};
pub use numberer::{CaptionNumberer, NumberedFigure, NumberingContext, NumberingReport};
pub use ordinal::{Ordinal, ParseOrdinalError};
pub use prefix::{CAPTION_TAG, FIGURE_TAG, PREFIX_CLASS, apply_numbering};
pub use types::{FigureType, FigureTypes, ORDINAL_PLACEHOLDER, format_prefix, is_type_identifier};
