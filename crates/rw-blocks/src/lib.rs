//! Generic block machinery for RW.
//!
//! A *block* is a captioned or otherwise structured region that an earlier
//! rendering stage marks with an intermediate `<rw-block>` element. This
//! crate provides the lifecycle contract blocks implement ([`BlockKind`],
//! [`Block`]), generic option parsing ([`BlockArgs`], [`BlockAttrs`]), and the
//! [`BlockHost`] that drives the lifecycle over an [`rw_tree::Element`] tree.
//!
//! # Lifecycle
//!
//! For every `<rw-block name="...">` the host:
//!
//! 1. mints fresh state with [`BlockKind::on_init`],
//! 2. validates the argument and options with [`Block::on_validate`],
//! 3. creates the output node under the parent with [`Block::on_create`],
//! 4. applies the generic `attrs` option to that node,
//! 5. builds nested content into the node returned by [`Block::on_add`],
//! 6. notifies the block with [`Block::on_end`].

mod args;
mod block;
mod host;

pub use args::{ATTRS_OPTION, BlockArgs, BlockAttrs};
pub use block::{Block, BlockKind};
pub use host::{ARGUMENT_ATTR, BLOCK_TAG, BlockHost, NAME_ATTR};
