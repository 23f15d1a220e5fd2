//! Block lifecycle traits.

use rw_tree::Element;

use crate::BlockArgs;

/// A registered kind of block, matched by name.
///
/// A kind is registered once with a [`BlockHost`](crate::BlockHost) and
/// mints a fresh [`Block`] for every occurrence in the document, so nested
/// blocks of the same kind never share state.
pub trait BlockKind: Send + Sync {
    /// Block name, matched against the `name` attribute of `rw-block`.
    fn name(&self) -> &str;

    /// Block-specific option names accepted besides the generic `attrs`.
    fn options(&self) -> &[&str] {
        &[]
    }

    /// Create per-block state for one occurrence.
    fn on_init(&self) -> Box<dyn Block>;
}

/// One occurrence of a block being built into the tree.
///
/// The host calls the methods in order: [`on_validate`](Self::on_validate),
/// [`on_create`](Self::on_create), [`on_add`](Self::on_add) (nested
/// content is then built into the returned node), and finally
/// [`on_end`](Self::on_end).
///
/// # Example
///
/// ```
/// use rw_blocks::{Block, BlockArgs, BlockHost, BlockKind};
/// use rw_tree::{Element, parse_xhtml, serialize};
///
/// struct Note;
/// struct NoteBlock;
///
/// impl BlockKind for Note {
///     fn name(&self) -> &str { "note" }
///     fn on_init(&self) -> Box<dyn Block> { Box::new(NoteBlock) }
/// }
///
/// impl Block for NoteBlock {
///     fn on_validate(&mut self, args: &BlockArgs) -> bool {
///         args.argument.is_empty()
///     }
///
///     fn on_create(&mut self, parent: &mut Element) -> usize {
///         parent.append(Element::new("aside").with_attr("class", "note"));
///         parent.children.len() - 1
///     }
/// }
///
/// let mut tree = parse_xhtml(r#"<rw-block name="note"><p>Hi</p></rw-block>"#).unwrap();
/// let mut host = BlockHost::new().with_kind(Note);
/// host.run(&mut tree);
/// assert_eq!(serialize(&tree), r#"<aside class="note"><p>Hi</p></aside>"#);
/// ```
pub trait Block {
    /// Validate the parsed argument and options.
    ///
    /// Returning `false` rejects the block before any tree mutation.
    fn on_validate(&mut self, args: &BlockArgs) -> bool;

    /// Create the node that owns this block's output.
    ///
    /// `parent` already contains every sibling built before this block.
    /// Returns the index of the owning node among `parent`'s children.
    fn on_create(&mut self, parent: &mut Element) -> usize;

    /// Return the sub-node that receives nested content.
    fn on_add<'a>(&mut self, block: &'a mut Element) -> &'a mut Element {
        block
    }

    /// Called once nested content has been built.
    fn on_end(&mut self, _block: &mut Element) {}
}
