//! Block host driving the block lifecycle over a tree.

use rw_tree::Element;

use crate::{Block, BlockArgs, BlockKind};

/// Tag of the intermediate element that marks a block.
pub const BLOCK_TAG: &str = "rw-block";
/// Attribute holding the block name.
pub const NAME_ATTR: &str = "name";
/// Attribute holding the block's leading argument.
pub const ARGUMENT_ATTR: &str = "argument";

/// Drives registered [`BlockKind`]s over `rw-block` elements.
///
/// Blocks are emitted by an earlier stage as intermediate elements:
///
/// ```text
/// <rw-block name="figure-caption" argument="< 2" attrs="#map">Caption</rw-block>
/// ```
///
/// Every attribute other than `name` and `argument` is passed to the
/// block as an option. The host rebuilds each child list in document
/// order, so when a block is created its parent holds exactly the
/// siblings that precede it.
///
/// Blocks with an unknown name, unknown options, or a failed validation
/// stay in the tree as `rw-block` elements and are reported through
/// [`warnings`](Self::warnings). Blocks nested inside them are still built.
pub struct BlockHost {
    kinds: Vec<Box<dyn BlockKind>>,
    warnings: Vec<String>,
    built: usize,
}

impl Default for BlockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockHost {
    /// Create a host with no registered kinds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kinds: Vec::new(),
            warnings: Vec::new(),
            built: 0,
        }
    }

    /// Register a block kind.
    #[must_use]
    pub fn with_kind<K: BlockKind + 'static>(mut self, kind: K) -> Self {
        self.register(Box::new(kind));
        self
    }

    /// Register a boxed block kind.
    ///
    /// A kind registered later with the same name replaces the earlier one.
    pub fn register(&mut self, kind: Box<dyn BlockKind>) {
        self.kinds.retain(|k| k.name() != kind.name());
        self.kinds.push(kind);
    }

    /// Whether a kind with this name is registered.
    #[must_use]
    pub fn has_kind(&self, name: &str) -> bool {
        self.kind_index(name).is_some()
    }

    /// Warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Consume the host and return collected warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    /// Build every block in the tree.
    ///
    /// Returns the number of blocks built by this call.
    pub fn run(&mut self, root: &mut Element) -> usize {
        let before = self.built;
        self.build_children(root);
        let built = self.built - before;
        tracing::debug!(built, warnings = self.warnings.len(), "Blocks built");
        built
    }

    fn kind_index(&self, name: &str) -> Option<usize> {
        self.kinds.iter().position(|k| k.name() == name)
    }

    fn build_children(&mut self, parent: &mut Element) {
        let incoming = std::mem::take(&mut parent.children);
        self.build_into(parent, incoming);
    }

    fn build_into(&mut self, parent: &mut Element, incoming: Vec<Element>) {
        for mut child in incoming {
            if child.tag != BLOCK_TAG {
                self.build_children(&mut child);
                parent.append(child);
                continue;
            }

            match self.start(&child) {
                Some((block, args)) => self.build_block(parent, block, &args, child),
                None => {
                    // The rejected element stays, but blocks inside it still build.
                    self.build_children(&mut child);
                    parent.append(child);
                }
            }
        }
    }

    /// Resolve, initialize and validate a block element.
    fn start(&mut self, element: &Element) -> Option<(Box<dyn Block>, BlockArgs)> {
        let Some(name) = element.get(NAME_ATTR) else {
            self.warn(format!("<{BLOCK_TAG}> without a {NAME_ATTR} attribute"));
            return None;
        };

        let Some(idx) = self.kind_index(name) else {
            self.warn(format!("unknown block '{name}'"));
            return None;
        };

        let mut args = BlockArgs::new(element.get(ARGUMENT_ATTR).unwrap_or_default());
        for (key, value) in &element.attrs {
            if key != NAME_ATTR && key != ARGUMENT_ATTR {
                args.options.insert(key.clone(), value.clone());
            }
        }

        let kind = &self.kinds[idx];
        let unknown = args.unknown_option(kind.options()).map(str::to_owned);
        let mut block = kind.on_init();
        if let Some(option) = unknown {
            self.warn(format!("block '{name}': unknown option '{option}'"));
            return None;
        }

        if !block.on_validate(&args) {
            let message = format!("block '{name}': invalid argument '{}'", args.argument);
            self.warn(message);
            return None;
        }

        Some((block, args))
    }

    fn build_block(
        &mut self,
        parent: &mut Element,
        mut block: Box<dyn Block>,
        args: &BlockArgs,
        element: Element,
    ) {
        let Element {
            text,
            tail,
            attrs,
            children,
            ..
        } = element;
        let name = attrs.get(NAME_ATTR).cloned().unwrap_or_default();

        let index = block.on_create(parent);
        let Some(node) = parent.children.get_mut(index) else {
            self.warn(format!(
                "block '{name}': created node index {index} is out of bounds"
            ));
            return;
        };

        if let Some(block_attrs) = args.attrs() {
            block_attrs.apply(node);
        }

        let container = block.on_add(node);
        append_text(container, &text);
        self.build_into(container, children);

        block.on_end(node);
        node.tail.push_str(&tail);

        self.built += 1;
        tracing::debug!(block = %name, "Built block");
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

/// Append text after the current last child (or as leading text).
fn append_text(node: &mut Element, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}
