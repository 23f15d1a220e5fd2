//! Element tree for rendered documents.
//!
//! Provides an ElementTree-style [`Element`] node (tag, attributes, ordered
//! children, and `text` / `tail` string slots) together with an XHTML
//! parser and serializer built on `quick-xml`.
//!
//! # Example
//!
//! ```
//! use rw_tree::{parse_xhtml, serialize};
//!
//! let mut tree = parse_xhtml("<p>Hello</p>").unwrap();
//! tree.children[0].set("id", "greeting");
//! assert_eq!(serialize(&tree), r#"<p id="greeting">Hello</p>"#);
//! ```

mod element;
mod entities;
mod error;
mod parser;
mod serializer;

pub use element::{Element, Iter};
pub use error::TreeError;
pub use parser::{ROOT_TAG, XhtmlParser, parse_xhtml};
pub use serializer::{serialize, serialize_element};
