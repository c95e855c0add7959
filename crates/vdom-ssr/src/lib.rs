//! Virtual DOM server-side rendering helpers
//!
//! Turns a virtual DOM tree into JSON for string output and keeps its facts
//! in order:
//! - [`add_attribute`] merges one fact into a copy of a node
//! - [`normalize_children`] flattens a serialized node's keyed children
//! - [`trigger_event`] runs a node's event decoder against a value
//!
//! # Example
//! ```rust
//! use vdom_ssr::{Fact, Node, add_attribute, normalize_children, stringify};
//!
//! let list = Node::element("ul", [], [Node::text("a"), Node::text("b")]);
//! let list = add_attribute(Fact::attribute("id", "items"), &list).unwrap();
//!
//! let children = normalize_children(&stringify(&list).unwrap());
//! assert_eq!(children, r#"[{"type":"text","text":"a"},{"type":"text","text":"b"}]"#);
//! ```

mod attributes;
mod config;
mod copy;
pub mod decode;
mod error;
mod events;
mod facts;
mod node;
mod normalize;
mod renderer;

pub use attributes::add_attribute;
pub use config::{ChildOrder, Config};
pub use copy::{DeepCopy, copy};
pub use decode::{DecodeError, Decoder};
pub use error::{VdomError, VdomResult};
pub use events::{EventHandler, EventOptions, trigger_event};
pub use facts::{
    ATTR_KEY, ATTR_NS_KEY, EVENT_KEY, Fact, FactCategory, FactTable, NAMESPACE_KEY,
    NamespacedValue, STYLE_KEY, StyleIter, StyleList,
};
pub use node::{Children, Node, NodeType};
pub use normalize::{normalize_children, normalize_children_with};
pub use renderer::Renderer;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Serialize a node with the default configuration
pub fn stringify(node: &Node) -> VdomResult<String> {
    Renderer::default().stringify(node)
}
