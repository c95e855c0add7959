//! Adding Facts to Nodes

use crate::copy::DeepCopy;
use crate::error::{VdomError, VdomResult};
use crate::facts::{Fact, organize_facts};
use crate::node::Node;

/// Return a copy of `node` with `fact` merged into its fact table
///
/// `node` itself is never modified. A namespace fact sets the copy's
/// `namespace`. Nodes without a fact table (text nodes) are rejected.
pub fn add_attribute(fact: Fact, node: &Node) -> VdomResult<Node> {
    let mut copy = node.deep_copy();

    let facts = copy
        .facts
        .as_mut()
        .ok_or_else(|| VdomError::InvalidNode(format!("{} node has no facts", node.kind)))?;

    tracing::trace!("Adding {:?} fact", fact.category());
    let mut namespace = None;
    organize_facts(fact, facts, &mut namespace);

    if namespace.is_some() {
        copy.namespace = namespace;
    }
    Ok(copy)
}
