//! Virtual DOM Node
//!
//! Serializable description of one rendered element or text fragment.
//! Upstream hands nodes over with children keyed by position (`"0"`, `"1"`,
//! ...); the normalizer turns that mapping into a plain sequence.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::facts::{Fact, FactTable};

/// Node discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "node")]
    Element,
    #[serde(rename = "text")]
    Text,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element => write!(f, "element"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Child collection, keyed or ordered depending on pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    Ordered(Vec<Node>),
    Keyed(IndexMap<String, Node>),
}

impl Default for Children {
    fn default() -> Self {
        Self::Ordered(Vec::new())
    }
}

impl Children {
    /// Key nodes by their position
    pub fn keyed_from<I: IntoIterator<Item = Node>>(nodes: I) -> Self {
        Self::Keyed(
            nodes
                .into_iter()
                .enumerate()
                .map(|(index, node)| (index.to_string(), node))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Ordered(nodes) => nodes.len(),
            Self::Keyed(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate children in storage order
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        match self {
            Self::Ordered(nodes) => Box::new(nodes.iter()),
            Self::Keyed(nodes) => Box::new(nodes.values()),
        }
    }

    /// Apply `f` to every child, keeping keys and shape
    pub fn map_nodes<F: Fn(&Node) -> Node>(&self, f: F) -> Self {
        match self {
            Self::Ordered(nodes) => Self::Ordered(nodes.iter().map(f).collect()),
            Self::Keyed(nodes) => Self::Keyed(
                nodes
                    .iter()
                    .map(|(key, node)| (key.clone(), f(node)))
                    .collect(),
            ),
        }
    }
}

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub facts: Option<FactTable>,
    #[serde(default)]
    pub children: Children,
    #[serde(default)]
    pub namespace: Option<String>,
}

impl Node {
    /// Create an element node from its facts and children
    pub fn element<F, C>(tag: impl Into<String>, facts: F, children: C) -> Self
    where
        F: IntoIterator<Item = Fact>,
        C: IntoIterator<Item = Node>,
    {
        let (facts, namespace) = FactTable::from_facts(facts);
        Self {
            kind: NodeType::Element,
            tag: Some(tag.into()),
            text: None,
            facts: Some(facts),
            children: Children::keyed_from(children),
            namespace,
        }
    }

    /// Create a text node
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: NodeType::Text,
            tag: None,
            text: Some(content.into()),
            facts: None,
            children: Children::default(),
            namespace: None,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeType::Element
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeType::Text
    }

    /// Number of nodes below this one
    pub fn descendants_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendants_count())
            .sum()
    }
}

/// Node paired with its precomputed descendant count
///
/// Counts are computed bottom-up once per serialization.
struct Counted<'a> {
    node: &'a Node,
    descendants: usize,
    children: Vec<Counted<'a>>,
}

impl<'a> Counted<'a> {
    fn new(node: &'a Node) -> Self {
        let children: Vec<Counted<'a>> = node.children.iter().map(Counted::new).collect();
        let descendants = children.iter().map(|child| 1 + child.descendants).sum();
        Self {
            node,
            descendants,
            children,
        }
    }
}

/// Children of a [`Counted`] node, in the node's own shape
struct CountedChildren<'b, 'a>(&'b Counted<'a>);

impl Serialize for CountedChildren<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let counted = self.0;
        match &counted.node.children {
            Children::Ordered(_) => serializer.collect_seq(&counted.children),
            Children::Keyed(nodes) => serializer.collect_map(nodes.keys().zip(&counted.children)),
        }
    }
}

impl Serialize for Counted<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.node;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &node.kind)?;
        if let Some(tag) = &node.tag {
            map.serialize_entry("tag", tag)?;
        }
        if let Some(text) = &node.text {
            map.serialize_entry("text", text)?;
        }
        if let Some(facts) = &node.facts {
            map.serialize_entry("facts", facts)?;
        }
        if node.is_element() {
            map.serialize_entry("children", &CountedChildren(self))?;
        }
        if let Some(namespace) = &node.namespace {
            map.serialize_entry("namespace", namespace)?;
        }
        if node.is_element() {
            map.serialize_entry("descendantsCount", &self.descendants)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Counted::new(self).serialize(serializer)
    }
}
