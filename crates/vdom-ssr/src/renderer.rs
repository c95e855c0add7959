//! Renderer - Serialization boundary entry point

use serde_json::Value;

use crate::error::VdomResult;
use crate::facts::Fact;
use crate::node::Node;
use crate::{Config, attributes, events, normalize};

/// Server-side renderer helpers bound to one configuration
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: Config,
}

impl Renderer {
    /// Create a new renderer with the given configuration
    pub fn new(config: Config) -> Self {
        tracing::debug!("Renderer {} initialized: {:?}", crate::VERSION, config);
        Self { config }
    }

    /// Serialize a node
    pub fn stringify(&self, node: &Node) -> VdomResult<String> {
        normalize::to_text(node, &self.config)
    }

    /// Serialized children sequence of a serialized node
    ///
    /// See [`normalize::normalize_children`] for the passthrough rules.
    pub fn normalize_children(&self, serialized: &str) -> String {
        normalize::normalize_children_with(serialized, &self.config)
    }

    /// Serialize `node` and normalize its children in one step
    pub fn render_children(&self, node: &Node) -> VdomResult<String> {
        let serialized = self.stringify(node)?;
        Ok(self.normalize_children(&serialized))
    }

    pub fn add_attribute(&self, fact: Fact, node: &Node) -> VdomResult<Node> {
        attributes::add_attribute(fact, node)
    }

    pub fn trigger_event(&self, event_name: &str, value: &Value, node: &Node) -> VdomResult<Value> {
        events::trigger_event(event_name, value, node)
    }

    /// Get renderer configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
