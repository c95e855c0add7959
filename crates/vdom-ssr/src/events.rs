//! Event Handlers
//!
//! Event bindings stored in a node's fact table, and dispatch of a named
//! event against them.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::decode::Decoder;
use crate::error::{VdomError, VdomResult};
use crate::node::Node;

/// Event handler options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOptions {
    pub stop_propagation: bool,
    pub prevent_default: bool,
}

/// Decoder registered for one event name
#[derive(Debug, Clone, PartialEq)]
pub struct EventHandler {
    pub decoder: Decoder,
    pub options: EventOptions,
}

impl EventHandler {
    pub fn new(decoder: Decoder) -> Self {
        Self {
            decoder,
            options: EventOptions::default(),
        }
    }

    /// Stop propagation after handling
    pub fn stop_propagation(mut self) -> Self {
        self.options.stop_propagation = true;
        self
    }

    /// Prevent the default browser action
    pub fn prevent_default(mut self) -> Self {
        self.options.prevent_default = true;
        self
    }
}

// Only the options reach the output; the decoder stays on the server.
impl Serialize for EventHandler {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.options.serialize(serializer)
    }
}

/// Run the decoder registered for `event_name` on `node` against `value`
///
/// Fails with [`VdomError::EventNotFound`] when the node has no such event,
/// and with [`VdomError::Decode`] when the decoder rejects the value.
pub fn trigger_event(event_name: &str, value: &Value, node: &Node) -> VdomResult<Value> {
    let facts = node
        .facts
        .as_ref()
        .ok_or_else(|| VdomError::InvalidNode(format!("{} node has no facts", node.kind)))?;

    let handler = facts
        .event(event_name)
        .ok_or_else(|| VdomError::EventNotFound(event_name.to_string()))?;

    tracing::trace!("Dispatching {} event", event_name);
    Ok(handler.decoder.decode(value)?)
}
