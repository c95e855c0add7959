//! Renderer Configuration

/// Order in which a keyed child mapping is flattened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildOrder {
    /// Array-index keys ascending, then other keys in document order
    #[default]
    HostEnumeration,
    /// Document order
    Insertion,
}

/// Renderer configuration options
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Child flattening order used by normalization
    pub child_order: ChildOrder,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Config {
    pub fn with_child_order(mut self, child_order: ChildOrder) -> Self {
        self.child_order = child_order;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}
