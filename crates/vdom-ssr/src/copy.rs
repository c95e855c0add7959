//! Deep Copy
//!
//! Structural clones: every nested container in the copy is fresh, so
//! mutating the copy never reaches the original.

use serde_json::Value;

use crate::facts::FactTable;
use crate::node::Node;

/// Structurally copy a JSON value
///
/// Arrays copy to arrays and objects to objects; scalars are copied by value.
pub fn copy(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(copy).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), copy(item)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Types that can be copied without sharing mutable containers
pub trait DeepCopy {
    fn deep_copy(&self) -> Self;
}

impl DeepCopy for Value {
    fn deep_copy(&self) -> Self {
        copy(self)
    }
}

// Decoders are shared between copies; they are immutable.
impl DeepCopy for FactTable {
    fn deep_copy(&self) -> Self {
        FactTable {
            attributes: self.attributes.clone(),
            namespaced: self.namespaced.clone(),
            events: self.events.clone(),
            styles: self.styles.clone(),
            properties: self
                .properties
                .iter()
                .map(|(key, value)| (key.clone(), copy(value)))
                .collect(),
        }
    }
}

impl DeepCopy for Node {
    fn deep_copy(&self) -> Self {
        Node {
            kind: self.kind,
            tag: self.tag.clone(),
            text: self.text.clone(),
            facts: self.facts.as_ref().map(FactTable::deep_copy),
            children: self.children.map_nodes(Node::deep_copy),
            namespace: self.namespace.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Fact;
    use serde_json::json;

    #[test]
    fn test_copy_preserves_shape() {
        let value = json!({ "list": [1, [2, 3]], "map": { "a": null }, "n": 1.5 });
        assert_eq!(copy(&value), value);
        assert!(copy(&json!([])).is_array());
        assert!(copy(&json!({})).is_object());
        assert_eq!(copy(&json!("s")), json!("s"));
    }

    #[test]
    fn test_copy_is_independent() {
        let original = json!({ "facts": { "ATTR": { "id": "a" } }, "children": [] });
        let mut copied = copy(&original);
        copied["facts"]["ATTR"]["id"] = json!("b");
        copied["children"].as_array_mut().unwrap().push(json!(1));

        assert_eq!(original["facts"]["ATTR"]["id"], json!("a"));
        assert_eq!(original["children"], json!([]));
    }

    #[test]
    fn test_copy_idempotent() {
        let value = json!({ "a": [{ "b": {} }] });
        assert_eq!(copy(&copy(&value)), copy(&value));
    }

    #[test]
    fn test_node_deep_copy_is_independent() {
        let original = Node::element(
            "div",
            [Fact::attribute("id", "a"), Fact::property("data", json!({ "k": [1] }))],
            [Node::text("hi")],
        );
        let mut copied = original.deep_copy();
        assert_eq!(copied, original);

        let facts = copied.facts.as_mut().unwrap();
        facts.attributes.as_mut().unwrap().insert("id".into(), "b".into());
        facts.properties["data"]["k"] = json!([2]);

        let facts = original.facts.as_ref().unwrap();
        assert_eq!(facts.attribute("id"), Some("a"));
        assert_eq!(facts.property("data"), Some(&json!({ "k": [1] })));
    }
}
