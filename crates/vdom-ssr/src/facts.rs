//! Node Facts
//!
//! A fact is one declarative binding on a node: an attribute, a namespaced
//! attribute, an event handler, a list of styles, the node namespace or a
//! plain property. Facts are grouped into a [`FactTable`] by category.
//!
//! Serialized layout of a fact table:
//!
//! ```text
//! { "className": "btn",
//!   "STYLE":   { "color": "red" },
//!   "EVENT":   { "click": { "stopPropagation": false, "preventDefault": false } },
//!   "ATTR":    { "aria-label": "Close" },
//!   "ATTR_NS": { "xlink:href": { "namespace": "http://www.w3.org/1999/xlink", "value": "#a" } } }
//! ```

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::decode::Decoder;
use crate::events::{EventHandler, EventOptions};

pub const ATTR_KEY: &str = "ATTR";
pub const ATTR_NS_KEY: &str = "ATTR_NS";
pub const EVENT_KEY: &str = "EVENT";
pub const STYLE_KEY: &str = "STYLE";
pub const NAMESPACE_KEY: &str = "namespace";

/// Keys a plain property may not use
const RESERVED_KEYS: [&str; 5] = [ATTR_KEY, ATTR_NS_KEY, EVENT_KEY, STYLE_KEY, NAMESPACE_KEY];

/// Fact categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactCategory {
    Attribute,
    NamespacedAttribute,
    Event,
    Style,
    Namespace,
    Plain,
}

impl FactCategory {
    /// Key the category is stored under in a fact table (`None` for plain
    /// properties, which are stored under their own key)
    pub fn key(self) -> Option<&'static str> {
        match self {
            Self::Attribute => Some(ATTR_KEY),
            Self::NamespacedAttribute => Some(ATTR_NS_KEY),
            Self::Event => Some(EVENT_KEY),
            Self::Style => Some(STYLE_KEY),
            Self::Namespace => Some(NAMESPACE_KEY),
            Self::Plain => None,
        }
    }
}

/// Value of a namespaced attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespacedValue {
    pub namespace: String,
    pub value: String,
}

/// Ordered list of (property, value) style pairs
///
/// Later pairs for the same property win when folded into a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StyleList {
    #[default]
    Empty,
    Cons {
        property: String,
        value: String,
        rest: Box<StyleList>,
    },
}

impl StyleList {
    pub fn new() -> Self {
        Self::Empty
    }

    /// Prepend a pair
    pub fn cons(property: impl Into<String>, value: impl Into<String>, rest: StyleList) -> Self {
        Self::Cons {
            property: property.into(),
            value: value.into(),
            rest: Box::new(rest),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Iterate pairs in list order
    pub fn iter(&self) -> StyleIter<'_> {
        StyleIter { current: self }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let pairs: Vec<(K, V)> = iter.into_iter().collect();
        pairs
            .into_iter()
            .rev()
            .fold(Self::Empty, |rest, (property, value)| Self::cons(property, value, rest))
    }
}

/// Iterator over a [`StyleList`]
pub struct StyleIter<'a> {
    current: &'a StyleList,
}

impl<'a> Iterator for StyleIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        match self.current {
            StyleList::Empty => None,
            StyleList::Cons { property, value, rest } => {
                self.current = &**rest;
                Some((property.as_str(), value.as_str()))
            }
        }
    }
}

/// One declarative binding
#[derive(Debug, Clone, PartialEq)]
pub enum Fact {
    Attribute { name: String, value: String },
    NamespacedAttribute { name: String, value: NamespacedValue },
    Event { name: String, handler: EventHandler },
    Style(StyleList),
    Namespace(String),
    Property { key: String, value: Value },
}

impl Fact {
    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn attribute_ns(
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::NamespacedAttribute {
            name: name.into(),
            value: NamespacedValue {
                namespace: namespace.into(),
                value: value.into(),
            },
        }
    }

    /// Event handler with default options
    pub fn on(name: impl Into<String>, decoder: Decoder) -> Self {
        Self::on_with_options(name, decoder, EventOptions::default())
    }

    pub fn on_with_options(name: impl Into<String>, decoder: Decoder, options: EventOptions) -> Self {
        Self::Event {
            name: name.into(),
            handler: EventHandler { decoder, options },
        }
    }

    pub fn style<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Style(pairs.into_iter().collect())
    }

    pub fn namespace(namespace: impl Into<String>) -> Self {
        Self::Namespace(namespace.into())
    }

    pub fn property(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Property {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn category(&self) -> FactCategory {
        match self {
            Self::Attribute { .. } => FactCategory::Attribute,
            Self::NamespacedAttribute { .. } => FactCategory::NamespacedAttribute,
            Self::Event { .. } => FactCategory::Event,
            Self::Style(_) => FactCategory::Style,
            Self::Namespace(_) => FactCategory::Namespace,
            Self::Property { .. } => FactCategory::Plain,
        }
    }

    /// Table key: the category key, or the property key for plain facts
    pub fn key(&self) -> &str {
        match self {
            Self::Property { key, .. } => key.as_str(),
            other => other.category().key().unwrap_or_default(),
        }
    }

    /// Inner key within the category sub-mapping
    pub fn real_key(&self) -> Option<&str> {
        match self {
            Self::Attribute { name, .. }
            | Self::NamespacedAttribute { name, .. }
            | Self::Event { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Per-node fact storage, grouped by category
///
/// A category sub-mapping is `None` until the first fact of that category
/// is organized into the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactTable {
    pub attributes: Option<IndexMap<String, String>>,
    pub namespaced: Option<IndexMap<String, NamespacedValue>>,
    pub events: Option<IndexMap<String, EventHandler>>,
    pub styles: Option<IndexMap<String, String>>,
    pub properties: IndexMap<String, Value>,
}

impl FactTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold facts in order into a fresh table
    ///
    /// Returns the table and the last namespace fact seen, if any.
    pub fn from_facts<I: IntoIterator<Item = Fact>>(facts: I) -> (Self, Option<String>) {
        let mut table = Self::new();
        let mut namespace = None;
        for fact in facts {
            organize_facts(fact, &mut table, &mut namespace);
        }
        (table, namespace)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.as_ref()?.get(name).map(String::as_str)
    }

    pub fn namespaced_attribute(&self, name: &str) -> Option<&NamespacedValue> {
        self.namespaced.as_ref()?.get(name)
    }

    pub fn event(&self, name: &str) -> Option<&EventHandler> {
        self.events.as_ref()?.get(name)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.as_ref()?.get(property).map(String::as_str)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// No category has been created and no property set
    pub fn is_empty(&self) -> bool {
        self.attributes.is_none()
            && self.namespaced.is_none()
            && self.events.is_none()
            && self.styles.is_none()
            && self.properties.is_empty()
    }
}

/// Merge one fact into `facts`
///
/// Keys within a category are unique; a later fact for the same key
/// overwrites the earlier value. A namespace fact is written to `namespace`
/// instead of the table.
pub(crate) fn organize_facts<'a>(
    fact: Fact,
    facts: &'a mut FactTable,
    namespace: &mut Option<String>,
) -> &'a mut FactTable {
    match fact {
        Fact::Attribute { name, value } => {
            facts.attributes.get_or_insert_with(IndexMap::new).insert(name, value);
        }
        Fact::NamespacedAttribute { name, value } => {
            facts.namespaced.get_or_insert_with(IndexMap::new).insert(name, value);
        }
        Fact::Event { name, handler } => {
            facts.events.get_or_insert_with(IndexMap::new).insert(name, handler);
        }
        Fact::Style(list) => {
            let styles = facts.styles.get_or_insert_with(IndexMap::new);
            for (property, value) in list.iter() {
                styles.insert(property.to_string(), value.to_string());
            }
        }
        Fact::Namespace(ns) => {
            *namespace = Some(ns);
        }
        Fact::Property { key, value } => {
            if RESERVED_KEYS.contains(&key.as_str()) {
                tracing::warn!("Ignoring property with reserved key: {}", key);
            } else {
                facts.properties.insert(key, value);
            }
        }
    }
    facts
}

impl Serialize for FactTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.properties {
            map.serialize_entry(key, value)?;
        }
        if let Some(styles) = &self.styles {
            map.serialize_entry(STYLE_KEY, styles)?;
        }
        if let Some(events) = &self.events {
            map.serialize_entry(EVENT_KEY, events)?;
        }
        if let Some(attributes) = &self.attributes {
            map.serialize_entry(ATTR_KEY, attributes)?;
        }
        if let Some(namespaced) = &self.namespaced {
            map.serialize_entry(ATTR_NS_KEY, namespaced)?;
        }
        map.end()
    }
}

// Event decoders are functions and cannot be read back from text; an
// `EVENT` entry is skipped.
impl<'de> Deserialize<'de> for FactTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut table = FactTable::new();
        for (key, value) in raw {
            match key.as_str() {
                ATTR_KEY => table.attributes = Some(serde_json::from_value(value).map_err(serde::de::Error::custom)?),
                ATTR_NS_KEY => table.namespaced = Some(serde_json::from_value(value).map_err(serde::de::Error::custom)?),
                STYLE_KEY => table.styles = Some(serde_json::from_value(value).map_err(serde::de::Error::custom)?),
                EVENT_KEY => tracing::trace!("Skipping serialized event table"),
                key if RESERVED_KEYS.contains(&key) => {
                    tracing::warn!("Ignoring property with reserved key: {}", key);
                }
                _ => {
                    table.properties.insert(key, value);
                }
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use serde_json::json;

    fn organize(fact: Fact) -> (FactTable, Option<String>) {
        let mut table = FactTable::new();
        let mut namespace = None;
        organize_facts(fact, &mut table, &mut namespace);
        (table, namespace)
    }

    #[test]
    fn test_attribute_routing() {
        let (table, ns) = organize(Fact::attribute("id", "main"));
        assert_eq!(table.attribute("id"), Some("main"));
        assert_eq!(table.attributes.as_ref().map(IndexMap::len), Some(1));
        assert!(table.namespaced.is_none() && table.events.is_none() && table.styles.is_none());
        assert!(table.properties.is_empty());
        assert_eq!(ns, None);
    }

    #[test]
    fn test_namespaced_attribute_routing() {
        let (table, _) = organize(Fact::attribute_ns("http://www.w3.org/1999/xlink", "xlink:href", "#a"));
        let value = table.namespaced_attribute("xlink:href").unwrap();
        assert_eq!(value.namespace, "http://www.w3.org/1999/xlink");
        assert_eq!(value.value, "#a");
        assert!(table.attributes.is_none());
    }

    #[test]
    fn test_event_routing() {
        let (table, _) = organize(Fact::on("click", decode::value()));
        assert!(table.event("click").is_some());
        assert!(table.event("input").is_none());
        assert!(table.attributes.is_none());
    }

    #[test]
    fn test_style_fold_later_wins() {
        let (table, _) = organize(Fact::style([("color", "red"), ("color", "blue")]));
        let styles = table.styles.as_ref().unwrap();
        assert_eq!(styles.len(), 1);
        assert_eq!(table.style("color"), Some("blue"));
    }

    #[test]
    fn test_empty_style_list_creates_category() {
        let (table, _) = organize(Fact::Style(StyleList::new()));
        assert_eq!(table.styles, Some(IndexMap::new()));
    }

    #[test]
    fn test_namespace_is_returned_not_stored() {
        let (table, ns) = organize(Fact::namespace("http://www.w3.org/2000/svg"));
        assert!(table.is_empty());
        assert_eq!(ns.as_deref(), Some("http://www.w3.org/2000/svg"));
    }

    #[test]
    fn test_plain_property_routing() {
        let (table, _) = organize(Fact::property("className", "btn"));
        assert_eq!(table.property("className"), Some(&json!("btn")));
        assert!(table.attributes.is_none());
    }

    #[test]
    fn test_reserved_property_key_ignored() {
        let (table, _) = organize(Fact::property("STYLE", "color: red"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_later_attribute_overwrites() {
        let (table, ns) = FactTable::from_facts([
            Fact::attribute("title", "a"),
            Fact::attribute("lang", "en"),
            Fact::attribute("title", "b"),
        ]);
        let attrs = table.attributes.as_ref().unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(table.attribute("title"), Some("b"));
        assert_eq!(ns, None);
    }

    #[test]
    fn test_style_list_order() {
        let list: StyleList = [("margin", "0"), ("padding", "1px")].into_iter().collect();
        let pairs: Vec<_> = list.iter().collect();
        assert_eq!(pairs, vec![("margin", "0"), ("padding", "1px")]);
        assert_eq!(list.len(), 2);
        assert!(StyleList::new().is_empty());
    }

    #[test]
    fn test_fact_keys() {
        assert_eq!(Fact::attribute("id", "x").key(), "ATTR");
        assert_eq!(Fact::attribute("id", "x").real_key(), Some("id"));
        assert_eq!(Fact::property("value", "x").key(), "value");
        assert_eq!(Fact::namespace("ns").category(), FactCategory::Namespace);
        assert_eq!(FactCategory::Plain.key(), None);
    }

    #[test]
    fn test_serialize_layout() {
        let (table, _) = FactTable::from_facts([
            Fact::attribute("id", "main"),
            Fact::style([("color", "red")]),
            Fact::property("className", "btn"),
            Fact::on("click", decode::value()),
        ]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            json!({
                "className": "btn",
                "STYLE": { "color": "red" },
                "EVENT": { "click": { "stopPropagation": false, "preventDefault": false } },
                "ATTR": { "id": "main" }
            })
        );
    }

    #[test]
    fn test_deserialize_skips_events() {
        let table: FactTable = serde_json::from_value(json!({
            "className": "btn",
            "ATTR": { "id": "main" },
            "EVENT": { "click": {} }
        }))
        .unwrap();
        assert_eq!(table.attribute("id"), Some("main"));
        assert_eq!(table.property("className"), Some(&json!("btn")));
        assert!(table.events.is_none());
    }

    #[test]
    fn test_deserialize_ignores_reserved_property() {
        let table: FactTable = serde_json::from_value(json!({
            "namespace": "http://www.w3.org/2000/svg",
            "title": "x"
        }))
        .unwrap();
        assert_eq!(table.property("namespace"), None);
        assert_eq!(table.property("title"), Some(&json!("x")));
        assert_eq!(serde_json::to_value(&table).unwrap(), json!({ "title": "x" }));
    }
}
