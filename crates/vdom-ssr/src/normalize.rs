//! Child Normalization
//!
//! Rewrites a serialized node's keyed `children` mapping into an ordered
//! sequence.
//!
//! Note the shapes: the input is a whole serialized node, the output is only
//! its serialized children sequence.
//!
//! Nesting depth is unbounded. Whole-number floats (`1.0`, `1e2`) are written
//! as integers (`1`, `100`), the way a host runtime prints numbers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{ChildOrder, Config};
use crate::error::{VdomError, VdomResult};

/// Normalize with the default configuration
///
/// `{"children":{"a":1,"b":2,"c":3}}` becomes `[1,2,3]`. Input that does not
/// parse, has no `children`, or whose `children` is not an object is
/// returned unchanged.
pub fn normalize_children(serialized: &str) -> String {
    normalize_children_with(serialized, &Config::default())
}

/// Normalize using the child order and output format from `config`
pub fn normalize_children_with(serialized: &str, config: &Config) -> String {
    match try_normalize_children(serialized, config) {
        Ok(children) => children,
        Err(err) => {
            tracing::debug!("Passing node through unchanged: {}", err);
            serialized.to_string()
        }
    }
}

fn try_normalize_children(serialized: &str, config: &Config) -> VdomResult<String> {
    let mut node = parse_unbounded(serialized)?;

    let children = match node.get_mut("children") {
        None | Some(Value::Null) => return Err(VdomError::MissingField("children")),
        Some(children) => children,
    };

    let Value::Object(keyed) = &mut *children else {
        return Err(VdomError::InvalidNode("children is not a mapping".into()));
    };

    let ordered = order_entries(std::mem::take(keyed), config.child_order);
    tracing::trace!("Normalized {} children", ordered.len());

    *children = Value::Array(ordered);
    write_whole_numbers(children);
    to_text(&*children, config)
}

/// Parse without serde_json's nesting limit; the stack grows on demand
fn parse_unbounded(serialized: &str) -> VdomResult<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(serialized);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Replace whole-number floats with integers, in place
fn write_whole_numbers(value: &mut Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        if let Some(whole) = whole_number(value) {
            *value = Value::from(whole);
            continue;
        }
        match value {
            Value::Array(items) => pending.extend(items.iter_mut()),
            Value::Object(map) => pending.extend(map.values_mut()),
            _ => {}
        }
    }
}

fn whole_number(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if !number.is_f64() {
        return None;
    }
    let f = number.as_f64()?;
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Flatten a keyed mapping into its values
fn order_entries(keyed: Map<String, Value>, order: ChildOrder) -> Vec<Value> {
    match order {
        ChildOrder::Insertion => keyed.into_iter().map(|(_, value)| value).collect(),
        ChildOrder::HostEnumeration => {
            let (mut indexed, named): (Vec<_>, Vec<_>) = keyed
                .into_iter()
                .map(|(key, value)| (array_index(&key), value))
                .partition(|(index, _)| index.is_some());
            indexed.sort_by_key(|(index, _)| *index);
            indexed
                .into_iter()
                .chain(named)
                .map(|(_, value)| value)
                .collect()
        }
    }
}

/// Canonical array index: decimal digits, no leading zero, below 2^32 - 1
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<u32>().ok().filter(|&index| index != u32::MAX)
}

/// Serialize honoring `config.pretty`
pub(crate) fn to_text<T: Serialize + ?Sized>(value: &T, config: &Config) -> VdomResult<String> {
    let text = if config.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
