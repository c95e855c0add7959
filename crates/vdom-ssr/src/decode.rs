//! Event Decoders
//!
//! A decoder turns the raw JSON value delivered with an event into the
//! payload the application sees. Decoders are immutable and cheap to clone;
//! clones share the underlying function.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Expecting {expected} but instead got: {found}")]
    Expecting { expected: &'static str, found: String },

    #[error("Expecting an object with a field named `{0}`")]
    MissingField(String),

    #[error("Problem with the value at field `{field}`: {source}")]
    InField {
        field: String,
        source: Box<DecodeError>,
    },

    #[error("{0}")]
    Failure(String),
}

impl DecodeError {
    fn expecting(expected: &'static str, found: &Value) -> Self {
        Self::Expecting {
            expected,
            found: found.to_string(),
        }
    }
}

type DecodeFn = dyn Fn(&Value) -> Result<Value, DecodeError> + Send + Sync;

/// Shared decoding function
#[derive(Clone)]
pub struct Decoder(Arc<DecodeFn>);

impl Decoder {
    /// Wrap a decoding function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, DecodeError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the decoder against a value
    pub fn decode(&self, value: &Value) -> Result<Value, DecodeError> {
        (self.0)(value)
    }

    /// Transform a successful result
    pub fn map<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::from_fn(move |value| self.decode(value).map(&f))
    }

    /// Pick the next decoder based on a successful result
    pub fn and_then<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Decoder + Send + Sync + 'static,
    {
        Self::from_fn(move |value| {
            let first = self.decode(value)?;
            f(first).decode(value)
        })
    }
}

impl PartialEq for Decoder {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Decoder(<function>)")
    }
}

/// Accept any value unchanged
pub fn value() -> Decoder {
    Decoder::from_fn(|value| Ok(value.clone()))
}

/// Ignore the input and produce `result`
pub fn succeed(result: Value) -> Decoder {
    Decoder::from_fn(move |_| Ok(result.clone()))
}

/// Ignore the input and fail with `message`
pub fn fail(message: impl Into<String>) -> Decoder {
    let message = message.into();
    Decoder::from_fn(move |_| Err(DecodeError::Failure(message.clone())))
}

pub fn string() -> Decoder {
    Decoder::from_fn(|value| match value {
        Value::String(_) => Ok(value.clone()),
        other => Err(DecodeError::expecting("a STRING", other)),
    })
}

/// Integers, including floats with no fractional part
pub fn int() -> Decoder {
    Decoder::from_fn(|value| {
        if let Some(i) = value.as_i64() {
            return Ok(Value::from(i));
        }
        match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Value::from(f as i64)),
            _ => Err(DecodeError::expecting("an INT", value)),
        }
    })
}

pub fn float() -> Decoder {
    Decoder::from_fn(|value| match value {
        Value::Number(_) => Ok(value.clone()),
        other => Err(DecodeError::expecting("a FLOAT", other)),
    })
}

pub fn bool() -> Decoder {
    Decoder::from_fn(|value| match value {
        Value::Bool(_) => Ok(value.clone()),
        other => Err(DecodeError::expecting("a BOOL", other)),
    })
}

/// Decode the field `name` of an object
pub fn field(name: impl Into<String>, decoder: Decoder) -> Decoder {
    let name = name.into();
    Decoder::from_fn(move |value| {
        let Value::Object(map) = value else {
            return Err(DecodeError::expecting("an OBJECT", value));
        };
        let inner = map
            .get(&name)
            .ok_or_else(|| DecodeError::MissingField(name.clone()))?;
        decoder.decode(inner).map_err(|err| DecodeError::InField {
            field: name.clone(),
            source: Box::new(err),
        })
    })
}

/// Decode a nested field, e.g. `["target", "value"]`
pub fn at<I, S>(path: I, decoder: Decoder) -> Decoder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let path: Vec<String> = path.into_iter().map(Into::into).collect();
    path.into_iter()
        .rev()
        .fold(decoder, |inner, name| field(name, inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitives() {
        assert_eq!(string().decode(&json!("hi")), Ok(json!("hi")));
        assert_eq!(int().decode(&json!(5)), Ok(json!(5)));
        assert_eq!(int().decode(&json!(5.0)), Ok(json!(5)));
        assert!(int().decode(&json!(5.5)).is_err());
        assert_eq!(bool().decode(&json!(true)), Ok(json!(true)));
        assert!(float().decode(&json!("1.0")).is_err());
    }

    #[test]
    fn test_field_and_at() {
        let input = json!({ "target": { "value": "typed" } });
        let decoder = at(["target", "value"], string());
        assert_eq!(decoder.decode(&input), Ok(json!("typed")));

        let missing = field("checked", bool()).decode(&input);
        assert_eq!(missing, Err(DecodeError::MissingField("checked".into())));
    }

    #[test]
    fn test_nested_failure_reports_field() {
        let input = json!({ "target": { "value": 3 } });
        let err = at(["target", "value"], string()).decode(&input).unwrap_err();
        assert!(matches!(err, DecodeError::InField { field: ref name, .. } if name == "target"));
        assert!(err.to_string().contains("a STRING"));
    }

    #[test]
    fn test_map_and_and_then() {
        let plus_one = int().map(|v| json!(v.as_i64().unwrap_or_default() + 1));
        assert_eq!(plus_one.decode(&json!(5)), Ok(json!(6)));

        let by_kind = field("kind", string()).and_then(|kind| {
            if kind == "num" {
                field("n", int())
            } else {
                fail("unknown kind")
            }
        });
        assert_eq!(by_kind.decode(&json!({ "kind": "num", "n": 2 })), Ok(json!(2)));
        assert_eq!(
            by_kind.decode(&json!({ "kind": "other" })),
            Err(DecodeError::Failure("unknown kind".into()))
        );
    }

    #[test]
    fn test_clones_compare_equal() {
        let d = value();
        assert_eq!(d.clone(), d);
        assert_ne!(value(), d);
    }
}
