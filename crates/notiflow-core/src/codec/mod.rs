//! JSON codec for wire DTOs.
//!
//! Decoding is two-phase:
//!
//! 1. **Normalization** on the raw JSON object, driven by each model's
//!    declared [`FieldRule`] table: documented defaults are filled, closed
//!    string enumerations are checked, and nested records are normalized
//!    recursively.
//! 2. **Typed decode** with serde into the Rust record.
//!
//! Encoding is a plain serde serialization; defaults are never omitted
//! because they are stored as concrete values after decode.

mod error;
pub mod nullable;
pub mod number;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use error::CodecError;

/// A JSON object as decoded from the wire.
pub type JsonMap = Map<String, Value>;

/// Normalization entry point for a nested value.
pub type Normalizer = fn(&mut Value) -> Result<(), CodecError>;

/// Default value filled in for an absent or `null` field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    /// A string default (also used for string-backed enumerations).
    Str(&'static str),
    /// A boolean default.
    Bool(bool),
}

impl Fallback {
    fn to_value(self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.to_string()),
            Self::Bool(b) => Value::Bool(b),
        }
    }
}

/// One row of a model's normalization table.
#[derive(Clone, Copy)]
pub enum FieldRule {
    /// Fill `field` with `value` when absent or explicitly `null`.
    Default {
        field: &'static str,
        value: Fallback,
    },
    /// `field`, when present as a string, must be one of `allowed`.
    OneOf {
        field: &'static str,
        allowed: &'static [&'static str],
    },
    /// Every string element of the array `field` must be one of `allowed`.
    EachOneOf {
        field: &'static str,
        allowed: &'static [&'static str],
    },
    /// Normalize the non-null value of `field` with `normalize`.
    Nested {
        field: &'static str,
        normalize: Normalizer,
    },
    /// Normalize every element of the array `field`.
    NestedEach {
        field: &'static str,
        normalize: Normalizer,
    },
    /// Normalize every value of the object `field`.
    NestedValues {
        field: &'static str,
        normalize: Normalizer,
    },
}

/// Apply a normalization table to a JSON object in place.
pub fn apply_rules(rules: &[FieldRule], object: &mut JsonMap) -> Result<(), CodecError> {
    for rule in rules {
        match *rule {
            FieldRule::Default { field, value } => {
                if object.get(field).is_none_or(Value::is_null) {
                    object.insert(field.to_string(), value.to_value());
                }
            }
            FieldRule::OneOf { field, allowed } => {
                if let Some(Value::String(raw)) = object.get(field) {
                    check_member(field, raw, allowed)?;
                }
            }
            FieldRule::EachOneOf { field, allowed } => {
                if let Some(Value::Array(items)) = object.get(field) {
                    for raw in items.iter().filter_map(Value::as_str) {
                        check_member(field, raw, allowed)?;
                    }
                }
            }
            FieldRule::Nested { field, normalize } => {
                if let Some(value) = object.get_mut(field).filter(|v| !v.is_null()) {
                    normalize(value).map_err(|e| e.within(field))?;
                }
            }
            FieldRule::NestedEach { field, normalize } => {
                if let Some(Value::Array(items)) = object.get_mut(field) {
                    for (index, item) in items.iter_mut().enumerate() {
                        normalize(item).map_err(|e| e.within(&format!("{field}[{index}]")))?;
                    }
                }
            }
            FieldRule::NestedValues { field, normalize } => {
                if let Some(Value::Object(entries)) = object.get_mut(field) {
                    for (key, entry) in entries.iter_mut() {
                        normalize(entry).map_err(|e| e.within(&format!("{field}.{key}")))?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_member(field: &str, raw: &str, allowed: &[&str]) -> Result<(), CodecError> {
    if allowed.contains(&raw) {
        Ok(())
    } else {
        Err(CodecError::InvalidEnumValue {
            field: field.to_string(),
            value: raw.to_string(),
        })
    }
}

/// Normalize every element of a JSON array with `T`'s table. Non-arrays are
/// left for the typed decode to reject.
pub fn normalize_each<T: WireModel>(value: &mut Value) -> Result<(), CodecError> {
    if let Value::Array(items) = value {
        for (index, item) in items.iter_mut().enumerate() {
            T::normalize(item).map_err(|e| e.within(&format!("[{index}]")))?;
        }
    }
    Ok(())
}

/// Name of a JSON value's type, for error messages.
pub const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read the `type` discriminator of a union envelope without validating the
/// rest of the object.
pub fn probe_discriminator<'a>(model: &'static str, value: &'a Value) -> Result<&'a str, CodecError> {
    let Value::Object(object) = value else {
        return Err(CodecError::MalformedEnvelope {
            model,
            reason: format!("expected a JSON object, found {}", json_kind(value)),
        });
    };

    match object.get("type") {
        Some(Value::String(tag)) => Ok(tag),
        Some(other) => Err(CodecError::MalformedEnvelope {
            model,
            reason: format!("discriminator `type` must be a string, found {}", json_kind(other)),
        }),
        None => Err(CodecError::MalformedEnvelope {
            model,
            reason: "missing discriminator `type`".to_string(),
        }),
    }
}

/// A DTO with a JSON wire representation.
///
/// Implementors declare their normalization table in [`WireModel::RULES`];
/// the provided methods run normalization before the typed decode.
pub trait WireModel: Serialize + DeserializeOwned {
    /// Model name used in error messages.
    const NAME: &'static str;

    /// Declared defaults, closed enums and nested records.
    const RULES: &'static [FieldRule] = &[];

    /// Normalize a raw JSON value in place.
    fn normalize(value: &mut Value) -> Result<(), CodecError> {
        let Value::Object(object) = value else {
            return Err(CodecError::MalformedEnvelope {
                model: Self::NAME,
                reason: format!("expected a JSON object, found {}", json_kind(value)),
            });
        };
        apply_rules(Self::RULES, object)
    }

    /// Decode from an already-parsed JSON value.
    fn decode_value(mut value: Value) -> Result<Self, CodecError> {
        Self::normalize(&mut value)?;
        serde_json::from_value(value).map_err(|source| CodecError::Decode {
            model: Self::NAME,
            source,
        })
    }

    /// Decode from raw JSON bytes.
    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| CodecError::MalformedEnvelope {
                model: Self::NAME,
                reason: e.to_string(),
            })?;
        Self::decode_value(value)
    }

    /// Decode from a JSON string.
    fn decode_str(input: &str) -> Result<Self, CodecError> {
        Self::decode(input.as_bytes())
    }

    /// Encode into a JSON value.
    fn encode_value(&self) -> Result<Value, CodecError> {
        serde_json::to_value(self).map_err(|source| CodecError::Encode {
            model: Self::NAME,
            source,
        })
    }

    /// Encode into compact JSON bytes.
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let value = self.encode_value()?;
        serde_json::to_vec(&value).map_err(|source| CodecError::Encode {
            model: Self::NAME,
            source,
        })
    }
}

/// Untyped bodies for operations whose schema is not modelled.
impl WireModel for Value {
    const NAME: &'static str = "JsonValue";

    fn normalize(_value: &mut Value) -> Result<(), CodecError> {
        Ok(())
    }
}
