//! Serde adapter for tri-state fields.
//!
//! Use with `#[serde(default, skip_serializing_if = "Option::is_none", with = "nullable")]`
//! on an `Option<Option<T>>`:
//!
//! | wire            | Rust               |
//! |-----------------|--------------------|
//! | field absent    | `None`             |
//! | `null`          | `Some(None)`       |
//! | value           | `Some(Some(v))`    |

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(Some(inner)) => inner.serialize(serializer),
        // `None` is skipped by `skip_serializing_if`.
        Some(None) | None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
