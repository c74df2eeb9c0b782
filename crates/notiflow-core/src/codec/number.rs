//! Numeric fields are `f64` on the wire model. Integral values are written
//! back as JSON integers so `{"amount": 5}` re-encodes as `5`, not `5.0`.
//!
//! The wire makes no integer/float distinction, so `5.0` also re-encodes as
//! `5`. Compare such documents by decoded value, not `serde_json::Value`
//! equality: `Number(5.0) != Number(5)`.

#![allow(
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]

use serde::{Deserialize, Deserializer, Serializer};

/// Largest magnitude at which every integer is exactly representable.
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

fn as_exact_integer(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT).then(|| value as i64)
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match as_exact_integer(*value) {
        Some(int) => serializer.serialize_i64(int),
        None => serializer.serialize_f64(*value),
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer)
}

/// Same as the parent module for `Option<f64>`.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Option::<f64>::deserialize(deserializer)
    }
}
