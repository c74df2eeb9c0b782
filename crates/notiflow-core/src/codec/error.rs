//! Codec error types.
//!
//! Every decode/encode failure in the crate surfaces as a [`CodecError`].
//! Nothing is recovered locally: the caller decides whether to retry,
//! surface, or abort.

use thiserror::Error;

use crate::domain::StepType;

/// Errors produced while converting between JSON and typed DTOs.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input is not valid JSON, is not an object, or lacks a readable
    /// discriminator where one is required.
    #[error("malformed {model} envelope: {reason}")]
    MalformedEnvelope {
        /// Name of the model being decoded.
        model: &'static str,
        /// What was wrong with the envelope.
        reason: String,
    },

    /// The discriminator did not match any member of the closed variant set.
    #[error("unrecognized {union} variant `{tag}`")]
    UnrecognizedVariant {
        /// Name of the union being decoded.
        union: &'static str,
        /// The raw discriminator value.
        tag: String,
        /// The raw input object, for diagnostics.
        raw: String,
    },

    /// The discriminator matched but the variant's own shape failed to decode.
    #[error("could not decode {union} variant `{variant}`: {source}")]
    VariantDecodeFailed {
        /// Name of the union being decoded.
        union: &'static str,
        /// The variant selected by the discriminator.
        variant: StepType,
        /// Underlying failure.
        #[source]
        source: Box<CodecError>,
    },

    /// A closed string enumeration received a value outside its set.
    #[error("invalid value `{value}` for field `{field}`")]
    InvalidEnumValue {
        /// Field name; nested fields use a dotted path (`controlValues.unit`).
        field: String,
        /// The offending raw value.
        value: String,
    },

    /// A slot-shaped union had no populated variant.
    #[error("cannot encode {union}: no variant is populated")]
    EmptyUnion {
        /// Name of the union.
        union: &'static str,
    },

    /// A slot-shaped union had more than one populated variant.
    #[error("cannot encode {union}: {} variants are populated", .populated.len())]
    AmbiguousUnion {
        /// Name of the union.
        union: &'static str,
        /// Every populated slot, in declaration order.
        populated: Vec<StepType>,
    },

    /// Typed decode failed (missing required field, wrong JSON type, ...).
    #[error("failed to decode {model}: {source}")]
    Decode {
        /// Name of the model being decoded.
        model: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Serialization failed.
    #[error("failed to encode {model}: {source}")]
    Encode {
        /// Name of the model being encoded.
        model: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl CodecError {
    /// Prefix the field path of an [`CodecError::InvalidEnumValue`] with its
    /// parent field. Index segments (`[0]`) attach without a dot. Other kinds
    /// are returned unchanged.
    #[must_use]
    pub fn within(self, parent: &str) -> Self {
        match self {
            Self::InvalidEnumValue { field, value } => {
                let field = if field.starts_with('[') {
                    format!("{parent}{field}")
                } else {
                    format!("{parent}.{field}")
                };
                Self::InvalidEnumValue { field, value }
            }
            other => other,
        }
    }

    /// The step variant this error is attributed to, if any.
    pub const fn variant(&self) -> Option<StepType> {
        match self {
            Self::VariantDecodeFailed { variant, .. } => Some(*variant),
            _ => None,
        }
    }

    /// Whether the error describes bad input data (as opposed to a value
    /// that could not be constructed or serialized).
    pub const fn is_data_error(&self) -> bool {
        !matches!(
            self,
            Self::EmptyUnion { .. } | Self::AmbiguousUnion { .. } | Self::Encode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_prefixes_enum_field() {
        let err = CodecError::InvalidEnumValue {
            field: "unit".to_string(),
            value: "fortnights".to_string(),
        }
        .within("controlValues");

        assert!(matches!(
            err,
            CodecError::InvalidEnumValue { ref field, ref value }
                if field == "controlValues.unit" && value == "fortnights"
        ));
    }

    #[test]
    fn test_within_leaves_other_kinds_alone() {
        let err = CodecError::EmptyUnion { union: "StepUpsert" }.within("steps[0]");
        assert!(matches!(err, CodecError::EmptyUnion { union: "StepUpsert" }));
    }

    #[test]
    fn test_display_messages() {
        let err = CodecError::AmbiguousUnion {
            union: "StepUpsert",
            populated: vec![StepType::Email, StepType::Sms],
        };
        assert_eq!(
            err.to_string(),
            "cannot encode StepUpsert: 2 variants are populated"
        );
        assert!(!err.is_data_error());

        let err = CodecError::UnrecognizedVariant {
            union: "StepUpsert",
            tag: "bogus".to_string(),
            raw: "{}".to_string(),
        };
        assert_eq!(err.to_string(), "unrecognized StepUpsert variant `bogus`");
        assert!(err.is_data_error());
    }
}
