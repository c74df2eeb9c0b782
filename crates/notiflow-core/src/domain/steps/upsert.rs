//! Step records sent with create/update workflow requests.

use serde::{Deserialize, Serialize};

use super::{ControlValues, StepFamily, StepRecord, TaggedStep};
use crate::codec::{FieldRule, WireModel};
use crate::domain::controls::{
    ChatControlValues, CustomControlValues, DelayControlValues, DigestControlValues,
    EmailControlValues, InAppControlValues, PushControlValues, SmsControlValues,
};
use crate::domain::enums::StepType;

/// A step as written by the client. `_id` is set when updating an existing
/// step and absent for a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound = "C: Serialize + serde::de::DeserializeOwned"
)]
pub struct StepUpsertDto<C> {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_values: Option<C>,
}

impl<C: ControlValues> StepUpsertDto<C> {
    /// New step of kind `C` with no control values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            step_type: C::KIND,
            control_values: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_controls(mut self, controls: C) -> Self {
        self.control_values = Some(controls);
        self
    }
}

impl<C: ControlValues> WireModel for StepUpsertDto<C> {
    const NAME: &'static str = "StepUpsertDto";
    const RULES: &'static [FieldRule] = &[
        FieldRule::OneOf {
            field: "type",
            allowed: StepType::TAGS,
        },
        FieldRule::Nested {
            field: "controlValues",
            normalize: C::normalize,
        },
    ];
}

impl<C: ControlValues> StepRecord for StepUpsertDto<C> {
    fn step_type(&self) -> StepType {
        self.step_type
    }

    fn stamp(&mut self, step_type: StepType) {
        self.step_type = step_type;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Family marker for client-written steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upsert;

impl StepFamily for Upsert {
    const UNION: &'static str = "StepUpsert";
    type Record<C: ControlValues> = StepUpsertDto<C>;
}

pub type UpsertStep = TaggedStep<Upsert>;

pub type InAppStepUpsertDto = StepUpsertDto<InAppControlValues>;
pub type EmailStepUpsertDto = StepUpsertDto<EmailControlValues>;
pub type SmsStepUpsertDto = StepUpsertDto<SmsControlValues>;
pub type PushStepUpsertDto = StepUpsertDto<PushControlValues>;
pub type ChatStepUpsertDto = StepUpsertDto<ChatControlValues>;
pub type DelayStepUpsertDto = StepUpsertDto<DelayControlValues>;
pub type DigestStepUpsertDto = StepUpsertDto<DigestControlValues>;
pub type CustomStepUpsertDto = StepUpsertDto<CustomControlValues>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use serde_json::json;

    #[test]
    fn test_controls_enum_error_is_prefixed() {
        let err = DelayStepUpsertDto::decode_value(json!({
            "name": "wait",
            "type": "delay",
            "controlValues": { "amount": 2, "unit": "fortnights" }
        }))
        .unwrap_err();

        assert!(matches!(
            err,
            CodecError::InvalidEnumValue { ref field, ref value }
                if field == "controlValues.unit" && value == "fortnights"
        ));
    }

    #[test]
    fn test_builder_sets_kind() {
        let step = DigestStepUpsertDto::new("batch").with_id("st_1");
        assert_eq!(step.step_type, StepType::Digest);
        assert_eq!(
            step.encode_value().unwrap(),
            json!({ "_id": "st_1", "name": "batch", "type": "digest" })
        );
    }

    #[test]
    fn test_null_control_values_mean_unset() {
        let step = SmsStepUpsertDto::decode_value(json!({
            "name": "text",
            "type": "sms",
            "controlValues": null
        }))
        .unwrap();
        assert_eq!(step.control_values, None);
    }

    #[test]
    fn test_controls_without_default_impl_may_be_absent() {
        // Email and delay controls have required fields and no `Default`.
        let email: EmailStepUpsertDto =
            serde_json::from_value(json!({ "name": "welcome", "type": "email" })).unwrap();
        assert_eq!(email.control_values, None);

        let delay = DelayStepUpsertDto::decode_value(json!({
            "name": "wait",
            "type": "delay",
            "controlValues": { "amount": 1, "unit": "hours" }
        }))
        .unwrap();
        assert_eq!(delay.control_values.map(|c| c.amount), Some(1.0));
    }
}
