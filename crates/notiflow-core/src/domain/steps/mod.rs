//! The step union.
//!
//! A workflow step is one of eight kinds, selected on the wire by its `type`
//! field. Two DTO families share the same union shape: the records sent when
//! creating/updating a workflow ([`Upsert`]) and the records returned by the
//! API ([`Response`]). [`TaggedStep`] is generic over the family so one codec
//! serves both.
//!
//! # Wire contract
//!
//! - Decoding reads `type` first and dispatches on it alone. Any other
//!   field is only looked at by the selected variant's own decoder.
//! - Encoding serializes the active record and always emits the variant's
//!   own tag as `type`.

/// Evaluate `$body` with `$record` bound to the active variant's record.
macro_rules! each_variant {
    ($step:expr, $record:ident => $body:expr) => {
        match $step {
            $crate::domain::steps::TaggedStep::InApp($record) => $body,
            $crate::domain::steps::TaggedStep::Email($record) => $body,
            $crate::domain::steps::TaggedStep::Sms($record) => $body,
            $crate::domain::steps::TaggedStep::Push($record) => $body,
            $crate::domain::steps::TaggedStep::Chat($record) => $body,
            $crate::domain::steps::TaggedStep::Delay($record) => $body,
            $crate::domain::steps::TaggedStep::Digest($record) => $body,
            $crate::domain::steps::TaggedStep::Custom($record) => $body,
        }
    };
}

mod response;
mod upsert;

use std::fmt::Debug;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

use super::controls::{
    ChatControlValues, CustomControlValues, DelayControlValues, DigestControlValues,
    EmailControlValues, InAppControlValues, PushControlValues, SmsControlValues,
};
use super::enums::StepType;
use crate::codec::{CodecError, WireModel, probe_discriminator};

pub use response::{
    ChatStepResponseDto, ContentIssue, ControlsMetadata, CustomStepResponseDto,
    DelayStepResponseDto, DigestStepResponseDto, EmailStepResponseDto, InAppStepResponseDto,
    IntegrationIssue, PushStepResponseDto, Response, ResponseStep, SmsStepResponseDto,
    StepIssues, StepResponseDto,
};
pub use upsert::{
    ChatStepUpsertDto, CustomStepUpsertDto, DelayStepUpsertDto, DigestStepUpsertDto,
    EmailStepUpsertDto, InAppStepUpsertDto, PushStepUpsertDto, SmsStepUpsertDto, StepUpsertDto,
    Upsert, UpsertStep,
};

/// A step record that carries its own `type` discriminator.
pub trait StepRecord: WireModel + Debug + Clone + PartialEq {
    fn step_type(&self) -> StepType;

    /// Overwrite the record's discriminator.
    fn stamp(&mut self, step_type: StepType);

    fn name(&self) -> &str;
}

/// A family of step records, one per control-values kind.
pub trait StepFamily: Debug + Clone + Copy + PartialEq + 'static {
    /// Union name used in error messages.
    const UNION: &'static str;

    type Record<C: ControlValues>: StepRecord;
}

/// Control values of one step kind, bound to its variant of [`TaggedStep`].
pub trait ControlValues: WireModel + Debug + Clone + PartialEq {
    const KIND: StepType;

    /// Wrap a record in this kind's variant without touching its tag.
    fn into_step<F: StepFamily>(record: F::Record<Self>) -> TaggedStep<F>;

    /// Borrow the record if `step` is this kind's variant.
    fn from_step<F: StepFamily>(step: &TaggedStep<F>) -> Option<&F::Record<Self>>;
}

macro_rules! bind_controls {
    ($($controls:ty => $variant:ident),+ $(,)?) => {
        $(
            impl ControlValues for $controls {
                const KIND: StepType = StepType::$variant;

                fn into_step<F: StepFamily>(record: F::Record<Self>) -> TaggedStep<F> {
                    TaggedStep::$variant(record)
                }

                fn from_step<F: StepFamily>(step: &TaggedStep<F>) -> Option<&F::Record<Self>> {
                    match step {
                        TaggedStep::$variant(record) => Some(record),
                        _ => None,
                    }
                }
            }
        )+
    };
}

bind_controls! {
    InAppControlValues => InApp,
    EmailControlValues => Email,
    SmsControlValues => Sms,
    PushControlValues => Push,
    ChatControlValues => Chat,
    DelayControlValues => Delay,
    DigestControlValues => Digest,
    CustomControlValues => Custom,
}

/// Exactly one step of family `F`.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedStep<F: StepFamily> {
    InApp(F::Record<InAppControlValues>),
    Email(F::Record<EmailControlValues>),
    Sms(F::Record<SmsControlValues>),
    Push(F::Record<PushControlValues>),
    Chat(F::Record<ChatControlValues>),
    Delay(F::Record<DelayControlValues>),
    Digest(F::Record<DigestControlValues>),
    Custom(F::Record<CustomControlValues>),
}

impl<F: StepFamily> TaggedStep<F> {
    /// Build the variant for `C`, stamping the record's `type` with the
    /// variant tag whatever it held before.
    pub fn from_record<C: ControlValues>(mut record: F::Record<C>) -> Self {
        record.stamp(C::KIND);
        C::into_step::<F>(record)
    }

    pub fn in_app(record: F::Record<InAppControlValues>) -> Self {
        Self::from_record::<InAppControlValues>(record)
    }

    pub fn email(record: F::Record<EmailControlValues>) -> Self {
        Self::from_record::<EmailControlValues>(record)
    }

    pub fn sms(record: F::Record<SmsControlValues>) -> Self {
        Self::from_record::<SmsControlValues>(record)
    }

    pub fn push(record: F::Record<PushControlValues>) -> Self {
        Self::from_record::<PushControlValues>(record)
    }

    pub fn chat(record: F::Record<ChatControlValues>) -> Self {
        Self::from_record::<ChatControlValues>(record)
    }

    pub fn delay(record: F::Record<DelayControlValues>) -> Self {
        Self::from_record::<DelayControlValues>(record)
    }

    pub fn digest(record: F::Record<DigestControlValues>) -> Self {
        Self::from_record::<DigestControlValues>(record)
    }

    pub fn custom(record: F::Record<CustomControlValues>) -> Self {
        Self::from_record::<CustomControlValues>(record)
    }

    /// The active variant's kind.
    pub const fn step_type(&self) -> StepType {
        match self {
            Self::InApp(_) => StepType::InApp,
            Self::Email(_) => StepType::Email,
            Self::Sms(_) => StepType::Sms,
            Self::Push(_) => StepType::Push,
            Self::Chat(_) => StepType::Chat,
            Self::Delay(_) => StepType::Delay,
            Self::Digest(_) => StepType::Digest,
            Self::Custom(_) => StepType::Custom,
        }
    }

    /// The record, if this step is of kind `C`.
    pub fn record<C: ControlValues>(&self) -> Option<&F::Record<C>> {
        C::from_step(self)
    }

    pub fn name(&self) -> &str {
        each_variant!(self, record => record.name())
    }

    fn decode_variant<C: ControlValues>(value: Value) -> Result<Self, CodecError> {
        <F::Record<C> as WireModel>::decode_value(value)
            .map(C::into_step::<F>)
            .map_err(|source| CodecError::VariantDecodeFailed {
                union: F::UNION,
                variant: C::KIND,
                source: Box::new(source),
            })
    }
}

impl<F: StepFamily> WireModel for TaggedStep<F> {
    const NAME: &'static str = F::UNION;

    /// Canonicalize in place by decoding and re-encoding, so that a step
    /// nested in a larger document reports the same errors as a bare one.
    fn normalize(value: &mut Value) -> Result<(), CodecError> {
        let step = Self::decode_value(value.take())?;
        *value = step.encode_value()?;
        Ok(())
    }

    fn decode_value(value: Value) -> Result<Self, CodecError> {
        let tag = probe_discriminator(F::UNION, &value)?;
        let Ok(step_type) = StepType::from_str(tag) else {
            return Err(CodecError::UnrecognizedVariant {
                union: F::UNION,
                tag: tag.to_string(),
                raw: value.to_string(),
            });
        };

        debug!(union = F::UNION, %step_type, "Dispatching step variant");

        match step_type {
            StepType::InApp => Self::decode_variant::<InAppControlValues>(value),
            StepType::Email => Self::decode_variant::<EmailControlValues>(value),
            StepType::Sms => Self::decode_variant::<SmsControlValues>(value),
            StepType::Push => Self::decode_variant::<PushControlValues>(value),
            StepType::Chat => Self::decode_variant::<ChatControlValues>(value),
            StepType::Delay => Self::decode_variant::<DelayControlValues>(value),
            StepType::Digest => Self::decode_variant::<DigestControlValues>(value),
            StepType::Custom => Self::decode_variant::<CustomControlValues>(value),
        }
    }

    fn encode_value(&self) -> Result<Value, CodecError> {
        let step_type = self.step_type();
        let mut value = each_variant!(self, record => record.encode_value())?;

        if let Value::Object(object) = &mut value {
            let recorded = object.get("type").and_then(Value::as_str);
            if recorded != Some(step_type.as_tag()) {
                warn!(
                    union = F::UNION,
                    %step_type,
                    recorded = recorded.unwrap_or("<none>"),
                    "Step record tag disagrees with its variant; emitting the variant tag"
                );
                object.insert("type".to_string(), Value::from(step_type.as_tag()));
            }
        }
        Ok(value)
    }
}

impl<F: StepFamily> Serialize for TaggedStep<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de, F: StepFamily> Deserialize<'de> for TaggedStep<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode_value(value).map_err(serde::de::Error::custom)
    }
}

/// Field-by-field form of a step union, for callers that fill in one slot
/// at a time. Converting to [`TaggedStep`] checks that exactly one slot is
/// populated.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSlots<F: StepFamily> {
    pub in_app: Option<F::Record<InAppControlValues>>,
    pub email: Option<F::Record<EmailControlValues>>,
    pub sms: Option<F::Record<SmsControlValues>>,
    pub push: Option<F::Record<PushControlValues>>,
    pub chat: Option<F::Record<ChatControlValues>>,
    pub delay: Option<F::Record<DelayControlValues>>,
    pub digest: Option<F::Record<DigestControlValues>>,
    pub custom: Option<F::Record<CustomControlValues>>,
}

impl<F: StepFamily> Default for StepSlots<F> {
    fn default() -> Self {
        Self {
            in_app: None,
            email: None,
            sms: None,
            push: None,
            chat: None,
            delay: None,
            digest: None,
            custom: None,
        }
    }
}

impl<F: StepFamily> StepSlots<F> {
    /// Kinds of every populated slot, in declaration order.
    pub fn populated(&self) -> Vec<StepType> {
        [
            (self.in_app.is_some(), StepType::InApp),
            (self.email.is_some(), StepType::Email),
            (self.sms.is_some(), StepType::Sms),
            (self.push.is_some(), StepType::Push),
            (self.chat.is_some(), StepType::Chat),
            (self.delay.is_some(), StepType::Delay),
            (self.digest.is_some(), StepType::Digest),
            (self.custom.is_some(), StepType::Custom),
        ]
        .into_iter()
        .filter_map(|(set, step_type)| set.then_some(step_type))
        .collect()
    }

    /// Collapse into a [`TaggedStep`].
    ///
    /// Fails with [`CodecError::EmptyUnion`] when no slot is set and with
    /// [`CodecError::AmbiguousUnion`] when more than one is.
    pub fn into_step(self) -> Result<TaggedStep<F>, CodecError> {
        let populated = self.populated();
        if populated.len() > 1 {
            return Err(CodecError::AmbiguousUnion {
                union: F::UNION,
                populated,
            });
        }

        macro_rules! take {
            ($slot:expr, $controls:ty) => {
                if let Some(record) = $slot {
                    return Ok(TaggedStep::from_record::<$controls>(record));
                }
            };
        }

        take!(self.in_app, InAppControlValues);
        take!(self.email, EmailControlValues);
        take!(self.sms, SmsControlValues);
        take!(self.push, PushControlValues);
        take!(self.chat, ChatControlValues);
        take!(self.delay, DelayControlValues);
        take!(self.digest, DigestControlValues);
        take!(self.custom, CustomControlValues);

        Err(CodecError::EmptyUnion { union: F::UNION })
    }

    /// Encode the single populated slot.
    pub fn encode_value(&self) -> Result<Value, CodecError> {
        self.clone().into_step()?.encode_value()
    }
}

impl<F: StepFamily> From<TaggedStep<F>> for StepSlots<F> {
    fn from(step: TaggedStep<F>) -> Self {
        let mut slots = Self::default();
        match step {
            TaggedStep::InApp(record) => slots.in_app = Some(record),
            TaggedStep::Email(record) => slots.email = Some(record),
            TaggedStep::Sms(record) => slots.sms = Some(record),
            TaggedStep::Push(record) => slots.push = Some(record),
            TaggedStep::Chat(record) => slots.chat = Some(record),
            TaggedStep::Delay(record) => slots.delay = Some(record),
            TaggedStep::Digest(record) => slots.digest = Some(record),
            TaggedStep::Custom(record) => slots.custom = Some(record),
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeUnit;
    use serde_json::json;

    #[test]
    fn test_stamping_constructor_overwrites_stale_tag() {
        let mut record = DelayStepUpsertDto::new("wait")
            .with_controls(DelayControlValues::new(5.0, TimeUnit::Minutes));
        record.step_type = StepType::Email;

        let step = UpsertStep::delay(record);
        assert_eq!(step.step_type(), StepType::Delay);
        assert_eq!(
            step.record::<DelayControlValues>().map(|r| r.step_type),
            Some(StepType::Delay)
        );
        assert_eq!(step.encode_value().unwrap()["type"], "delay");
    }

    #[test]
    fn test_encode_emits_variant_tag_even_for_raw_variant() {
        let mut record = SmsStepUpsertDto::new("text");
        record.step_type = StepType::Chat;
        let step = UpsertStep::Sms(record);
        assert_eq!(step.encode_value().unwrap()["type"], "sms");
    }

    #[test]
    fn test_record_accessor_matches_only_active_kind() {
        let step = UpsertStep::email(
            EmailStepUpsertDto::new("welcome").with_controls(EmailControlValues::new("Hi")),
        );
        assert!(step.record::<EmailControlValues>().is_some());
        assert!(step.record::<SmsControlValues>().is_none());
        assert_eq!(step.name(), "welcome");
    }

    #[test]
    fn test_empty_slots_fail() {
        let err = StepSlots::<Upsert>::default().into_step().unwrap_err();
        assert!(matches!(err, CodecError::EmptyUnion { union: "StepUpsert" }));
        assert!(StepSlots::<Upsert>::default().encode_value().is_err());
    }

    #[test]
    fn test_multiple_slots_are_ambiguous() {
        let slots = StepSlots::<Upsert> {
            email: Some(EmailStepUpsertDto::new("a")),
            sms: Some(SmsStepUpsertDto::new("b")),
            ..StepSlots::default()
        };
        let err = slots.into_step().unwrap_err();
        assert!(matches!(
            err,
            CodecError::AmbiguousUnion { ref populated, .. }
                if populated == &[StepType::Email, StepType::Sms]
        ));
    }

    #[test]
    fn test_single_slot_converts_and_stamps() {
        let mut record = ChatStepUpsertDto::new("ping");
        record.step_type = StepType::Push;
        let slots = StepSlots::<Upsert> {
            chat: Some(record),
            ..StepSlots::default()
        };
        let step = slots.into_step().unwrap();
        assert_eq!(step.step_type(), StepType::Chat);
        assert_eq!(
            step.encode_value().unwrap(),
            json!({ "name": "ping", "type": "chat" })
        );
        assert_eq!(StepSlots::from(step.clone()).into_step().unwrap(), step);
    }

    #[test]
    fn test_normalize_rewrites_nested_step_in_place() {
        let mut value = json!({
            "name": "wait",
            "type": "delay",
            "controlValues": { "amount": 1, "unit": "hours" },
            "ignored": true
        });
        UpsertStep::normalize(&mut value).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "wait",
                "type": "delay",
                "controlValues": { "type": "regular", "amount": 1, "unit": "hours" }
            })
        );
    }
}
