//! Step union decoding and encoding across every step kind.
//!
//! Exercises the public `WireModel` surface only: decode from JSON text,
//! encode back, and the error kinds callers match on.

use notiflow_core::domain::steps::{DelayStepUpsertDto, EmailStepUpsertDto};
use notiflow_core::domain::{DelayControlValues, DelayType, EmailControlValues, TimeUnit};
use notiflow_core::{CodecError, ResponseStep, StepType, UpsertStep, WireModel};
use serde_json::{Value, json};

fn minimal_step(kind: StepType) -> Value {
    let controls = match kind {
        StepType::Email => json!({"subject": "Hello"}),
        StepType::Delay => json!({"amount": 3, "unit": "days"}),
        StepType::Digest => json!({"cron": "0 9 * * *"}),
        StepType::InApp => json!({"body": "You have a new message"}),
        StepType::Custom => json!({"anything": ["goes", 1]}),
        StepType::Sms | StepType::Push | StepType::Chat => json!({"body": "ping"}),
    };
    json!({"name": format!("{kind} step"), "type": kind.as_tag(), "controlValues": controls})
}

#[test]
fn test_every_kind_decodes_to_its_own_variant() {
    for kind in ALL_KINDS {
        let step = UpsertStep::decode_value(minimal_step(kind)).unwrap();
        assert_eq!(step.step_type(), kind);
        assert_eq!(step.name(), format!("{kind} step"));

        let encoded = step.encode_value().unwrap();
        assert_eq!(encoded["type"], json!(kind.as_tag()));
        assert_eq!(UpsertStep::decode_value(encoded).unwrap(), step);
    }
}

const ALL_KINDS: [StepType; 8] = [
    StepType::InApp,
    StepType::Email,
    StepType::Sms,
    StepType::Push,
    StepType::Chat,
    StepType::Delay,
    StepType::Digest,
    StepType::Custom,
];

/// `minimal_step(kind)`'s control values once normalization has filled defaults.
fn filled_controls(kind: StepType) -> Value {
    match kind {
        StepType::Email => json!({
            "subject": "Hello",
            "body": "",
            "editorType": "block",
            "disableOutputSanitization": false
        }),
        StepType::Delay => json!({"type": "regular", "amount": 3, "unit": "days"}),
        StepType::InApp => json!({
            "body": "You have a new message",
            "disableOutputSanitization": false
        }),
        _ => minimal_step(kind)["controlValues"].clone(),
    }
}

#[test]
fn test_upsert_encoding_is_exact_per_kind() {
    for kind in ALL_KINDS {
        let step = UpsertStep::decode_value(minimal_step(kind)).unwrap();
        let expected = json!({
            "name": format!("{kind} step"),
            "type": kind.as_tag(),
            "controlValues": filled_controls(kind)
        });
        assert_eq!(step.encode_value().unwrap(), expected, "kind {kind}");
    }
}

#[test]
fn test_response_encoding_is_exact_per_kind() {
    for kind in ALL_KINDS {
        let mut input = json!({
            "controls": {"values": {}},
            "variables": {},
            "stepId": "s1",
            "_id": "st_1",
            "name": format!("{kind} step"),
            "slug": "s1_st_1",
            "type": kind.as_tag(),
            "origin": "external",
            "workflowId": "onboarding",
            "workflowDatabaseId": "wf_1"
        });
        input["controlValues"] = minimal_step(kind)["controlValues"].clone();

        let step = ResponseStep::decode_value(input.clone()).unwrap();
        assert_eq!(step.step_type(), kind);

        let mut expected = input;
        expected["controlValues"] = filled_controls(kind);
        assert_eq!(step.encode_value().unwrap(), expected, "kind {kind}");
    }
}

#[test]
fn test_unknown_tag_is_unrecognized_variant() {
    let err = UpsertStep::decode_str(r#"{"name": "Fax", "type": "fax"}"#).unwrap_err();
    match err {
        CodecError::UnrecognizedVariant { tag, raw, .. } => {
            assert_eq!(tag, "fax");
            assert!(raw.contains("Fax"));
        }
        other => panic!("expected UnrecognizedVariant, got {other:?}"),
    }
}

#[test]
fn test_missing_tag_is_malformed() {
    let err = UpsertStep::decode_str(r#"{"name": "No type"}"#).unwrap_err();
    assert!(matches!(err, CodecError::MalformedEnvelope { .. }));

    let err = UpsertStep::decode_str(r#"{"name": "Numeric", "type": 3}"#).unwrap_err();
    assert!(matches!(err, CodecError::MalformedEnvelope { .. }));
}

#[test]
fn test_email_without_subject_fails_as_email() {
    let err = UpsertStep::decode_str(
        r#"{"name": "Welcome", "type": "email", "controlValues": {"body": "<p>hi</p>"}}"#,
    )
    .unwrap_err();
    assert_eq!(err.variant(), Some(StepType::Email));
}

#[test]
fn test_email_fields_do_not_leak_into_other_variants() {
    // A delay record carrying email fields still decodes as a delay.
    let step = UpsertStep::decode_str(
        r#"{"name": "Wait", "type": "delay",
            "controlValues": {"amount": 1, "unit": "hours", "subject": "ignored"}}"#,
    )
    .unwrap();
    let record = step.record::<DelayControlValues>().unwrap();
    let controls = record.control_values.as_ref().unwrap();
    assert_eq!(controls.unit, TimeUnit::Hours);
    assert_eq!(controls.delay_type, DelayType::Regular);
}

#[test]
fn test_invalid_unit_names_the_nested_field() {
    let err = UpsertStep::decode_str(
        r#"{"name": "Wait", "type": "delay", "controlValues": {"amount": 2, "unit": "fortnights"}}"#,
    )
    .unwrap_err();
    let CodecError::VariantDecodeFailed { variant, source, .. } = err else {
        panic!("expected VariantDecodeFailed");
    };
    assert_eq!(variant, StepType::Delay);
    match *source {
        CodecError::InvalidEnumValue { field, value } => {
            assert_eq!(field, "controlValues.unit");
            assert_eq!(value, "fortnights");
        }
        other => panic!("expected InvalidEnumValue, got {other:?}"),
    }
}

#[test]
fn test_built_steps_encode_with_defaults() {
    let step = UpsertStep::delay(
        DelayStepUpsertDto::new("Wait").with_controls(DelayControlValues::new(5.0, TimeUnit::Minutes)),
    );
    assert_eq!(
        step.encode_value().unwrap(),
        json!({
            "name": "Wait",
            "type": "delay",
            "controlValues": {"type": "regular", "amount": 5, "unit": "minutes"}
        })
    );
}

#[test]
fn test_email_residual_fields_survive_round_trip() {
    let input = json!({
        "name": "Welcome",
        "type": "email",
        "controlValues": {"subject": "Hi", "preheader": "Read me", "layoutId": null}
    });
    let step = UpsertStep::decode_value(input).unwrap();
    let record = step.record::<EmailControlValues>().unwrap();
    let controls = record.control_values.as_ref().unwrap();
    assert_eq!(controls.additional_properties["preheader"], json!("Read me"));
    assert_eq!(controls.layout_id, Some(None));

    let encoded = step.encode_value().unwrap();
    assert_eq!(encoded["controlValues"]["preheader"], json!("Read me"));
    assert_eq!(encoded["controlValues"]["layoutId"], Value::Null);
    assert_eq!(encoded["controlValues"]["editorType"], json!("block"));
}

#[test]
fn test_constructed_email_round_trips() {
    let step = UpsertStep::email(
        EmailStepUpsertDto::new("Welcome")
            .with_id("step_1")
            .with_controls(EmailControlValues::new("Hi {{subscriber.firstName}}").with_body("<p>Hello</p>")),
    );
    let bytes = step.encode().unwrap();
    assert_eq!(UpsertStep::decode(&bytes).unwrap(), step);
}
