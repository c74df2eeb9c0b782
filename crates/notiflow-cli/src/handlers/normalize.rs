//! `normalize`: decode a document and print its canonical encoding.

use notiflow_core::domain::{
    ChatControlValues, CustomControlValues, DelayControlValues, DigestControlValues,
    EmailControlValues, InAppControlValues, PushControlValues, SmsControlValues,
};
use notiflow_core::{
    CodecError, CreateWorkflowDto, ListWorkflowResponse, PatchWorkflowDto, ResponseStep,
    SyncWorkflowDto, UpdateWorkflowDto, UpsertStep, WireModel, WorkflowResponseDto,
};
use serde_json::Value;
use tracing::debug;

use crate::commands::DocumentKind;
use crate::error::CliError;
use crate::presentation::render_json;

pub fn execute(kind: DocumentKind, input: &[u8], compact: bool) -> Result<String, CliError> {
    let value = canonicalize(kind, input)?;
    debug!(?kind, "Normalized document");
    render_json(&value, compact)
}

/// Decode `input` as `kind` and encode it again with defaults filled in.
pub fn canonicalize(kind: DocumentKind, input: &[u8]) -> Result<Value, CodecError> {
    match kind {
        DocumentKind::Create => roundtrip::<CreateWorkflowDto>(input),
        DocumentKind::Update => roundtrip::<UpdateWorkflowDto>(input),
        DocumentKind::Patch => roundtrip::<PatchWorkflowDto>(input),
        DocumentKind::Sync => roundtrip::<SyncWorkflowDto>(input),
        DocumentKind::Workflow => roundtrip::<WorkflowResponseDto>(input),
        DocumentKind::List => roundtrip::<ListWorkflowResponse>(input),
        DocumentKind::Step => roundtrip::<UpsertStep>(input),
        DocumentKind::StepResponse => roundtrip::<ResponseStep>(input),
        DocumentKind::ControlsInApp => roundtrip::<InAppControlValues>(input),
        DocumentKind::ControlsEmail => roundtrip::<EmailControlValues>(input),
        DocumentKind::ControlsSms => roundtrip::<SmsControlValues>(input),
        DocumentKind::ControlsPush => roundtrip::<PushControlValues>(input),
        DocumentKind::ControlsChat => roundtrip::<ChatControlValues>(input),
        DocumentKind::ControlsDelay => roundtrip::<DelayControlValues>(input),
        DocumentKind::ControlsDigest => roundtrip::<DigestControlValues>(input),
        DocumentKind::ControlsCustom => roundtrip::<CustomControlValues>(input),
    }
}

fn roundtrip<T: WireModel>(input: &[u8]) -> Result<Value, CodecError> {
    T::decode(input)?.encode_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delay_defaults_are_filled() {
        let value =
            canonicalize(DocumentKind::ControlsDelay, br#"{"amount": 5, "unit": "minutes"}"#)
                .unwrap();
        assert_eq!(value, json!({"type": "regular", "amount": 5, "unit": "minutes"}));
    }

    #[test]
    fn test_step_without_subject_names_variant() {
        let err = canonicalize(
            DocumentKind::Step,
            br#"{"name": "Welcome", "type": "email", "controlValues": {"body": "hi"}}"#,
        )
        .unwrap_err();
        assert_eq!(err.variant(), Some(notiflow_core::StepType::Email));
    }

    #[test]
    fn test_compact_output() {
        let out = execute(
            DocumentKind::Sync,
            br#"{"targetEnvironmentId": "env_1"}"#,
            true,
        )
        .unwrap();
        assert_eq!(out, r#"{"targetEnvironmentId":"env_1"}"#);
    }

    #[test]
    fn test_malformed_json_is_data_error() {
        let err = execute(DocumentKind::Create, b"{not json", false).unwrap_err();
        assert_eq!(err.exit_code(), 65);
    }
}
