//! Workflow DTOs: request bodies, responses, preferences and issues.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ResourceOrigin, RuntimeIssueType, StepType, WorkflowCreationSource, WorkflowStatus};
use super::steps::{ResponseStep, UpsertStep};
use crate::codec::{Fallback, FieldRule, JsonMap, WireModel, number};

/// Workflow-wide preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPreference {
    pub enabled: bool,
    /// Subscribers cannot override a read-only preference.
    pub read_only: bool,
}

impl Default for WorkflowPreference {
    fn default() -> Self {
        Self {
            enabled: true,
            read_only: false,
        }
    }
}

impl WireModel for WorkflowPreference {
    const NAME: &'static str = "WorkflowPreference";
    const RULES: &'static [FieldRule] = &[
        FieldRule::Default {
            field: "enabled",
            value: Fallback::Bool(true),
        },
        FieldRule::Default {
            field: "readOnly",
            value: Fallback::Bool(false),
        },
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPreference {
    pub enabled: bool,
}

impl Default for ChannelPreference {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl WireModel for ChannelPreference {
    const NAME: &'static str = "ChannelPreference";
    const RULES: &'static [FieldRule] = &[FieldRule::Default {
        field: "enabled",
        value: Fallback::Bool(true),
    }];
}

/// Preferences for the whole workflow plus per-channel overrides keyed by
/// channel name (`email`, `in_app`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkflowPreferences {
    pub all: WorkflowPreference,
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelPreference>,
}

impl WireModel for WorkflowPreferences {
    const NAME: &'static str = "WorkflowPreferences";
    const RULES: &'static [FieldRule] = &[
        FieldRule::Nested {
            field: "all",
            normalize: WorkflowPreference::normalize,
        },
        FieldRule::NestedValues {
            field: "channels",
            normalize: ChannelPreference::normalize,
        },
    ];
}

/// Preferences sent with create/update. `user` holds the subscriber-facing
/// overrides and `workflow` the workflow's own defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferencesRequestDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<WorkflowPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowPreferences>,
}

impl WireModel for PreferencesRequestDto {
    const NAME: &'static str = "PreferencesRequestDto";
    const RULES: &'static [FieldRule] = &[
        FieldRule::Nested {
            field: "user",
            normalize: WorkflowPreferences::normalize,
        },
        FieldRule::Nested {
            field: "workflow",
            normalize: WorkflowPreferences::normalize,
        },
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowPreferencesResponseDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<WorkflowPreferences>,
    pub default: WorkflowPreferences,
}

impl WireModel for WorkflowPreferencesResponseDto {
    const NAME: &'static str = "WorkflowPreferencesResponseDto";
    const RULES: &'static [FieldRule] = &[
        FieldRule::Nested {
            field: "user",
            normalize: WorkflowPreferences::normalize,
        },
        FieldRule::Nested {
            field: "default",
            normalize: WorkflowPreferences::normalize,
        },
    ];
}

/// A problem detected while creating or updating a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeIssue {
    pub issue_type: RuntimeIssueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    pub message: String,
}

impl WireModel for RuntimeIssue {
    const NAME: &'static str = "RuntimeIssue";
    const RULES: &'static [FieldRule] = &[FieldRule::OneOf {
        field: "issueType",
        allowed: RuntimeIssueType::TAGS,
    }];
}

/// Body of `POST /v2/workflows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_payload: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_schema: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_translation_enabled: Option<bool>,
    pub workflow_id: String,
    pub steps: Vec<UpsertStep>,
    #[serde(rename = "__source")]
    pub source: WorkflowCreationSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<PreferencesRequestDto>,
}

impl CreateWorkflowDto {
    pub fn new(name: impl Into<String>, workflow_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tags: None,
            active: false,
            validate_payload: None,
            payload_schema: None,
            is_translation_enabled: None,
            workflow_id: workflow_id.into(),
            steps: Vec::new(),
            source: WorkflowCreationSource::Editor,
            preferences: None,
        }
    }

    #[must_use]
    pub fn with_step(mut self, step: UpsertStep) -> Self {
        self.steps.push(step);
        self
    }
}

impl WireModel for CreateWorkflowDto {
    const NAME: &'static str = "CreateWorkflowDto";
    const RULES: &'static [FieldRule] = &[
        FieldRule::Default {
            field: "active",
            value: Fallback::Bool(false),
        },
        FieldRule::Default {
            field: "__source",
            value: Fallback::Str("editor"),
        },
        FieldRule::OneOf {
            field: "__source",
            allowed: WorkflowCreationSource::TAGS,
        },
        FieldRule::NestedEach {
            field: "steps",
            normalize: UpsertStep::normalize,
        },
        FieldRule::Nested {
            field: "preferences",
            normalize: PreferencesRequestDto::normalize,
        },
    ];
}

/// Body of `PUT /v2/workflows/{workflowId}`. Replaces the whole workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_payload: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_schema: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_translation_enabled: Option<bool>,
    /// Only code-first workflows may change their identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    pub steps: Vec<UpsertStep>,
    pub preferences: PreferencesRequestDto,
    pub origin: ResourceOrigin,
}

impl WireModel for UpdateWorkflowDto {
    const NAME: &'static str = "UpdateWorkflowDto";
    const RULES: &'static [FieldRule] = &[
        FieldRule::Default {
            field: "active",
            value: Fallback::Bool(false),
        },
        FieldRule::OneOf {
            field: "origin",
            allowed: ResourceOrigin::TAGS,
        },
        FieldRule::NestedEach {
            field: "steps",
            normalize: UpsertStep::normalize,
        },
        FieldRule::Nested {
            field: "preferences",
            normalize: PreferencesRequestDto::normalize,
        },
    ];
}

/// Body of `PATCH /v2/workflows/{workflowId}`; every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchWorkflowDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_schema: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_payload: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_translation_enabled: Option<bool>,
}

impl WireModel for PatchWorkflowDto {
    const NAME: &'static str = "PatchWorkflowDto";
}

/// Body of `PUT /v2/workflows/{workflowId}/sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncWorkflowDto {
    pub target_environment_id: String,
}

impl WireModel for SyncWorkflowDto {
    const NAME: &'static str = "SyncWorkflowDto";
}

/// Body of `POST /v2/workflows/{workflowId}/duplicate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateWorkflowDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_translation_enabled: Option<bool>,
}

impl WireModel for DuplicateWorkflowDto {
    const NAME: &'static str = "DuplicateWorkflowDto";
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// A workflow as returned by get/create/update/patch/sync/duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponseDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_payload: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_schema: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_translation_enabled: Option<bool>,
    #[serde(rename = "_id")]
    pub id: String,
    pub workflow_id: String,
    pub slug: String,
    pub updated_at: String,
    pub created_at: String,
    pub steps: Vec<ResponseStep>,
    pub origin: ResourceOrigin,
    pub preferences: WorkflowPreferencesResponseDto,
    pub status: WorkflowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<BTreeMap<String, RuntimeIssue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_example: Option<JsonMap>,
}

impl WorkflowResponseDto {
    /// Kinds of the workflow's steps, in order.
    pub fn step_types(&self) -> Vec<StepType> {
        self.steps.iter().map(ResponseStep::step_type).collect()
    }

    /// Workflow-level issues plus the issues of every step.
    pub fn issue_count(&self) -> usize {
        let workflow = self.issues.as_ref().map_or(0, BTreeMap::len);
        let steps: usize = self
            .steps
            .iter()
            .filter_map(ResponseStep::issues)
            .map(super::steps::StepIssues::count)
            .sum();
        workflow + steps
    }

    /// `createdAt` as a UTC timestamp, if it is RFC 3339.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }
}

impl WireModel for WorkflowResponseDto {
    const NAME: &'static str = "WorkflowResponseDto";
    const RULES: &'static [FieldRule] = &[
        FieldRule::Default {
            field: "active",
            value: Fallback::Bool(false),
        },
        FieldRule::OneOf {
            field: "origin",
            allowed: ResourceOrigin::TAGS,
        },
        FieldRule::OneOf {
            field: "status",
            allowed: WorkflowStatus::TAGS,
        },
        FieldRule::NestedEach {
            field: "steps",
            normalize: ResponseStep::normalize,
        },
        FieldRule::Nested {
            field: "preferences",
            normalize: WorkflowPreferencesResponseDto::normalize,
        },
        FieldRule::NestedValues {
            field: "issues",
            normalize: RuntimeIssue::normalize,
        },
    ];
}

/// Summary row of a workflow search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowListResponseDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub updated_at: String,
    pub created_at: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub workflow_id: String,
    pub slug: String,
    pub status: WorkflowStatus,
    pub origin: ResourceOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered_at: Option<String>,
    pub step_type_overviews: Vec<StepType>,
}

impl WorkflowListResponseDto {
    pub fn last_triggered_at_utc(&self) -> Option<DateTime<Utc>> {
        self.last_triggered_at.as_deref().and_then(parse_timestamp)
    }
}

impl WireModel for WorkflowListResponseDto {
    const NAME: &'static str = "WorkflowListResponseDto";
    const RULES: &'static [FieldRule] = &[
        FieldRule::OneOf {
            field: "status",
            allowed: WorkflowStatus::TAGS,
        },
        FieldRule::OneOf {
            field: "origin",
            allowed: ResourceOrigin::TAGS,
        },
        FieldRule::EachOneOf {
            field: "stepTypeOverviews",
            allowed: StepType::TAGS,
        },
    ];
}

/// Body returned by `GET /v2/workflows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkflowResponse {
    pub workflows: Vec<WorkflowListResponseDto>,
    #[serde(with = "number")]
    pub total_count: f64,
}

impl WireModel for ListWorkflowResponse {
    const NAME: &'static str = "ListWorkflowResponse";
    const RULES: &'static [FieldRule] = &[FieldRule::NestedEach {
        field: "workflows",
        normalize: WorkflowListResponseDto::normalize,
    }];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use serde_json::json;

    #[test]
    fn test_create_fills_workflow_defaults() {
        let dto = CreateWorkflowDto::decode_value(json!({
            "name": "Onboarding",
            "workflowId": "onboarding",
            "steps": []
        }))
        .unwrap();
        assert_eq!(dto, CreateWorkflowDto::new("Onboarding", "onboarding"));
        assert_eq!(
            dto.encode_value().unwrap(),
            json!({
                "name": "Onboarding",
                "active": false,
                "workflowId": "onboarding",
                "steps": [],
                "__source": "editor"
            })
        );
    }

    #[test]
    fn test_preferences_defaults_nest() {
        let prefs = PreferencesRequestDto::decode_value(json!({
            "workflow": { "all": {}, "channels": { "email": {}, "sms": { "enabled": false } } }
        }))
        .unwrap();
        let workflow = prefs.workflow.unwrap();
        assert_eq!(workflow.all, WorkflowPreference::default());
        assert!(workflow.channels["email"].enabled);
        assert!(!workflow.channels["sms"].enabled);
    }

    #[test]
    fn test_update_rejects_unknown_origin() {
        let err = UpdateWorkflowDto::decode_value(json!({
            "name": "n",
            "steps": [],
            "preferences": {},
            "origin": "mars"
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidEnumValue { ref field, .. } if field == "origin"
        ));
    }

    #[test]
    fn test_list_rejects_unknown_step_overview() {
        let err = ListWorkflowResponse::decode_value(json!({
            "workflows": [{
                "name": "n",
                "updatedAt": "2025-01-01T00:00:00Z",
                "createdAt": "2025-01-01T00:00:00Z",
                "_id": "wf_1",
                "workflowId": "n",
                "slug": "n_wf_1",
                "status": "ACTIVE",
                "origin": "external",
                "stepTypeOverviews": ["email", "fax"]
            }],
            "totalCount": 1
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidEnumValue { ref field, ref value }
                if field == "workflows[0].stepTypeOverviews" && value == "fax"
        ));
    }

    #[test]
    fn test_list_timestamps_parse() {
        let row = WorkflowListResponseDto::decode_value(json!({
            "name": "n",
            "updatedAt": "2025-01-01T00:00:00Z",
            "createdAt": "2025-01-01T00:00:00Z",
            "_id": "wf_1",
            "workflowId": "n",
            "slug": "n_wf_1",
            "status": "INACTIVE",
            "origin": "novu-cloud",
            "lastTriggeredAt": "2025-03-04T05:06:07.000Z",
            "stepTypeOverviews": []
        }))
        .unwrap();
        let ts = row.last_triggered_at_utc().unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-03-04T05:06:07+00:00");
    }
}
