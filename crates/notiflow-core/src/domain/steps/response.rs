//! Step records returned by the API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ControlValues, StepFamily, StepRecord, TaggedStep};
use crate::codec::{FieldRule, JsonMap, WireModel, normalize_each};
use crate::domain::controls::{
    ChatControlValues, CustomControlValues, DelayControlValues, DigestControlValues,
    EmailControlValues, InAppControlValues, PushControlValues, SmsControlValues,
};
use crate::domain::enums::{ContentIssueType, IntegrationIssueType, ResourceOrigin, StepType};

/// JSON schema and UI hints describing a step's controls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_schema: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_schema: Option<JsonMap>,
    /// Current control values; always emitted, `{}` when absent on input.
    #[serde(default)]
    pub values: JsonMap,
}

impl WireModel for ControlsMetadata {
    const NAME: &'static str = "ControlsMetadata";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIssue {
    pub issue_type: ContentIssueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    pub message: String,
}

impl WireModel for ContentIssue {
    const NAME: &'static str = "ContentIssue";
    const RULES: &'static [FieldRule] = &[FieldRule::OneOf {
        field: "issueType",
        allowed: ContentIssueType::TAGS,
    }];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationIssue {
    pub issue_type: IntegrationIssueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    pub message: String,
}

impl WireModel for IntegrationIssue {
    const NAME: &'static str = "IntegrationIssue";
    const RULES: &'static [FieldRule] = &[FieldRule::OneOf {
        field: "issueType",
        allowed: IntegrationIssueType::TAGS,
    }];
}

/// Problems found on a step, keyed by control name or integration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepIssues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<BTreeMap<String, Vec<ContentIssue>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<BTreeMap<String, Vec<IntegrationIssue>>>,
}

impl StepIssues {
    pub fn is_empty(&self) -> bool {
        self.controls.as_ref().is_none_or(BTreeMap::is_empty)
            && self.integration.as_ref().is_none_or(BTreeMap::is_empty)
    }

    /// Total number of issues across every control and integration.
    pub fn count(&self) -> usize {
        let controls: usize = self.controls.iter().flatten().map(|(_, v)| v.len()).sum();
        let integration: usize = self.integration.iter().flatten().map(|(_, v)| v.len()).sum();
        controls + integration
    }
}

impl WireModel for StepIssues {
    const NAME: &'static str = "StepIssues";
    const RULES: &'static [FieldRule] = &[
        FieldRule::NestedValues {
            field: "controls",
            normalize: normalize_each::<ContentIssue>,
        },
        FieldRule::NestedValues {
            field: "integration",
            normalize: normalize_each::<IntegrationIssue>,
        },
    ];
}

/// A step as stored by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound = "C: Serialize + serde::de::DeserializeOwned"
)]
pub struct StepResponseDto<C> {
    pub controls: ControlsMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_values: Option<C>,
    /// JSON schema of the variables available to the step's templates.
    pub variables: JsonMap,
    pub step_id: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub origin: ResourceOrigin,
    pub workflow_id: String,
    pub workflow_database_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<StepIssues>,
}

impl<C: ControlValues> WireModel for StepResponseDto<C> {
    const NAME: &'static str = "StepResponseDto";
    const RULES: &'static [FieldRule] = &[
        FieldRule::OneOf {
            field: "type",
            allowed: StepType::TAGS,
        },
        FieldRule::OneOf {
            field: "origin",
            allowed: ResourceOrigin::TAGS,
        },
        FieldRule::Nested {
            field: "controlValues",
            normalize: C::normalize,
        },
        FieldRule::Nested {
            field: "issues",
            normalize: StepIssues::normalize,
        },
    ];
}

impl<C: ControlValues> StepRecord for StepResponseDto<C> {
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

/// Family marker for API-returned steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response;

impl StepFamily for Response {
    const UNION: &'static str = "StepResponse";
    type Record<C: ControlValues> = StepResponseDto<C>;
}

pub type ResponseStep = TaggedStep<Response>;

impl ResponseStep {
    pub fn step_id(&self) -> &str {
        each_variant!(self, record => &record.step_id)
    }

    pub fn issues(&self) -> Option<&StepIssues> {
        each_variant!(self, record => record.issues.as_ref())
    }
}

pub type InAppStepResponseDto = StepResponseDto<InAppControlValues>;
pub type EmailStepResponseDto = StepResponseDto<EmailControlValues>;
pub type SmsStepResponseDto = StepResponseDto<SmsControlValues>;
pub type PushStepResponseDto = StepResponseDto<PushControlValues>;
pub type ChatStepResponseDto = StepResponseDto<ChatControlValues>;
pub type DelayStepResponseDto = StepResponseDto<DelayControlValues>;
pub type DigestStepResponseDto = StepResponseDto<DigestControlValues>;
pub type CustomStepResponseDto = StepResponseDto<CustomControlValues>;
