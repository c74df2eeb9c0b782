//! Wire-model domain types.
//!
//! # Structure
//!
//! - `enums` - closed string enumerations (`StepType`, `TimeUnit`, ...)
//! - `controls` - per-kind step control values
//! - `steps` - the step union and its upsert/response record families
//! - `workflow` - workflow requests, responses and preferences

pub mod controls;
mod enums;
pub mod steps;
pub mod workflow;

pub use enums::{
    ContentIssueType, DelayType, DigestType, EditorType, IntegrationIssueType, RedirectTarget,
    ResourceOrigin, RuntimeIssueType, SortDirection, StepType, TimeUnit, WorkflowCreationSource,
    WorkflowSortField, WorkflowStatus,
};

pub use controls::{
    ActionDto, ChatControlValues, CustomControlValues, DelayControlValues, DigestControlValues,
    EmailControlValues, InAppControlValues, LookBackWindow, PushControlValues, RedirectDto,
    SmsControlValues,
};

pub use steps::{
    ControlValues, ResponseStep, StepFamily, StepIssues, StepRecord, StepResponseDto, StepSlots,
    StepUpsertDto, TaggedStep, UpsertStep,
};

pub use workflow::{
    ChannelPreference, CreateWorkflowDto, DuplicateWorkflowDto, ListWorkflowResponse,
    PatchWorkflowDto, PreferencesRequestDto, RuntimeIssue, SyncWorkflowDto, UpdateWorkflowDto,
    WorkflowListResponseDto, WorkflowPreference, WorkflowPreferences,
    WorkflowPreferencesResponseDto, WorkflowResponseDto,
};
