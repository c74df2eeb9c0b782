#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod codec;
pub mod domain;
pub mod operations;
pub mod security;
pub mod settings;

// Re-export commonly used types for convenience
pub use codec::{CodecError, JsonMap, WireModel};
pub use domain::{
    ControlValues, CreateWorkflowDto, ListWorkflowResponse, PatchWorkflowDto, ResponseStep,
    StepFamily, StepSlots, StepType, SyncWorkflowDto, TaggedStep, UpdateWorkflowDto, UpsertStep,
    WorkflowListResponseDto, WorkflowResponseDto,
};
pub use operations::{
    CATALOG, HttpMetadata, Operation, OperationError, OperationRequest, OperationResponse,
};
pub use security::{Credential, Security, SecurityError};
pub use settings::{
    DEFAULT_SERVER_URL, SdkSettings, SettingsError, SettingsUpdate, validate_settings,
};
