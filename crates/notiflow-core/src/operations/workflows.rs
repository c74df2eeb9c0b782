//! `/v2/workflows` operations.

use std::borrow::Cow;

use http::{Method, StatusCode};
use serde_json::Value;

use super::{
    JSON_MEDIA_TYPE, Operation, OperationRequest, ParamSpec, PathParams, QueryParams, QueryValue,
};
use crate::domain::{
    CreateWorkflowDto, DuplicateWorkflowDto, PatchWorkflowDto, SortDirection, SyncWorkflowDto,
    UpdateWorkflowDto, WorkflowSortField, WorkflowStatus,
};

const IDEMPOTENCY_KEY: ParamSpec = ParamSpec::header(super::IDEMPOTENCY_KEY_HEADER);
const WORKFLOW_ID: ParamSpec = ParamSpec::path("workflowId");

const WORKFLOW_PARAMS: &[ParamSpec] = &[WORKFLOW_ID, IDEMPOTENCY_KEY];

pub static CREATE_WORKFLOW: Operation = Operation {
    id: "WorkflowController_create",
    method: Method::POST,
    path: "/v2/workflows",
    params: &[IDEMPOTENCY_KEY],
    request_media_type: Some(JSON_MEDIA_TYPE),
    success_status: StatusCode::CREATED,
    summary: "Create a workflow",
};

pub static SEARCH_WORKFLOWS: Operation = Operation {
    id: "WorkflowController_searchWorkflows",
    method: Method::GET,
    path: "/v2/workflows",
    params: &[
        ParamSpec::query("limit"),
        ParamSpec::query("offset"),
        ParamSpec::query("orderDirection"),
        ParamSpec::query("orderBy"),
        ParamSpec::query("query"),
        ParamSpec::query("tags"),
        ParamSpec::query("status"),
        IDEMPOTENCY_KEY,
    ],
    request_media_type: None,
    success_status: StatusCode::OK,
    summary: "List workflows",
};

pub static GET_WORKFLOW: Operation = Operation {
    id: "WorkflowController_getWorkflow",
    method: Method::GET,
    path: "/v2/workflows/{workflowId}",
    params: WORKFLOW_PARAMS,
    request_media_type: None,
    success_status: StatusCode::OK,
    summary: "Retrieve a workflow",
};

pub static UPDATE_WORKFLOW: Operation = Operation {
    id: "WorkflowController_update",
    method: Method::PUT,
    path: "/v2/workflows/{workflowId}",
    params: WORKFLOW_PARAMS,
    request_media_type: Some(JSON_MEDIA_TYPE),
    success_status: StatusCode::OK,
    summary: "Update a workflow",
};

pub static PATCH_WORKFLOW: Operation = Operation {
    id: "WorkflowController_patchWorkflow",
    method: Method::PATCH,
    path: "/v2/workflows/{workflowId}",
    params: WORKFLOW_PARAMS,
    request_media_type: Some(JSON_MEDIA_TYPE),
    success_status: StatusCode::OK,
    summary: "Patch a workflow",
};

pub static DELETE_WORKFLOW: Operation = Operation {
    id: "WorkflowController_removeWorkflow",
    method: Method::DELETE,
    path: "/v2/workflows/{workflowId}",
    params: WORKFLOW_PARAMS,
    request_media_type: None,
    success_status: StatusCode::NO_CONTENT,
    summary: "Delete a workflow",
};

pub static SYNC_WORKFLOW: Operation = Operation {
    id: "WorkflowController_sync",
    method: Method::PUT,
    path: "/v2/workflows/{workflowId}/sync",
    params: WORKFLOW_PARAMS,
    request_media_type: Some(JSON_MEDIA_TYPE),
    success_status: StatusCode::OK,
    summary: "Sync a workflow to another environment",
};

pub static DUPLICATE_WORKFLOW: Operation = Operation {
    id: "WorkflowController_duplicateWorkflow",
    method: Method::POST,
    path: "/v2/workflows/{workflowId}/duplicate",
    params: WORKFLOW_PARAMS,
    request_media_type: Some(JSON_MEDIA_TYPE),
    success_status: StatusCode::CREATED,
    summary: "Duplicate a workflow",
};

/// Path of the single-workflow operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowPath {
    /// Workflow identifier or database id.
    pub workflow_id: String,
}

impl WorkflowPath {
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
        }
    }
}

impl PathParams for WorkflowPath {
    fn path_param(&self, name: &str) -> Option<Cow<'_, str>> {
        (name == "workflowId").then(|| Cow::Borrowed(self.workflow_id.as_str()))
    }
}

/// Query of `GET /v2/workflows`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchWorkflowsQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_direction: Option<SortDirection>,
    pub order_by: Option<WorkflowSortField>,
    /// Free-text search over name and identifier.
    pub query: Option<String>,
    pub tags: Vec<String>,
    pub status: Vec<WorkflowStatus>,
}

impl QueryParams for SearchWorkflowsQuery {
    fn query_pairs(&self) -> Vec<(String, QueryValue)> {
        let one = |name: &str, value: String| (name.to_string(), QueryValue::One(value));
        let mut pairs = Vec::new();

        if let Some(limit) = self.limit {
            pairs.push(one("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(one("offset", offset.to_string()));
        }
        if let Some(direction) = self.order_direction {
            pairs.push(one("orderDirection", direction.to_string()));
        }
        if let Some(field) = self.order_by {
            pairs.push(one("orderBy", field.to_string()));
        }
        if let Some(query) = &self.query {
            pairs.push(one("query", query.clone()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags".to_string(), QueryValue::Many(self.tags.clone())));
        }
        if !self.status.is_empty() {
            let status = self.status.iter().map(ToString::to_string).collect();
            pairs.push(("status".to_string(), QueryValue::Many(status)));
        }
        pairs
    }
}

pub fn create(body: CreateWorkflowDto) -> OperationRequest<(), CreateWorkflowDto> {
    OperationRequest::new(&CREATE_WORKFLOW, ()).with_body(body)
}

pub fn search(query: SearchWorkflowsQuery) -> OperationRequest<(), Value, SearchWorkflowsQuery> {
    OperationRequest::new(&SEARCH_WORKFLOWS, ()).with_query(query)
}

pub fn get(workflow_id: impl Into<String>) -> OperationRequest<WorkflowPath> {
    OperationRequest::new(&GET_WORKFLOW, WorkflowPath::new(workflow_id))
}

pub fn update(
    workflow_id: impl Into<String>,
    body: UpdateWorkflowDto,
) -> OperationRequest<WorkflowPath, UpdateWorkflowDto> {
    OperationRequest::new(&UPDATE_WORKFLOW, WorkflowPath::new(workflow_id)).with_body(body)
}

pub fn patch(
    workflow_id: impl Into<String>,
    body: PatchWorkflowDto,
) -> OperationRequest<WorkflowPath, PatchWorkflowDto> {
    OperationRequest::new(&PATCH_WORKFLOW, WorkflowPath::new(workflow_id)).with_body(body)
}

pub fn delete(workflow_id: impl Into<String>) -> OperationRequest<WorkflowPath> {
    OperationRequest::new(&DELETE_WORKFLOW, WorkflowPath::new(workflow_id))
}

pub fn sync(
    workflow_id: impl Into<String>,
    body: SyncWorkflowDto,
) -> OperationRequest<WorkflowPath, SyncWorkflowDto> {
    OperationRequest::new(&SYNC_WORKFLOW, WorkflowPath::new(workflow_id)).with_body(body)
}

pub fn duplicate(
    workflow_id: impl Into<String>,
    body: DuplicateWorkflowDto,
) -> OperationRequest<WorkflowPath, DuplicateWorkflowDto> {
    OperationRequest::new(&DUPLICATE_WORKFLOW, WorkflowPath::new(workflow_id)).with_body(body)
}
