//! Request/response envelopes for the API operations.
//!
//! Each operation is a static [`Operation`] descriptor. A single generic
//! [`OperationRequest`] renders any of them into a method, URL, header list
//! and JSON body; [`OperationResponse`] decodes what came back. Nothing in
//! this module performs I/O.

pub mod subscribers;
pub mod workflows;

use std::borrow::Cow;
use std::collections::BTreeMap;

use http::{HeaderMap, Method, StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::codec::{CodecError, JsonMap, WireModel, number};
use crate::security::{Security, SecurityError};
use crate::settings::SdkSettings;

pub use subscribers::{
    DELETE_SUBSCRIBER_CREDENTIALS, GET_TOPIC_SUBSCRIBER, MARK_ACTION_AS_SEEN, SubscriberCredentialsPath,
    SubscriberMessageActionPath, TopicSubscriberPath,
};
pub use workflows::{
    CREATE_WORKFLOW, DELETE_WORKFLOW, DUPLICATE_WORKFLOW, GET_WORKFLOW, PATCH_WORKFLOW,
    SEARCH_WORKFLOWS, SYNC_WORKFLOW, SearchWorkflowsQuery, UPDATE_WORKFLOW, WorkflowPath,
};

/// Request bodies are always JSON.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Name of the idempotency header accepted by every operation.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
}

/// OpenAPI serialization style of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    Simple,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub location: ParamLocation,
    pub style: ParamStyle,
    /// For arrays: repeat `name=value` per element instead of joining with commas.
    pub explode: bool,
    pub required: bool,
}

impl ParamSpec {
    pub const fn path(name: &'static str) -> Self {
        Self {
            name,
            location: ParamLocation::Path,
            style: ParamStyle::Simple,
            explode: false,
            required: true,
        }
    }

    pub const fn query(name: &'static str) -> Self {
        Self {
            name,
            location: ParamLocation::Query,
            style: ParamStyle::Form,
            explode: true,
            required: false,
        }
    }

    pub const fn header(name: &'static str) -> Self {
        Self {
            name,
            location: ParamLocation::Header,
            style: ParamStyle::Simple,
            explode: false,
            required: false,
        }
    }
}

/// Static description of one API operation.
#[derive(Debug)]
pub struct Operation {
    pub id: &'static str,
    pub method: Method,
    /// Path template with `{name}` placeholders.
    pub path: &'static str,
    pub params: &'static [ParamSpec],
    /// Media type of the request body; `None` for operations without one.
    pub request_media_type: Option<&'static str>,
    pub success_status: StatusCode,
    pub summary: &'static str,
}

/// Every described operation, in catalog order.
pub static CATALOG: &[&Operation] = &[
    &CREATE_WORKFLOW,
    &SEARCH_WORKFLOWS,
    &GET_WORKFLOW,
    &UPDATE_WORKFLOW,
    &PATCH_WORKFLOW,
    &DELETE_WORKFLOW,
    &SYNC_WORKFLOW,
    &DUPLICATE_WORKFLOW,
    &MARK_ACTION_AS_SEEN,
    &GET_TOPIC_SUBSCRIBER,
    &DELETE_SUBSCRIBER_CREDENTIALS,
];

/// Look up an operation by its id.
pub fn find(id: &str) -> Option<&'static Operation> {
    CATALOG.iter().copied().find(|op| op.id == id)
}

impl Operation {
    pub fn params_in(&self, location: ParamLocation) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(move |p| p.location == location)
    }

    /// Substitute path parameters into the template, percent-encoding each
    /// value.
    pub fn render_path(&self, params: &impl PathParams) -> Result<String, OperationError> {
        let mut rendered = String::with_capacity(self.path.len());
        let mut rest = self.path;

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                break;
            };
            let name = &rest[open + 1..close];
            let value = params
                .path_param(name)
                .ok_or_else(|| OperationError::MissingPathParam {
                    operation: self.id,
                    name: name.to_string(),
                })?;

            rendered.push_str(&rest[..open]);
            rendered.push_str(&urlencoding::encode(&value));
            rest = &rest[close + 1..];
        }
        rendered.push_str(rest);
        Ok(rendered)
    }

    /// Render query pairs in form style. Arrays follow the parameter's
    /// `explode` flag; undeclared names are exploded.
    pub fn render_query(&self, params: &impl QueryParams) -> String {
        let mut parts = Vec::new();
        for (name, value) in params.query_pairs() {
            let explode = self
                .params_in(ParamLocation::Query)
                .find(|p| p.name == name)
                .is_none_or(|p| p.explode);
            let key = urlencoding::encode(&name);

            match value {
                QueryValue::One(v) => parts.push(format!("{key}={}", urlencoding::encode(&v))),
                QueryValue::Many(values) if values.is_empty() => {}
                QueryValue::Many(values) if explode => {
                    for v in values {
                        parts.push(format!("{key}={}", urlencoding::encode(&v)));
                    }
                }
                QueryValue::Many(values) => {
                    let joined: Vec<_> = values.iter().map(|v| urlencoding::encode(v)).collect();
                    parts.push(format!("{key}={}", joined.join(",")));
                }
            }
        }
        parts.join("&")
    }

    pub const fn has_body(&self) -> bool {
        self.request_media_type.is_some()
    }
}

/// Values for an operation's path placeholders.
pub trait PathParams {
    fn path_param(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl PathParams for () {
    fn path_param(&self, _name: &str) -> Option<Cow<'_, str>> {
        None
    }
}

impl PathParams for BTreeMap<String, String> {
    fn path_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

/// Query parameters of a request, in emission order.
pub trait QueryParams {
    fn query_pairs(&self) -> Vec<(String, QueryValue)>;
}

impl QueryParams for () {
    fn query_pairs(&self) -> Vec<(String, QueryValue)> {
        Vec::new()
    }
}

impl QueryParams for BTreeMap<String, Vec<String>> {
    fn query_pairs(&self) -> Vec<(String, QueryValue)> {
        self.iter()
            .map(|(name, values)| {
                let value = match values.as_slice() {
                    [single] => QueryValue::One(single.clone()),
                    _ => QueryValue::Many(values.clone()),
                };
                (name.clone(), value)
            })
            .collect()
    }
}

/// Error body returned by the API for non-success statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDto {
    #[serde(with = "number")]
    pub status_code: f64,
    pub timestamp: String,
    pub path: String,
    /// Free-form: a string, an object, or a list of validation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctx: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_id: Option<String>,
}

impl WireModel for ErrorDto {
    const NAME: &'static str = "ErrorDto";
}

impl ErrorDto {
    /// Human-readable message, if any.
    pub fn message_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("{operation}: missing path parameter `{name}`")]
    MissingPathParam {
        operation: &'static str,
        name: String,
    },

    #[error("{operation} requires a request body")]
    MissingBody { operation: &'static str },

    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error("{operation} failed with HTTP {status}: {}", .error.message_text().unwrap_or_default())]
    Api {
        operation: &'static str,
        status: StatusCode,
        error: Box<ErrorDto>,
    },

    #[error("{operation} returned unexpected HTTP {status}")]
    UnexpectedStatus {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("invalid HTTP request: {0}")]
    Http(#[from] http::Error),
}

/// A request for one operation: path parameters `P`, body `B`, query `Q`.
#[derive(Debug, Clone)]
pub struct OperationRequest<P, B = Value, Q = ()> {
    pub operation: &'static Operation,
    pub path: P,
    pub query: Q,
    pub idempotency_key: Option<String>,
    pub body: Option<B>,
}

impl<P: PathParams, B: WireModel, Q: QueryParams + Default> OperationRequest<P, B, Q> {
    pub fn new(operation: &'static Operation, path: P) -> Self {
        Self {
            operation,
            path,
            query: Q::default(),
            idempotency_key: None,
            body: None,
        }
    }
}

impl<P: PathParams, B: WireModel, Q: QueryParams> OperationRequest<P, B, Q> {
    #[must_use]
    pub fn with_query(mut self, query: Q) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn render_path(&self) -> Result<String, OperationError> {
        self.operation.render_path(&self.path)
    }

    pub fn query_string(&self) -> String {
        self.operation.render_query(&self.query)
    }

    /// Absolute URL against the configured server.
    pub fn url(&self, settings: &SdkSettings) -> Result<String, OperationError> {
        let mut url = format!("{}{}", settings.effective_server_url(), self.render_path()?);
        let query = self.query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }

    /// Headers to send, `Authorization` included when configured.
    pub fn header_pairs(&self, security: &Security) -> Result<Vec<(String, String)>, OperationError> {
        let mut headers = vec![(header::ACCEPT.as_str().to_string(), JSON_MEDIA_TYPE.to_string())];
        if let (Some(media_type), Some(_)) = (self.operation.request_media_type, &self.body) {
            headers.push((header::CONTENT_TYPE.as_str().to_string(), media_type.to_string()));
        }
        if let Some(key) = &self.idempotency_key {
            headers.push((IDEMPOTENCY_KEY_HEADER.to_string(), key.clone()));
        }
        if let Some((name, value)) = security.authorization_header()? {
            headers.push((name.to_string(), value));
        }
        Ok(headers)
    }

    /// Encoded JSON body. Operations that take a body require one.
    pub fn body_bytes(&self) -> Result<Option<Vec<u8>>, OperationError> {
        match (&self.body, self.operation.has_body()) {
            (Some(body), _) => Ok(Some(body.encode()?)),
            (None, true) => Err(OperationError::MissingBody {
                operation: self.operation.id,
            }),
            (None, false) => Ok(None),
        }
    }

    /// Assemble an `http::Request` ready for any HTTP client.
    pub fn to_http(&self, settings: &SdkSettings) -> Result<http::Request<Vec<u8>>, OperationError> {
        let url = self.url(settings)?;
        let body = self.body_bytes()?.unwrap_or_default();

        let mut builder = http::Request::builder()
            .method(self.operation.method.clone())
            .uri(&url);
        for (name, value) in self.header_pairs(&settings.security())? {
            builder = builder.header(name, value);
        }

        debug!(operation = self.operation.id, %url, body_len = body.len(), "Rendered request");
        Ok(builder.body(body)?)
    }
}

/// Transport-level facts about an exchange, kept on every response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMetadata {
    pub status: StatusCode,
    pub method: Method,
    pub url: String,
    /// Headers that were sent, with `Authorization` redacted.
    pub request_headers: Vec<(String, String)>,
}

impl HttpMetadata {
    /// Metadata for a request rendered by [`OperationRequest::to_http`].
    pub fn for_request<T>(request: &http::Request<T>, status: StatusCode) -> Self {
        let request_headers = request
            .headers()
            .iter()
            .map(|(name, value)| {
                let shown = if *name == header::AUTHORIZATION {
                    "<redacted>".to_string()
                } else {
                    String::from_utf8_lossy(value.as_bytes()).into_owned()
                };
                (name.as_str().to_string(), shown)
            })
            .collect();

        Self {
            status,
            method: request.method().clone(),
            url: request.uri().to_string(),
            request_headers,
        }
    }
}

/// Group response headers by name, preserving repeated values.
pub fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        grouped
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    grouped
}

/// Decoded response of an operation.
#[derive(Debug, Clone)]
pub struct OperationResponse<B> {
    pub http_meta: HttpMetadata,
    pub headers: BTreeMap<String, Vec<String>>,
    /// `None` for empty bodies (e.g. `204 No Content`).
    pub body: Option<B>,
}

impl<B: WireModel> OperationResponse<B> {
    /// Build from raw parts. Non-success statuses decode the API's
    /// [`ErrorDto`] into [`OperationError::Api`].
    pub fn from_parts(
        operation: &Operation,
        http_meta: HttpMetadata,
        headers: BTreeMap<String, Vec<String>>,
        body: &[u8],
    ) -> Result<Self, OperationError> {
        let status = http_meta.status;

        if !status.is_success() {
            return Err(match ErrorDto::decode(body) {
                Ok(error) => OperationError::Api {
                    operation: operation.id,
                    status,
                    error: Box::new(error),
                },
                Err(_) => OperationError::UnexpectedStatus {
                    operation: operation.id,
                    status,
                    body: String::from_utf8_lossy(body).into_owned(),
                },
            });
        }

        if status != operation.success_status {
            debug!(
                operation = operation.id,
                expected = %operation.success_status,
                %status,
                "Success status differs from the documented one"
            );
        }

        let body = if status == StatusCode::NO_CONTENT || body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(B::decode(body)?)
        };

        Ok(Self {
            http_meta,
            headers,
            body,
        })
    }

    /// Convenience wrapper over [`from_parts`](Self::from_parts) for an
    /// `http::Response`.
    pub fn from_http(
        operation: &Operation,
        request: &http::Request<Vec<u8>>,
        response: &http::Response<Vec<u8>>,
    ) -> Result<Self, OperationError> {
        Self::from_parts(
            operation,
            HttpMetadata::for_request(request, response.status()),
            collect_headers(response.headers()),
            response.body(),
        )
    }

    /// Header values by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateWorkflowDto, ListWorkflowResponse, WorkflowResponseDto};
    use serde_json::json;

    fn settings() -> SdkSettings {
        SdkSettings {
            server_url: Some("https://api.example.test/".to_string()),
            api_key: Some("sk_test".to_string()),
            ..SdkSettings::default()
        }
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<_> = CATALOG.iter().map(|op| op.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CATALOG.len());
        assert!(find("WorkflowController_create").is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_path_is_percent_encoded() {
        let path = WorkflowPath::new("welcome flow/v2");
        assert_eq!(
            GET_WORKFLOW.render_path(&path).unwrap(),
            "/v2/workflows/welcome%20flow%2Fv2"
        );
    }

    #[test]
    fn test_missing_path_param() {
        let err = SYNC_WORKFLOW.render_path(&()).unwrap_err();
        assert!(matches!(
            err,
            OperationError::MissingPathParam { ref name, .. } if name == "workflowId"
        ));
    }

    #[test]
    fn test_query_explodes_arrays() {
        let query = SearchWorkflowsQuery {
            limit: Some(10),
            tags: vec!["a b".to_string(), "c".to_string()],
            ..SearchWorkflowsQuery::default()
        };
        let request = workflows::search(query);
        assert_eq!(request.query_string(), "limit=10&tags=a%20b&tags=c");
    }

    #[test]
    fn test_untyped_query_map() {
        let mut query: BTreeMap<String, Vec<String>> = BTreeMap::new();
        query.insert("status".into(), vec!["ACTIVE".into(), "ERROR".into()]);
        query.insert("query".into(), vec!["x".into()]);
        assert_eq!(
            SEARCH_WORKFLOWS.render_query(&query),
            "query=x&status=ACTIVE&status=ERROR"
        );
    }

    #[test]
    fn test_create_renders_full_request() {
        let request = workflows::create(CreateWorkflowDto::new("Onboarding", "onboarding"))
            .with_idempotency_key("req-1");
        let http_request = request.to_http(&settings()).unwrap();

        assert_eq!(http_request.method(), Method::POST);
        assert_eq!(
            http_request.uri().to_string(),
            "https://api.example.test/v2/workflows"
        );
        assert_eq!(http_request.headers()["authorization"], "ApiKey sk_test");
        assert_eq!(http_request.headers()["idempotency-key"], "req-1");
        assert_eq!(http_request.headers()["content-type"], JSON_MEDIA_TYPE);

        let body: Value = serde_json::from_slice(http_request.body()).unwrap();
        assert_eq!(body["workflowId"], "onboarding");
    }

    #[test]
    fn test_body_is_required_when_declared() {
        let request: OperationRequest<WorkflowPath, crate::domain::SyncWorkflowDto> =
            OperationRequest::new(&SYNC_WORKFLOW, WorkflowPath::new("wf"));
        assert!(matches!(
            request.body_bytes(),
            Err(OperationError::MissingBody { .. })
        ));
    }

    #[test]
    fn test_conflicting_credentials_fail_rendering() {
        let mut settings = settings();
        settings.bearer_token = Some("t".into());
        let err = workflows::get("wf").to_http(&settings).unwrap_err();
        assert!(matches!(err, OperationError::Security(SecurityError::Conflicting)));
    }

    #[test]
    fn test_response_decodes_body_and_keeps_metadata() {
        let request = workflows::search(SearchWorkflowsQuery::default())
            .to_http(&settings())
            .unwrap();
        let response = http::Response::builder()
            .status(200)
            .header("x-request-id", "r1")
            .header("set-cookie", "a=1")
            .header("set-cookie", "b=2")
            .body(
                serde_json::to_vec(&json!({ "workflows": [], "totalCount": 0 })).unwrap(),
            )
            .unwrap();

        let decoded: OperationResponse<ListWorkflowResponse> =
            OperationResponse::from_http(&SEARCH_WORKFLOWS, &request, &response).unwrap();
        assert_eq!(decoded.body.as_ref().unwrap().total_count, 0.0);
        assert_eq!(decoded.header("X-Request-Id"), Some(&["r1".to_string()][..]));
        assert_eq!(decoded.headers["set-cookie"].len(), 2);
        assert_eq!(decoded.http_meta.method, Method::GET);
        assert!(
            decoded
                .http_meta
                .request_headers
                .iter()
                .any(|(name, value)| name == "authorization" && value == "<redacted>")
        );
    }

    #[test]
    fn test_no_content_has_no_body() {
        let meta = HttpMetadata {
            status: StatusCode::NO_CONTENT,
            method: Method::DELETE,
            url: "https://api.example.test/v2/workflows/wf".into(),
            request_headers: Vec::new(),
        };
        let response: OperationResponse<Value> =
            OperationResponse::from_parts(&DELETE_WORKFLOW, meta, BTreeMap::new(), b"").unwrap();
        assert!(response.body.is_none());
    }

    #[test]
    fn test_error_status_decodes_error_dto() {
        let meta = HttpMetadata {
            status: StatusCode::NOT_FOUND,
            method: Method::GET,
            url: "https://api.example.test/v2/workflows/wf".into(),
            request_headers: Vec::new(),
        };
        let body = json!({
            "statusCode": 404,
            "timestamp": "2025-01-01T00:00:00Z",
            "path": "/v2/workflows/wf",
            "message": "Workflow not found"
        })
        .to_string();

        let err = OperationResponse::<WorkflowResponseDto>::from_parts(
            &GET_WORKFLOW,
            meta.clone(),
            BTreeMap::new(),
            body.as_bytes(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "WorkflowController_getWorkflow failed with HTTP 404 Not Found: Workflow not found"
        );

        let err = OperationResponse::<WorkflowResponseDto>::from_parts(
            &GET_WORKFLOW,
            meta,
            BTreeMap::new(),
            b"<html>",
        )
        .unwrap_err();
        assert!(matches!(err, OperationError::UnexpectedStatus { .. }));
    }
}
