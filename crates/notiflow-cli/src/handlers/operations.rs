//! `operations`: list the catalog or render one request without sending it.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use http::StatusCode;
use notiflow_core::operations::{ParamLocation, find};
use notiflow_core::{CATALOG, HttpMetadata, OperationError, OperationRequest, WireModel};
use serde_json::Value;
use tracing::warn;

use crate::bootstrap::CliConfig;
use crate::error::CliError;
use crate::presentation::{render_json, separator};

/// Inputs for [`render`], borrowed from the parsed command line.
#[derive(Debug, Clone, Copy)]
pub struct RenderArgs<'a> {
    pub id: &'a str,
    pub params: &'a [(String, String)],
    pub query: &'a [(String, String)],
    pub idempotency_key: Option<&'a str>,
    /// Raw JSON request body.
    pub body: Option<&'a [u8]>,
}

/// One line per operation: id, method, path and summary.
pub fn list_catalog() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<44} {:<7} {:<52} SUMMARY", "ID", "METHOD", "PATH");
    let _ = writeln!(out, "{}", separator(120));
    for operation in CATALOG {
        let _ = writeln!(
            out,
            "{:<44} {:<7} {:<52} {}",
            operation.id,
            operation.method.as_str(),
            operation.path,
            operation.summary
        );
    }
    out
}

/// Render the request line, headers (credential redacted) and body.
pub fn render(args: &RenderArgs<'_>, config: &CliConfig, compact: bool) -> Result<String, CliError> {
    let operation =
        find(args.id).ok_or_else(|| OperationError::UnknownOperation(args.id.to_string()))?;

    for (name, _) in args.params {
        if !operation.params_in(ParamLocation::Path).any(|p| p.name == name) {
            warn!(operation = operation.id, param = %name, "Ignoring undeclared path parameter");
        }
    }

    let path: BTreeMap<String, String> = args.params.iter().cloned().collect();
    let mut query: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in args.query {
        query.entry(name.clone()).or_default().push(value.clone());
    }

    let mut request: OperationRequest<_, Value, _> =
        OperationRequest::new(operation, path).with_query(query);
    if let Some(key) = args.idempotency_key {
        request = request.with_idempotency_key(config.settings.idempotency_key(key));
    }
    if let Some(bytes) = args.body {
        if !operation.has_body() {
            return Err(CliError::Arguments(format!(
                "{} does not take a request body",
                operation.id
            )));
        }
        request = request.with_body(Value::decode(bytes)?);
    }

    let http_request = request.to_http(&config.settings)?;
    let meta = HttpMetadata::for_request(&http_request, operation.success_status);

    let mut out = String::new();
    let _ = writeln!(out, "{} {}", meta.method, meta.url);
    for (name, value) in &meta.request_headers {
        let _ = writeln!(out, "{name}: {value}");
    }
    let _ = writeln!(out, "expect: {}", describe_status(meta.status));
    if let Some(body) = &request.body {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", render_json(body, compact)?);
    }
    Ok(out)
}

fn describe_status(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || status.as_str().to_string(),
        |reason| format!("{} {reason}", status.as_str()),
    )
}
