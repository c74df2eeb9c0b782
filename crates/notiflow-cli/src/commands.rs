//! Subcommands and their arguments.

use clap::{Subcommand, ValueEnum};

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode a document and print it back with every default filled in
    Normalize {
        /// JSON file to read, or `-` for stdin
        input: String,
        /// What the document is
        #[arg(short, long, value_enum)]
        kind: DocumentKind,
    },

    /// Print a human-readable summary of a workflow, workflow list or step
    Inspect {
        /// JSON file to read, or `-` for stdin
        input: String,
        #[arg(short, long, value_enum)]
        kind: DocumentKind,
    },

    /// List the operation catalog, or render one request with --id
    Operations {
        /// Operation id (e.g. `WorkflowController_create`)
        #[arg(long)]
        id: Option<String>,
        /// Path parameter as `name=value` (repeatable)
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,
        /// Query parameter as `name=value` (repeatable; repeat a name for arrays)
        #[arg(long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
        /// Value of the `idempotency-key` header
        #[arg(long = "idempotency-key")]
        idempotency_key: Option<String>,
        /// JSON file to send as the request body, or `-` for stdin
        #[arg(long)]
        body: Option<String>,
    },
}

/// Document kinds understood by `normalize` and `inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentKind {
    /// Create-workflow request body
    Create,
    /// Update-workflow request body
    Update,
    /// Patch-workflow request body
    Patch,
    /// Sync-workflow request body
    Sync,
    /// Workflow as returned by the API
    Workflow,
    /// Workflow search result
    List,
    /// A single step of a create/update request
    Step,
    /// A single step as returned by the API
    StepResponse,
    ControlsInApp,
    ControlsEmail,
    ControlsSms,
    ControlsPush,
    ControlsChat,
    ControlsDelay,
    ControlsDigest,
    ControlsCustom,
}

/// Parse `name=value`. The value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert_eq!(parse_key_value("a=").unwrap(), ("a".to_string(), String::new()));
        assert!(parse_key_value("=b").is_err());
        assert!(parse_key_value("ab").is_err());
    }
}
