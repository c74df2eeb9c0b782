//! Command handlers.
//!
//! Each handler takes already-read input and returns the text to print, so
//! `main` owns stdout and tests can assert on the output directly.

pub mod inspect;
pub mod normalize;
pub mod operations;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::bootstrap::CliConfig;
use crate::commands::Commands;
use crate::error::CliError;

/// Input path that means "read stdin".
pub const STDIN_PATH: &str = "-";

/// Read a document from `path`, or from stdin for `-`.
pub fn read_input(path: &str) -> Result<Vec<u8>, CliError> {
    if path == STDIN_PATH {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer)?;
        debug!(bytes = buffer.len(), "Read document from stdin");
        return Ok(buffer);
    }

    let path = Path::new(path);
    if !path.is_file() {
        return Err(CliError::NoInput(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read document");
    Ok(bytes)
}

/// Run one command and return its output.
pub fn dispatch(command: &Commands, config: &CliConfig, compact: bool) -> Result<String, CliError> {
    match command {
        Commands::Normalize { input, kind } => {
            normalize::execute(*kind, &read_input(input)?, compact)
        }
        Commands::Inspect { input, kind } => inspect::execute(*kind, &read_input(input)?),
        Commands::Operations {
            id: None,
            params,
            query,
            idempotency_key,
            body,
        } => {
            if !params.is_empty() || !query.is_empty() || idempotency_key.is_some() || body.is_some()
            {
                return Err(CliError::Arguments(
                    "--param, --query, --idempotency-key and --body need --id".to_string(),
                ));
            }
            Ok(operations::list_catalog())
        }
        Commands::Operations {
            id: Some(id),
            params,
            query,
            idempotency_key,
            body,
        } => {
            let body = body.as_deref().map(read_input).transpose()?;
            let args = operations::RenderArgs {
                id,
                params,
                query,
                idempotency_key: idempotency_key.as_deref(),
                body: body.as_deref(),
            };
            operations::render(&args, config, compact)
        }
    }
}
