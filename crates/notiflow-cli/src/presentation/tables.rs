//! Table and JSON formatting utilities for CLI output.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::CliError;

/// Truncates a string to a maximum number of characters, adding "..." if
/// needed.
///
/// # Examples
///
/// ```rust
/// use notiflow_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// A horizontal separator line.
pub fn separator(width: usize) -> String {
    "-".repeat(width)
}

/// Format an optional value for table display, returning a default if None.
pub fn format_optional<T: std::fmt::Display>(value: Option<&T>, default: &str) -> String {
    value.map_or_else(|| default.to_string(), ToString::to_string)
}

/// Show a parsed timestamp as `YYYY-MM-DD HH:MM UTC`, falling back to the
/// raw wire string when it did not parse.
pub fn format_timestamp(parsed: Option<DateTime<Utc>>, raw: &str) -> String {
    parsed.map_or_else(
        || raw.to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

/// Pretty JSON, or a single line with `compact`.
pub fn render_json(value: &Value, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.map_err(|e| CliError::Core(e.to_string()))
}
