//! Output formatting shared by the handlers.

mod tables;

pub use tables::{format_optional, format_timestamp, render_json, separator, truncate_string};
