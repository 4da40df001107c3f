//! Output formatting for `roster`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//! Diagnostics always go to stderr through tracing.

mod output;
mod text;

pub use output::{DeleteSummary, ExportSummary, InitSummary};
pub use text::{format_cell, format_import_outcome, format_table, format_user_line, pad};

use serde::Serialize;

/// Print `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> roster_lib::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
