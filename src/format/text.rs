//! Text formatting functions for `roster`.
//!
//! Plain (non-ANSI) output for the terminal:
//! - Record tables with display-width aware padding
//! - Import summaries with one line per problem

use roster_lib::{ImportOutcome, Severity, User};
use serde_json::{Map, Value};
use unicode_width::UnicodeWidthStr;

/// Render a cell: strings bare, null as `-`, everything else as JSON.
#[must_use]
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pad `text` on the right to `width` terminal columns.
#[must_use]
pub fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Render rows as an aligned table, columns in the rows' key order.
///
/// Returns an empty string for no rows.
#[must_use]
pub fn format_table(rows: &[Map<String, Value>]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(*h).map_or_else(String::new, format_cell))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(h.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |values: Vec<&str>| -> String {
        let line = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| pad(v, *w))
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let titles: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
    let mut out = render(titles.iter().map(String::as_str).collect());
    for row in &cells {
        out.push('\n');
        out.push_str(&render(row.iter().map(String::as_str).collect()));
    }
    out
}

/// One line per user: `id username [staff] [admin]`.
#[must_use]
pub fn format_user_line(user: &User) -> String {
    let mut line = format!("{:>4}  {}", user.id, user.username);
    if user.is_staff {
        line.push_str(" [staff]");
    }
    if user.is_admin {
        line.push_str(" [admin]");
    }
    line
}

/// Completion message followed by each problem, warnings marked.
#[must_use]
pub fn format_import_outcome(outcome: &ImportOutcome) -> String {
    let mut out = outcome.message();
    for issue in &outcome.errors {
        let marker = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        out.push_str(&format!("\n  {marker}: {issue}"));
    }
    out
}
