//! Export command implementation.

use crate::cli::{Context, ExportArgs};
use crate::format::{ExportSummary, print_json};
use roster_lib::{Result, Roster};
use std::fs;

/// Execute the export command.
///
/// Writes the pretty-printed document to `--output`, or to the kind's
/// default filename inside the configured export directory.
///
/// # Errors
///
/// Returns `Unauthenticated`/`Forbidden` for callers without staff
/// privileges, or an error if the file cannot be written.
pub fn execute(args: &ExportArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let identity = ctx.identity(&store)?;
    let roster = Roster::new(store);

    let file = roster.export(identity.as_ref(), args.kind)?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| ctx.settings.export_dir.join(file.filename));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &file.bytes)?;

    if ctx.json {
        return print_json(&ExportSummary {
            kind: args.kind,
            path: path.display().to_string(),
            count: file.count,
        });
    }
    println!(
        "Exported {} {} to {}",
        file.count,
        args.kind.plural(),
        path.display()
    );
    Ok(())
}
