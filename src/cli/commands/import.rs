//! Import command implementation.
//!
//! The store is saved once after the whole batch, and only when something
//! changed. A backup of the previous store is taken first.

use crate::cli::{Context, ImportArgs};
use crate::format::{format_import_outcome, print_json};
use crate::sync::backup_before_import;
use roster_lib::{ImportResponse, Result, Roster, RosterError, Upload};
use std::fs;
use std::io::ErrorKind;

/// Execute the import command.
///
/// # Errors
///
/// Returns `Unauthenticated`/`Forbidden`, one of the payload rejections
/// (no file, wrong extension, malformed JSON, not an array), or an error
/// if the store cannot be saved. Per-record problems are printed, not
/// returned.
pub fn execute(args: &ImportArgs, ctx: &Context) -> Result<()> {
    let bytes = match &args.file {
        Some(path) => Some(fs::read(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                RosterError::FileNotFound(path.clone())
            } else {
                RosterError::Io(e)
            }
        })?),
        None => None,
    };
    let filename = args
        .file
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let upload = bytes.as_deref().map(|bytes| Upload::new(&filename, bytes));

    let store = ctx.open_store()?;
    let identity = ctx.identity(&store)?;
    let mut roster = Roster::new(store);

    let outcome = match roster.import(identity.as_ref(), args.kind, upload) {
        Ok(outcome) => outcome,
        Err(e) => {
            if ctx.json {
                if let Some(body) = ImportResponse::rejected(&e) {
                    print_json(&body)?;
                }
            }
            return Err(e);
        }
    };

    if roster.store().is_dirty() {
        if let Some(backup) = backup_before_import(&ctx.settings.store_path, &ctx.settings.history)? {
            tracing::info!(backup = %backup.display(), "Backed up store");
        }
        roster.store_mut().save()?;
    }

    if ctx.json {
        return print_json(&ImportResponse::completed(&outcome));
    }
    println!("{}", format_import_outcome(&outcome));
    Ok(())
}
