//! List command implementation.

use crate::cli::{Context, KindArgs};
use crate::format::{format_table, print_json};
use roster_lib::{Result, Roster};

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the caller is not
/// authenticated.
pub fn execute(args: &KindArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let identity = ctx.identity(&store)?;
    let roster = Roster::new(store);
    let rows = roster.list(identity.as_ref(), args.kind)?;

    if ctx.json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No {} found.", args.kind.plural());
        return Ok(());
    }
    println!("{}", format_table(&rows));
    println!("\n{} {}", rows.len(), args.kind.plural());
    Ok(())
}
