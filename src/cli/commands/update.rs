use crate::cli::{Context, UpdateArgs, assignments_to_fields};
use crate::format::{format_cell, print_json};
use roster_lib::{Result, Roster};

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if the record is missing, the caller may not modify
/// it, a field is invalid, or the store cannot be saved.
pub fn execute(args: &UpdateArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let identity = ctx.identity(&store)?;
    let mut roster = Roster::new(store);

    let row = roster.update(
        identity.as_ref(),
        args.kind,
        args.id,
        &assignments_to_fields(&args.set),
    )?;
    roster.store_mut().save()?;

    if ctx.json {
        return print_json(&row);
    }
    println!("Updated {} {}: {}", args.kind, args.id, format_cell(&row["name"]));
    Ok(())
}
