use crate::cli::{Context, CreateArgs, assignments_to_fields};
use crate::format::{format_cell, print_json};
use roster_lib::{Result, Roster};

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if the caller may not create the kind, a field is
/// invalid, or the store cannot be saved.
pub fn execute(args: &CreateArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let identity = ctx.identity(&store)?;
    let mut roster = Roster::new(store);

    let row = roster.create(identity.as_ref(), args.kind, &assignments_to_fields(&args.set))?;
    roster.store_mut().save()?;

    if ctx.json {
        return print_json(&row);
    }
    println!(
        "Created {} {}: {}",
        args.kind,
        format_cell(&row["id"]),
        format_cell(&row["name"])
    );
    Ok(())
}
