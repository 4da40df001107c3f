use crate::cli::{Context, RecordArgs};
use crate::format::{DeleteSummary, print_json};
use roster_lib::{Result, Roster};

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if the record is missing, the caller may not delete
/// it, or the store cannot be saved.
pub fn execute(args: &RecordArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let identity = ctx.identity(&store)?;
    let mut roster = Roster::new(store);

    roster.delete(identity.as_ref(), args.kind, args.id)?;
    roster.store_mut().save()?;

    if ctx.json {
        return print_json(&DeleteSummary {
            kind: args.kind,
            id: args.id,
            deleted: true,
        });
    }
    println!("Deleted {} {}", args.kind, args.id);
    Ok(())
}
