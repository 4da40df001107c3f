//! User account commands.

use crate::cli::{Context, UserAddArgs, UserCommand, UserSubcommand};
use crate::format::{format_user_line, print_json};
use roster_lib::{Result, RosterError};

/// Execute a `user` subcommand.
///
/// # Errors
///
/// Returns `Unauthenticated` without an acting user, `Forbidden` when a
/// non-staff user adds accounts, or a store error.
pub fn execute(command: &UserCommand, ctx: &Context) -> Result<()> {
    match &command.command {
        UserSubcommand::Add(args) => add(args, ctx),
        UserSubcommand::List => list(ctx),
    }
}

fn add(args: &UserAddArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let identity = ctx.identity(&store)?.ok_or(RosterError::Unauthenticated)?;
    if !identity.is_privileged() {
        return Err(RosterError::forbidden("add users"));
    }

    let user = store.add_user(&args.username, args.staff, args.admin)?;
    store.save()?;
    tracing::info!(id = user.id, username = %user.username, actor = %identity.username, "Added user");

    if ctx.json {
        return print_json(&user);
    }
    println!("Added user {}: {}", user.id, user.username);
    Ok(())
}

fn list(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    ctx.identity(&store)?.ok_or(RosterError::Unauthenticated)?;

    let users = store.users();
    if ctx.json {
        return print_json(&users);
    }
    for user in users {
        println!("{}", format_user_line(user));
    }
    Ok(())
}
