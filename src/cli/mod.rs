//! Command-line interface for `roster`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use roster_lib::{EntityKind, InMemoryStore, RecordId, RecordStore, RosterError, User};
use serde_json::{Map, Value};

use crate::config::{self, Overrides, Settings};
use crate::logging;

/// `roster` - character roster manager.
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(
    author,
    version,
    about = "Character roster manager with JSON bulk import/export",
    long_about = None,
    after_help = "Kinds: warrior, mage, enemy, item (singular or plural)."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Act as this user
    #[arg(long = "as", global = true, env = "ROSTER_USER", value_name = "USERNAME")]
    pub actor: Option<String>,

    /// Store document to use instead of the workspace default
    #[arg(long, global = true, env = "ROSTER_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a roster workspace
    Init(InitArgs),

    /// Manage user accounts
    User(UserCommand),

    /// List records of a kind
    List(KindArgs),

    /// Create a record
    Create(CreateArgs),

    /// Update fields of an existing record
    Update(UpdateArgs),

    /// Delete a record
    Delete(RecordArgs),

    /// Export every record of a kind to a JSON file
    Export(ExportArgs),

    /// Import records of a kind from a JSON file
    Import(ImportArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Username of the first staff account
    #[arg(long, default_value = "admin", value_name = "USERNAME")]
    pub admin: String,

    /// Overwrite an existing store
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct UserCommand {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// Add a user account
    Add(UserAddArgs),

    /// List user accounts
    List,
}

#[derive(Args, Debug)]
pub struct UserAddArgs {
    pub username: String,

    /// Grant staff privileges
    #[arg(long)]
    pub staff: bool,

    /// Mark as administrator
    #[arg(long)]
    pub admin: bool,
}

#[derive(Args, Debug)]
pub struct KindArgs {
    /// Record kind
    pub kind: EntityKind,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Record kind
    pub kind: EntityKind,

    /// Record identifier
    pub id: RecordId,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Record kind
    pub kind: EntityKind,

    /// Field value; VALUE is read as JSON when it parses, else as text
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, Value)>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Record kind
    pub kind: EntityKind,

    /// Record identifier
    pub id: RecordId,

    /// Field value; VALUE is read as JSON when it parses, else as text
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment, required = true)]
    pub set: Vec<(String, Value)>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Record kind
    pub kind: EntityKind,

    /// Output file (default: <export_dir>/<kind plural>.json)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Record kind
    pub kind: EntityKind,

    /// JSON file holding an array of records
    pub file: Option<PathBuf>,
}

/// Parse `FIELD=VALUE` from `--set`.
fn parse_assignment(raw: &str) -> std::result::Result<(String, Value), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((field.to_string(), value))
}

/// Collect `--set` pairs into a field map; later pairs win.
#[must_use]
pub fn assignments_to_fields(set: &[(String, Value)]) -> Map<String, Value> {
    set.iter().cloned().collect()
}

/// Settings and output mode shared by commands that work on a store.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    pub json: bool,
}

impl Context {
    /// Open the configured store document.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` if the store file is missing, or a load error.
    pub fn open_store(&self) -> roster_lib::Result<InMemoryStore> {
        match InMemoryStore::open(&self.settings.store_path) {
            Err(RosterError::FileNotFound(_)) => Err(RosterError::NotInitialized),
            other => other,
        }
    }

    /// The acting user, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the configured username is not registered.
    pub fn identity(&self, store: &impl RecordStore) -> roster_lib::Result<Option<User>> {
        let Some(username) = &self.settings.user else {
            return Ok(None);
        };
        store
            .find_user_by_name(username)?
            .map(Some)
            .ok_or_else(|| RosterError::UserNotFound {
                user: username.clone(),
            })
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, cli.log_json)?;

    let cwd = std::env::current_dir()?;
    let overrides = Overrides {
        store: cli.store.clone(),
        user: cli.actor.clone(),
    };
    let json = cli.json;
    let context = || {
        config::resolve(&cwd, &overrides).map(|settings| Context { settings, json })
    };

    match cli.command {
        Commands::Init(args) => commands::init::execute(&cwd, &args, cli.store.as_deref(), json)?,
        Commands::Version => commands::version::execute(json)?,
        Commands::User(user) => commands::user::execute(&user, &context()?)?,
        Commands::List(args) => commands::list::execute(&args, &context()?)?,
        Commands::Create(args) => commands::create::execute(&args, &context()?)?,
        Commands::Update(args) => commands::update::execute(&args, &context()?)?,
        Commands::Delete(args) => commands::delete::execute(&args, &context()?)?,
        Commands::Export(args) => commands::export::execute(&args, &context()?)?,
        Commands::Import(args) => commands::import::execute(&args, &context()?)?,
    }

    Ok(())
}
