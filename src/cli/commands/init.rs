use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE, Config, ROSTER_DIR, STORE_FILE};
use crate::format::{InitSummary, print_json};
use crate::sync::history::HISTORY_DIR;
use roster_lib::{InMemoryStore, Result, RosterError};
use std::fs;
use std::path::Path;

/// Execute the init command.
///
/// Creates `.roster/` in `cwd` with an empty store holding one staff user,
/// a config file naming that user, and a `.gitignore` for backups.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if the store exists and `--force` was not
/// given, or an error if any file cannot be written.
pub fn execute(cwd: &Path, args: &InitArgs, store: Option<&Path>, json: bool) -> Result<()> {
    let roster_dir = cwd.join(ROSTER_DIR);
    let store_path = store.map_or_else(|| roster_dir.join(STORE_FILE), |path| cwd.join(path));

    if store_path.exists() && !args.force {
        return Err(RosterError::AlreadyInitialized { path: store_path });
    }

    fs::create_dir_all(&roster_dir)?;
    if let Some(parent) = store_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut roster = InMemoryStore::new();
    let admin = roster.add_user(&args.admin, true, true)?;
    roster.save_to(&store_path)?;

    let config_path = roster_dir.join(CONFIG_FILE);
    if !config_path.exists() || args.force {
        let config = Config {
            store: store.map(Path::to_path_buf),
            user: Some(admin.username.clone()),
            ..Config::default()
        };
        let body = format!("# Roster workspace configuration\n{}", config.to_yaml()?);
        fs::write(&config_path, body)?;
    }

    let gitignore_path = roster_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, format!("# Store backups\n{HISTORY_DIR}/\n"))?;
    }

    tracing::info!(store = %store_path.display(), admin = %admin.username, "Initialized workspace");

    if json {
        return print_json(&InitSummary {
            roster_dir: roster_dir.display().to_string(),
            store: store_path.display().to_string(),
            admin,
        });
    }
    println!(
        "Initialized roster workspace in {ROSTER_DIR}/ (staff user: {})",
        admin.username
    );
    Ok(())
}
