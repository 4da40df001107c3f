//! Store document I/O.
//!
//! The whole store is one pretty-printed JSON object with a list per table.
//! Writes go to a temp file that is renamed over the target.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RosterError, Result};
use crate::model::{Enemy, Item, Mage, User, Warrior};
use crate::store::{Table, Tables};

/// On-disk shape of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    warriors: Vec<Warrior>,
    #[serde(default)]
    mages: Vec<Mage>,
    #[serde(default)]
    enemies: Vec<Enemy>,
    #[serde(default)]
    items: Vec<Item>,
}

/// Load all tables from a store document.
///
/// An empty file loads as an empty store.
///
/// # Errors
///
/// Returns `FileNotFound` if the file is missing, `Io` if it cannot be read,
/// or `Json` if it is not a valid store document.
pub fn load(path: &Path) -> Result<Tables> {
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RosterError::FileNotFound(path.to_path_buf())
        } else {
            RosterError::Io(e)
        }
    })?;

    let doc: StoreDocument = if text.trim().is_empty() {
        StoreDocument::default()
    } else {
        serde_json::from_str(&text)?
    };

    Ok(Tables {
        users: doc.users.into_iter().map(|u| (u.id, u)).collect(),
        warriors: Table::from_rows(doc.warriors),
        mages: Table::from_rows(doc.mages),
        enemies: Table::from_rows(doc.enemies),
        items: Table::from_rows(doc.items),
    })
}

/// Save all tables with an atomic write.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save(path: &Path, tables: &Tables) -> Result<()> {
    let doc = StoreDocument {
        users: tables.users.values().cloned().collect(),
        warriors: tables.warriors.sorted(),
        mages: tables.mages.sorted(),
        enemies: tables.enemies.sorted(),
        items: tables.items.sorted(),
    };

    let tmp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp_path)?;
    serde_json::to_writer_pretty(&mut file, &doc)?;
    writeln!(file)?;
    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}
