//! Store safety around imports.
//!
//! An import may rewrite many records at once, so the store document is
//! copied to a local history directory before the rewritten store is saved.

pub mod history;

pub use history::{HistoryConfig, backup_before_import, list_backups};
