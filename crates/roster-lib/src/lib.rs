//! `roster-lib` — character roster records with JSON import/export.
//!
//! Warriors and mages belong to the user who created them; enemies and
//! items are shared catalogs that only staff manage. Every kind can be
//! exported to, and bulk-imported from, a JSON array. Import upserts by
//! identifier and reports problems per record instead of failing the batch.
//!
//! # Quick Start
//!
//! ```no_run
//! use roster_lib::{EntityKind, InMemoryStore, Roster, Upload};
//!
//! let store = InMemoryStore::open("path/to/.roster/roster.json").unwrap();
//! let mut roster = Roster::new(store);
//! let admin = roster.store().users()[0].clone();
//!
//! // Export
//! let file = roster.export(Some(&admin), EntityKind::Enemy).unwrap();
//!
//! // Import it back; every record is updated in place
//! let outcome = roster
//!     .import(Some(&admin), EntityKind::Enemy, Some(Upload::new(file.filename, &file.bytes)))
//!     .unwrap();
//! println!("{}", outcome.message());
//!
//! // Save back
//! roster.store_mut().save().unwrap();
//! ```

pub mod access;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod persist;
pub mod schema;
pub mod service;
pub mod store;
pub mod validation;

pub use access::{AccessPolicy, StaffPolicy};
pub use error::{Result, RosterError};
pub use import::{ImportOutcome, RecordIssue, Severity};
pub use model::{Enemy, EntityKind, Item, ItemType, Mage, Record, RecordId, User, UserId, Warrior};
pub use service::{ExportFile, ImportResponse, Roster, Upload};
pub use store::{InMemoryStore, RecordStore, Upserted};
