//! `roster` - command-line front end for `roster-lib`.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Workspace discovery and `.roster/config.yaml`
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - tracing subscriber setup
//! - [`sync`] - Store backups taken before an import rewrites it
//!
//! Records, the store, access rules and the import/export logic live in
//! the `roster-lib` crate.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod sync;

pub use roster_lib::{Result, RosterError};
