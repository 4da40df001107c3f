//! Command implementations.

pub mod create;
pub mod delete;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod update;
pub mod user;
pub mod version;
