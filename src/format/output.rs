use roster_lib::{EntityKind, User};
use serde::Serialize;

/// `roster export --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub kind: EntityKind,
    pub path: String,
    pub count: usize,
}

/// `roster delete --json`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteSummary {
    pub kind: EntityKind,
    pub id: i64,
    pub deleted: bool,
}

/// `roster init --json`.
#[derive(Debug, Clone, Serialize)]
pub struct InitSummary {
    pub roster_dir: String,
    pub store: String,
    pub admin: User,
}
