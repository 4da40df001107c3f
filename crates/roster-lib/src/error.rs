//! Error types for `roster-lib`.
//!
//! Whole-call failures (authorization, payload validation) and store
//! failures share one enum. Per-record import problems are not errors at
//! this level; they are collected as [`crate::import::RecordIssue`]s.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for roster operations.
#[derive(Error, Debug)]
pub enum RosterError {
    // === Authorization ===
    /// No identity is attached to the call.
    #[error("Authentication required")]
    Unauthenticated,

    /// The identity lacks the privilege the operation requires.
    #[error("Permission denied: {action}")]
    Forbidden { action: String },

    // === Payload Errors ===
    /// The import request carried no file.
    #[error("No file selected.")]
    NoFileSupplied,

    /// The uploaded file name does not end in `.json`.
    #[error("The file must be a JSON file.")]
    WrongExtension { filename: String },

    /// The upload could not be decoded as JSON.
    #[error("Error reading JSON file: {0}")]
    MalformedJson(String),

    /// The decoded JSON is not an array.
    #[error("The JSON file must contain a list of objects.")]
    InvalidShape,

    // === Record Errors ===
    /// Record with the given identifier does not exist.
    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: String, id: i64 },

    /// User with the given identifier or username does not exist.
    #[error("User not found: {user}")]
    UserNotFound { user: String },

    /// A unique column already holds the value.
    #[error("{kind} with {field} '{value}' already exists")]
    UniqueViolation {
        kind: String,
        field: String,
        value: String,
    },

    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {}", join_errors(.errors))]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Item type outside the known set.
    #[error("Invalid item type: {item_type}")]
    InvalidItemType { item_type: String },

    /// Entity kind name not recognised.
    #[error("Invalid entity kind: {kind}")]
    InvalidKind { kind: String },

    // === Workspace Errors ===
    /// No `.roster` workspace was found.
    #[error("Roster workspace not initialized: run `roster init`")]
    NotInitialized,

    /// `roster init` found an existing store.
    #[error("Already initialized: {path}")]
    AlreadyInitialized { path: PathBuf },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found at the specified path.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl RosterError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }

    /// True for the four whole-payload rejections of an import upload.
    #[must_use]
    pub const fn is_payload_rejection(&self) -> bool {
        matches!(
            self,
            Self::NoFileSupplied
                | Self::WrongExtension { .. }
                | Self::MalformedJson(_)
                | Self::InvalidShape
        )
    }

    /// HTTP-equivalent status for callers that render a response.
    ///
    /// Payload rejections render the import page again with a message,
    /// so they report 200 rather than a failure status.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Forbidden { .. } => 403,
            Self::NoFileSupplied
            | Self::WrongExtension { .. }
            | Self::MalformedJson(_)
            | Self::InvalidShape => 200,
            Self::RecordNotFound { .. } | Self::UserNotFound { .. } => 404,
            Self::UniqueViolation { .. }
            | Self::Validation { .. }
            | Self::ValidationErrors { .. }
            | Self::InvalidItemType { .. }
            | Self::InvalidKind { .. } => 400,
            Self::NotInitialized
            | Self::AlreadyInitialized { .. }
            | Self::Config(_)
            | Self::FileNotFound(_)
            | Self::Io(_)
            | Self::Json(_) => 500,
        }
    }
}

/// Result type using `RosterError`.
pub type Result<T> = std::result::Result<T, RosterError>;
