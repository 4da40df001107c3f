//! Per-kind entry points: export, import and record CRUD.
//!
//! Each call checks authentication and the [`AccessPolicy`] before touching
//! the store. A rejected call returns an error and changes nothing.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::access::{AccessPolicy, StaffPolicy};
use crate::error::{RosterError, Result};
use crate::export;
use crate::import::{self, ImportOutcome};
use crate::model::{Enemy, EntityKind, Item, Mage, Record, RecordId, User, Warrior};
use crate::schema::{self, ID_FIELD, OWNER_FIELD};
use crate::store::RecordStore;

/// Run `$body` with `$record` bound to the record type of `$kind`.
macro_rules! with_kind {
    ($kind:expr, $record:ident => $body:expr) => {
        match $kind {
            EntityKind::Warrior => {
                type $record = Warrior;
                $body
            }
            EntityKind::Mage => {
                type $record = Mage;
                $body
            }
            EntityKind::Enemy => {
                type $record = Enemy;
                $body
            }
            EntityKind::Item => {
                type $record = Item;
                $body
            }
        }
    };
}

/// Content type of export downloads.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The `json_file` field of an import request.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub filename: &'a str,
    pub bytes: &'a [u8],
}

impl<'a> Upload<'a> {
    #[must_use]
    pub const fn new(filename: &'a str, bytes: &'a [u8]) -> Self {
        Self { filename, bytes }
    }
}

/// A rendered export, ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    /// Number of records in the document.
    pub count: usize,
}

/// Body returned by the import endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportResponse {
    pub message: String,
    pub errors: Vec<String>,
}

impl ImportResponse {
    /// Body for a completed import, including partial successes.
    #[must_use]
    pub fn completed(outcome: &ImportOutcome) -> Self {
        Self {
            message: outcome.message(),
            errors: outcome.error_lines(),
        }
    }

    /// Body for a whole-payload rejection; `None` for any other error.
    #[must_use]
    pub fn rejected(err: &RosterError) -> Option<Self> {
        err.is_payload_rejection().then(|| Self {
            message: err.to_string(),
            errors: Vec::new(),
        })
    }
}

/// Roster operations over a store, gated by an access policy.
#[derive(Debug, Clone, Default)]
pub struct Roster<S, P = StaffPolicy> {
    store: S,
    policy: P,
}

impl<S: RecordStore> Roster<S> {
    /// Wrap `store` with the default staff policy.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            policy: StaffPolicy,
        }
    }
}

impl<S: RecordStore, P: AccessPolicy> Roster<S, P> {
    pub const fn with_policy(store: S, policy: P) -> Self {
        Self { store, policy }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ========================================================================
    // Import / export
    // ========================================================================

    /// Export every record of `kind` as a downloadable JSON document.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without an identity, `Forbidden` if the
    /// policy refuses the export, or a store error.
    pub fn export(&self, identity: Option<&User>, kind: EntityKind) -> Result<ExportFile> {
        let identity = authenticated(identity)?;
        if !self.policy.can_export(identity, kind) {
            return Err(RosterError::forbidden(format!("export {}", kind.plural())));
        }

        let rows = with_kind!(kind, R => export::export_records::<R>(&self.store))?;
        tracing::info!(kind = %kind, actor = %identity.username, count = rows.len(), "Export");
        Ok(ExportFile {
            filename: kind.export_filename(),
            content_type: JSON_CONTENT_TYPE,
            bytes: export::to_json_bytes(&rows)?,
            count: rows.len(),
        })
    }

    /// Import an uploaded JSON array of `kind` records.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated`, `Forbidden`, or one of the payload
    /// rejections (`NoFileSupplied`, `WrongExtension`, `MalformedJson`,
    /// `InvalidShape`). Per-record failures are reported in the outcome.
    pub fn import(
        &mut self,
        identity: Option<&User>,
        kind: EntityKind,
        upload: Option<Upload<'_>>,
    ) -> Result<ImportOutcome> {
        let identity = authenticated(identity)?;
        if !self.policy.can_import(identity, kind) {
            return Err(RosterError::forbidden(format!("import {}", kind.plural())));
        }

        let upload = upload.ok_or(RosterError::NoFileSupplied)?;
        if !has_json_extension(upload.filename) {
            return Err(RosterError::WrongExtension {
                filename: upload.filename.to_string(),
            });
        }

        let records = import::parse_payload(Some(upload.bytes))?;
        tracing::debug!(kind = %kind, file = upload.filename, records = records.len(), "Import payload accepted");
        Ok(with_kind!(kind, R => {
            import::import_records::<R>(&mut self.store, &self.policy, identity, &records)
        }))
    }

    // ========================================================================
    // Record CRUD
    // ========================================================================

    /// Every record of `kind` in natural order, as export-shaped rows.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without an identity, or a store error.
    pub fn list(&self, identity: Option<&User>, kind: EntityKind) -> Result<Vec<Map<String, Value>>> {
        authenticated(identity)?;
        with_kind!(kind, R => export::export_records::<R>(&self.store))
    }

    /// Create a record from JSON-keyed `fields`; owned kinds belong to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if the caller may not create `kind`, or a
    /// validation/store error.
    pub fn create(
        &mut self,
        identity: Option<&User>,
        kind: EntityKind,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let identity = authenticated(identity)?;
        if !self.policy.can_create(identity, kind) {
            return Err(RosterError::forbidden(format!("create {}", kind.as_str())));
        }
        with_kind!(kind, R => self.create_record::<R>(identity, fields))
    }

    /// Overwrite the supplied fields of an existing record.
    ///
    /// The owner never changes through an update.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound`, `Forbidden` if the caller may not modify
    /// the record, or a validation/store error.
    pub fn update(
        &mut self,
        identity: Option<&User>,
        kind: EntityKind,
        id: RecordId,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let identity = authenticated(identity)?;
        with_kind!(kind, R => self.update_record::<R>(identity, id, fields))
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` or `Forbidden`.
    pub fn delete(&mut self, identity: Option<&User>, kind: EntityKind, id: RecordId) -> Result<()> {
        let identity = authenticated(identity)?;
        with_kind!(kind, R => self.delete_record::<R>(identity, id))
    }

    fn create_record<R: Record>(
        &mut self,
        identity: &User,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let mut record = R::from_fields(&form_fields(R::KIND, fields)?)?;
        record.set_owner_id(identity.id);
        let created = self.store.create(record)?;
        tracing::info!(kind = %R::KIND, id = created.id(), actor = %identity.username, "Created");
        export::record_row(&created)
    }

    fn update_record<R: Record>(
        &mut self,
        identity: &User,
        id: RecordId,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let existing = self.existing::<R>(id)?;
        if !self.policy.can_modify(identity, existing.owner_id(), R::KIND) {
            return Err(RosterError::forbidden(format!("update {} {id}", R::KIND)));
        }
        let updated = existing.with_fields(&form_fields(R::KIND, fields)?)?;
        self.store.upsert(updated.clone())?;
        tracing::info!(kind = %R::KIND, id, actor = %identity.username, "Updated");
        export::record_row(&updated)
    }

    fn delete_record<R: Record>(&mut self, identity: &User, id: RecordId) -> Result<()> {
        let existing = self.existing::<R>(id)?;
        if !self.policy.can_modify(identity, existing.owner_id(), R::KIND) {
            return Err(RosterError::forbidden(format!("delete {} {id}", R::KIND)));
        }
        self.store.delete::<R>(id)?;
        tracing::info!(kind = %R::KIND, id, actor = %identity.username, "Deleted");
        Ok(())
    }

    fn existing<R: Record>(&self, id: RecordId) -> Result<R> {
        self.store
            .get::<R>(id)?
            .ok_or_else(|| RosterError::RecordNotFound {
                kind: R::KIND.to_string(),
                id,
            })
    }
}

fn authenticated(identity: Option<&User>) -> Result<&User> {
    identity.ok_or(RosterError::Unauthenticated)
}

fn has_json_extension(filename: &str) -> bool {
    filename.ends_with(".json")
}

/// Map form input (JSON keys) onto record fields.
///
/// Unlike import, unknown keys are rejected, and the identifier and owner
/// cannot be set.
fn form_fields(kind: EntityKind, input: &Map<String, Value>) -> Result<Map<String, Value>> {
    let schema = schema::for_kind(kind);
    let mut fields = Map::new();
    for (key, value) in input {
        let spec = schema
            .by_json_key(key)
            .ok_or_else(|| RosterError::validation(key.as_str(), format!("unknown {kind} field")))?;
        if spec.field == ID_FIELD || spec.field == OWNER_FIELD {
            return Err(RosterError::validation(spec.field, "cannot be set directly"));
        }
        fields.insert(spec.field.to_string(), spec.coerce(value)?);
    }
    Ok(fields)
}
