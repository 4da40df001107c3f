//! In-memory record store backed by `BTreeMap`s.
//!
//! [`RecordStore`] is the create/read/update/delete + upsert-by-id seam the
//! exporter, importer and service talk to. [`InMemoryStore`] implements it
//! and persists to a single JSON document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{RosterError, Result};
use crate::model::{Enemy, Item, Mage, Record, RecordId, User, UserId, Warrior};
use crate::persist;

/// Whether an upsert inserted a new row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

/// Storage operations the roster needs.
///
/// Every write validates the record and enforces name uniqueness and the
/// owner relation before changing anything, so a failed call leaves the
/// store untouched.
pub trait RecordStore {
    /// Look up a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage lookup fails.
    fn find_user(&self, id: UserId) -> Result<Option<User>>;

    /// Look up a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage lookup fails.
    fn find_user_by_name(&self, username: &str) -> Result<Option<User>>;

    /// All records of a kind in natural order (name ascending).
    ///
    /// # Errors
    ///
    /// Returns an error if the storage lookup fails.
    fn all<R: Record>(&self) -> Result<Vec<R>>;

    /// Look up a record by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage lookup fails.
    fn get<R: Record>(&self, id: RecordId) -> Result<Option<R>>;

    /// Insert `record` under a freshly assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `UniqueViolation` or `UserNotFound` if the
    /// record cannot be stored.
    fn create<R: Record>(&mut self, record: R) -> Result<R>;

    /// Write `record` under its own identifier, inserting or replacing.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `UniqueViolation` or `UserNotFound` if the
    /// record cannot be stored.
    fn upsert<R: Record>(&mut self, record: R) -> Result<Upserted>;

    /// Remove a record, returning it.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if no record has the identifier.
    fn delete<R: Record>(&mut self, id: RecordId) -> Result<R>;
}

/// Rows of one kind keyed by identifier.
#[derive(Debug, Clone)]
pub struct Table<R> {
    rows: BTreeMap<RecordId, R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<R: Record> Table<R> {
    /// Build a table from loaded rows; later duplicates of an id win.
    #[must_use]
    pub fn from_rows(rows: Vec<R>) -> Self {
        Self {
            rows: rows.into_iter().map(|r| (r.id(), r)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in natural order: name ascending, identifier breaking ties.
    #[must_use]
    pub fn sorted(&self) -> Vec<R> {
        let mut rows: Vec<R> = self.rows.values().cloned().collect();
        rows.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        rows
    }

    fn next_id(&self) -> Result<RecordId> {
        match self.rows.keys().next_back() {
            None => Ok(1),
            Some(last) => last
                .checked_add(1)
                .ok_or_else(|| RosterError::validation("id", "no identifiers left for new records")),
        }
    }

    fn name_taken(&self, name: &str, except: RecordId) -> bool {
        self.rows
            .values()
            .any(|r| r.id() != except && r.name() == name)
    }
}

/// All tables of the in-memory store.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: BTreeMap<UserId, User>,
    pub warriors: Table<Warrior>,
    pub mages: Table<Mage>,
    pub enemies: Table<Enemy>,
    pub items: Table<Item>,
}

/// In-memory roster store.
///
/// Use `open()` to load a store document and `save()` to persist it back.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Tables,
    path: Option<PathBuf>,
    dirty: bool,
}

impl InMemoryStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and load from a store document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let tables = persist::load(path)?;
        tracing::debug!(
            path = %path.display(),
            users = tables.users.len(),
            warriors = tables.warriors.len(),
            mages = tables.mages.len(),
            enemies = tables.enemies.len(),
            items = tables.items.len(),
            "Loaded store"
        );
        Ok(Self {
            tables,
            path: Some(path.to_path_buf()),
            dirty: false,
        })
    }

    /// Save to the file that was opened.
    ///
    /// # Errors
    ///
    /// Returns `Config` if no file path is set, or `Io` on write failure.
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| RosterError::Config("No store path set; use save_to()".to_string()))?;
        self.save_to(path)
    }

    /// Save to a specific file path.
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<()> {
        persist::save(path.as_ref(), &self.tables)?;
        self.dirty = false;
        Ok(())
    }

    /// Path the store was opened from.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub const fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Number of records of the kind `R`.
    #[must_use]
    pub fn count<R: Record>(&self) -> usize {
        R::table(&self.tables).len()
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Register a new user account.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty username or `UniqueViolation` if it
    /// is already taken.
    pub fn add_user(&mut self, username: &str, is_staff: bool, is_admin: bool) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RosterError::validation("username", "cannot be empty"));
        }
        if self.tables.users.values().any(|u| u.username == username) {
            return Err(RosterError::UniqueViolation {
                kind: "user".to_string(),
                field: "username".to_string(),
                value: username.to_string(),
            });
        }
        let id = self
            .tables
            .users
            .keys()
            .next_back()
            .map_or(1, |id| id + 1);
        let user = User {
            id,
            username: username.to_string(),
            is_staff,
            is_admin,
        };
        self.tables.users.insert(id, user.clone());
        self.dirty = true;
        Ok(user)
    }

    /// All users ordered by identifier.
    #[must_use]
    pub fn users(&self) -> Vec<&User> {
        self.tables.users.values().collect()
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn check<R: Record>(&self, record: &R) -> Result<()> {
        record
            .validate()
            .map_err(RosterError::from_validation_errors)?;

        if R::table(&self.tables).name_taken(record.name(), record.id()) {
            return Err(RosterError::UniqueViolation {
                kind: R::KIND.to_string(),
                field: "name".to_string(),
                value: record.name().to_string(),
            });
        }

        if let Some(owner) = record.owner_id() {
            if !self.tables.users.contains_key(&owner) {
                return Err(RosterError::UserNotFound {
                    user: owner.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl RecordStore for InMemoryStore {
    fn find_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.tables.users.get(&id).cloned())
    }

    fn find_user_by_name(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    fn all<R: Record>(&self) -> Result<Vec<R>> {
        Ok(R::table(&self.tables).sorted())
    }

    fn get<R: Record>(&self, id: RecordId) -> Result<Option<R>> {
        Ok(R::table(&self.tables).rows.get(&id).cloned())
    }

    fn create<R: Record>(&mut self, record: R) -> Result<R> {
        let mut record = record;
        record.set_id(R::table(&self.tables).next_id()?);
        if record.id() <= 0 {
            return Err(RosterError::validation("id", "must be a positive integer"));
        }
        self.check(&record)?;

        R::table_mut(&mut self.tables)
            .rows
            .insert(record.id(), record.clone());
        self.dirty = true;
        tracing::debug!(kind = %R::KIND, id = record.id(), "Created record");
        Ok(record)
    }

    fn upsert<R: Record>(&mut self, record: R) -> Result<Upserted> {
        if record.id() <= 0 {
            return Err(RosterError::validation("id", "must be a positive integer"));
        }
        self.check(&record)?;

        let id = record.id();
        let previous = R::table_mut(&mut self.tables).rows.insert(id, record);
        self.dirty = true;
        let outcome = if previous.is_some() {
            Upserted::Updated
        } else {
            Upserted::Created
        };
        tracing::debug!(kind = %R::KIND, id, ?outcome, "Upserted record");
        Ok(outcome)
    }

    fn delete<R: Record>(&mut self, id: RecordId) -> Result<R> {
        let removed = R::table_mut(&mut self.tables)
            .rows
            .remove(&id)
            .ok_or_else(|| RosterError::RecordNotFound {
                kind: R::KIND.to_string(),
                id,
            })?;
        self.dirty = true;
        tracing::debug!(kind = %R::KIND, id, "Deleted record");
        Ok(removed)
    }
}
