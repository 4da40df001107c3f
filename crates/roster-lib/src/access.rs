//! Access policy for roster operations.
//!
//! Export and import are staff-only for every kind, including the
//! user-owned characters. [`AccessPolicy`] is a trait so a deployment can
//! swap the rule without touching the importer.

use crate::model::{EntityKind, User, UserId};

/// Decides which identity may do what.
pub trait AccessPolicy {
    /// May `identity` download every record of `kind`?
    fn can_export(&self, identity: &User, kind: EntityKind) -> bool;

    /// May `identity` upload records of `kind`?
    fn can_import(&self, identity: &User, kind: EntityKind) -> bool;

    /// May an import by `identity` overwrite a record owned by
    /// `existing_owner`?
    ///
    /// `existing_owner` is `None` when nothing is being overwritten (a
    /// create) or the kind is unowned.
    fn can_upsert_target(
        &self,
        identity: &User,
        existing_owner: Option<UserId>,
        kind: EntityKind,
    ) -> bool;

    /// May `identity` create a record of `kind` directly?
    fn can_create(&self, identity: &User, kind: EntityKind) -> bool;

    /// May `identity` edit or delete a record of `kind` owned by
    /// `existing_owner`?
    fn can_modify(&self, identity: &User, existing_owner: Option<UserId>, kind: EntityKind)
    -> bool;
}

/// Staff see and change everything; other users manage their own
/// characters and only read the shared catalogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaffPolicy;

impl AccessPolicy for StaffPolicy {
    fn can_export(&self, identity: &User, _kind: EntityKind) -> bool {
        identity.is_privileged()
    }

    fn can_import(&self, identity: &User, _kind: EntityKind) -> bool {
        identity.is_privileged()
    }

    fn can_upsert_target(
        &self,
        identity: &User,
        existing_owner: Option<UserId>,
        kind: EntityKind,
    ) -> bool {
        if !kind.is_owned() || identity.is_privileged() {
            return true;
        }
        existing_owner.is_none_or(|owner| owner == identity.id)
    }

    fn can_create(&self, identity: &User, kind: EntityKind) -> bool {
        kind.is_owned() || identity.is_privileged()
    }

    fn can_modify(
        &self,
        identity: &User,
        existing_owner: Option<UserId>,
        kind: EntityKind,
    ) -> bool {
        if identity.is_privileged() {
            return true;
        }
        kind.is_owned() && existing_owner == Some(identity.id)
    }
}
