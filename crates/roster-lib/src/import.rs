//! JSON import with upsert-by-identifier.
//!
//! A payload is decoded and shape-checked as a whole first; any failure
//! there aborts the call before a single record is looked at. After that
//! each array element is processed on its own: a failing element is
//! reported against its 1-based position and the loop moves on.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::access::AccessPolicy;
use crate::error::{RosterError, Result};
use crate::model::{Record, User, UserId};
use crate::schema::{self, FieldTag, ID_FIELD, OWNER_FIELD};
use crate::store::{RecordStore, Upserted};

/// How bad a per-record problem was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The record was not stored.
    Error,
    /// The record was stored with a fallback value.
    Warning,
}

/// A problem with one element of the imported array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordIssue {
    /// 1-based position in the uploaded array.
    pub index: usize,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object {}: {}", self.index, self.message)
    }
}

/// Result of one import call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub created_count: usize,
    pub updated_count: usize,
    /// Errors and warnings in the order they were raised.
    pub errors: Vec<RecordIssue>,
}

impl ImportOutcome {
    /// Summary line shown after an import.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Import completed. Created: {}, Updated: {}.",
            self.created_count, self.updated_count
        )
    }

    /// Every issue rendered as `Object <n>: <message>`.
    #[must_use]
    pub fn error_lines(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Number of records that were not stored.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.errors
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .count()
    }

    fn push(&mut self, index: usize, severity: Severity, message: String) {
        self.errors.push(RecordIssue {
            index,
            severity,
            message,
        });
    }
}

/// Decode an upload and check it is a JSON array.
///
/// # Errors
///
/// Returns `NoFileSupplied` when there is no payload, `MalformedJson` when
/// it is not UTF-8 JSON, and `InvalidShape` when it is not an array.
pub fn parse_payload(payload: Option<&[u8]>) -> Result<Vec<Value>> {
    let bytes = payload.ok_or(RosterError::NoFileSupplied)?;
    let text = std::str::from_utf8(bytes).map_err(|e| RosterError::MalformedJson(e.to_string()))?;
    let value: Value =
        serde_json::from_str(text).map_err(|e| RosterError::MalformedJson(e.to_string()))?;
    match value {
        Value::Array(records) => Ok(records),
        _ => Err(RosterError::InvalidShape),
    }
}

/// Import already-decoded records of kind `R` on behalf of `identity`.
///
/// Never fails as a whole: every per-record problem ends up in
/// [`ImportOutcome::errors`]. Each stored record is committed on its own,
/// so earlier records stay stored when a later one fails.
pub fn import_records<R: Record>(
    store: &mut impl RecordStore,
    policy: &impl AccessPolicy,
    identity: &User,
    records: &[Value],
) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();

    for (position, raw) in records.iter().enumerate() {
        let index = position + 1;
        let mut warnings = Vec::new();
        let result = import_one::<R>(store, policy, identity, raw, &mut warnings);

        for warning in warnings {
            tracing::warn!(kind = %R::KIND, index, "{warning}");
            outcome.push(index, Severity::Warning, warning);
        }

        match result {
            Ok(Upserted::Created) => outcome.created_count += 1,
            Ok(Upserted::Updated) => outcome.updated_count += 1,
            Err(e) => {
                tracing::warn!(kind = %R::KIND, index, error = %e, "Record failed");
                outcome.push(
                    index,
                    Severity::Error,
                    format!("Error processing '{raw}': {e}"),
                );
            }
        }
    }

    tracing::info!(
        kind = %R::KIND,
        actor = %identity.username,
        created = outcome.created_count,
        updated = outcome.updated_count,
        failed = outcome.failed_count(),
        "Import finished"
    );
    outcome
}

/// Parse `payload` then import it.
///
/// # Errors
///
/// Returns the whole-payload errors of [`parse_payload`]; nothing is
/// written in that case.
pub fn import_payload<R: Record>(
    store: &mut impl RecordStore,
    policy: &impl AccessPolicy,
    identity: &User,
    payload: Option<&[u8]>,
) -> Result<ImportOutcome> {
    let records = parse_payload(payload)?;
    Ok(import_records::<R>(store, policy, identity, &records))
}

fn import_one<R: Record>(
    store: &mut impl RecordStore,
    policy: &impl AccessPolicy,
    identity: &User,
    raw: &Value,
    warnings: &mut Vec<String>,
) -> Result<Upserted> {
    let schema = schema::for_kind(R::KIND);
    let Value::Object(row) = raw else {
        return Err(RosterError::validation("record", "expected a JSON object"));
    };

    let mut fields = Map::new();
    for spec in schema.fields {
        let Some(value) = row.get(spec.json_key) else {
            continue;
        };
        // A null identifier means "no target".
        if spec.field == ID_FIELD && value.is_null() {
            continue;
        }
        match spec.tag {
            FieldTag::FreeForm => {
                fields.insert(spec.field.to_string(), free_form_value(spec.field, value, warnings));
            }
            // Resolved below against the acting identity.
            FieldTag::Relation if spec.field == OWNER_FIELD => {}
            FieldTag::Relation | FieldTag::Scalar => {
                fields.insert(spec.field.to_string(), spec.coerce(value)?);
            }
        }
    }

    if let Some(owner_spec) = schema.owner_field() {
        let owner = match row.get(owner_spec.json_key) {
            Some(supplied) if identity.is_privileged() => {
                resolve_owner(store, identity, supplied, warnings)?
            }
            _ => identity.id,
        };
        fields.insert(OWNER_FIELD.to_string(), Value::from(owner));
    }

    let target = fields
        .remove(ID_FIELD)
        .and_then(|id| schema::coerce_integer(&id));

    let Some(id) = target else {
        store.create(R::from_fields(&fields)?)?;
        return Ok(Upserted::Created);
    };

    match store.get::<R>(id)? {
        Some(current) if policy.can_upsert_target(identity, current.owner_id(), R::KIND) => {
            store.upsert(current.with_fields(&fields)?)
        }
        Some(current) => {
            tracing::info!(
                kind = %R::KIND,
                id,
                owner = ?current.owner_id(),
                actor = %identity.username,
                "Target owned by another user; storing as a new record"
            );
            store.create(R::from_fields(&fields)?)?;
            Ok(Upserted::Created)
        }
        None => {
            let mut record = R::from_fields(&fields)?;
            record.set_id(id);
            store.upsert(record)
        }
    }
}

/// Accept structured JSON as is; parse strings as JSON, falling back to an
/// empty object with a warning.
fn free_form_value(field: &str, value: &Value, warnings: &mut Vec<String>) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };
    serde_json::from_str(text).unwrap_or_else(|_| {
        warnings.push(format!("Invalid JSON in '{field}'."));
        Value::Object(Map::new())
    })
}

fn resolve_owner(
    store: &impl RecordStore,
    identity: &User,
    supplied: &Value,
    warnings: &mut Vec<String>,
) -> Result<UserId> {
    let found = match supplied {
        Value::Null => None,
        other => {
            let id = schema::coerce_integer(other).ok_or_else(|| {
                RosterError::validation(
                    OWNER_FIELD,
                    format!("expected a number but got {other}"),
                )
            })?;
            store.find_user(id)?
        }
    };

    Ok(found.map_or_else(
        || {
            warnings.push(format!(
                "Owner with ID {supplied} not found. Assigning to current admin."
            ));
            identity.id
        },
        |user| user.id,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::StaffPolicy;
    use crate::export::{export_records, to_json_bytes};
    use crate::model::{Enemy, Item, Mage, Warrior};
    use crate::store::InMemoryStore;
    use proptest::prelude::*;
    use serde_json::json;

    struct Fixture {
        store: InMemoryStore,
        admin: User,
        alice: User,
        bob: User,
    }

    fn fixture() -> Fixture {
        let mut store = InMemoryStore::new();
        let admin = store.add_user("admin", true, true).unwrap();
        let alice = store.add_user("alice", false, false).unwrap();
        let bob = store.add_user("bob", false, false).unwrap();
        Fixture {
            store,
            admin,
            alice,
            bob,
        }
    }

    fn import<R: Record>(fx: &mut Fixture, identity: &User, records: &Value) -> ImportOutcome {
        let records = records.as_array().unwrap().clone();
        import_records::<R>(&mut fx.store, &StaffPolicy, identity, &records)
    }

    // === Payload validation ===

    #[test]
    fn test_missing_payload() {
        assert!(matches!(parse_payload(None), Err(RosterError::NoFileSupplied)));
    }

    #[test]
    fn test_malformed_payload() {
        let err = parse_payload(Some(b"[{\"name\": ")).unwrap_err();
        assert!(matches!(err, RosterError::MalformedJson(_)));
        let err = parse_payload(Some(&[0xff, 0xfe, b'['])).unwrap_err();
        assert!(matches!(err, RosterError::MalformedJson(_)));
    }

    #[test]
    fn test_object_payload_rejected_without_mutation() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let err = import_payload::<Enemy>(
            &mut fx.store,
            &StaffPolicy,
            &admin,
            Some(br#"{"not": "an array"}"#),
        )
        .unwrap_err();
        assert!(matches!(err, RosterError::InvalidShape));
        assert_eq!(fx.store.count::<Enemy>(), 0);
    }

    // === Basic create / update ===

    #[test]
    fn test_create_enemy_without_id() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Enemy>(
            &mut fx,
            &admin,
            &json!([{"name": "Goblin", "health": 30, "attack": 10, "defense": 2}]),
        );
        assert_eq!(outcome.created_count, 1);
        assert_eq!(outcome.updated_count, 0);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.message(), "Import completed. Created: 1, Updated: 0.");

        let goblin = &fx.store.all::<Enemy>().unwrap()[0];
        assert_eq!((goblin.health, goblin.attack, goblin.defense), (30, 10, 2));
    }

    #[test]
    fn test_unknown_keys_ignored_and_defaults_applied() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Enemy>(
            &mut fx,
            &admin,
            &json!([{"name": "Troll", "level": 12, "loot": ["club"]}]),
        );
        assert_eq!(outcome.created_count, 1);
        assert!(outcome.errors.is_empty());
        let troll = &fx.store.all::<Enemy>().unwrap()[0];
        assert_eq!((troll.health, troll.attack, troll.defense), (50, 15, 5));
    }

    #[test]
    fn test_update_by_id_keeps_unsupplied_fields() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let orc = fx
            .store
            .create(Enemy {
                name: "Orc".to_string(),
                health: 70,
                attack: 12,
                defense: 6,
                ..Default::default()
            })
            .unwrap();

        let outcome = import::<Enemy>(&mut fx, &admin, &json!([{"id": orc.id, "attack": 20}]));
        assert_eq!(outcome.updated_count, 1);
        let stored = fx.store.get::<Enemy>(orc.id).unwrap().unwrap();
        assert_eq!((stored.name.as_str(), stored.health, stored.attack), ("Orc", 70, 20));
    }

    #[test]
    fn test_unknown_id_creates_with_that_id() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Enemy>(&mut fx, &admin, &json!([{"id": 40, "name": "Wyvern"}]));
        assert_eq!(outcome.created_count, 1);
        assert!(fx.store.get::<Enemy>(40).unwrap().is_some());
    }

    #[test]
    fn test_null_id_creates_record() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Enemy>(&mut fx, &admin, &json!([{"id": null, "name": "Gamma"}]));
        assert_eq!(outcome.created_count, 1);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.error_lines());
        assert_eq!(fx.store.all::<Enemy>().unwrap()[0].name, "Gamma");
    }

    #[test]
    fn test_max_id_then_new_record_fails_only_that_record() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Enemy>(
            &mut fx,
            &admin,
            &json!([
                {"id": i64::MAX, "name": "Alpha"},
                {"name": "Beta"},
                {"id": 3, "name": "Delta"}
            ]),
        );
        assert_eq!(outcome.created_count, 2);
        assert_eq!(outcome.failed_count(), 1);
        assert!(outcome.error_lines()[0].starts_with("Object 2: Error processing"));
        assert!(fx.store.get::<Enemy>(i64::MAX).unwrap().is_some());
        assert!(fx.store.all::<Enemy>().unwrap().iter().all(|e| e.id > 0));
    }

    #[test]
    fn test_new_item_without_type_is_a_record_error() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Item>(
            &mut fx,
            &admin,
            &json!([{"name": "Mystery"}, {"name": "Blade", "item_type": "SWORD"}]),
        );
        assert_eq!(outcome.created_count, 1);
        assert_eq!(
            outcome.error_lines(),
            vec![
                "Object 1: Error processing '{\"name\":\"Mystery\"}': \
                 Validation failed: item_type: is required"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Enemy>(
            &mut fx,
            &admin,
            &json!([{"id": "9", "name": "Kobold", "health": "15"}]),
        );
        assert!(outcome.errors.is_empty());
        assert_eq!(fx.store.get::<Enemy>(9).unwrap().unwrap().health, 15);
    }

    // === Per-record isolation ===

    #[test]
    fn test_bad_record_isolated() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Enemy>(
            &mut fx,
            &admin,
            &json!([
                {"name": "Goblin", "health": 30},
                {"name": "Orc", "health": "lots"},
                {"name": "Troll", "health": 90}
            ]),
        );
        assert_eq!(outcome.created_count + outcome.updated_count, 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].index, 2);
        assert_eq!(outcome.errors[0].severity, Severity::Error);
        assert!(outcome.error_lines()[0].starts_with("Object 2: Error processing"));
        assert!(outcome.errors[0].message.contains("health"));
        assert_eq!(fx.store.count::<Enemy>(), 2);
    }

    #[test]
    fn test_constraint_violations_are_record_errors() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Enemy>(
            &mut fx,
            &admin,
            &json!([
                {"name": "Goblin"},
                {"name": "Goblin"},
                {"name": "Bad Name 9"},
                {"name": "Imp", "attack": -1},
                "not an object"
            ]),
        );
        assert_eq!(outcome.created_count, 1);
        let indexes: Vec<usize> = outcome.errors.iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec![2, 3, 4, 5]);
        assert!(outcome.errors[0].message.contains("already exists"));
    }

    #[test]
    fn test_invalid_item_type_is_record_error() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Item>(&mut fx, &admin, &json!([{"name": "Bow", "item_type": "BOW"}]));
        assert_eq!(outcome.failed_count(), 1);
        assert_eq!(fx.store.count::<Item>(), 0);
    }

    // === Free-form attributes ===

    #[test]
    fn test_malformed_extra_attributes_recovers() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Item>(
            &mut fx,
            &admin,
            &json!([{"name": "Amulet", "item_type": "STAFF", "extra_attributes": "not json"}]),
        );
        assert_eq!(outcome.created_count, 1);
        assert_eq!(outcome.failed_count(), 0);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].severity, Severity::Warning);
        assert_eq!(
            outcome.error_lines()[0],
            "Object 1: Invalid JSON in 'extra_attributes'."
        );
        let amulet = &fx.store.all::<Item>().unwrap()[0];
        assert_eq!(amulet.extra_attributes, json!({}));
    }

    #[test]
    fn test_stringified_extra_attributes_parsed() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Item>(
            &mut fx,
            &admin,
            &json!([
                {"name": "Ring", "item_type": "SWORD", "extra_attributes": "{\"slot\": \"finger\"}"},
                {"name": "Cloak", "item_type": "SWORD", "extra_attributes": ["warm", 3]}
            ]),
        );
        assert!(outcome.errors.is_empty());
        let items = fx.store.all::<Item>().unwrap();
        assert_eq!(items[0].name, "Cloak");
        assert_eq!(items[0].extra_attributes, json!(["warm", 3]));
        assert_eq!(items[1].extra_attributes, json!({"slot": "finger"}));
    }

    // === Ownership ===

    #[test]
    fn test_staff_assigns_supplied_owner() {
        let mut fx = fixture();
        let (admin, alice) = (fx.admin.clone(), fx.alice.clone());
        let outcome = import::<Warrior>(
            &mut fx,
            &admin,
            &json!([{"name": "Conan", "owner_id": alice.id}]),
        );
        assert!(outcome.errors.is_empty());
        assert_eq!(fx.store.all::<Warrior>().unwrap()[0].owner_id, alice.id);
    }

    #[test]
    fn test_staff_missing_owner_falls_back_with_warning() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Mage>(
            &mut fx,
            &admin,
            &json!([{"name": "Merlin", "owner_id": 404}]),
        );
        assert_eq!(outcome.created_count, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].severity, Severity::Warning);
        assert_eq!(
            outcome.error_lines()[0],
            "Object 1: Owner with ID 404 not found. Assigning to current admin."
        );
        assert_eq!(fx.store.all::<Mage>().unwrap()[0].owner_id, admin.id);
    }

    #[test]
    fn test_staff_without_owner_owns_record() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        import::<Warrior>(&mut fx, &admin, &json!([{"name": "Conan"}]));
        assert_eq!(fx.store.all::<Warrior>().unwrap()[0].owner_id, admin.id);
    }

    #[test]
    fn test_non_numeric_owner_is_record_error() {
        let mut fx = fixture();
        let admin = fx.admin.clone();
        let outcome = import::<Warrior>(
            &mut fx,
            &admin,
            &json!([{"name": "Conan", "owner_id": "someone"}]),
        );
        assert_eq!(outcome.failed_count(), 1);
    }

    #[test]
    fn test_player_cannot_assign_other_owner() {
        let mut fx = fixture();
        let (alice, bob) = (fx.alice.clone(), fx.bob.clone());
        let outcome = import::<Warrior>(
            &mut fx,
            &alice,
            &json!([{"name": "Conan", "owner_id": bob.id}]),
        );
        assert!(outcome.errors.is_empty());
        assert_eq!(fx.store.all::<Warrior>().unwrap()[0].owner_id, alice.id);
    }

    #[test]
    fn test_player_updates_own_record() {
        let mut fx = fixture();
        let alice = fx.alice.clone();
        let mine = fx
            .store
            .create(Warrior {
                name: "Conan".to_string(),
                owner_id: alice.id,
                ..Default::default()
            })
            .unwrap();
        let outcome = import::<Warrior>(&mut fx, &alice, &json!([{"id": mine.id, "damage": 55}]));
        assert_eq!(outcome.updated_count, 1);
        assert_eq!(fx.store.get::<Warrior>(mine.id).unwrap().unwrap().damage, 55);
    }

    #[test]
    fn test_player_targeting_foreign_record_creates_new_one() {
        let mut fx = fixture();
        let (alice, bob) = (fx.alice.clone(), fx.bob.clone());
        let theirs = fx
            .store
            .create(Warrior {
                name: "Xena".to_string(),
                damage: 40,
                owner_id: bob.id,
                ..Default::default()
            })
            .unwrap();

        let outcome = import::<Warrior>(
            &mut fx,
            &alice,
            &json!([{"id": theirs.id, "name": "Gabrielle", "damage": 1}]),
        );
        assert_eq!(outcome.created_count, 1);
        assert_eq!(outcome.updated_count, 0);
        assert!(outcome.errors.is_empty());

        let untouched = fx.store.get::<Warrior>(theirs.id).unwrap().unwrap();
        assert_eq!((untouched.name.as_str(), untouched.damage, untouched.owner_id), ("Xena", 40, bob.id));

        let warriors = fx.store.all::<Warrior>().unwrap();
        let created = warriors.iter().find(|w| w.name == "Gabrielle").unwrap();
        assert_ne!(created.id, theirs.id);
        assert_eq!(created.owner_id, alice.id);
    }

    #[test]
    fn test_staff_overwrites_any_owner() {
        let mut fx = fixture();
        let (admin, bob) = (fx.admin.clone(), fx.bob.clone());
        let theirs = fx
            .store
            .create(Mage {
                name: "Morgana".to_string(),
                owner_id: bob.id,
                ..Default::default()
            })
            .unwrap();
        let outcome = import::<Mage>(
            &mut fx,
            &admin,
            &json!([{"id": theirs.id, "mana": 500, "owner_id": bob.id}]),
        );
        assert_eq!(outcome.updated_count, 1);
        let stored = fx.store.get::<Mage>(theirs.id).unwrap().unwrap();
        assert_eq!((stored.mana, stored.owner_id), (500, bob.id));
    }

    // === Round-trip ===

    #[test]
    fn test_export_import_roundtrip_updates_everything() {
        let mut fx = fixture();
        let (admin, alice, bob) = (fx.admin.clone(), fx.alice.clone(), fx.bob.clone());
        for (name, owner) in [("Conan", alice.id), ("Xena", bob.id), ("Ñoño", alice.id)] {
            fx.store
                .create(Warrior {
                    name: name.to_string(),
                    owner_id: owner,
                    ..Default::default()
                })
                .unwrap();
        }
        let before = fx.store.all::<Warrior>().unwrap();

        let bytes = to_json_bytes(&export_records::<Warrior>(&fx.store).unwrap()).unwrap();
        let outcome =
            import_payload::<Warrior>(&mut fx.store, &StaffPolicy, &admin, Some(&bytes)).unwrap();

        assert_eq!(outcome.updated_count, before.len());
        assert_eq!(outcome.created_count, 0);
        assert!(outcome.errors.is_empty());
        assert_eq!(fx.store.all::<Warrior>().unwrap(), before);
    }

    fn enemy_catalog() -> impl Strategy<Value = Vec<Enemy>> {
        prop::collection::btree_map("[A-Za-z][a-z]{0,11}", (0i64..1000, 0i64..1000, 0i64..1000), 1..16)
            .prop_map(|entries| {
                entries
                    .into_iter()
                    .map(|(name, (health, attack, defense))| Enemy {
                        id: 0,
                        name,
                        health,
                        attack,
                        defense,
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn prop_roundtrip_reproduces_records(enemies in enemy_catalog()) {
            let mut fx = fixture();
            let admin = fx.admin.clone();
            for enemy in enemies {
                fx.store.create(enemy).unwrap();
            }
            let before = fx.store.all::<Enemy>().unwrap();
            let rows = export_records::<Enemy>(&fx.store).unwrap();
            let bytes = to_json_bytes(&rows).unwrap();

            let outcome = import_payload::<Enemy>(&mut fx.store, &StaffPolicy, &admin, Some(&bytes)).unwrap();
            prop_assert_eq!(outcome.updated_count, before.len());
            prop_assert_eq!(outcome.created_count, 0);
            prop_assert!(outcome.errors.is_empty());
            prop_assert_eq!(fx.store.all::<Enemy>().unwrap(), before);
        }

        #[test]
        fn prop_second_import_only_updates(enemies in enemy_catalog()) {
            let mut source = InMemoryStore::new();
            for enemy in enemies {
                source.create(enemy).unwrap();
            }
            let bytes = to_json_bytes(&export_records::<Enemy>(&source).unwrap()).unwrap();

            let mut fx = fixture();
            let admin = fx.admin.clone();
            let first = import_payload::<Enemy>(&mut fx.store, &StaffPolicy, &admin, Some(&bytes)).unwrap();
            prop_assert_eq!(first.created_count, source.count::<Enemy>());

            let second = import_payload::<Enemy>(&mut fx.store, &StaffPolicy, &admin, Some(&bytes)).unwrap();
            prop_assert_eq!(second.created_count, 0);
            prop_assert_eq!(second.updated_count, source.count::<Enemy>());
            prop_assert!(second.errors.is_empty());
        }
    }
}
