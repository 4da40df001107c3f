//! Record schema registry.
//!
//! For each [`EntityKind`] this lists the fields that are exported, in
//! output order, and the JSON key each one is read from on import. Every
//! field carries an explicit [`FieldTag`] so relation and free-form fields
//! are recognised by declaration rather than by name.

use serde_json::{Number, Value};

use crate::error::{RosterError, Result};
use crate::model::{EntityKind, ItemType};

/// How a field relates to the rest of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag {
    /// Plain value stored on the record.
    Scalar,
    /// Identifier of another record; exported and imported as the raw id.
    Relation,
    /// Arbitrary JSON value stored verbatim.
    FreeForm,
}

/// JSON shape a field value is normalised to before it reaches a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    NullableInteger,
    Text,
    NullableText,
    ItemType,
    Any,
}

/// One exportable/importable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key used in the JSON document.
    pub json_key: &'static str,
    /// Field name on the record.
    pub field: &'static str,
    pub tag: FieldTag,
    pub value_type: ValueType,
}

impl FieldSpec {
    const fn scalar(name: &'static str, value_type: ValueType) -> Self {
        Self {
            json_key: name,
            field: name,
            tag: FieldTag::Scalar,
            value_type,
        }
    }

    const fn relation(name: &'static str) -> Self {
        Self {
            json_key: name,
            field: name,
            tag: FieldTag::Relation,
            value_type: ValueType::Integer,
        }
    }

    const fn free_form(name: &'static str) -> Self {
        Self {
            json_key: name,
            field: name,
            tag: FieldTag::FreeForm,
            value_type: ValueType::Any,
        }
    }

    /// Normalise `value` to this field's JSON type.
    ///
    /// Integers also accept strings holding an integer; text also accepts
    /// numbers and booleans, rendered as strings.
    ///
    /// # Errors
    ///
    /// Returns `Validation` naming the field when the value cannot be
    /// converted.
    pub fn coerce(&self, value: &Value) -> Result<Value> {
        let invalid = |reason: String| RosterError::validation(self.field, reason);
        match (self.value_type, value) {
            (ValueType::Any, v) => Ok(v.clone()),
            (ValueType::NullableInteger | ValueType::NullableText, Value::Null) => Ok(Value::Null),
            (_, Value::Null) => Err(invalid("cannot be null".to_string())),
            (ValueType::Integer | ValueType::NullableInteger, v) => {
                coerce_integer(v).map(|n| Value::Number(Number::from(n))).ok_or_else(|| {
                    invalid(format!("expected a number but got {}", describe(v)))
                })
            }
            (ValueType::Text | ValueType::NullableText, Value::String(s)) => {
                Ok(Value::String(s.clone()))
            }
            (ValueType::Text | ValueType::NullableText, v @ (Value::Number(_) | Value::Bool(_))) => {
                Ok(Value::String(v.to_string()))
            }
            (ValueType::Text | ValueType::NullableText, v) => {
                Err(invalid(format!("expected text but got {}", describe(v))))
            }
            (ValueType::ItemType, Value::String(s)) => s
                .parse::<ItemType>()
                .map(|t| Value::String(t.as_str().to_string()))
                .map_err(|_| invalid(format!("'{s}' is not a valid choice"))),
            (ValueType::ItemType, v) => {
                Err(invalid(format!("'{}' is not a valid choice", describe(v))))
            }
        }
    }
}

/// Parse an integer out of a JSON number or numeric string.
#[must_use]
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => format!("'{other}'"),
    }
}

/// Declared fields of one kind.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub kind: EntityKind,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Field names written by the exporter, in output order.
    pub fn export_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.field)
    }

    /// Look up the field read from `json_key` on import.
    #[must_use]
    pub fn by_json_key(&self, json_key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.json_key == json_key)
    }

    /// Look up the field for an internal field name.
    #[must_use]
    pub fn by_field(&self, field: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// The free-form field, if the kind declares one.
    #[must_use]
    pub fn free_form_field(&self) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.tag == FieldTag::FreeForm)
    }

    /// The owner relation, present only on owned kinds.
    #[must_use]
    pub fn owner_field(&self) -> Option<&'static FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.tag == FieldTag::Relation && f.field == OWNER_FIELD)
    }
}

/// Record field holding the identifier.
pub const ID_FIELD: &str = "id";

/// Record field holding the owner relation.
pub const OWNER_FIELD: &str = "owner_id";

static WARRIOR_FIELDS: [FieldSpec; 6] = [
    FieldSpec::scalar("id", ValueType::Integer),
    FieldSpec::scalar("name", ValueType::Text),
    FieldSpec::scalar("health", ValueType::Integer),
    FieldSpec::scalar("damage", ValueType::Integer),
    FieldSpec::scalar("defense", ValueType::Integer),
    FieldSpec::relation(OWNER_FIELD),
];

static MAGE_FIELDS: [FieldSpec; 7] = [
    FieldSpec::scalar("id", ValueType::Integer),
    FieldSpec::scalar("name", ValueType::Text),
    FieldSpec::scalar("health", ValueType::Integer),
    FieldSpec::scalar("magic_damage", ValueType::Integer),
    FieldSpec::scalar("mana", ValueType::Integer),
    FieldSpec::scalar("defense", ValueType::Integer),
    FieldSpec::relation(OWNER_FIELD),
];

static ENEMY_FIELDS: [FieldSpec; 5] = [
    FieldSpec::scalar("id", ValueType::Integer),
    FieldSpec::scalar("name", ValueType::Text),
    FieldSpec::scalar("health", ValueType::Integer),
    FieldSpec::scalar("attack", ValueType::Integer),
    FieldSpec::scalar("defense", ValueType::Integer),
];

static ITEM_FIELDS: [FieldSpec; 9] = [
    FieldSpec::scalar("id", ValueType::Integer),
    FieldSpec::scalar("name", ValueType::Text),
    FieldSpec::scalar("item_type", ValueType::ItemType),
    FieldSpec::scalar("description", ValueType::NullableText),
    FieldSpec::scalar("value", ValueType::Integer),
    FieldSpec::scalar("damage_buff", ValueType::NullableInteger),
    FieldSpec::scalar("health_restore", ValueType::NullableInteger),
    FieldSpec::scalar("mana_restore", ValueType::NullableInteger),
    FieldSpec::free_form("extra_attributes"),
];

/// Schema registered for `kind`.
#[must_use]
pub fn for_kind(kind: EntityKind) -> Schema {
    let fields: &'static [FieldSpec] = match kind {
        EntityKind::Warrior => &WARRIOR_FIELDS,
        EntityKind::Mage => &MAGE_FIELDS,
        EntityKind::Enemy => &ENEMY_FIELDS,
        EntityKind::Item => &ITEM_FIELDS,
    };
    Schema { kind, fields }
}
