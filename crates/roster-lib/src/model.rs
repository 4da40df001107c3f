//! Core data types for roster-lib.
//!
//! Records serialize flat: relations are stored as the related record's
//! identifier, so the serde form doubles as the export/import row shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{RosterError, Result, ValidationError};
use crate::store::{Table, Tables};
use crate::validation;

/// Identifier of a stored character, enemy or item.
pub type RecordId = i64;

/// Identifier of a user account.
pub type UserId = i64;

/// The four record kinds the roster manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Warrior,
    Mage,
    Enemy,
    Item,
}

impl EntityKind {
    pub const ALL: [Self; 4] = [Self::Warrior, Self::Mage, Self::Enemy, Self::Item];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warrior => "warrior",
            Self::Mage => "mage",
            Self::Enemy => "enemy",
            Self::Item => "item",
        }
    }

    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Warrior => "warriors",
            Self::Mage => "mages",
            Self::Enemy => "enemies",
            Self::Item => "items",
        }
    }

    /// Attachment filename suggested for an export of this kind.
    #[must_use]
    pub const fn export_filename(self) -> &'static str {
        match self {
            Self::Warrior => "warriors.json",
            Self::Mage => "mages.json",
            Self::Enemy => "enemies.json",
            Self::Item => "items.json",
        }
    }

    /// Owned kinds carry an owner relation to a user.
    #[must_use]
    pub const fn is_owned(self) -> bool {
        matches!(self, Self::Warrior | Self::Mage)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "warrior" | "warriors" => Ok(Self::Warrior),
            "mage" | "mages" => Ok(Self::Mage),
            "enemy" | "enemies" => Ok(Self::Enemy),
            "item" | "items" => Ok(Self::Item),
            other => Err(RosterError::InvalidKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// An account that can own characters.
///
/// `is_staff` is the privileged flag; `is_admin` is carried for the user
/// admin screens but grants nothing on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>, is_staff: bool) -> Self {
        Self {
            id,
            username: username.into(),
            is_staff,
            is_admin: false,
        }
    }

    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.is_staff
    }
}

/// Item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    #[default]
    Sword,
    Staff,
    HealthPotion,
    ManaPotion,
}

impl ItemType {
    pub const ALL: [Self; 4] = [
        Self::Sword,
        Self::Staff,
        Self::HealthPotion,
        Self::ManaPotion,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sword => "SWORD",
            Self::Staff => "STAFF",
            Self::HealthPotion => "HEALTH_POTION",
            Self::ManaPotion => "MANA_POTION",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sword => "Sword (Warrior)",
            Self::Staff => "Staff (Mage)",
            Self::HealthPotion => "Health Potion",
            Self::ManaPotion => "Mana Potion",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| RosterError::InvalidItemType {
                item_type: s.to_string(),
            })
    }
}

/// Behaviour shared by every stored record kind.
///
/// The store, exporter and importer are generic over this trait; each
/// kind is one implementation rather than a class hierarchy.
pub trait Record: Clone + fmt::Debug + Default + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    /// Fields a new record must be given; the rest start from `Default`.
    const REQUIRED: &'static [&'static str] = &[];

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    fn name(&self) -> &str;

    /// Owning user, for owned kinds.
    fn owner_id(&self) -> Option<UserId> {
        None
    }

    fn set_owner_id(&mut self, _owner: UserId) {}

    /// Table holding this kind in the in-memory store.
    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Check field invariants (ranges, name format).
    ///
    /// # Errors
    ///
    /// Returns every violated rule.
    fn validate(&self) -> std::result::Result<(), Vec<ValidationError>>;

    /// Copy of `self` with `fields` (internal field name -> value) written over it.
    ///
    /// Values must already be normalised to the field's JSON type; see
    /// [`crate::schema::FieldSpec::coerce`].
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a value has the wrong shape for its field.
    fn with_fields(&self, fields: &Map<String, Value>) -> Result<Self> {
        let mut row = match serde_json::to_value(self)? {
            Value::Object(row) => row,
            _ => return Err(RosterError::validation(Self::KIND.as_str(), "not an object")),
        };
        for (field, value) in fields {
            row.insert(field.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(row))
            .map_err(|e| RosterError::validation(Self::KIND.as_str(), e.to_string()))
    }

    /// Build a new record from `fields` over the kind's defaults.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a [`Record::REQUIRED`] field is missing or
    /// null, or any error of [`Record::with_fields`].
    fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
        if let Some(missing) = Self::REQUIRED
            .iter()
            .find(|field| fields.get(**field).is_none_or(Value::is_null))
        {
            return Err(RosterError::validation(*missing, "is required"));
        }
        Self::default().with_fields(fields)
    }
}

/// Warrior character, owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warrior {
    pub id: RecordId,
    pub name: String,
    pub health: i64,
    pub defense: i64,
    pub damage: i64,
    pub owner_id: UserId,
}

impl Default for Warrior {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            health: 100,
            defense: 10,
            damage: 20,
            owner_id: 0,
        }
    }
}

impl Record for Warrior {
    const KIND: EntityKind = EntityKind::Warrior;

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.warriors
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.warriors
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn owner_id(&self) -> Option<UserId> {
        Some(self.owner_id)
    }

    fn set_owner_id(&mut self, owner: UserId) {
        self.owner_id = owner;
    }

    fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        validation::character_name(&self.name, &mut errors);
        validation::non_negative("health", self.health, &mut errors);
        validation::non_negative("defense", self.defense, &mut errors);
        validation::non_negative("damage", self.damage, &mut errors);
        validation::finish(errors)
    }
}

/// Mage character, owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mage {
    pub id: RecordId,
    pub name: String,
    pub health: i64,
    pub defense: i64,
    pub magic_damage: i64,
    pub mana: i64,
    pub owner_id: UserId,
}

impl Default for Mage {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            health: 100,
            defense: 10,
            magic_damage: 25,
            mana: 50,
            owner_id: 0,
        }
    }
}

impl Record for Mage {
    const KIND: EntityKind = EntityKind::Mage;

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.mages
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.mages
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn owner_id(&self) -> Option<UserId> {
        Some(self.owner_id)
    }

    fn set_owner_id(&mut self, owner: UserId) {
        self.owner_id = owner;
    }

    fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        validation::character_name(&self.name, &mut errors);
        validation::non_negative("health", self.health, &mut errors);
        validation::non_negative("defense", self.defense, &mut errors);
        validation::non_negative("magic_damage", self.magic_damage, &mut errors);
        validation::non_negative("mana", self.mana, &mut errors);
        validation::finish(errors)
    }
}

/// Shared enemy catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: RecordId,
    pub name: String,
    pub health: i64,
    pub attack: i64,
    pub defense: i64,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            health: 50,
            attack: 15,
            defense: 5,
        }
    }
}

impl Record for Enemy {
    const KIND: EntityKind = EntityKind::Enemy;

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.enemies
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.enemies
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        validation::character_name(&self.name, &mut errors);
        validation::non_negative("health", self.health, &mut errors);
        validation::non_negative("attack", self.attack, &mut errors);
        validation::non_negative("defense", self.defense, &mut errors);
        validation::finish(errors)
    }
}

/// Shared item catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: RecordId,
    pub name: String,
    pub item_type: ItemType,
    pub description: Option<String>,
    pub value: i64,
    /// Free-form attributes, stored verbatim.
    pub extra_attributes: Value,
    pub damage_buff: Option<i64>,
    pub health_restore: Option<i64>,
    pub mana_restore: Option<i64>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            item_type: ItemType::default(),
            description: None,
            value: 0,
            extra_attributes: Value::Object(Map::new()),
            damage_buff: Some(0),
            health_restore: Some(0),
            mana_restore: Some(0),
        }
    }
}

impl Record for Item {
    const KIND: EntityKind = EntityKind::Item;
    const REQUIRED: &'static [&'static str] = &["item_type"];

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.items
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.items
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        validation::plain_name(&self.name, &mut errors);
        validation::non_negative("value", self.value, &mut errors);
        for (field, amount) in [
            ("damage_buff", self.damage_buff),
            ("health_restore", self.health_restore),
            ("mana_restore", self.mana_restore),
        ] {
            if let Some(amount) = amount {
                validation::non_negative(field, amount, &mut errors);
            }
        }
        validation::finish(errors)
    }
}
