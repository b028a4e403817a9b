//! Item model: the wizard's draft, the record sent to storage and the stored
//! item read back from the backend.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use smartfood_core::{DomainError, DomainResult, ItemId};

use crate::category::Category;
use crate::shelf_life::temperature_for;
use crate::urgency::{DaysLeft, Urgency};

/// Provenance tag written on records created by the intake wizard.
pub const WIZARD_SOURCE: &str = "wizard";

/// Quantity and unit every wizard-created record starts with.
pub const WIZARD_QTY: f64 = 1.0;
pub const WIZARD_UNIT: &str = "pcs";

/// Where an item is kept.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageLocation {
    Fridge,
    Freezer,
    Pantry,
}

impl StorageLocation {
    pub const ALL: [StorageLocation; 3] = [Self::Fridge, Self::Freezer, Self::Pantry];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageLocation::Fridge => "Fridge",
            StorageLocation::Freezer => "Freezer",
            StorageLocation::Pantry => "Pantry",
        }
    }

    /// Storage temperature sent to the predictor, in °C.
    pub fn temperature_celsius(&self) -> f64 {
        temperature_for(self.as_str())
    }
}

impl core::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageLocation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fridge" => Ok(Self::Fridge),
            "freezer" => Ok(Self::Freezer),
            "pantry" => Ok(Self::Pantry),
            other => Err(DomainError::validation(format!(
                "location must be one of: Fridge, Freezer, Pantry (got {other:?})"
            ))),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    #[default]
    Sealed,
    Open,
}

impl Packaging {
    pub const ALL: [Packaging; 2] = [Self::Sealed, Self::Open];

    pub fn as_str(&self) -> &'static str {
        match self {
            Packaging::Sealed => "sealed",
            Packaging::Open => "open",
        }
    }
}

impl core::fmt::Display for Packaging {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Packaging {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sealed" => Ok(Self::Sealed),
            "open" => Ok(Self::Open),
            other => Err(DomainError::validation(format!(
                "packaging must be sealed or open (got {other:?})"
            ))),
        }
    }
}

/// Whether the food is raw or has been cooked.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodState {
    #[default]
    Raw,
    Cooked,
}

impl FoodState {
    pub const ALL: [FoodState; 2] = [Self::Raw, Self::Cooked];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodState::Raw => "raw",
            FoodState::Cooked => "cooked",
        }
    }
}

impl core::fmt::Display for FoodState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FoodState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "cooked" => Ok(Self::Cooked),
            other => Err(DomainError::validation(format!(
                "state must be raw or cooked (got {other:?})"
            ))),
        }
    }
}

/// A fully populated intake draft.
///
/// Every attribute the predictor needs is present, so a `DraftItem` can
/// always be turned into a prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftItem {
    pub name: String,
    pub category: Category,
    pub location: StorageLocation,
    pub packaging: Packaging,
    pub state: FoodState,
}

impl DraftItem {
    /// Start a draft with the default packaging (`sealed`) and state (`raw`).
    pub fn new(
        name: impl Into<String>,
        category: Category,
        location: StorageLocation,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name must not be empty"));
        }
        Ok(Self {
            name,
            category,
            location,
            packaging: Packaging::default(),
            state: FoodState::default(),
        })
    }

    pub fn with_packaging(mut self, packaging: Packaging) -> Self {
        self.packaging = packaging;
        self
    }

    pub fn with_state(mut self, state: FoodState) -> Self {
        self.state = state;
        self
    }
}

/// The full record the storage service accepts on `add_item` and
/// `update_item`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub category: Option<String>,
    pub qty: f64,
    pub unit: String,
    pub location: String,
    pub purchased_on: Option<NaiveDate>,
    pub expiry_on: Option<NaiveDate>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

impl ItemRecord {
    /// Record committed at the end of an intake session.
    pub fn from_intake(
        draft: &DraftItem,
        purchased_on: NaiveDate,
        expiry_on: NaiveDate,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            name: draft.name.clone(),
            category: Some(draft.category.as_str().to_string()),
            qty: WIZARD_QTY,
            unit: WIZARD_UNIT.to_string(),
            location: draft.location.as_str().to_string(),
            purchased_on: Some(purchased_on),
            expiry_on: Some(expiry_on),
            source: Some(WIZARD_SOURCE.to_string()),
            notes: Some(notes.into()),
        }
    }
}

/// An item as returned by `list_items`.
///
/// Deserialization is lenient: missing or null fields take their defaults and
/// unparseable dates read as absent, so one odd row never spoils a fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: ItemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qty: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub purchased_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub expiry_on: Option<NaiveDate>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub days_left: DaysLeft,
}

impl StoredItem {
    pub fn urgency(&self) -> Urgency {
        Urgency::of(&self.days_left)
    }

    /// Full record for a `PUT /update_item/{id}`, carrying every field over.
    ///
    /// A missing location falls back to the backend's column default.
    pub fn to_record(&self) -> ItemRecord {
        ItemRecord {
            name: self.name.clone(),
            category: self.category.clone(),
            qty: self.qty,
            unit: self.unit.clone().unwrap_or_default(),
            location: self
                .location
                .clone()
                .unwrap_or_else(|| StorageLocation::Fridge.as_str().to_string()),
            purchased_on: self.purchased_on,
            expiry_on: self.expiry_on,
            source: self.source.clone(),
            notes: self.notes.clone(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(text)) = raw else {
        return Ok(None);
    };
    // Accept full timestamps too; only the calendar date matters.
    let date_part = text.trim().get(..10).unwrap_or(text.trim());
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            tracing::debug!(value = %text, "ignoring unparseable date");
            Ok(None)
        }
    }
}
