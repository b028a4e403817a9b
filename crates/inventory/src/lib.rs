//! Food inventory domain module.
//!
//! This crate contains the item model and the rules the assistant applies to
//! it, implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage): category detection, storage temperatures, shelf-life prediction
//! payloads, expiry arithmetic, manual entry validation and urgency ranking.

pub mod category;
pub mod dates;
pub mod item;
pub mod manual;
pub mod shelf_life;
pub mod urgency;

pub use category::Category;
pub use dates::{parse_date_input, parse_expiry_input};
pub use item::{DraftItem, FoodState, ItemRecord, Packaging, StorageLocation, StoredItem, WIZARD_SOURCE};
pub use manual::{MANUAL_SOURCE, ManualEntry};
pub use shelf_life::{
    CUSTOM_EXPIRY_NOTE, Prediction, PredictionRequest, expiry_from, prediction_note, temperature_for,
};
pub use urgency::{DaysLeft, Urgency, UrgencyColor, priority_key, sort_by_urgency};
