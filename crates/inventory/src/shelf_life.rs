//! Shelf-life prediction contract: the request payload derived from a draft,
//! validation of the predictor's answer, and expiry arithmetic.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use smartfood_core::{DomainError, DomainResult};

use crate::item::{DraftItem, FoodState, Packaging};

pub const FRIDGE_TEMPERATURE_C: f64 = 4.0;
pub const FREEZER_TEMPERATURE_C: f64 = -18.0;
pub const ROOM_TEMPERATURE_C: f64 = 20.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Storage temperature for a location string.
///
/// Exact and case-sensitive: only `"Fridge"` and `"Freezer"` are recognised,
/// every other string is treated as room temperature.
pub fn temperature_for(location: &str) -> f64 {
    match location {
        "Fridge" => FRIDGE_TEMPERATURE_C,
        "Freezer" => FREEZER_TEMPERATURE_C,
        _ => ROOM_TEMPERATURE_C,
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub category: String,
    pub location: String,
    pub packaging: Packaging,
    pub state: FoodState,
    pub temperature: f64,
}

impl From<&DraftItem> for PredictionRequest {
    fn from(draft: &DraftItem) -> Self {
        Self {
            category: draft.category.as_str().to_string(),
            location: draft.location.as_str().to_string(),
            packaging: draft.packaging,
            state: draft.state,
            temperature: draft.location.temperature_celsius(),
        }
    }
}

/// The predictor's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_shelf_life_days: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibrated_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Prediction {
    pub fn new(days: f64) -> DomainResult<Self> {
        if !days.is_finite() || days < 0.0 {
            return Err(DomainError::malformed(format!(
                "predicted_shelf_life_days must be a non-negative number, got {days}"
            )));
        }
        Ok(Self {
            predicted_shelf_life_days: days,
            baseline_days: None,
            calibrated_ratio: None,
            status: None,
        })
    }

    /// Validate a raw response body.
    ///
    /// The predictor reports internal failures as a successful response with
    /// an `error` field; those are rejected here like any other malformed body.
    pub fn from_json(body: &Value) -> DomainResult<Self> {
        let obj = body
            .as_object()
            .ok_or_else(|| DomainError::malformed("prediction response is not an object"))?;

        if let Some(err) = obj.get("error") {
            let msg = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
            return Err(DomainError::malformed(format!("predictor reported an error: {msg}")));
        }

        let days = obj
            .get("predicted_shelf_life_days")
            .ok_or_else(|| DomainError::malformed("missing predicted_shelf_life_days"))?
            .as_f64()
            .ok_or_else(|| DomainError::malformed("predicted_shelf_life_days is not a number"))?;

        let mut prediction = Self::new(days)?;
        prediction.baseline_days = obj.get("baseline_days").and_then(Value::as_f64);
        prediction.calibrated_ratio = obj.get("calibrated_ratio").and_then(Value::as_f64);
        prediction.status = obj.get("status").and_then(Value::as_str).map(str::to_string);
        Ok(prediction)
    }

    /// Default expiry proposed to the user.
    pub fn expiry_from(&self, now: NaiveDateTime) -> NaiveDate {
        expiry_from(now, self.predicted_shelf_life_days)
    }

    /// Free-text note stored with a record saved on the predicted date.
    pub fn note(&self) -> String {
        prediction_note(self.predicted_shelf_life_days)
    }
}

pub fn prediction_note(days: f64) -> String {
    format!("Predicted shelf life: {days} days")
}

/// Note stored with a record saved on a user-chosen date.
pub const CUSTOM_EXPIRY_NOTE: &str = "Custom expiry date selected by user.";

/// Add a (possibly fractional) number of days to `now` and keep the date.
pub fn expiry_from(now: NaiveDateTime, days: f64) -> NaiveDate {
    let millis = (days * MILLIS_PER_DAY).round();
    // Clamp to what chrono can represent; realistic shelf lives are far below this.
    let millis = millis.clamp(-1e15, 1e15) as i64;
    now.checked_add_signed(Duration::milliseconds(millis))
        .unwrap_or(now)
        .date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::item::StorageLocation;
    use chrono::NaiveTime;
    use proptest::prelude::*;
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap())
    }

    #[test]
    fn temperature_mapping_is_exact() {
        assert_eq!(temperature_for("Fridge"), 4.0);
        assert_eq!(temperature_for("Freezer"), -18.0);
        assert_eq!(temperature_for("Pantry"), 20.0);
        // Case-sensitive on the stored strings.
        assert_eq!(temperature_for("fridge"), 20.0);
        assert_eq!(temperature_for(""), 20.0);
    }

    #[test]
    fn request_payload_matches_predictor_contract() {
        let draft = DraftItem::new("chicken breast", Category::detect("chicken breast"), StorageLocation::Fridge)
            .unwrap();
        let body = serde_json::to_value(PredictionRequest::from(&draft)).unwrap();
        assert_eq!(
            body,
            json!({
                "category": "meat",
                "location": "Fridge",
                "packaging": "sealed",
                "state": "raw",
                "temperature": 4.0,
            })
        );
    }

    #[test]
    fn prediction_accepts_extra_fields() {
        let p = Prediction::from_json(&json!({
            "predicted_shelf_life_days": 5.6,
            "baseline_days": 5,
            "calibrated_ratio": 1.12,
            "status": "success",
        }))
        .unwrap();
        assert_eq!(p.predicted_shelf_life_days, 5.6);
        assert_eq!(p.baseline_days, Some(5.0));
        assert_eq!(p.status.as_deref(), Some("success"));
    }

    #[test]
    fn prediction_rejects_malformed_bodies() {
        for body in [
            json!({}),
            json!({"predicted_shelf_life_days": "5"}),
            json!({"predicted_shelf_life_days": -1}),
            json!({"error": "Model not loaded"}),
            json!([5]),
        ] {
            assert!(
                matches!(Prediction::from_json(&body), Err(DomainError::Malformed(_))),
                "{body} should be rejected"
            );
        }
    }

    #[test]
    fn expiry_adds_whole_and_fractional_days() {
        assert_eq!(expiry_from(at(2025, 3, 1, 9), 5.0), NaiveDate::from_ymd_opt(2025, 3, 6).unwrap());
        assert_eq!(expiry_from(at(2025, 3, 1, 9), 0.0), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        // 09:00 + 0.5 days = 21:00 the same day; 18:00 + 0.5 days rolls over.
        assert_eq!(expiry_from(at(2025, 3, 1, 9), 0.5), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(expiry_from(at(2025, 3, 1, 18), 0.5), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(expiry_from(at(2024, 12, 30, 0), 2.0), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn prediction_note_records_day_count() {
        assert_eq!(Prediction::new(5.0).unwrap().note(), "Predicted shelf life: 5 days");
        assert_eq!(Prediction::new(2.5).unwrap().note(), "Predicted shelf life: 2.5 days");
    }

    proptest! {
        /// Property: whole-day predictions land exactly that many calendar days ahead.
        #[test]
        fn whole_days_move_the_date_exactly(days in 0u32..2000, hour in 0u32..24) {
            let now = at(2025, 6, 15, hour);
            let expected = now.date() + Duration::days(i64::from(days));
            prop_assert_eq!(expiry_from(now, f64::from(days)), expected);
        }
    }
}
