//! Urgency: a display-only classification of remaining shelf life.
//!
//! Nothing here is persisted. Everything is derived from the `days_left`
//! value the backend reports for each stored item.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Items with at most this many days left are critical.
pub const CRITICAL_THRESHOLD_DAYS: f64 = 3.0;

/// Sort key assigned to expired items (surface first).
pub const EXPIRED_PRIORITY: f64 = -9999.0;
/// Sort key assigned to items with no known expiry (sink to the end).
pub const UNKNOWN_PRIORITY: f64 = 9999.0;

const EXPIRED_SENTINEL: &str = "Expired";

/// Remaining shelf life as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DaysLeft {
    Remaining(f64),
    Expired,
    #[default]
    Unknown,
}

impl DaysLeft {
    /// Days between `today` and `expiry`: a past date is expired, no date is unknown.
    pub fn until(expiry: Option<NaiveDate>, today: NaiveDate) -> Self {
        match expiry {
            None => DaysLeft::Unknown,
            Some(expiry) => {
                let days = (expiry - today).num_days();
                if days < 0 {
                    DaysLeft::Expired
                } else {
                    DaysLeft::Remaining(days as f64)
                }
            }
        }
    }

    /// Classify any JSON value. Total: never fails.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(DaysLeft::Remaining).unwrap_or(DaysLeft::Unknown),
            Value::String(s) if s == EXPIRED_SENTINEL => DaysLeft::Expired,
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => DaysLeft::Remaining(n),
                _ => DaysLeft::Unknown,
            },
            _ => DaysLeft::Unknown,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            DaysLeft::Expired => 0,
            DaysLeft::Remaining(_) => 1,
            DaysLeft::Unknown => 2,
        }
    }
}

impl<'de> Deserialize<'de> for DaysLeft {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map(DaysLeft::from_json).unwrap_or_default())
    }
}

impl Serialize for DaysLeft {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DaysLeft::Remaining(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            DaysLeft::Remaining(n) => serializer.serialize_f64(*n),
            DaysLeft::Expired => serializer.serialize_str(EXPIRED_SENTINEL),
            DaysLeft::Unknown => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Expired,
    Critical,
    Normal,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyColor {
    Red,
    Orange,
    Green,
    Gray,
}

impl Urgency {
    pub fn of(days_left: &DaysLeft) -> Self {
        match days_left {
            DaysLeft::Expired => Urgency::Expired,
            DaysLeft::Unknown => Urgency::Unknown,
            DaysLeft::Remaining(n) if *n <= CRITICAL_THRESHOLD_DAYS => Urgency::Critical,
            DaysLeft::Remaining(_) => Urgency::Normal,
        }
    }

    pub fn color(&self) -> UrgencyColor {
        match self {
            Urgency::Expired => UrgencyColor::Red,
            Urgency::Critical => UrgencyColor::Orange,
            Urgency::Normal => UrgencyColor::Green,
            Urgency::Unknown => UrgencyColor::Gray,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Expired => "expired",
            Urgency::Critical => "critical",
            Urgency::Normal => "ok",
            Urgency::Unknown => "unknown",
        }
    }
}

/// Numeric priority used when ordering by urgency (lower sorts first).
pub fn priority_key(days_left: &DaysLeft) -> f64 {
    match days_left {
        DaysLeft::Expired => EXPIRED_PRIORITY,
        DaysLeft::Unknown => UNKNOWN_PRIORITY,
        DaysLeft::Remaining(n) => *n,
    }
}

/// Compare by urgency class first, then by priority key.
pub fn compare_urgency(a: &DaysLeft, b: &DaysLeft) -> Ordering {
    a.rank()
        .cmp(&b.rank())
        .then_with(|| priority_key(a).total_cmp(&priority_key(b)))
}

/// Order items soonest-expiring first without touching the input slice.
///
/// Stable: items with equal keys keep their fetch order.
pub fn sort_by_urgency<'a, T, F>(items: &'a [T], days_left: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &DaysLeft,
{
    let mut ordered: Vec<&T> = items.iter().collect();
    ordered.sort_by(|a, b| compare_urgency(days_left(a), days_left(b)));
    ordered
}
