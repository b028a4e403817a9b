//! Items typed in field by field, outside the intake wizard.

use chrono::NaiveDate;

use smartfood_core::{DomainError, DomainResult};

use crate::category::Category;
use crate::dates::{parse_date_input, parse_expiry_input};
use crate::item::{ItemRecord, StorageLocation, WIZARD_QTY, WIZARD_UNIT};

/// Provenance tag written on records entered by hand.
pub const MANUAL_SOURCE: &str = "manual";

/// Raw answers to the manual add prompts, exactly as typed.
///
/// Blank answers take defaults: quantity `1`, unit `pcs`, the category
/// detected from the name, location `Fridge`, purchased today and no expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualEntry {
    pub name: String,
    pub qty: String,
    pub unit: String,
    pub category: String,
    pub location: String,
    pub purchased: String,
    pub expiry: String,
}

impl ManualEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Validate every field and build the record sent to `add_item`.
    ///
    /// The purchase date reads bare counts as days ago, the expiry reads them
    /// as days ahead.
    pub fn to_record(&self, today: NaiveDate) -> DomainResult<ItemRecord> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }

        let qty = match self.qty.trim() {
            "" => WIZARD_QTY,
            text => match text.parse::<f64>() {
                Ok(qty) if qty.is_finite() && qty > 0.0 => qty,
                _ => {
                    return Err(DomainError::validation(format!(
                        "quantity must be a positive number (got {text:?})"
                    )));
                }
            },
        };

        let unit = match self.unit.trim() {
            "" => WIZARD_UNIT.to_string(),
            unit => unit.to_string(),
        };

        let category = if self.category.trim().is_empty() {
            Category::detect(name)
        } else {
            Category::manual(&self.category)?
        };

        let location = if self.location.trim().is_empty() {
            StorageLocation::Fridge
        } else {
            self.location.parse()?
        };

        let purchased_on = parse_date_input(&self.purchased, today).ok_or_else(|| {
            DomainError::validation(format!(
                "could not read purchase date {:?}",
                self.purchased.trim()
            ))
        })?;

        let expiry_on = match self.expiry.trim() {
            "" => None,
            text => Some(parse_expiry_input(text, today).ok_or_else(|| {
                DomainError::validation(format!("could not read expiry date {text:?}"))
            })?),
        };

        Ok(ItemRecord {
            name: name.to_string(),
            category: Some(category.as_str().to_string()),
            qty,
            unit,
            location: location.as_str().to_string(),
            purchased_on: Some(purchased_on),
            expiry_on,
            source: Some(MANUAL_SOURCE.to_string()),
            notes: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn blank_answers_take_defaults() {
        let record = ManualEntry::new("  oat milk ").to_record(today()).unwrap();
        assert_eq!(record.name, "oat milk");
        assert_eq!(record.qty, 1.0);
        assert_eq!(record.unit, "pcs");
        assert_eq!(record.category.as_deref(), Some("dairy"));
        assert_eq!(record.location, "Fridge");
        assert_eq!(record.purchased_on, Some(today()));
        assert_eq!(record.expiry_on, None);
        assert_eq!(record.source.as_deref(), Some(MANUAL_SOURCE));
        assert_eq!(record.notes, None);
    }

    #[test]
    fn typed_answers_are_kept() {
        let entry = ManualEntry {
            name: "rice".into(),
            qty: "2.5".into(),
            unit: "kg".into(),
            category: "Staples".into(),
            location: "pantry".into(),
            purchased: "3".into(),
            expiry: "30".into(),
        };
        let record = entry.to_record(today()).unwrap();
        assert_eq!(record.qty, 2.5);
        assert_eq!(record.unit, "kg");
        assert_eq!(record.category.as_deref(), Some("Staples"));
        assert_eq!(record.location, "Pantry");
        assert_eq!(record.purchased_on, Some(d(6, 12)));
        assert_eq!(record.expiry_on, Some(d(7, 15)));
    }

    #[test]
    fn invalid_fields_are_validation_errors() {
        let bad = [
            ManualEntry::new(" "),
            ManualEntry {
                qty: "0".into(),
                ..ManualEntry::new("milk")
            },
            ManualEntry {
                qty: "lots".into(),
                ..ManualEntry::new("milk")
            },
            ManualEntry {
                location: "garage".into(),
                ..ManualEntry::new("milk")
            },
            ManualEntry {
                purchased: "last tuesday".into(),
                ..ManualEntry::new("milk")
            },
            ManualEntry {
                expiry: "-3".into(),
                ..ManualEntry::new("milk")
            },
            ManualEntry {
                expiry: "+999999999999999".into(),
                ..ManualEntry::new("milk")
            },
        ];
        for entry in bad {
            assert!(
                matches!(entry.to_record(today()), Err(DomainError::Validation(_))),
                "{entry:?} should be rejected"
            );
        }
    }
}
