//! Plain-text rendering for the terminal.

use std::fmt::Write as _;

use owo_colors::{AnsiColors, OwoColorize};

use smartfood_inventory::{DaysLeft, StoredItem, UrgencyColor};

use crate::wizard::PredictionSummary;

const HEADERS: [&str; 8] = ["ID", "Days", "Status", "Item", "Qty", "Unit", "Category", "Location"];

/// Terminal color for an urgency tint. Orange has no basic ANSI slot; yellow stands in.
fn terminal_color(color: UrgencyColor) -> AnsiColors {
    match color {
        UrgencyColor::Red => AnsiColors::Red,
        UrgencyColor::Orange => AnsiColors::Yellow,
        UrgencyColor::Green => AnsiColors::Green,
        UrgencyColor::Gray => AnsiColors::BrightBlack,
    }
}

pub fn days_text(days_left: &DaysLeft) -> String {
    match days_left {
        DaysLeft::Expired => "EXPIRED".to_string(),
        DaysLeft::Unknown => "-".to_string(),
        DaysLeft::Remaining(n) if n.fract() == 0.0 => format!("{n:.0}"),
        DaysLeft::Remaining(n) => format!("{n:.1}"),
    }
}

fn qty_text(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{qty:.0}")
    } else {
        format!("{qty}")
    }
}

/// Render items as an aligned table.
///
/// With `color`, each row's status cell is tinted by urgency; padding is
/// computed on the plain text so columns stay aligned either way.
pub fn render_table(items: &[&StoredItem], color: bool) -> String {
    if items.is_empty() {
        return "No items in inventory.\n".to_string();
    }

    let rows: Vec<([String; 8], UrgencyColor)> = items
        .iter()
        .map(|item| {
            let urgency = item.urgency();
            let cells = [
                item.id.to_string(),
                days_text(&item.days_left),
                urgency.label().to_string(),
                item.name.clone(),
                qty_text(item.qty),
                item.unit.clone().unwrap_or_default(),
                item.category.clone().unwrap_or_default(),
                item.location.clone().unwrap_or_default(),
            ];
            (cells, urgency.color())
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for (cells, _) in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths, None);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for (cells, urgency) in &rows {
        push_row(&mut out, cells, &widths, color.then_some(*urgency));
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 8], widths: &[usize; 8], tint: Option<UrgencyColor>) {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let pad = width.saturating_sub(cell.chars().count());
        match tint {
            // Status column.
            Some(color) if idx == 2 => {
                let _ = write!(line, "{}{}", cell.color(terminal_color(color)), " ".repeat(pad));
            }
            _ => {
                let _ = write!(line, "{cell}{}", " ".repeat(pad));
            }
        }
    }
    let _ = writeln!(out, "{}", line.trim_end());
}

/// The prediction result shown before the user picks an expiry.
pub fn render_summary(summary: &PredictionSummary) -> String {
    let draft = &summary.draft;
    let mut out = String::new();
    let _ = writeln!(out, "Prediction for {}", draft.name);
    let _ = writeln!(out, "  Category:            {}", draft.category);
    let _ = writeln!(out, "  Location:            {}", draft.location.as_str());
    let _ = writeln!(out, "  Packaging:           {}", draft.packaging.as_str());
    let _ = writeln!(out, "  State:               {}", draft.state.as_str());
    let _ = writeln!(
        out,
        "  Expected shelf life: {:.1} days",
        summary.prediction.predicted_shelf_life_days
    );
    let _ = writeln!(out, "  Expires on:          {}", summary.predicted_expiry);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use smartfood_core::ItemId;
    use smartfood_inventory::{Category, DraftItem, Prediction, StorageLocation};

    fn item(id: i64, name: &str, days_left: DaysLeft) -> StoredItem {
        StoredItem {
            id: ItemId::Numeric(id),
            name: name.into(),
            category: Some("dairy".into()),
            location: Some("Fridge".into()),
            qty: 1.5,
            unit: Some("l".into()),
            purchased_on: None,
            expiry_on: None,
            source: None,
            notes: None,
            days_left,
        }
    }

    #[test]
    fn days_column_distinguishes_all_shapes() {
        assert_eq!(days_text(&DaysLeft::Expired), "EXPIRED");
        assert_eq!(days_text(&DaysLeft::Unknown), "-");
        assert_eq!(days_text(&DaysLeft::Remaining(3.0)), "3");
        assert_eq!(days_text(&DaysLeft::Remaining(2.5)), "2.5");
    }

    #[test]
    fn table_is_aligned_and_labels_urgency() {
        let a = item(1, "milk", DaysLeft::Remaining(2.0));
        let b = item(12, "cheddar cheese", DaysLeft::Expired);
        let table = render_table(&[&a, &b], false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID  Days"));
        assert!(lines[2].contains("critical"));
        assert!(lines[3].contains("EXPIRED"));
        assert!(lines[3].contains("expired"));
        let item_col = lines[0].find("Item").unwrap();
        assert_eq!(lines[2].find("milk"), Some(item_col));
        assert_eq!(lines[3].find("cheddar"), Some(item_col));
        assert!(!table.contains('\x1b'));
    }

    #[test]
    fn color_only_tints_the_status_cell() {
        let a = item(1, "milk", DaysLeft::Unknown);
        let table = render_table(&[&a], true);
        assert!(table.contains("\x1b[90munknown\x1b["));
        let status = table.find("unknown").unwrap();
        let item = table.rfind("milk").unwrap();
        assert!(!table[item..].contains('\x1b'));
        assert!(table[..status].lines().last().unwrap().ends_with("\x1b[90m"));
    }

    #[test]
    fn empty_inventory_has_a_message() {
        assert_eq!(render_table(&[], false), "No items in inventory.\n");
    }

    #[test]
    fn summary_shows_one_decimal_of_shelf_life() {
        let draft = DraftItem::new("apple", Category::detect("apple"), StorageLocation::Fridge).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let summary = PredictionSummary {
            draft,
            prediction: Prediction::new(5.0).unwrap(),
            predicted_expiry: expiry,
            custom_expiry: expiry,
            saved: None,
        };
        let text = render_summary(&summary);
        assert!(text.contains("Expected shelf life: 5.0 days"));
        assert!(text.contains("2025-01-06"));
        assert!(text.contains("fruit"));
    }
}
