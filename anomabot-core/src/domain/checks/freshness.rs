// anomabot-core/src/domain/checks/freshness.rs

use chrono::NaiveDate;

use crate::domain::table::Value;

/// True when the latest date in the table is `today`.
///
/// The comparison is on the ISO `YYYY-MM-DD` text, so a timestamp value
/// (`2024-01-01 10:00:00`) never counts as today's date.
pub fn arrived_today(last_entry_date: &Value, today: NaiveDate) -> bool {
    match last_entry_date {
        Value::Text(s) => s.trim() == today.format("%Y-%m-%d").to_string(),
        _ => false,
    }
}
