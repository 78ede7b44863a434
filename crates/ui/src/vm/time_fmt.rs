use chrono::{DateTime, Utc};

pub const UNKNOWN_DATE: &str = "Unknown date";

#[must_use]
pub fn format_datetime(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(
        || UNKNOWN_DATE.to_string(),
        |at| at.format("%Y-%m-%d %H:%M").to_string(),
    )
}
