pub mod chat;
pub mod lead;
pub mod webhook;

use chrono::{ SecondsFormat, Utc };

/// Current UTC time in the `2024-01-31T12:00:00.000Z` form.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
