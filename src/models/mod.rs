pub mod appointment;
pub mod user;

pub use appointment::*;
pub use user::*;

use mongodb::bson::DateTime;

/// Renders a stored timestamp as RFC 3339 (UTC, millisecond precision).
pub fn format_timestamp(dt: DateTime) -> String {
    chrono::DateTime::from_timestamp_millis(dt.timestamp_millis())
        .map(|ts| ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        let dt = DateTime::from_millis(1_700_000_000_123);
        assert_eq!(format_timestamp(dt), "2023-11-14T22:13:20.123Z");
    }
}
