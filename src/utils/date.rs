//! Start date parsing.

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use crate::error::{AppError, AppResult};

/// External start date format: day-month-year.
pub const START_DATE_FORMAT: &str = "%d-%m-%Y";

/// Parses a `DD-MM-YYYY` start date into the midnight UTC instant of that
/// day. Any other format is a validation failure.
pub fn parse_start_date(input: &str) -> AppResult<Timestamp> {
    let date = Date::strptime(START_DATE_FORMAT, input).map_err(|_| AppError::Validation {
        field: "start_date".to_string(),
        reason: format!("Invalid date format '{input}', expected DD-MM-YYYY"),
    })?;
    let zoned = date
        .to_zoned(TimeZone::UTC)
        .map_err(|e| AppError::Validation {
            field: "start_date".to_string(),
            reason: e.to_string(),
        })?;
    Ok(zoned.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_month_year() {
        let ts = parse_start_date("15-01-2026").unwrap();
        assert_eq!(ts.to_string(), "2026-01-15T00:00:00Z");
    }

    #[test]
    fn rejects_iso_order() {
        assert!(parse_start_date("2026-01-15").is_err());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_start_date("31-02-2025").is_err());
        assert!(parse_start_date("00-01-2025").is_err());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_start_date("next tuesday").unwrap_err();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "start_date"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }
}
