//! Date parsing and interval arithmetic.
//!
//! Window bounds accept either an ISO-8601 date/time or a relative offset
//! counted back from "now": `90d`, `2w`, `3m`, `1y`.

use chrono::{DateTime, Duration, Months, NaiveDate, SecondsFormat, TimeZone, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, thiserror::Error)]
pub enum DateError {
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),
    #[error("Date offset out of range: {0}")]
    OutOfRange(String),
}

/// Whole days between two instants, rounding partial days up.
///
/// Order does not matter. Identical instants are 0 days apart; anything
/// from one millisecond to a full day apart is 1.
pub fn days_between<A: TimeZone, B: TimeZone>(start: &DateTime<A>, end: &DateTime<B>) -> u64 {
    let millis = end
        .with_timezone(&Utc)
        .signed_duration_since(start.with_timezone(&Utc))
        .num_milliseconds()
        .unsigned_abs();
    millis.div_ceil(MILLIS_PER_DAY as u64)
}

/// Parse a window bound relative to `now`.
pub fn parse_date_spec(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DateError> {
    let input = input.trim();

    if input.contains('-') || input.contains('T') {
        return parse_iso(input);
    }

    let invalid = || DateError::InvalidFormat(input.to_string());
    let unit = input.chars().last().ok_or_else(invalid)?;
    let value: u32 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;

    let out_of_range = || DateError::OutOfRange(input.to_string());
    match unit {
        'd' => now
            .checked_sub_signed(Duration::days(value.into()))
            .ok_or_else(out_of_range),
        'w' => now
            .checked_sub_signed(Duration::weeks(value.into()))
            .ok_or_else(out_of_range),
        'm' => now
            .checked_sub_months(Months::new(value))
            .ok_or_else(out_of_range),
        'y' => value
            .checked_mul(12)
            .and_then(|months| now.checked_sub_months(Months::new(months)))
            .ok_or_else(out_of_range),
        _ => Err(invalid()),
    }
}

fn parse_iso(input: &str) -> Result<DateTime<Utc>, DateError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| DateError::InvalidFormat(input.to_string()))
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn format_iso<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{day, ts};

    fn now() -> DateTime<Utc> {
        "2025-06-15T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_days_between_identical_instants_is_zero() {
        assert_eq!(days_between(&day(3), &day(3)), 0);
    }

    #[test]
    fn test_days_between_rounds_partial_days_up() {
        let start = ts("2025-01-01T00:00:00Z");
        assert_eq!(days_between(&start, &ts("2025-01-01T00:00:00.001Z")), 1);
        assert_eq!(days_between(&start, &ts("2025-01-01T23:59:59Z")), 1);
        assert_eq!(days_between(&start, &ts("2025-01-02T00:00:00Z")), 1);
        assert_eq!(days_between(&start, &ts("2025-01-02T00:00:01Z")), 2);
    }

    #[test]
    fn test_days_between_is_symmetric() {
        assert_eq!(days_between(&day(10), &day(3)), 7);
        assert_eq!(days_between(&day(3), &day(10)), 7);
    }

    #[test]
    fn test_days_between_ignores_offsets() {
        let utc = ts("2025-01-01T00:00:00Z");
        let shifted = ts("2025-01-01T02:00:00+02:00");
        assert_eq!(days_between(&utc, &shifted), 0);
    }

    #[test]
    fn test_parse_relative_days_and_weeks() {
        let expected: DateTime<Utc> = "2025-03-17T12:00:00Z".parse().unwrap();
        assert_eq!(parse_date_spec("90d", now()).unwrap(), expected);
        let expected: DateTime<Utc> = "2025-06-01T12:00:00Z".parse().unwrap();
        assert_eq!(parse_date_spec("2w", now()).unwrap(), expected);
    }

    #[test]
    fn test_parse_relative_months_and_years() {
        let expected: DateTime<Utc> = "2025-03-15T12:00:00Z".parse().unwrap();
        assert_eq!(parse_date_spec("3m", now()).unwrap(), expected);
        let expected: DateTime<Utc> = "2024-06-15T12:00:00Z".parse().unwrap();
        assert_eq!(parse_date_spec("1y", now()).unwrap(), expected);
    }

    #[test]
    fn test_parse_iso_forms() {
        let expected: DateTime<Utc> = "2024-02-01T00:00:00Z".parse().unwrap();
        assert_eq!(parse_date_spec("2024-02-01", now()).unwrap(), expected);
        assert_eq!(
            parse_date_spec("2024-02-01T02:00:00+02:00", now()).unwrap(),
            expected
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            parse_date_spec("yesterday", now()),
            Err(DateError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_date_spec("10x", now()),
            Err(DateError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_date_spec("2024-13-45", now()),
            Err(DateError::InvalidFormat(_))
        ));
        assert!(parse_date_spec("", now()).is_err());
    }

    #[test]
    fn test_format_iso() {
        let instant = ts("2025-01-01T02:00:00.5+02:00");
        assert_eq!(format_iso(&instant), "2025-01-01T00:00:00.500Z");
    }
}
