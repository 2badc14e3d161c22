//! Calendar dates and ISO 8601 timestamps.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::ValueError;

/// Format of a date token.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepted timestamp formats, tried in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

/// Parse `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValueError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| ValueError::new(format!("invalid date '{s}' (expected YYYY-MM-DD): {e}")))
}

/// Parse `YYYY-MM-DDTHH:MM:SS[.fraction][Z]`.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, ValueError> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .ok_or_else(|| {
            ValueError::new(format!(
                "invalid timestamp '{s}' (expected YYYY-MM-DDTHH:MM:SS[.micros][Z])"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_date() {
        assert_eq!(
            parse_date("2001-02-03").unwrap(),
            NaiveDate::from_ymd_opt(2001, 2, 3).unwrap()
        );
        assert!(parse_date("2001-02-30").is_err());
        assert!(parse_date("200").is_err());
    }

    #[test]
    fn test_datetime_variants() {
        let plain = parse_datetime("2020-03-03T10:11:12").unwrap();
        assert_eq!(plain.hour(), 10);
        assert_eq!(parse_datetime("2020-03-03T10:11:12Z").unwrap(), plain);

        let micros = parse_datetime("2020-03-03T10:11:12.250000").unwrap();
        assert_eq!(micros.nanosecond(), 250_000_000);
        assert_eq!(parse_datetime("2020-03-03T10:11:12.250000Z").unwrap(), micros);

        assert!(parse_datetime("2020-03-03 10:11:12").is_err());
    }
}
