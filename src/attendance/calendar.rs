use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::AttendanceError;

/// All day-boundary arithmetic in this service is anchored to UTC. Every
/// window below is a closed interval: the end is the last representable
/// instant (microsecond precision, matching the DATETIME(6) column) before
/// the next day.

pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    // Fixed hour/minute/second components, valid for every date.
    let start = date.and_hms_opt(0, 0, 0).unwrap();
    let end = date.and_hms_micro_opt(23, 59, 59, 999_999).unwrap();
    (start.and_utc(), end.and_utc())
}

pub fn month_bounds(
    year: i32,
    month: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AttendanceError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AttendanceError::InvalidDate(format!("{year}-{month:02} is not a valid month"))
    })?;
    let last = last_day_of_month(year, month)?;
    let (start, _) = day_bounds(first);
    let (_, end) = day_bounds(last);
    Ok((start, end))
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, AttendanceError> {
    Ok(last_day_of_month(year, month)?.day())
}

/// "Day 0 of the next month": handles 28/29/30/31-day months uniformly.
fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, AttendanceError> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| {
            AttendanceError::InvalidDate(format!("{year}-{month:02} is not a valid month"))
        })
}

/// Grouping key for an instant: its UTC date component.
pub fn day_key(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Strict `YYYY-MM-DD`; malformed or non-existent calendar dates are rejected.
pub fn parse_date(input: &str) -> Result<NaiveDate, AttendanceError> {
    if input.len() != 10 {
        return Err(AttendanceError::InvalidDate(format!(
            "'{input}' must be in YYYY-MM-DD format"
        )));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        AttendanceError::InvalidDate(format!("'{input}' is not a valid calendar date"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn day_bounds_span_the_whole_utc_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 23).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start.to_rfc3339(), "2025-06-23T00:00:00+00:00");
        assert_eq!(end.date_naive(), date);
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert!(start < end);
    }

    #[test]
    fn month_bounds_handle_every_month_length() {
        let (_, feb_leap) = month_bounds(2024, 2).unwrap();
        assert_eq!(feb_leap.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, feb) = month_bounds(2025, 2).unwrap();
        assert_eq!(feb.date_naive(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());

        let (_, apr) = month_bounds(2025, 4).unwrap();
        assert_eq!(apr.date_naive(), NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());

        let (start, dec) = month_bounds(2025, 12).unwrap();
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(dec.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn invalid_months_are_rejected() {
        assert!(matches!(
            month_bounds(2025, 13),
            Err(AttendanceError::InvalidDate(_))
        ));
        assert!(matches!(
            month_bounds(2025, 0),
            Err(AttendanceError::InvalidDate(_))
        ));
    }

    #[test]
    fn days_in_month_matches_the_calendar() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2025, 2).unwrap(), 28);
        assert_eq!(days_in_month(2025, 6).unwrap(), 30);
        assert_eq!(days_in_month(2025, 7).unwrap(), 31);
    }

    #[test]
    fn day_key_truncates_to_the_utc_date() {
        let almost_midnight = NaiveDate::from_ymd_opt(2025, 6, 23)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap()
            .and_utc();
        assert_eq!(
            day_key(almost_midnight),
            NaiveDate::from_ymd_opt(2025, 6, 23).unwrap()
        );
    }

    #[test]
    fn parse_date_accepts_only_strict_calendar_dates() {
        assert_eq!(
            parse_date("2025-06-23").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 23).unwrap()
        );
        for bad in ["2025-6-23", "23-06-2025", "2025-13-01", "2025-02-30", "nonsense", ""] {
            assert!(
                matches!(parse_date(bad), Err(AttendanceError::InvalidDate(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
