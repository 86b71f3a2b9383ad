use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;

use crate::attendance::{calendar, store};
use crate::error::AttendanceError;
use crate::model::attendance::{
    AttendanceEvent, AttendanceStatus, DailyActivity, DailySummary, DayStatus, MonthlyStats,
    RangeStats,
};
use crate::utils::stats_cache;

/// Rollups are pure functions over event slices ordered ascending by
/// timestamp; the async wrappers below only fetch and delegate.

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn first_of_status(
    events: &[AttendanceEvent],
    status: AttendanceStatus,
) -> Option<&AttendanceEvent> {
    events.iter().find(|e| e.status == status)
}

pub fn elapsed_hours(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> f64 {
    round_two((check_out - check_in).num_milliseconds() as f64 / 3_600_000.0)
}

/// Earliest CHECK_IN paired with earliest CHECK_OUT. Should duplicates exist
/// despite the uniqueness invariant, the first occurrence wins.
pub fn summarize_day(
    employee_id: &str,
    date: NaiveDate,
    events: &[AttendanceEvent],
) -> DailySummary {
    let check_in = first_of_status(events, AttendanceStatus::CheckIn);
    let check_out = first_of_status(events, AttendanceStatus::CheckOut);

    let (status, working_hours) = match (check_in, check_out) {
        (Some(ci), Some(co)) => (
            DayStatus::Present,
            Some(elapsed_hours(ci.timestamp, co.timestamp)),
        ),
        (Some(_), None) => (DayStatus::Incomplete, None),
        _ => (DayStatus::Absent, None),
    };

    DailySummary {
        employee_id: employee_id.to_owned(),
        date,
        check_in_time: check_in.map(|e| e.timestamp),
        check_out_time: check_out.map(|e| e.timestamp),
        working_hours,
        status,
    }
}

pub fn monthly_rollup(total_days: u32, events: &[AttendanceEvent]) -> MonthlyStats {
    let mut by_day: BTreeMap<NaiveDate, Vec<&AttendanceEvent>> = BTreeMap::new();
    for event in events {
        by_day
            .entry(calendar::day_key(event.timestamp))
            .or_default()
            .push(event);
    }

    let mut present_days = 0u32;
    let mut incomplete_days = 0u32;
    let mut total_working_hours = 0f64;

    for day_events in by_day.values() {
        let check_in = day_events
            .iter()
            .find(|e| e.status == AttendanceStatus::CheckIn);
        let check_out = day_events
            .iter()
            .find(|e| e.status == AttendanceStatus::CheckOut);

        match (check_in, check_out) {
            (Some(ci), Some(co)) => {
                present_days += 1;
                total_working_hours +=
                    (co.timestamp - ci.timestamp).num_milliseconds() as f64 / 3_600_000.0;
            }
            (Some(_), None) => incomplete_days += 1,
            _ => {}
        }
    }

    let average_working_hours = if present_days > 0 {
        round_two(total_working_hours / present_days as f64)
    } else {
        0.0
    };

    MonthlyStats {
        total_days,
        present_days,
        incomplete_days,
        // Negative only if day grouping double-counted, which would be a bug.
        absent_days: total_days as i64 - present_days as i64 - incomplete_days as i64,
        average_working_hours,
    }
}

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), AttendanceError> {
    if end < start {
        return Err(AttendanceError::InvalidRange(
            "End date must be after start date".to_owned(),
        ));
    }
    if (end - start).num_days() > 365 {
        return Err(AttendanceError::InvalidRange(
            "Date range cannot exceed 365 days".to_owned(),
        ));
    }
    Ok(())
}

pub fn range_rollup(start: NaiveDate, end: NaiveDate, events: &[AttendanceEvent]) -> RangeStats {
    struct DayAccum<'a> {
        check_ins: u64,
        check_outs: u64,
        employees: HashSet<&'a str>,
    }

    let mut by_day: BTreeMap<NaiveDate, DayAccum<'_>> = BTreeMap::new();
    let mut total_check_ins = 0u64;
    let mut total_check_outs = 0u64;
    let mut all_employees: HashSet<&str> = HashSet::new();

    for event in events {
        all_employees.insert(event.employee_id.as_str());

        let day = by_day
            .entry(calendar::day_key(event.timestamp))
            .or_insert_with(|| DayAccum {
                check_ins: 0,
                check_outs: 0,
                employees: HashSet::new(),
            });
        day.employees.insert(event.employee_id.as_str());

        match event.status {
            AttendanceStatus::CheckIn => {
                day.check_ins += 1;
                total_check_ins += 1;
            }
            AttendanceStatus::CheckOut => {
                day.check_outs += 1;
                total_check_outs += 1;
            }
        }
    }

    // BTreeMap iteration keeps the breakdown ascending by date; days with no
    // events never appear.
    let daily_breakdown = by_day
        .into_iter()
        .map(|(date, day)| DailyActivity {
            date,
            check_ins: day.check_ins,
            check_outs: day.check_outs,
            unique_employees: day.employees.len() as u64,
        })
        .collect();

    RangeStats {
        start_date: start,
        end_date: end,
        total_records: events.len() as u64,
        total_check_ins,
        total_check_outs,
        unique_employees: all_employees.len() as u64,
        daily_breakdown,
    }
}

pub async fn daily_summary(
    pool: &MySqlPool,
    employee_id: &str,
    date: NaiveDate,
) -> Result<DailySummary, AttendanceError> {
    let (start, end) = calendar::day_bounds(date);
    let events = store::events_for_employee_between_asc(pool, employee_id, start, end).await?;
    Ok(summarize_day(employee_id, date, &events))
}

pub async fn monthly_stats(
    pool: &MySqlPool,
    employee_id: &str,
    year: i32,
    month: u32,
) -> Result<MonthlyStats, AttendanceError> {
    let (start, end) = calendar::month_bounds(year, month)?;
    let total_days = calendar::days_in_month(year, month)?;

    // Closed months are stable in an append-only ledger; serve them from the
    // cache. Back-dated administrative entries surface once the TTL lapses.
    let month_closed = end < Utc::now();
    if month_closed {
        if let Some(stats) = stats_cache::get(employee_id, year, month).await {
            return Ok(stats);
        }
    }

    let events = store::events_for_employee_between_asc(pool, employee_id, start, end).await?;
    let stats = monthly_rollup(total_days, &events);

    if month_closed {
        stats_cache::insert(employee_id, year, month, stats.clone()).await;
    }

    Ok(stats)
}

pub async fn range_stats(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RangeStats, AttendanceError> {
    validate_range(start, end)?;

    let (window_start, _) = calendar::day_bounds(start);
    let (_, window_end) = calendar::day_bounds(end);
    let events = store::events_between_asc(pool, window_start, window_end).await?;

    Ok(range_rollup(start, end, &events))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn event(employee_id: &str, timestamp: &str, status: AttendanceStatus) -> AttendanceEvent {
        AttendanceEvent::new(employee_id.to_owned(), status, ts(timestamp), None, None)
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn full_day_is_present_with_rounded_hours() {
        let events = vec![
            event("e1", "2025-06-23T01:00:00Z", AttendanceStatus::CheckIn),
            event("e1", "2025-06-23T09:30:00Z", AttendanceStatus::CheckOut),
        ];
        let summary = summarize_day("e1", date("2025-06-23"), &events);
        assert_eq!(summary.status, DayStatus::Present);
        assert_eq!(summary.working_hours, Some(8.5));
        assert_eq!(summary.check_in_time, Some(ts("2025-06-23T01:00:00Z")));
        assert_eq!(summary.check_out_time, Some(ts("2025-06-23T09:30:00Z")));
    }

    #[test]
    fn check_in_only_is_incomplete() {
        let events = vec![event("e1", "2025-06-23T08:00:00Z", AttendanceStatus::CheckIn)];
        let summary = summarize_day("e1", date("2025-06-23"), &events);
        assert_eq!(summary.status, DayStatus::Incomplete);
        assert_eq!(summary.working_hours, None);
        assert!(summary.check_out_time.is_none());
    }

    #[test]
    fn no_events_is_absent() {
        let summary = summarize_day("e1", date("2025-06-23"), &[]);
        assert_eq!(summary.status, DayStatus::Absent);
        assert!(summary.check_in_time.is_none());
        assert!(summary.working_hours.is_none());
    }

    #[test]
    fn duplicate_events_resolve_to_first_occurrence() {
        let events = vec![
            event("e1", "2025-06-23T08:00:00Z", AttendanceStatus::CheckIn),
            event("e1", "2025-06-23T09:00:00Z", AttendanceStatus::CheckIn),
            event("e1", "2025-06-23T16:00:00Z", AttendanceStatus::CheckOut),
            event("e1", "2025-06-23T17:00:00Z", AttendanceStatus::CheckOut),
        ];
        let summary = summarize_day("e1", date("2025-06-23"), &events);
        assert_eq!(summary.check_in_time, Some(ts("2025-06-23T08:00:00Z")));
        assert_eq!(summary.check_out_time, Some(ts("2025-06-23T16:00:00Z")));
        assert_eq!(summary.working_hours, Some(8.0));
    }

    #[test]
    fn elapsed_hours_rounds_to_two_decimals() {
        assert_eq!(
            elapsed_hours(ts("2025-06-23T09:00:00Z"), ts("2025-06-23T09:15:00Z")),
            0.25
        );
        assert_eq!(
            elapsed_hours(ts("2025-06-23T09:00:00Z"), ts("2025-06-23T17:20:00Z")),
            8.33
        );
    }

    #[test]
    fn monthly_rollup_classifies_each_day_once() {
        let events = vec![
            event("e1", "2025-06-02T08:00:00Z", AttendanceStatus::CheckIn),
            event("e1", "2025-06-02T16:00:00Z", AttendanceStatus::CheckOut),
            event("e1", "2025-06-03T08:00:00Z", AttendanceStatus::CheckIn),
            event("e1", "2025-06-03T16:30:00Z", AttendanceStatus::CheckOut),
            event("e1", "2025-06-04T08:00:00Z", AttendanceStatus::CheckIn),
        ];
        let stats = monthly_rollup(30, &events);
        assert_eq!(stats.total_days, 30);
        assert_eq!(stats.present_days, 2);
        assert_eq!(stats.incomplete_days, 1);
        assert_eq!(stats.absent_days, 27);
        assert_eq!(stats.average_working_hours, 8.25);
        assert_eq!(
            stats.present_days as i64 + stats.incomplete_days as i64 + stats.absent_days,
            stats.total_days as i64
        );
    }

    #[test]
    fn monthly_rollup_with_no_present_days_has_zero_average() {
        let events = vec![event("e1", "2025-06-02T08:00:00Z", AttendanceStatus::CheckIn)];
        let stats = monthly_rollup(30, &events);
        assert_eq!(stats.present_days, 0);
        assert_eq!(stats.average_working_hours, 0.0);
        assert_eq!(stats.absent_days, 29);
    }

    #[test]
    fn range_rollup_counts_records_and_employees() {
        let events = vec![
            event("e1", "2025-06-23T01:00:00Z", AttendanceStatus::CheckIn),
            event("e2", "2025-06-23T02:00:00Z", AttendanceStatus::CheckIn),
            event("e1", "2025-06-23T09:30:00Z", AttendanceStatus::CheckOut),
        ];
        let stats = range_rollup(date("2025-06-23"), date("2025-06-23"), &events);
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.total_check_ins, 2);
        assert_eq!(stats.total_check_outs, 1);
        assert_eq!(stats.unique_employees, 2);
        assert_eq!(stats.total_records, stats.total_check_ins + stats.total_check_outs);
        assert!(stats.unique_employees <= stats.total_records);
        assert_eq!(stats.daily_breakdown.len(), 1);
        assert_eq!(stats.daily_breakdown[0].unique_employees, 2);
    }

    #[test]
    fn range_breakdown_is_ascending_and_skips_empty_days() {
        let events = vec![
            event("e1", "2025-06-25T08:00:00Z", AttendanceStatus::CheckIn),
            event("e2", "2025-06-21T08:00:00Z", AttendanceStatus::CheckIn),
            event("e1", "2025-06-21T16:00:00Z", AttendanceStatus::CheckOut),
        ];
        let stats = range_rollup(date("2025-06-20"), date("2025-06-30"), &events);
        let dates: Vec<_> = stats.daily_breakdown.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date("2025-06-21"), date("2025-06-25")]);
        assert_eq!(stats.daily_breakdown[0].check_ins, 1);
        assert_eq!(stats.daily_breakdown[0].check_outs, 1);
        assert_eq!(stats.daily_breakdown[1].check_ins, 1);
        assert_eq!(stats.daily_breakdown[1].check_outs, 0);
    }

    #[test]
    fn range_validation_enforces_order_and_span() {
        assert!(validate_range(date("2025-06-23"), date("2025-06-23")).is_ok());
        assert!(validate_range(date("2025-01-01"), date("2026-01-01")).is_ok());
        assert!(matches!(
            validate_range(date("2025-06-24"), date("2025-06-23")),
            Err(AttendanceError::InvalidRange(_))
        ));
        assert!(matches!(
            validate_range(date("2025-01-01"), date("2026-01-02")),
            Err(AttendanceError::InvalidRange(_))
        ));
    }
}
