use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum_macros::Display,
    strum_macros::EnumString,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    CheckIn,
    CheckOut,
}

/// One immutable ledger entry: an employee checked in or out at an instant.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceEvent {
    #[schema(example = "8f14e45f-ceea-467f-a8d5-91be66d92ab1")]
    pub id: String,
    #[schema(example = "c4ca4238-a0b9-4382-8dcc-509a6f75849b")]
    pub employee_id: String,
    /// UTC instant the event occurred; the sole ordering key.
    #[sqlx(rename = "ts")]
    #[schema(example = "2025-06-23T01:00:00Z", format = "date-time", value_type = String)]
    pub timestamp: DateTime<Utc>,
    #[schema(example = "CHECK_IN")]
    pub status: AttendanceStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl AttendanceEvent {
    pub fn new(
        employee_id: String,
        status: AttendanceStatus,
        timestamp: DateTime<Utc>,
        location: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            employee_id,
            timestamp,
            status,
            location,
            notes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Present,
    Incomplete,
    Absent,
}

/// Derived classification of one employee's calendar day. Never persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailySummary {
    pub employee_id: String,
    #[schema(example = "2025-06-23", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub check_in_time: Option<DateTime<Utc>>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub check_out_time: Option<DateTime<Utc>>,
    /// Elapsed hours between check-in and check-out, 2 decimal places.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 8.5)]
    pub working_hours: Option<f64>,
    #[schema(example = "present")]
    pub status: DayStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyStats {
    #[schema(example = 30)]
    pub total_days: u32,
    #[schema(example = 20)]
    pub present_days: u32,
    #[schema(example = 2)]
    pub incomplete_days: u32,
    #[schema(example = 8)]
    pub absent_days: i64,
    #[schema(example = 7.92)]
    pub average_working_hours: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyActivity {
    #[schema(example = "2025-06-23", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub check_ins: u64,
    pub check_outs: u64,
    pub unique_employees: u64,
}

/// Organization-wide aggregation over a bounded date span.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RangeStats {
    #[schema(example = "2025-06-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-06-30", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub total_records: u64,
    pub total_check_ins: u64,
    pub total_check_outs: u64,
    pub unique_employees: u64,
    /// Days with no events at all are omitted.
    pub daily_breakdown: Vec<DailyActivity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_wire_names() {
        assert_eq!(AttendanceStatus::CheckIn.to_string(), "CHECK_IN");
        assert_eq!(AttendanceStatus::CheckOut.to_string(), "CHECK_OUT");
        assert_eq!(
            AttendanceStatus::from_str("CHECK_OUT").unwrap(),
            AttendanceStatus::CheckOut
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::CheckIn).unwrap(),
            "\"CHECK_IN\""
        );
    }

    #[test]
    fn new_event_gets_unique_ids() {
        let ts = Utc::now();
        let a = AttendanceEvent::new("e1".into(), AttendanceStatus::CheckIn, ts, None, None);
        let b = AttendanceEvent::new("e1".into(), AttendanceStatus::CheckIn, ts, None, None);
        assert_ne!(a.id, b.id);
        assert_eq!(a.timestamp, ts);
        assert_eq!(a.status, AttendanceStatus::CheckIn);
    }

    #[test]
    fn day_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DayStatus::Present).unwrap(),
            "\"present\""
        );
        assert_eq!(
            serde_json::to_string(&DayStatus::Absent).unwrap(),
            "\"absent\""
        );
    }
}
