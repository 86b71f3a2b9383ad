use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use crate::attendance::{calendar, store};
use crate::error::AttendanceError;
use crate::model::attendance::{AttendanceEvent, AttendanceStatus};

/// Check-in/check-out sequencing over the append-only ledger. The existence
/// pre-checks are best-effort; the composite unique index in storage is the
/// authoritative guard, and its conflict maps to the same duplicate errors.

pub async fn check_in(
    pool: &MySqlPool,
    employee_id: &str,
) -> Result<AttendanceEvent, AttendanceError> {
    let now = Utc::now();
    let (start, end) = calendar::day_bounds(calendar::day_key(now));

    if store::exists_with_status(pool, employee_id, AttendanceStatus::CheckIn, start, end).await? {
        return Err(AttendanceError::DuplicateCheckIn);
    }

    let event = AttendanceEvent::new(
        employee_id.to_owned(),
        AttendanceStatus::CheckIn,
        now,
        None,
        None,
    );
    append(pool, event).await
}

pub async fn check_out(
    pool: &MySqlPool,
    employee_id: &str,
) -> Result<AttendanceEvent, AttendanceError> {
    let now = Utc::now();
    let (start, end) = calendar::day_bounds(calendar::day_key(now));

    if !store::exists_with_status(pool, employee_id, AttendanceStatus::CheckIn, start, end).await? {
        return Err(AttendanceError::MissingCheckIn);
    }
    if store::exists_with_status(pool, employee_id, AttendanceStatus::CheckOut, start, end).await? {
        return Err(AttendanceError::DuplicateCheckOut);
    }

    let event = AttendanceEvent::new(
        employee_id.to_owned(),
        AttendanceStatus::CheckOut,
        now,
        None,
        None,
    );
    append(pool, event).await
}

/// Unconditioned append for administrative/back-dated entries. No sequencing
/// pre-checks; callers own consistency. The unique index still rejects
/// same-day duplicates.
pub async fn create_event(
    pool: &MySqlPool,
    employee_id: &str,
    status: AttendanceStatus,
    timestamp: Option<DateTime<Utc>>,
    location: Option<String>,
    notes: Option<String>,
) -> Result<AttendanceEvent, AttendanceError> {
    let event = AttendanceEvent::new(
        employee_id.to_owned(),
        status,
        timestamp.unwrap_or_else(Utc::now),
        location,
        notes,
    );
    append(pool, event).await
}

async fn append(
    pool: &MySqlPool,
    event: AttendanceEvent,
) -> Result<AttendanceEvent, AttendanceError> {
    match store::insert_event(pool, &event).await {
        Ok(()) => {
            tracing::info!(
                employee_id = %event.employee_id,
                status = %event.status,
                "Attendance event recorded"
            );
            Ok(event)
        }
        Err(e) if store::is_unique_violation(&e) => Err(duplicate_error(event.status)),
        Err(e) => Err(e.into()),
    }
}

fn duplicate_error(status: AttendanceStatus) -> AttendanceError {
    match status {
        AttendanceStatus::CheckIn => AttendanceError::DuplicateCheckIn,
        AttendanceStatus::CheckOut => AttendanceError::DuplicateCheckOut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_conflicts_map_to_the_matching_duplicate_error() {
        assert!(matches!(
            duplicate_error(AttendanceStatus::CheckIn),
            AttendanceError::DuplicateCheckIn
        ));
        assert!(matches!(
            duplicate_error(AttendanceStatus::CheckOut),
            AttendanceError::DuplicateCheckOut
        ));
    }
}
