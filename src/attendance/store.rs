use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use crate::model::attendance::{AttendanceEvent, AttendanceStatus};

/// Append and window/range queries over `attendance_records`. Events are
/// append-only; nothing here updates or deletes.

pub async fn insert_event(pool: &MySqlPool, event: &AttendanceEvent) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO attendance_records (id, employee_id, ts, status, location, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&event.id)
    .bind(&event.employee_id)
    .bind(event.timestamp)
    .bind(event.status)
    .bind(&event.location)
    .bind(&event.notes)
    .execute(pool)
    .await?;

    Ok(())
}

/// SQLSTATE 23000 = the composite unique index rejected a same-day duplicate.
/// The append path treats this as the authoritative duplicate signal.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        db_err.code().as_deref() == Some("23000")
    } else {
        false
    }
}

pub async fn exists_with_status(
    pool: &MySqlPool,
    employee_id: &str,
    status: AttendanceStatus,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let hit: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT 1 FROM attendance_records
        WHERE employee_id = ? AND status = ? AND ts BETWEEN ? AND ?
        LIMIT 1
        "#,
    )
    .bind(employee_id)
    .bind(status)
    .bind(start)
    .bind(end)
    .fetch_optional(pool)
    .await?;

    Ok(hit.is_some())
}

pub async fn events_for_employee_between_asc(
    pool: &MySqlPool,
    employee_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<AttendanceEvent>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceEvent>(
        r#"
        SELECT id, employee_id, ts, status, location, notes
        FROM attendance_records
        WHERE employee_id = ? AND ts BETWEEN ? AND ?
        ORDER BY ts ASC
        "#,
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn events_between_asc(
    pool: &MySqlPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<AttendanceEvent>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceEvent>(
        r#"
        SELECT id, employee_id, ts, status, location, notes
        FROM attendance_records
        WHERE ts BETWEEN ? AND ?
        ORDER BY ts ASC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn events_for_employee_desc(
    pool: &MySqlPool,
    employee_id: &str,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> Result<Vec<AttendanceEvent>, sqlx::Error> {
    match window {
        Some((start, end)) => {
            sqlx::query_as::<_, AttendanceEvent>(
                r#"
                SELECT id, employee_id, ts, status, location, notes
                FROM attendance_records
                WHERE employee_id = ? AND ts BETWEEN ? AND ?
                ORDER BY ts DESC
                "#,
            )
            .bind(employee_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, AttendanceEvent>(
                r#"
                SELECT id, employee_id, ts, status, location, notes
                FROM attendance_records
                WHERE employee_id = ?
                ORDER BY ts DESC
                "#,
            )
            .bind(employee_id)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn count_events(
    pool: &MySqlPool,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> Result<i64, sqlx::Error> {
    match window {
        Some((start, end)) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM attendance_records WHERE ts BETWEEN ? AND ?",
            )
            .bind(start)
            .bind(end)
            .fetch_one(pool)
            .await
        }
        None => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance_records")
                .fetch_one(pool)
                .await
        }
    }
}

pub async fn events_page_desc(
    pool: &MySqlPool,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    limit: u32,
    offset: i64,
) -> Result<Vec<AttendanceEvent>, sqlx::Error> {
    match window {
        Some((start, end)) => {
            sqlx::query_as::<_, AttendanceEvent>(
                r#"
                SELECT id, employee_id, ts, status, location, notes
                FROM attendance_records
                WHERE ts BETWEEN ? AND ?
                ORDER BY ts DESC, id DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(start)
            .bind(end)
            .bind(limit as i64)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, AttendanceEvent>(
                r#"
                SELECT id, employee_id, ts, status, location, notes
                FROM attendance_records
                ORDER BY ts DESC, id DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(limit as i64)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolClosed));
    }
}
