use chrono::NaiveDate;
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::attendance::{calendar, store};
use crate::error::AttendanceError;
use crate::model::attendance::AttendanceEvent;

pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedEvents {
    pub data: Vec<AttendanceEvent>,
    #[schema(example = 42)]
    pub total: i64,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub limit: u32,
    #[schema(example = 5)]
    pub total_pages: u32,
}

pub fn validate_pagination(page: u32, limit: u32) -> Result<(), AttendanceError> {
    if page < 1 {
        return Err(AttendanceError::InvalidPagination(
            "page must be 1 or greater".to_owned(),
        ));
    }
    if limit < 1 || limit > MAX_LIMIT {
        return Err(AttendanceError::InvalidPagination(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(())
}

pub fn total_pages(total: i64, limit: u32) -> u32 {
    ((total + limit as i64 - 1) / limit as i64) as u32
}

/// Bounded listing of the whole ledger, newest first. An optional date filter
/// restricts to that day's window before paging.
pub async fn list_all(
    pool: &MySqlPool,
    page: u32,
    limit: u32,
    date: Option<NaiveDate>,
) -> Result<PaginatedEvents, AttendanceError> {
    validate_pagination(page, limit)?;

    let window = date.map(calendar::day_bounds);
    let total = store::count_events(pool, window).await?;
    let skip = (page as i64 - 1) * limit as i64;
    let data = store::events_page_desc(pool, window, limit, skip).await?;

    Ok(PaginatedEvents {
        data,
        total,
        page,
        limit,
        total_pages: total_pages(total, limit),
    })
}

/// One employee's events, newest first. The date window applies only when
/// both bounds are supplied; the end bound covers its entire day.
pub async fn list_by_employee(
    pool: &MySqlPool,
    employee_id: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<AttendanceEvent>, AttendanceError> {
    let window = match (start, end) {
        (Some(start), Some(end)) => {
            Some((calendar::day_bounds(start).0, calendar::day_bounds(end).1))
        }
        _ => None,
    };

    Ok(store::events_for_employee_desc(pool, employee_id, window).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_bounds_are_enforced() {
        assert!(validate_pagination(1, 1).is_ok());
        assert!(validate_pagination(1, 100).is_ok());
        assert!(validate_pagination(250, 10).is_ok());
        for (page, limit) in [(0, 10), (1, 0), (1, 101)] {
            assert!(
                matches!(
                    validate_pagination(page, limit),
                    Err(AttendanceError::InvalidPagination(_))
                ),
                "expected page={page} limit={limit} to be rejected"
            );
        }
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(100, 10), 10);
        assert_eq!(total_pages(101, 10), 11);
        assert_eq!(total_pages(99, 100), 1);
    }
}
