use crate::attendance::query::PaginatedEvents;
use crate::attendance::{calendar, ledger, query, summary};
use crate::auth::auth::AuthUser;
use crate::error::AttendanceError;
use crate::model::attendance::{
    AttendanceEvent, AttendanceStatus, DailySummary, MonthlyStats, RangeStats,
};
use crate::utils::notifier;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "c4ca4238-a0b9-4382-8dcc-509a6f75849b")]
    pub employee_id: String,
    #[schema(example = "CHECK_IN")]
    pub status: AttendanceStatus,
    /// Defaults to the current instant when omitted.
    #[schema(example = "2025-06-23T01:00:00Z", format = "date-time", value_type = Option<String>)]
    pub timestamp: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecordsQuery {
    /// Window start, YYYY-MM-DD; applied only together with end_date
    pub start_date: Option<String>,
    /// Window end, YYYY-MM-DD
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DateQuery {
    /// Calendar date, YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthQuery {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RangeQuery {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Restrict to one calendar day, YYYY-MM-DD
    pub date: Option<String>,
}

fn parse_optional_window(
    query: &RecordsQuery,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), AttendanceError> {
    let start = query
        .start_date
        .as_deref()
        .map(calendar::parse_date)
        .transpose()?;
    let end = query
        .end_date
        .as_deref()
        .map(calendar::parse_date)
        .transpose()?;
    Ok((start, end))
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    responses(
        (status = 200, description = "Checked in successfully", body = AttendanceEvent),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth
        .employee_id
        .clone()
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let event = ledger::check_in(pool.get_ref(), &employee_id).await?;

    Ok(HttpResponse::Ok().json(event))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceEvent),
        (status = 400, description = "No check-in found, or already checked out", body = Object, example = json!({
            "message": "No check-in record found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth
        .employee_id
        .clone()
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let event = ledger::check_out(pool.get_ref(), &employee_id).await?;

    Ok(HttpResponse::Ok().json(event))
}

/// Administrative attendance entry (back-dated entries allowed)
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event recorded", body = AttendanceEvent),
        (status = 400, description = "Duplicate entry for that day"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn create_event(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEventRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let payload = payload.into_inner();
    let event = ledger::create_event(
        pool.get_ref(),
        &payload.employee_id,
        payload.status,
        payload.timestamp,
        payload.location,
        payload.notes,
    )
    .await?;

    // Side-channel only; must never delay or fail the ledger write.
    notifier::notify_admins(
        pool.get_ref().clone(),
        event.employee_id.clone(),
        format!(
            "Manual attendance entry ({}) recorded by {}",
            event.status, auth.username
        ),
    );

    Ok(HttpResponse::Created().json(event))
}

/// Caller's own attendance history
#[utoipa::path(
    get,
    path = "/api/v1/attendance/my-records",
    params(RecordsQuery),
    responses(
        (status = 200, description = "Events, newest first", body = [AttendanceEvent]),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_records(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    params: web::Query<RecordsQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth
        .employee_id
        .clone()
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;
    let (start, end) = parse_optional_window(&params)?;

    let events = query::list_by_employee(pool.get_ref(), &employee_id, start, end).await?;

    Ok(HttpResponse::Ok().json(events))
}

/// One employee's attendance history (self or admin)
#[utoipa::path(
    get,
    path = "/api/v1/attendance/employee/{employee_id}/records",
    params(
        ("employee_id", Path, description = "Employee ID"),
        RecordsQuery
    ),
    responses(
        (status = 200, description = "Events, newest first", body = [AttendanceEvent]),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn employee_records(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    params: web::Query<RecordsQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    auth.require_self_or_admin(&employee_id)?;

    let (start, end) = parse_optional_window(&params)?;
    let events = query::list_by_employee(pool.get_ref(), &employee_id, start, end).await?;

    Ok(HttpResponse::Ok().json(events))
}

/// Caller's own daily summary
#[utoipa::path(
    get,
    path = "/api/v1/attendance/summary/daily",
    params(DateQuery),
    responses(
        (status = 200, description = "Daily summary", body = DailySummary),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_daily_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    params: web::Query<DateQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth
        .employee_id
        .clone()
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;
    let date = calendar::parse_date(&params.date)?;

    let summary = summary::daily_summary(pool.get_ref(), &employee_id, date).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// One employee's daily summary (self or admin)
#[utoipa::path(
    get,
    path = "/api/v1/attendance/summary/daily/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        DateQuery
    ),
    responses(
        (status = 200, description = "Daily summary", body = DailySummary),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn employee_daily_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    params: web::Query<DateQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    auth.require_self_or_admin(&employee_id)?;

    let date = calendar::parse_date(&params.date)?;
    let summary = summary::daily_summary(pool.get_ref(), &employee_id, date).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// Caller's own monthly stats
#[utoipa::path(
    get,
    path = "/api/v1/attendance/stats/monthly",
    params(MonthQuery),
    responses(
        (status = 200, description = "Monthly stats", body = MonthlyStats),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_monthly_stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    params: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth
        .employee_id
        .clone()
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let stats =
        summary::monthly_stats(pool.get_ref(), &employee_id, params.year, params.month).await?;

    Ok(HttpResponse::Ok().json(stats))
}

/// One employee's monthly stats (self or admin)
#[utoipa::path(
    get,
    path = "/api/v1/attendance/stats/monthly/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        MonthQuery
    ),
    responses(
        (status = 200, description = "Monthly stats", body = MonthlyStats),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn employee_monthly_stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    params: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    auth.require_self_or_admin(&employee_id)?;

    let stats =
        summary::monthly_stats(pool.get_ref(), &employee_id, params.year, params.month).await?;

    Ok(HttpResponse::Ok().json(stats))
}

/// Organization-wide stats over a date range (admin)
#[utoipa::path(
    get,
    path = "/api/v1/attendance/stats/range",
    params(RangeQuery),
    responses(
        (status = 200, description = "Range stats", body = RangeStats),
        (status = 400, description = "Malformed date or invalid range", body = Object, example = json!({
            "message": "Date range cannot exceed 365 days"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn range_stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    params: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let start = calendar::parse_date(&params.start_date)?;
    let end = calendar::parse_date(&params.end_date)?;
    let stats = summary::range_stats(pool.get_ref(), start, end).await?;

    Ok(HttpResponse::Ok().json(stats))
}

/// Paginated listing of all attendance events (admin)
#[utoipa::path(
    get,
    path = "/api/v1/attendance/all",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated events, newest first", body = PaginatedEvents),
        (status = 400, description = "Invalid pagination or date", body = Object, example = json!({
            "message": "limit must be between 1 and 100"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_all(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    params: web::Query<ListQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(10);
    let date = params
        .date
        .as_deref()
        .map(calendar::parse_date)
        .transpose()?;

    let result = query::list_all(pool.get_ref(), page, limit, date).await?;

    Ok(HttpResponse::Ok().json(result))
}
