use crate::auth::auth::AuthUser;
use crate::error::AttendanceError;
use crate::model::notification::AdminNotification;
use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

/// All admin notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = [AdminNotification]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn list_notifications(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let notifications = sqlx::query_as::<_, AdminNotification>(
        r#"
        SELECT id, employee_id, message, is_read, created_at
        FROM admin_notifications
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(AttendanceError::from)?;

    Ok(HttpResponse::Ok().json(notifications))
}

/// Unread admin notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread",
    responses(
        (status = 200, description = "Unread notifications, newest first", body = [AdminNotification]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn unread_notifications(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let notifications = sqlx::query_as::<_, AdminNotification>(
        r#"
        SELECT id, employee_id, message, is_read, created_at
        FROM admin_notifications
        WHERE is_read = FALSE
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(AttendanceError::from)?;

    Ok(HttpResponse::Ok().json(notifications))
}

/// Mark one notification as read
#[utoipa::path(
    put,
    path = "/api/v1/notifications/{notification_id}/read",
    params(
        ("notification_id", Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Updated notification", body = AdminNotification),
        (status = 404, description = "Notification not found", body = Object, example = json!({
            "message": "Notification not found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn mark_read(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let notification_id = path.into_inner();

    // MySQL reports 0 affected rows for no-change updates, so existence is
    // decided by the follow-up read, not by rows_affected.
    sqlx::query("UPDATE admin_notifications SET is_read = TRUE WHERE id = ?")
        .bind(&notification_id)
        .execute(pool.get_ref())
        .await
        .map_err(AttendanceError::from)?;

    let notification = sqlx::query_as::<_, AdminNotification>(
        r#"
        SELECT id, employee_id, message, is_read, created_at
        FROM admin_notifications
        WHERE id = ?
        "#,
    )
    .bind(&notification_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(AttendanceError::from)?;

    match notification {
        Some(n) => Ok(HttpResponse::Ok().json(n)),
        None => Err(AttendanceError::NotFound("Notification not found".to_owned()).into()),
    }
}
