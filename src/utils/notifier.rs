use sqlx::MySqlPool;
use uuid::Uuid;

/// Best-effort admin notification for auditable ledger activity. Runs off
/// the request path; a failure here is logged and never reaches the caller
/// of the write it accompanies.
pub fn notify_admins(pool: MySqlPool, employee_id: String, message: String) {
    actix_web::rt::spawn(async move {
        let id = Uuid::new_v4().to_string();
        let result = sqlx::query(
            r#"
            INSERT INTO admin_notifications (id, employee_id, message)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&employee_id)
        .bind(&message)
        .execute(&pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, employee_id, "Failed to record admin notification");
        }
    });
}
