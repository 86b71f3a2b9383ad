use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Admin-facing notification row. Delivery to admins is handled elsewhere;
/// this service only records and lists them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AdminNotification {
    #[schema(example = "45c48cce-2e2d-4fbd-aa84-05fbc35e7c1a")]
    pub id: String,
    #[schema(example = "c4ca4238-a0b9-4382-8dcc-509a6f75849b")]
    pub employee_id: String,
    #[schema(example = "Manual attendance entry recorded")]
    pub message: String,
    pub is_read: bool,
    #[schema(example = "2025-06-23T09:30:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}
