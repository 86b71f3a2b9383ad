use crate::api::attendance::CreateEventRequest;
use crate::attendance::query::PaginatedEvents;
use crate::model::attendance::{
    AttendanceEvent, AttendanceStatus, DailyActivity, DailySummary, DayStatus, MonthlyStats,
    RangeStats,
};
use crate::model::notification::AdminNotification;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Service API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Service

This API records employee check-in/check-out events on an append-only ledger
and derives the summaries used for payroll and compliance reporting.

### 🔹 Key Features
- **Attendance Ledger**
  - Daily check-in and check-out with one-per-day enforcement
  - Administrative back-dated entries
- **Reporting**
  - Daily summaries, monthly stats, organization-wide range stats
  - Paginated event listing with date filter
- **Admin Notifications**
  - Review and acknowledge notifications raised by manual entries

### 🔐 Security
All endpoints are protected using **JWT Bearer authentication** issued by the
identity service. Organization-wide views require the **Admin** role.

### 📦 Response Format
- JSON-based RESTful responses
- All timestamps are absolute UTC instants

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::create_event,
        crate::api::attendance::my_records,
        crate::api::attendance::employee_records,
        crate::api::attendance::my_daily_summary,
        crate::api::attendance::employee_daily_summary,
        crate::api::attendance::my_monthly_stats,
        crate::api::attendance::employee_monthly_stats,
        crate::api::attendance::range_stats,
        crate::api::attendance::list_all,

        crate::api::notification::list_notifications,
        crate::api::notification::unread_notifications,
        crate::api::notification::mark_read
    ),
    components(
        schemas(
            AttendanceEvent,
            AttendanceStatus,
            CreateEventRequest,
            DayStatus,
            DailySummary,
            MonthlyStats,
            DailyActivity,
            RangeStats,
            PaginatedEvents,
            AdminNotification
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance ledger and reporting APIs"),
        (name = "Notification", description = "Admin notification APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
