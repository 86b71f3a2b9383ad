use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Failure modes of the ledger and aggregation paths. Client-input and
/// business-rule violations map to 4xx; storage failures stay generic.
#[derive(Debug, Display)]
pub enum AttendanceError {
    #[display(fmt = "{}", _0)]
    InvalidDate(String),

    #[display(fmt = "{}", _0)]
    InvalidRange(String),

    #[display(fmt = "{}", _0)]
    InvalidPagination(String),

    #[display(fmt = "Already checked in today")]
    DuplicateCheckIn,

    #[display(fmt = "Already checked out today")]
    DuplicateCheckOut,

    #[display(fmt = "No check-in record found for today")]
    MissingCheckIn,

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for AttendanceError {}

impl From<sqlx::Error> for AttendanceError {
    fn from(e: sqlx::Error) -> Self {
        AttendanceError::Database(e)
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::InvalidDate(_)
            | AttendanceError::InvalidRange(_)
            | AttendanceError::InvalidPagination(_)
            | AttendanceError::DuplicateCheckIn
            | AttendanceError::DuplicateCheckOut
            | AttendanceError::MissingCheckIn => StatusCode::BAD_REQUEST,
            AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
            AttendanceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AttendanceError::Database(e) => {
                tracing::error!(error = %e, "Attendance storage failure");
                HttpResponse::InternalServerError().json(json!({
                    "message": "Internal Server Error"
                }))
            }
            other => HttpResponse::build(other.status_code()).json(json!({
                "message": other.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rule_violations_are_client_errors() {
        assert_eq!(
            AttendanceError::DuplicateCheckIn.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttendanceError::DuplicateCheckOut.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttendanceError::MissingCheckIn.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttendanceError::InvalidRange("too wide".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn lookup_and_storage_failures_keep_their_classes() {
        assert_eq!(
            AttendanceError::NotFound("Notification not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AttendanceError::from(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_match_the_wire_contract() {
        assert_eq!(
            AttendanceError::DuplicateCheckIn.to_string(),
            "Already checked in today"
        );
        assert_eq!(
            AttendanceError::MissingCheckIn.to_string(),
            "No check-in record found for today"
        );
    }
}
