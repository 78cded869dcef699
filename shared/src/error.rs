use std::time::Duration;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Rejections of caller input. None of these ever reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field `{0}` is required")]
    MissingField(&'static str),
    #[error("start time {start} must be before end time {end}")]
    InvalidTimeRange { start: String, end: String },
    #[error("`{0}` is not a valid email address")]
    InvalidEmail(String),
    #[error("`{0}` is not a bookable area")]
    UnknownArea(String),
    #[error("`{0}` is not one of the available time slots")]
    InvalidTimeSlot(String),
    #[error("`{0}` is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("date {0} is in the past")]
    PastDate(String),
    #[error("at least one search criterion is required")]
    EmptyCriteria,
    #[error("search criterion `{field}` has an invalid value `{value}`")]
    InvalidCriterion { field: &'static str, value: String },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidTimeRange { .. } => "INVALID_TIME_RANGE",
            Self::InvalidEmail(_) => "INVALID_EMAIL",
            Self::UnknownArea(_) => "UNKNOWN_AREA",
            Self::InvalidTimeSlot(_) => "INVALID_TIME_SLOT",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::PastDate(_) => "PAST_DATE",
            Self::EmptyCriteria => "EMPTY_CRITERIA",
            Self::InvalidCriterion { .. } => "INVALID_CRITERION",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("your input was invalid: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    InvalidRequest(#[from] garde::Report),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("we couldn't find that record: {0}")]
    EntityNotFound(String),
    #[error("reservation {reservation_id} cannot move from {current} to {target}")]
    InvalidTransition {
        reservation_id: String,
        current: String,
        target: String,
    },
    #[error("{0}")]
    ReservationConflict(String),
    #[error(
        "reservation {reservation_id} was saved, but the {kind} notification could not be sent: {message}"
    )]
    NotificationDispatchFailed {
        reservation_id: String,
        kind: String,
        message: String,
    },
    #[error("the reservation store is unavailable")]
    StoreUnavailable(#[from] sqlx::Error),
    #[error("{operation} timed out after {millis}ms", millis = .after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    #[error("{0}")]
    ExternalServiceError(String),
    #[error("{0}")]
    ConversionEntityError(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code(),
            Self::InvalidRequest(_) | Self::MalformedRequest(_) => "INVALID_REQUEST",
            Self::EntityNotFound(_) => "NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ReservationConflict(_) => "RESERVATION_CONFLICT",
            Self::NotificationDispatchFailed { .. } => "NOTIFICATION_DISPATCH_FAILED",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Timeout { .. } => "TIMEOUT",
            Self::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            Self::ConversionEntityError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(ValidationError::EmptyCriteria)
            | Self::InvalidRequest(_)
            | Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::EntityNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTransition { .. } | Self::ReservationConflict(_) => StatusCode::CONFLICT,
            Self::NotificationDispatchFailed { .. } | Self::ExternalServiceError(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::ConversionEntityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the bounded retry policy may repeat the failed call.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_)
                | Self::ExternalServiceError(_)
                | Self::NotificationDispatchFailed { .. }
        )
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reservation_id: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
        }

        let reservation_id = match &self {
            Self::NotificationDispatchFailed { reservation_id, .. } => Some(reservation_id.clone()),
            _ => None,
        };
        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
            reservation_id,
        };

        (status_code, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
