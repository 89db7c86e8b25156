use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;
use crate::payroll::{FailureDetail, PayrollError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    Payroll(#[from] PayrollError),

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

fn payroll_status(error: &PayrollError) -> StatusCode {
    match error {
        PayrollError::EmployeeNotFound { .. } => StatusCode::NOT_FOUND,
        PayrollError::InvalidPeriod(_) | PayrollError::MonthOutOfRange(_) => {
            StatusCode::BAD_REQUEST
        }
        PayrollError::ParameterNotConfigured { .. }
        | PayrollError::ConflictingParameters { .. }
        | PayrollError::NoBracketConfigured { .. }
        | PayrollError::BracketGapOrOverlap { .. }
        | PayrollError::EmployeeInactive { .. }
        | PayrollError::NegativeDeduction { .. }
        | PayrollError::DeductionsExceedGross { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Payroll(error) => payroll_status(error),
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        log::error!(
            "Request failed with status {}: {}",
            status_code,
            error_message
        );

        match self {
            AppError::Payroll(error) => HttpResponse::build(status_code).json(
                ApiResponse::error_with_data(FailureDetail::from(error), &error_message),
            ),
            _ => HttpResponse::build(status_code).json(ApiResponse::<()>::error(&error_message)),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl AppError {
    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    pub fn payroll(&self) -> Option<&PayrollError> {
        match self {
            AppError::Payroll(error) => Some(error),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => AppError::DatabaseError(sqlx_err),
            Err(original_error) => AppError::InternalServerError(Some(original_error.to_string())),
        }
    }
}
