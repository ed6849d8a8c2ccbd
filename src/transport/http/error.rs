use crate::app::error::ServiceError;
use crate::domain::validate::ValidationFailure;
use crate::transport::http::types::ErrorBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const MALFORMED_MESSAGE: &str = "The value entered for the key was in the wrong format or was a string/text entered without being wrapped in quotes.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("Country name already exists in the database!")]
    DuplicateKey,

    #[error("Invalid resource URI: Invalid Country Name")]
    InvalidCountryName,

    #[error("Invalid resource URI - That country does not exist")]
    CountryDoesNotExist,

    #[error("Invalid resource URI: Invalid year")]
    InvalidYear,

    #[error("Malformed request body: {0}")]
    MalformedLiteral(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(failure) => ApiError::Validation(failure),
            ServiceError::DuplicateKey => ApiError::DuplicateKey,
            ServiceError::CountryNotFound => ApiError::CountryDoesNotExist,
            ServiceError::InvalidYear(_) => ApiError::InvalidYear,
            ServiceError::Store(store_err) => {
                tracing::error!(error = ?store_err, "Store error.");
                ApiError::Internal(store_err.to_string())
            }
        }
    }
}

fn not_found(message: String) -> (StatusCode, ErrorBody) {
    (
        StatusCode::NOT_FOUND,
        ErrorBody {
            status: 404,
            error: "Not found".to_string(),
            message: Some(message),
        },
    )
}

/// Converts `ApiError` into the HTTP status and `{status, error, message}` body.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(failure) => {
                tracing::debug!(%failure, "Payload rejected.");
                // Unknown keys keep a 404 in the body while the response itself is a 400.
                let body_status = match failure {
                    ValidationFailure::UnknownColumn { .. } => 404,
                    _ => 400,
                };
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        status: body_status,
                        error: failure.to_string(),
                        message: None,
                    },
                )
            }
            ApiError::DuplicateKey => (
                StatusCode::CONFLICT,
                ErrorBody {
                    status: 409,
                    error: "Database Integrity Error".to_string(),
                    message: Some("Country name already exists in the database!".to_string()),
                },
            ),
            e @ (ApiError::InvalidCountryName
            | ApiError::CountryDoesNotExist
            | ApiError::InvalidYear) => not_found(e.to_string()),
            ApiError::MalformedLiteral(detail) => {
                tracing::debug!(%detail, "Malformed request body.");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        status: 400,
                        error: "Bad Request".to_string(),
                        message: Some(MALFORMED_MESSAGE.to_string()),
                    },
                )
            }
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    status: 500,
                    error: "Internal Server Error".to_string(),
                    message: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
