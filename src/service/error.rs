use thiserror::Error;

use crate::error::{ErrorMessage, HttpError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{}", ErrorMessage::PinMismatch)]
    PinMismatch,

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Not authorized to perform this action")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Transfer failed: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match &error {
            ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),
            ServiceError::PinMismatch => HttpError::unauthorized(error.to_string()),
            ServiceError::InsufficientFunds { .. } => HttpError::payment_required(error.to_string()),
            ServiceError::Forbidden => HttpError::forbidden(error.to_string()),
            ServiceError::NotFound(_) => HttpError::not_found(error.to_string()),
            ServiceError::Conflict(_) => HttpError::conflict(error.to_string()),
            ServiceError::Upstream(_) => HttpError::bad_gateway(error.to_string()),
            ServiceError::Database(e) => {
                tracing::error!("database error: {}", e);
                HttpError::server_error("Internal Server Error")
            }
        }
    }
}
