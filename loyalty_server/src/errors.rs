use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use loyalty_engine::{BalanceApiError, OrderUploadError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("The user id header is missing or empty")]
    Unauthenticated,
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0}")]
    OrderConflict(String),
    #[error("Invalid order number. {0}")]
    InvalidOrderNumber(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::OrderConflict(_) => StatusCode::CONFLICT,
            Self::InvalidOrderNumber(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Backend details stay in the log
        let message = if status.is_server_error() {
            error!("💻️ {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": message }).to_string())
    }
}

impl From<OrderUploadError> for ServerError {
    fn from(e: OrderUploadError) -> Self {
        match e {
            OrderUploadError::InvalidOrderNumber(e) => Self::InvalidOrderNumber(e.to_string()),
            OrderUploadError::OwnedByAnotherUser(_) => Self::OrderConflict(e.to_string()),
            OrderUploadError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<BalanceApiError> for ServerError {
    fn from(e: BalanceApiError) -> Self {
        match e {
            BalanceApiError::InvalidOrderNumber(e) => Self::InvalidOrderNumber(e.to_string()),
            BalanceApiError::InvalidAmount(s) => Self::InvalidRequestBody(s),
            BalanceApiError::UserNotFound(_) => Self::NoRecordFound(e.to_string()),
            BalanceApiError::InsufficientFunds => Self::InsufficientFunds,
            BalanceApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}
