use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use healthstore_core::CoreError;
use healthstore_sale::{SaleError, TerminalError};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    /// The register refused a change; `code` tells the UI which message to show.
    SaleRejected {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, "VALIDATION", msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::SaleRejected { status, code, message } => (status, code, message),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => AppError::ValidationError(msg),
            CoreError::NotFound(msg) => AppError::NotFoundError(msg),
            CoreError::Conflict(msg) => AppError::ConflictError(msg),
            CoreError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<SaleError> for AppError {
    fn from(err: SaleError) -> Self {
        let (status, code) = match &err {
            SaleError::OutOfStock { .. } => (StatusCode::CONFLICT, "OUT_OF_STOCK"),
            SaleError::StockLimitExceeded { .. } => (StatusCode::CONFLICT, "STOCK_LIMIT_EXCEEDED"),
            SaleError::EmptySale => (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_SALE"),
            SaleError::InvalidQuantity { .. } => (StatusCode::BAD_REQUEST, "INVALID_QUANTITY"),
        };
        AppError::SaleRejected {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl From<TerminalError> for AppError {
    fn from(err: TerminalError) -> Self {
        match err {
            TerminalError::Sale(err) => err.into(),
            TerminalError::ProductNotFound(id) => AppError::NotFoundError(format!("product {}", id)),
            TerminalError::CustomerNotFound(id) => AppError::NotFoundError(format!("customer {}", id)),
            TerminalError::Lookup(err) => err.into(),
        }
    }
}
