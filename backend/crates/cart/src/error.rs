//! Cart Error Types
//!
//! Cart-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Cart-specific result type alias
pub type CartResult<T> = Result<T, CartError>;

#[derive(Debug, Error)]
pub enum CartError {
    /// Request body could not be read
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Device id is not a positive integer
    #[error("Invalid device ID")]
    InvalidDeviceId(i64),

    /// No such device in the catalog
    #[error("Device not found")]
    DeviceNotFound(i64),

    /// The device catalog could not be queried
    #[error("Device catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CartError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CartError::InvalidRequest(_) | CartError::InvalidDeviceId(_) => StatusCode::BAD_REQUEST,
            CartError::DeviceNotFound(_) => StatusCode::NOT_FOUND,
            CartError::CatalogUnavailable(_) | CartError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::InvalidRequest(_) | CartError::InvalidDeviceId(_) => ErrorKind::BadRequest,
            CartError::DeviceNotFound(_) => ErrorKind::NotFound,
            CartError::CatalogUnavailable(_) | CartError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CartError::CatalogUnavailable(msg) => {
                tracing::error!(message = %msg, "Device catalog unavailable");
            }
            CartError::Internal(msg) => {
                tracing::error!(message = %msg, "Cart internal error");
            }
            CartError::DeviceNotFound(id) => {
                tracing::info!(device_id = id, "Unknown device requested");
            }
            _ => {
                tracing::debug!(error = %self, "Cart error");
            }
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err.kind() {
            ErrorKind::InternalServerError => {
                AppError::internal("Internal server error").with_source(err)
            }
            kind => AppError::new(kind, err.to_string()),
        }
    }
}

impl From<sqlx::Error> for CartError {
    fn from(err: sqlx::Error) -> Self {
        CartError::CatalogUnavailable(err.to_string())
    }
}

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
