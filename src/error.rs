//! Error types for the books service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

// == Store Error ==
/// Failure reported by the data store gateway.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connectivity, pool or constraint failure from the database driver
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// == Api Error Enum ==
/// Error type returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No row matched the requested id
    #[error("{0}")]
    NotFound(String),

    /// Malformed query string or path parameter
    #[error("{0}")]
    InvalidRequest(String),

    /// Store failure; `message` is what the client sees
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Builds a mapper that wraps a store failure with a client-facing message.
    ///
    /// ```ignore
    /// repo.create(payload).await.map_err(ApiError::store("Error inserting data"))?;
    /// ```
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { message, source }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store { message, source } => {
                // Driver detail goes to the log only
                error!(error = %source, "{}", message);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
