use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// A cadence token that is neither `HALFYEAR` nor `YEAR`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid reminder frequency: {0}")]
pub struct CadenceParseError(pub String);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("Client {0} not found")]
    NotFound(i32),
    #[error("Stored client {client_id} is invalid: {source}")]
    InvalidCadence {
        client_id: i32,
        #[source]
        source: CadenceParseError,
    },
}

/// JSON error body returned by the HTTP API.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl ApiError {
    pub fn bad_request(description: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "bad_request".to_string(),
            error_description: Some(description.into()),
        }
    }

    pub fn not_found(description: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: "not_found".to_string(),
            error_description: Some(description.into()),
        }
    }

    pub fn server_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "server_error".to_string(),
            error_description: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::not_found(format!("Client {id} not found")),
            other => {
                tracing::error!(
                    name = "api.store_error",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    error = %other,
                    message = "Storage operation failed"
                );
                ApiError::server_error()
            }
        }
    }
}

impl From<CadenceParseError> for ApiError {
    fn from(err: CadenceParseError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
