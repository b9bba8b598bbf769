use axum::{http::StatusCode, response::IntoResponse};
use lambda_http::tracing;
use utoipa::{PartialSchema, ToSchema};

use crate::{models::ErrorResponse, storage::StorageError};

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("{1}")]
    HandlerError(StatusCode, String),
}

impl From<HandlerError> for ErrorResponse {
    fn from(value: HandlerError) -> Self {
        match &value {
            HandlerError::HandlerError(status, message) => ErrorResponse::new(*status, message),
            HandlerError::StorageError(e) => {
                tracing::error!("Storage failure: {}", e);
                ErrorResponse::with_inner_status(e.inner_status(), value.to_string())
            }
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        ErrorResponse::from(self).into_response()
    }
}

impl PartialSchema for HandlerError {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ErrorResponse::schema()
    }
}

impl ToSchema for HandlerError {
    fn schemas(
        schemas: &mut Vec<(
            String,
            utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>,
        )>,
    ) {
        <ErrorResponse as ToSchema>::schemas(schemas);
    }
}

impl HandlerError {
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::HandlerError(StatusCode::NOT_FOUND, message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::HandlerError(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::HandlerError(StatusCode::CONFLICT, message.into())
    }
}
