use axum::{http::StatusCode, response::IntoResponse};
use lambda_http::tracing;
use utoipa::{PartialSchema, ToSchema};

use crate::{models::ErrorResponse, store::StoreError};

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
    #[error("JWT operation failed: {0}")]
    JWTError(#[from] jsonwebtoken::errors::Error),
    #[error("PasswordHash error: {0}")]
    PasswordHashError(#[from] scrypt::password_hash::Error),
    #[error("{1}")]
    HandlerError(StatusCode, String),
}

impl From<HandlerError> for ErrorResponse {
    fn from(value: HandlerError) -> Self {
        match &value {
            HandlerError::HandlerError(status, message) => ErrorResponse::new(*status, message),
            HandlerError::StoreError(e) => {
                tracing::error!("Store failure: {}", e);
                ErrorResponse::with_inner_status(e.inner_status(), value.to_string())
            }
            _ => {
                tracing::error!("Handler failure: {}", value);
                ErrorResponse::with_inner_status(None, value.to_string())
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
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::HandlerError(StatusCode::NOT_FOUND, format!("{} not found", what.into()))
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::HandlerError(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::HandlerError(StatusCode::FORBIDDEN, message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::HandlerError(StatusCode::CONFLICT, message.into())
    }
}
