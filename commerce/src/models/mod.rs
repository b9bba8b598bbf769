use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod auth;
pub mod bid;
pub mod comment;
pub mod listing;
pub mod money;
pub mod user;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlainSuccessResponse {
    pub status: u16,
    pub message: String,
}

impl PlainSuccessResponse {
    pub fn ok<S: Into<String>>(message: S) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: u16,
    pub inner_status: Option<u16>,
    pub message: String,
}

impl ErrorResponse {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status: status.as_u16(),
            inner_status: None,
            message: message.into(),
        }
    }

    pub fn with_inner_status<S: Into<String>>(inner_status: Option<u16>, message: S) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            inner_status,
            message: message.into(),
        }
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }
}

fn status_or_500(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for PlainSuccessResponse {
    fn into_response(self) -> Response {
        let code = status_or_500(self.status);
        let body = Json(self);

        (code, body).into_response()
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let code = status_or_500(self.status);
        let body = Json(self);

        (code, body).into_response()
    }
}

pub type GeneralResult<T> = Result<T, ErrorResponse>;
