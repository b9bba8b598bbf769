use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod entry;

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
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let code = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);

        (code, body).into_response()
    }
}
