//! HTTP rendering of [`ServiceError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{protocol::ErrorResponse, ErrorKind, ServiceError};
use tracing::{error, warn};

/// Error returned from HTTP handlers; renders as `{message, statusCode}`.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.0.kind() {
            ErrorKind::Internal => error!(status = status.as_u16(), error = %self.0, "request failed"),
            _ => warn!(status = status.as_u16(), error = %self.0, "request rejected"),
        }

        let body = ErrorResponse::new(status.as_u16(), self.0.message());
        (status, Json(body)).into_response()
    }
}
