use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use installs::{ExportError, InstallSourceError, SelectionError};
use serde::Serialize;
use servicetitan::ServiceTitanError;
use std::fmt;

use crate::config::MissingConfiguration;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<MissingConfiguration> for ApiError {
    fn from(err: MissingConfiguration) -> Self {
        tracing::error!("{}", err);
        Self::internal(err.to_string())
    }
}

impl From<ServiceTitanError> for ApiError {
    fn from(err: ServiceTitanError) -> Self {
        match err {
            // Relay the upstream answer untouched.
            ServiceTitanError::Upstream { status, body } => Self::new(status, body),
            ServiceTitanError::ResponseError(_) | ServiceTitanError::ParsingError(_) => {
                tracing::error!("ServiceTitan call failed: {}", err);
                Self::bad_gateway(err.to_string())
            }
        }
    }
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<InstallSourceError> for ApiError {
    fn from(err: InstallSourceError) -> Self {
        tracing::error!("Install source failed: {}", err);
        Self::unavailable(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        tracing::error!("CSV export failed: {}", err);
        Self::internal(err.to_string())
    }
}
