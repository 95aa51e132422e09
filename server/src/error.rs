//! HTTP error mapping
//!
//! Client mistakes get a 4xx with a short plain-text body. Everything else
//! is logged and answered with a generic 500.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use agri_assist::AgriAssistError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No file uploaded.")]
    NoFile,

    #[error("Upload rejected: {1}")]
    Multipart(StatusCode, String),

    #[error("Could not read image: {0}")]
    UndecodableImage(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Template error: {0}")]
    Template(#[from] tinytemplate::error::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Internal(AgriAssistError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFile | ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::Multipart(status, _) => *status,
            ApiError::UndecodableImage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Template(_) | ApiError::Join(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AgriAssistError> for ApiError {
    fn from(err: AgriAssistError) -> Self {
        match err {
            AgriAssistError::ImageDecode(msg) => ApiError::UndecodableImage(msg),
            AgriAssistError::MissingField(field) => ApiError::MissingField(field),
            other => ApiError::Internal(other),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
            return (status, "Internal server error").into_response();
        }
        (status, self.to_string()).into_response()
    }
}
