use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::accounts::{
    dto::MessageResponse,
    repo::{DuplicateField, StoreError},
};

pub type RegisterResult<T> = Result<T, RegisterError>;

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// Missing or unreadable input (400).
    #[error("{0}")]
    Validation(String),

    /// Username or email already taken (409).
    #[error("{0} already registered")]
    Duplicate(DuplicateField),

    /// Store unreachable, schema failure or any other write failure (500).
    #[error("internal server error while registering account: {0}")]
    StorageUnavailable(String),
}

impl RegisterError {
    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::Validation(format!(
            "all required fields must be provided; missing: {}",
            fields.join(", ")
        ))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Duplicate(_) => StatusCode::CONFLICT,
            Self::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for RegisterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => Self::Duplicate(field),
            StoreError::Unavailable(e) => Self::StorageUnavailable(e.to_string()),
        }
    }
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "registration failed");
        } else {
            tracing::warn!(error = %self, "registration rejected");
        }

        let body = MessageResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
