use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error payload returned by every endpoint: a short machine-readable
/// `error` plus, where safe, a human-readable `message`. Internal
/// detail belongs in the logs, not here.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

pub fn error_response(status: StatusCode, error: ApiError) -> Response {
    (status, Json(error)).into_response()
}

/// Success envelope for read endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiData<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiData<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
