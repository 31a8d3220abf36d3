use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use artifex_registry::RegistryError;
use artifex_types::PathError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PathError> for ServerError {
    fn from(e: PathError) -> Self {
        Self::Registry(RegistryError::Path(e))
    }
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            // Malformed names are the caller's mistake.
            Self::Registry(RegistryError::Path(_)) => StatusCode::BAD_REQUEST,
            // Everything else is a fault on our side of the boundary.
            Self::Registry(RegistryError::Store(_))
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "result": false, "error": self.to_string() }))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
