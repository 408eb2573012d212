//! Request-scoped failures and their HTTP mapping
//!
//! Callers only ever see a short generic message; the detail goes to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ResolveError;
use crate::proxy::validators::IconListError;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Malformed or incomplete inbound request. The message is shown to the caller.
    #[error("{0}")]
    ClientInput(&'static str),

    #[error("backend unreachable: {source}")]
    BackendUnavailable {
        #[source]
        source: reqwest::Error,
        message: &'static str,
    },

    #[error("backend answered {status}")]
    BackendRejected {
        status: reqwest::StatusCode,
        message: &'static str,
    },

    #[error("invalid icon data from backend: {0}")]
    ResponseShapeInvalid(#[from] IconListError),

    #[error(transparent)]
    UnknownModel(#[from] ResolveError),

    #[error("{0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::ClientInput(_) => StatusCode::BAD_REQUEST,
            ProxyError::BackendRejected { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::UnknownModel(_) => StatusCode::NOT_FOUND,
            ProxyError::BackendUnavailable { .. }
            | ProxyError::ResponseShapeInvalid(_)
            | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ProxyError::ClientInput(message) => *message,
            ProxyError::BackendRejected { message, .. } => *message,
            ProxyError::ResponseShapeInvalid(_) => "Invalid icon data format",
            ProxyError::UnknownModel(_) => "Unsupported model",
            ProxyError::BackendUnavailable { message, .. } => *message,
            ProxyError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::ClientInput(message) => {
                tracing::debug!("Rejected request: {}", message);
            }
            ProxyError::BackendRejected { status, .. } => {
                tracing::error!(
                    "Backend error: {}",
                    status.canonical_reason().unwrap_or(status.as_str())
                );
            }
            ProxyError::ResponseShapeInvalid(e) => {
                tracing::error!("Invalid icon format from backend: {}", e);
            }
            ProxyError::UnknownModel(e) => {
                tracing::warn!("{}", e);
            }
            ProxyError::BackendUnavailable { source, .. } => {
                tracing::error!("Fetch error: {:?}", source);
            }
            ProxyError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
            }
        }

        (self.status(), self.public_message()).into_response()
    }
}
