use crate::auth::AuthError;
use crate::static_files::StaticFileError;
use crate::token::IssueError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<IssueError> for ApiError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::UnknownRealm(_) => Self::NotFound,
            IssueError::Capability(inner) => Self::Internal(inner.to_string()),
        }
    }
}

impl From<StaticFileError> for ApiError {
    fn from(err: StaticFileError) -> Self {
        match err {
            StaticFileError::Escapes(requested) => {
                tracing::warn!(%requested, "Rejected static path outside its root");
                Self::NotFound
            }
            StaticFileError::Missing(_) => Self::NotFound,
            StaticFileError::Read { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(err) => err.into_response(),
            Self::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            Self::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
