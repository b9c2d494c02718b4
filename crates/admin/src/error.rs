//! Unified error handling for admin.
//!
//! Every failure reaching a route boundary becomes a JSON body
//! `{"error": "..."}` with a status chosen by the error's layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::content::ContentError;
use crate::editor::EditError;
use crate::services::email::EmailError;
use crate::store::StoreError;

/// Application-level error type for the admin dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or writing a storefront data file failed.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// The hosted store rejected or failed a call.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Storing an uploaded file failed.
    #[error("Upload failed: {0}")]
    Upload(#[source] StoreError),

    /// A single-record editor refused the input.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Sending the SMTP test message failed.
    #[error(transparent)]
    Email(#[from] EmailError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Malformed or incomplete request.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::NotFound { .. })
            | Self::Edit(EditError::NotFound { .. })
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Edit(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Email(e) if e.is_invalid_request() => StatusCode::BAD_REQUEST,
            Self::Content(_)
            | Self::Store(_)
            | Self::Upload(_)
            | Self::Email(_)
            | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
