//! SMTP test endpoint.

use axum::{Json, Router, routing::post};
use serde::Serialize;
use tracing::instrument;

use super::ApiJson;
use crate::error::AppError;
use crate::services::email::{SmtpTestRequest, send_test_email};
use crate::state::AppState;

/// Message returned after a successful test.
pub const SENT_MESSAGE: &str = "Test email sent successfully!";

/// Build the SMTP test router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/test-smtp", post(test_smtp))
}

/// Response after sending the test email.
#[derive(Debug, Serialize)]
pub struct SmtpTestResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/test-smtp
#[instrument(skip(request))]
async fn test_smtp(
    ApiJson(request): ApiJson<SmtpTestRequest>,
) -> Result<Json<SmtpTestResponse>, AppError> {
    send_test_email(&request).await?;
    Ok(Json(SmtpTestResponse {
        success: true,
        message: SENT_MESSAGE,
    }))
}
