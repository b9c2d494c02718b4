//! CRM API: newsletter leads and contact messages.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use marom_core::{ContactMessage, Lead};

use crate::db::crm;
use crate::error::AppError;
use crate::state::AppState;

/// Build the CRM router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/crm/leads", get(leads))
        .route("/api/crm/messages", get(messages))
}

/// GET /api/crm/leads
#[instrument(skip(state))]
async fn leads(State(state): State<AppState>) -> Result<Json<Vec<Lead>>, AppError> {
    Ok(Json(crm::newsletter_leads(state.store()).await?))
}

/// GET /api/crm/messages
#[instrument(skip(state))]
async fn messages(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>, AppError> {
    Ok(Json(crm::contact_messages(state.store()).await?))
}
