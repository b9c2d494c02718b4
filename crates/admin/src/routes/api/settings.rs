//! Settings documents kept in `content_blocks`.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use marom_core::{BrandSettings, SmtpSettings};

use super::{ApiJson, Success};
use crate::db::content_blocks;
use crate::error::AppError;
use crate::state::AppState;

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/settings/smtp", get(get_smtp).put(put_smtp))
        .route("/api/settings/brand", get(get_brand).put(put_brand))
}

/// GET /api/settings/smtp
#[instrument(skip(state))]
async fn get_smtp(State(state): State<AppState>) -> Result<Json<SmtpSettings>, AppError> {
    Ok(Json(content_blocks::smtp(state.store()).await?))
}

/// PUT /api/settings/smtp
#[instrument(skip(state, settings))]
async fn put_smtp(
    State(state): State<AppState>,
    ApiJson(settings): ApiJson<SmtpSettings>,
) -> Result<Json<Success>, AppError> {
    content_blocks::put(state.store(), SmtpSettings::SECTION_KEY, &settings).await?;
    Ok(Success::ok())
}

/// GET /api/settings/brand
#[instrument(skip(state))]
async fn get_brand(State(state): State<AppState>) -> Result<Json<BrandSettings>, AppError> {
    Ok(Json(content_blocks::brand(state.store()).await?))
}

/// PUT /api/settings/brand
#[instrument(skip(state, settings))]
async fn put_brand(
    State(state): State<AppState>,
    ApiJson(settings): ApiJson<BrandSettings>,
) -> Result<Json<Success>, AppError> {
    content_blocks::put(state.store(), BrandSettings::SECTION_KEY, &settings).await?;
    Ok(Success::ok())
}
