//! File-backed collections: blog, legal, ingredient entries and site settings.
//!
//! PUT bodies replace the whole collection.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::instrument;

use marom_core::{BlogPost, IngredientEntry, LegalDocument, SiteSettings};

use super::{ApiJson, Success};
use crate::content::{DataFile, Document};
use crate::error::AppError;
use crate::state::AppState;

/// Build the content router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/blog", get(get_blog).put(put_blog))
        .route("/api/legal", get(get_legal).put(put_legal))
        .route("/api/ingredients", get(get_ingredients).put(put_ingredients))
        .route("/api/socials", get(get_socials).put(put_socials))
}

async fn replace<D: Document>(file: &DataFile<D>, doc: D) -> Result<Json<Success>, AppError> {
    file.write(&doc).await?;
    Ok(Success::ok())
}

/// GET /api/blog
#[instrument(skip(state))]
async fn get_blog(State(state): State<AppState>) -> Json<Vec<BlogPost>> {
    Json(state.content().blog().read().await)
}

/// PUT /api/blog
#[instrument(skip(state, posts), fields(count = posts.len()))]
async fn put_blog(
    State(state): State<AppState>,
    ApiJson(posts): ApiJson<Vec<BlogPost>>,
) -> Result<Json<Success>, AppError> {
    replace(state.content().blog(), posts).await
}

/// GET /api/legal
#[instrument(skip(state))]
async fn get_legal(State(state): State<AppState>) -> Json<Vec<LegalDocument>> {
    Json(state.content().legal().read().await)
}

/// PUT /api/legal
#[instrument(skip(state, docs), fields(count = docs.len()))]
async fn put_legal(
    State(state): State<AppState>,
    ApiJson(docs): ApiJson<Vec<LegalDocument>>,
) -> Result<Json<Success>, AppError> {
    replace(state.content().legal(), docs).await
}

/// GET /api/ingredients
#[instrument(skip(state))]
async fn get_ingredients(State(state): State<AppState>) -> Json<Vec<IngredientEntry>> {
    Json(state.content().ingredients().read().await)
}

/// PUT /api/ingredients
#[instrument(skip(state, entries), fields(count = entries.len()))]
async fn put_ingredients(
    State(state): State<AppState>,
    ApiJson(entries): ApiJson<Vec<IngredientEntry>>,
) -> Result<Json<Success>, AppError> {
    replace(state.content().ingredients(), entries).await
}

/// GET /api/socials
#[instrument(skip(state))]
async fn get_socials(State(state): State<AppState>) -> Json<SiteSettings> {
    Json(state.content().settings().read().await)
}

/// PUT /api/socials
#[instrument(skip(state, settings))]
async fn put_socials(
    State(state): State<AppState>,
    ApiJson(settings): ApiJson<SiteSettings>,
) -> Result<Json<Success>, AppError> {
    replace(state.content().settings(), settings).await
}
