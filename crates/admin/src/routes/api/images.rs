//! Local product image library.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use crate::services::images::{ImageFile, list_product_images};
use crate::state::AppState;

/// Build the images router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/images", get(list))
}

/// GET /api/images
#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Json<Vec<ImageFile>> {
    Json(list_product_images(&state.config().product_images_dir()).await)
}
