//! Ingredient table API.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use marom_core::{Ingredient, IngredientId};

use super::ApiJson;
use crate::db::ingredients::{self, IngredientPatch};
use crate::editor::EditError;
use crate::error::AppError;
use crate::state::AppState;

/// Build the ingredient table router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/catalog/ingredients", get(list).patch(update))
}

/// Body of `PATCH /api/catalog/ingredients`.
#[derive(Debug, Deserialize)]
pub struct IngredientUpdateRequest {
    pub id: IngredientId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub image: String,
}

/// Response after updating an ingredient.
#[derive(Debug, Serialize)]
pub struct IngredientUpdated {
    pub success: bool,
    pub ingredient: Ingredient,
}

/// GET /api/catalog/ingredients
#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Ingredient>>, AppError> {
    Ok(Json(ingredients::list(state.store()).await?))
}

/// PATCH /api/catalog/ingredients
#[instrument(skip(state, request), fields(ingredient_id = %request.id))]
async fn update(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<IngredientUpdateRequest>,
) -> Result<Json<IngredientUpdated>, AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(EditError::Required("Name").into());
    }
    let patch = IngredientPatch {
        name: name.to_string(),
        description: request.description,
        benefits: request
            .benefits
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect(),
        image: request.image,
        updated_at: Utc::now(),
    };
    let ingredient = ingredients::update(state.store(), &request.id, &patch).await?;
    Ok(Json(IngredientUpdated {
        success: true,
        ingredient,
    }))
}
