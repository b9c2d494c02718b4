//! Product API over the hosted `products` table.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;

use marom_core::{Product, ProductId};

use super::ApiJson;
use crate::db::products;
use crate::error::AppError;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/products", get(list).put(update))
}

/// Response after updating a product.
#[derive(Debug, Serialize)]
pub struct ProductUpdated {
    pub success: bool,
    pub product: Product,
}

/// Split a PUT body into the product id and the columns to write.
///
/// # Errors
///
/// `BadRequest` when `id` is missing, blank or not a string.
pub fn split_id(mut body: Map<String, Value>) -> Result<(ProductId, Map<String, Value>), AppError> {
    match body.remove("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok((ProductId::new(id.trim()), body)),
        _ => Err(AppError::BadRequest("Product ID is required".to_string())),
    }
}

/// GET /api/products
#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(products::list(state.store()).await?))
}

/// PUT /api/products
///
/// Only the keys present in the body are written.
#[instrument(skip(state, body))]
async fn update(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Map<String, Value>>,
) -> Result<Json<ProductUpdated>, AppError> {
    let (id, columns) = split_id(body)?;
    let product = products::patch_columns(state.store(), &id, columns).await?;
    Ok(Json(ProductUpdated {
        success: true,
        product,
    }))
}
