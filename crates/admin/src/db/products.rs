//! `products` table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use marom_core::{IngredientId, Price, Product, ProductId};

use crate::store::{Direction, HostedStore, Select, StoreError, decode_row, decode_rows, encode};

pub const TABLE: &str = "products";

/// Columns the product editor writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPatch {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image: String,
    pub ingredient_ids: Vec<IngredientId>,
    pub ingredients: Vec<String>,
    pub benefits: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// All products ordered by name.
///
/// # Errors
///
/// Returns the store error, or `Decode` if a row is malformed.
pub async fn list(store: &dyn HostedStore) -> Result<Vec<Product>, StoreError> {
    let rows = store
        .select(TABLE, &Select::all().order_by("name", Direction::Ascending))
        .await?;
    decode_rows(TABLE, rows)
}

/// One product by id, `None` if absent.
///
/// # Errors
///
/// Returns the store error, or `Decode` if the row is malformed.
pub async fn get(store: &dyn HostedStore, id: &ProductId) -> Result<Option<Product>, StoreError> {
    let rows = store
        .select(TABLE, &Select::all().eq("id", id.as_str()).limit(1))
        .await?;
    rows.into_iter()
        .next()
        .map(|row| decode_row(TABLE, row))
        .transpose()
}

/// Apply the editor's patch to one product.
///
/// # Errors
///
/// `NotFound` when no product has `id`.
#[tracing::instrument(skip(store, patch), fields(product_id = %id))]
pub async fn update(
    store: &dyn HostedStore,
    id: &ProductId,
    patch: &ProductPatch,
) -> Result<Product, StoreError> {
    let row = store.update(TABLE, id.as_str(), encode(patch)?).await?;
    decode_row(TABLE, row)
}

/// Patch exactly the columns present in `columns` (the JSON API's PUT).
///
/// Columns absent from the map keep their stored values.
///
/// # Errors
///
/// `NotFound` when no product has `id`.
#[tracing::instrument(skip(store, columns), fields(product_id = %id, columns = columns.len()))]
pub async fn patch_columns(
    store: &dyn HostedStore,
    id: &ProductId,
    columns: Map<String, Value>,
) -> Result<Product, StoreError> {
    let row = store.update(TABLE, id.as_str(), Value::Object(columns)).await?;
    decode_row(TABLE, row)
}

/// Probe whether the `ingredient_ids` column exists.
///
/// # Errors
///
/// The store error when the column (or table) is missing.
pub async fn probe_ingredient_ids(store: &dyn HostedStore) -> Result<(), StoreError> {
    store
        .select(TABLE, &Select::all().columns("ingredient_ids").limit(1))
        .await
        .map(|_| ())
}
