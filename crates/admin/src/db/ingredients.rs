//! `ingredients` table.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marom_core::{Ingredient, IngredientId};

use crate::store::{Direction, HostedStore, Select, StoreError, decode_row, decode_rows, encode};

pub const TABLE: &str = "ingredients";

/// Columns the ingredient editor writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientPatch {
    pub name: String,
    pub description: String,
    pub benefits: Vec<String>,
    pub image: String,
    pub updated_at: DateTime<Utc>,
}

/// All ingredients ordered by name.
///
/// # Errors
///
/// Returns the store error (`MissingTable` before setup), or `Decode`.
pub async fn list(store: &dyn HostedStore) -> Result<Vec<Ingredient>, StoreError> {
    let rows = store
        .select(TABLE, &Select::all().order_by("name", Direction::Ascending))
        .await?;
    decode_rows(TABLE, rows)
}

/// One ingredient by id, `None` if absent.
///
/// # Errors
///
/// Returns the store error, or `Decode` if the row is malformed.
pub async fn get(
    store: &dyn HostedStore,
    id: &IngredientId,
) -> Result<Option<Ingredient>, StoreError> {
    let rows = store
        .select(TABLE, &Select::all().eq("id", id.as_str()).limit(1))
        .await?;
    rows.into_iter()
        .next()
        .map(|row| decode_row(TABLE, row))
        .transpose()
}

/// Apply the editor's patch to one ingredient.
///
/// # Errors
///
/// `NotFound` when no ingredient has `id`.
#[tracing::instrument(skip(store, patch), fields(ingredient_id = %id))]
pub async fn update(
    store: &dyn HostedStore,
    id: &IngredientId,
    patch: &IngredientPatch,
) -> Result<Ingredient, StoreError> {
    let row = store.update(TABLE, id.as_str(), encode(patch)?).await?;
    decode_row(TABLE, row)
}

/// Probe the table with a one-row read; returns the sample row if any.
///
/// # Errors
///
/// The store error when the table is missing or unreachable.
pub async fn probe(store: &dyn HostedStore) -> Result<Option<serde_json::Value>, StoreError> {
    let rows = store.select(TABLE, &Select::all().limit(1)).await?;
    Ok(rows.into_iter().next())
}
