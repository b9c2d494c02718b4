//! Catalog rows held in the hosted store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::Keyed;
use super::id::{IngredientId, ProductId};
use super::price::Price;
use super::status::ProductCategory;

/// A row of the `products` table.
///
/// Column names follow the storefront's JSON shape, which mixes camelCase
/// (`originalPrice`, `keyIngredients`) with snake_case (`ingredient_ids`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub price: Price,
    #[serde(
        rename = "originalPrice",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub category: ProductCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub benefits: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: Vec<String>,
    /// IDs of linked rows in the `ingredients` table. Never validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_ids: Option<Vec<IngredientId>>,
    #[serde(
        rename = "keyIngredients",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub key_ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub image: String,
}

impl Product {
    /// Whether the product links the given ingredient row.
    #[must_use]
    pub fn links_ingredient(&self, id: &IngredientId) -> bool {
        self.ingredient_ids
            .as_ref()
            .is_some_and(|ids| ids.contains(id))
    }
}

impl Keyed for Product {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// A row of the `ingredients` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Ingredient {
    /// Split a comma separated benefits field into trimmed, non-empty items.
    #[must_use]
    pub fn parse_benefits(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Benefits joined back into the comma separated form used by the editor.
    #[must_use]
    pub fn benefits_text(&self) -> String {
        self.benefits.join(", ")
    }
}

impl Keyed for Ingredient {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// Deserialize a JSON `null` array column as an empty vector.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_store_row() {
        let row = serde_json::json!({
            "id": "p1",
            "name": "Moringa Shampoo",
            "slug": "moringa-shampoo",
            "price": 590,
            "originalPrice": 690,
            "category": "Hair",
            "description": "Gentle daily shampoo",
            "benefits": ["Strengthens"],
            "ingredients": null,
            "ingredient_ids": ["i1", "i2"],
            "image": "/images/products/shampoo.png",
            "created_at": "2025-01-01T00:00:00Z"
        });

        let product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.name, "Moringa Shampoo");
        assert!(product.ingredients.is_empty());
        assert!(product.original_price.is_some());
        assert!(product.links_ingredient(&IngredientId::new("i2")));
        assert!(!product.links_ingredient(&IngredientId::new("i3")));
    }

    #[test]
    fn test_product_serializes_storefront_field_names() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Set",
            "category": "Set",
            "keyIngredients": ["moringa"]
        }))
        .unwrap();

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["keyIngredients"][0], "moringa");
        assert!(value.get("originalPrice").is_none());
        assert!(value.get("ingredient_ids").is_none());
    }

    #[test]
    fn test_parse_benefits() {
        assert_eq!(
            Ingredient::parse_benefits(" Hydrating, , Soothing ,Repairs"),
            vec!["Hydrating", "Soothing", "Repairs"]
        );
        assert!(Ingredient::parse_benefits(" , ").is_empty());
    }
}
