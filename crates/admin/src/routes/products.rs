//! Product pages: listing and editor.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tracing::instrument;

use marom_core::{Ingredient, Product, ProductId};

use crate::db::{ingredients, products};
use crate::editor::ProductForm;
use crate::error::AppError;
use crate::filters;
use crate::routes::layout::{FlashQuery, Layout, redirect_error, redirect_success};
use crate::state::AppState;

/// Build the product pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(index))
        .route("/products/{id}", get(edit).post(save))
}

/// Product row.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub original_price: Option<String>,
    pub image: String,
    pub ingredient_count: usize,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.to_string(),
            price: product.price.display(),
            original_price: product.original_price.map(|p| p.display()),
            image: product.image.clone(),
            ingredient_count: product.ingredient_ids.as_ref().map_or(0, Vec::len),
        }
    }
}

/// Checklist entry in the product editor.
#[derive(Debug, Clone)]
pub struct IngredientOption {
    pub id: String,
    pub name: String,
    pub checked: bool,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub layout: Layout,
    pub products: Vec<ProductRow>,
    pub load_error: Option<String>,
}

/// Product editor template.
#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct ProductEditTemplate {
    pub layout: Layout,
    pub id: String,
    pub form: ProductForm,
    pub ingredients: Vec<IngredientOption>,
    pub ingredients_error: Option<String>,
    pub load_error: Option<String>,
}

/// GET /products
#[instrument(skip(state))]
async fn index(State(state): State<AppState>, Query(flash): Query<FlashQuery>) -> ProductsTemplate {
    let (products, load_error) = match products::list(state.store()).await {
        Ok(products) => (products.iter().map(ProductRow::from).collect(), None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load products");
            (Vec::new(), Some(e.to_string()))
        }
    };

    ProductsTemplate {
        layout: Layout::new("Products", "/products").with_flash(flash),
        products,
        load_error,
    }
}

fn checklist(ingredients: &[Ingredient], selected: &[String]) -> Vec<IngredientOption> {
    ingredients
        .iter()
        .map(|i| IngredientOption {
            id: i.id.to_string(),
            name: i.name.clone(),
            checked: selected.iter().any(|s| s == i.id.as_str()),
        })
        .collect()
}

fn form_from_product(product: &Product) -> ProductForm {
    ProductForm {
        name: product.name.clone(),
        price: product.price.amount().to_string(),
        description: product.description.clone(),
        image: product.image.clone(),
        ingredients: product.ingredients.join(", "),
        benefits: product.benefits.join(", "),
        ingredient_ids: product
            .ingredient_ids
            .iter()
            .flatten()
            .map(ToString::to_string)
            .collect(),
    }
}

/// GET /products/{id}
#[instrument(skip(state))]
async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(flash): Query<FlashQuery>,
) -> ProductEditTemplate {
    let path = format!("/products/{id}");
    let product_id = ProductId::new(id.clone());

    let (form, load_error) = match products::get(state.store(), &product_id).await {
        Ok(Some(product)) => (form_from_product(&product), None),
        Ok(None) => (ProductForm::default(), Some(format!("Product not found: {id}"))),
        Err(e) => (ProductForm::default(), Some(e.to_string())),
    };

    let (ingredients, ingredients_error) = match ingredients::list(state.store()).await {
        Ok(list) => (checklist(&list, &form.ingredient_ids), None),
        Err(e) => (Vec::new(), Some(e.to_string())),
    };

    ProductEditTemplate {
        layout: Layout::new("Edit product", path).with_flash(flash),
        id,
        form,
        ingredients,
        ingredients_error,
        load_error,
    }
}

/// POST /products/{id}
///
/// The body is parsed as raw pairs so that each checked ingredient box
/// contributes one `ingredient_ids` value.
#[instrument(skip(state, body))]
async fn save(State(state): State<AppState>, Path(id): Path<String>, body: Bytes) -> Response {
    let form = ProductForm::from_pairs(url::form_urlencoded::parse(&body).into_owned());
    let path = format!("/products/{id}");

    let result = async {
        let patch = form.into_patch(Utc::now())?;
        let product = products::update(state.store(), &ProductId::new(id.clone()), &patch).await?;
        Ok::<Product, AppError>(product)
    }
    .await;

    match result {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product saved");
            redirect_success("/products", &format!("Saved {}", product.name)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to update product");
            redirect_error(&path, &format!("Failed to update product: {e}")).into_response()
        }
    }
}
