//! Ingredient table editor with image upload.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::instrument;

use marom_core::{Ingredient, IngredientId};

use crate::db::{ingredients, storage};
use crate::editor::{EditError, IngredientForm, ingredient_image_key};
use crate::error::AppError;
use crate::filters;
use crate::routes::layout::{FlashQuery, Layout, redirect_error, redirect_success};
use crate::state::AppState;

/// Build the ingredient pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(index))
        .route("/ingredients/{id}", post(save))
}

/// Ingredient row with its inline edit form.
#[derive(Debug, Clone)]
pub struct IngredientRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub benefits: String,
    pub image: String,
    pub updated_at: Option<String>,
}

impl From<&Ingredient> for IngredientRow {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id.to_string(),
            name: ingredient.name.clone(),
            description: ingredient.description.clone(),
            benefits: ingredient.benefits_text(),
            image: ingredient.image.clone(),
            updated_at: ingredient
                .updated_at
                .map(|t| t.format("%b %d, %Y").to_string()),
        }
    }
}

/// Ingredients template.
#[derive(Template, WebTemplate)]
#[template(path = "ingredients/index.html")]
pub struct IngredientsTemplate {
    pub layout: Layout,
    pub ingredients: Vec<IngredientRow>,
    pub load_error: Option<String>,
}

/// GET /ingredients
#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> IngredientsTemplate {
    let (ingredients, load_error) = match ingredients::list(state.store()).await {
        Ok(list) => (list.iter().map(IngredientRow::from).collect(), None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load ingredients");
            (Vec::new(), Some(e.to_string()))
        }
    };

    IngredientsTemplate {
        layout: Layout::new("Ingredients", "/ingredients").with_flash(flash),
        ingredients,
        load_error,
    }
}

/// An image file picked in the edit form.
struct PickedImage {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

async fn read_form(multipart: &mut Multipart) -> Result<(IngredientForm, Option<PickedImage>), AppError> {
    let bad_request = |e: axum::extract::multipart::MultipartError| AppError::BadRequest(e.body_text());
    let mut form = IngredientForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        match field.name().unwrap_or_default() {
            "name" => form.name = field.text().await.map_err(bad_request)?,
            "description" => form.description = field.text().await.map_err(bad_request)?,
            "benefits" => form.benefits = field.text().await.map_err(bad_request)?,
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_request)?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    image = Some(PickedImage {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok((form, image))
}

async fn apply(
    state: &AppState,
    id: &IngredientId,
    multipart: &mut Multipart,
) -> Result<Ingredient, AppError> {
    let (form, image) = read_form(multipart).await?;
    let current = ingredients::get(state.store(), id)
        .await?
        .ok_or_else(|| EditError::NotFound {
            kind: "Ingredient",
            id: id.to_string(),
        })?;

    // Validate before uploading.
    let now = Utc::now();
    let mut patch = form.into_patch(current.image.clone(), now)?;
    if let Some(picked) = image {
        let key = ingredient_image_key(&current, &picked.file_name, now);
        let content_type = picked
            .content_type
            .unwrap_or_else(|| storage::content_type_for(&picked.file_name).to_string());
        patch.image = storage::upload_ingredient_image(state.store(), &key, picked.bytes, &content_type)
            .await
            .map_err(AppError::Upload)?;
    }

    Ok(ingredients::update(state.store(), id, &patch).await?)
}

/// POST /ingredients/{id} (multipart: name, description, benefits, image)
#[instrument(skip(state, multipart))]
async fn save(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    match apply(&state, &IngredientId::new(id), &mut multipart).await {
        Ok(ingredient) => {
            tracing::info!(ingredient_id = %ingredient.id, "ingredient saved");
            redirect_success("/ingredients", &format!("Saved {}", ingredient.name)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to save ingredient");
            redirect_error("/ingredients", &e.message()).into_response()
        }
    }
}
