//! Product image bucket: listing and multipart upload.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::get,
};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use marom_core::slugify;

use crate::db::storage::{self, content_type_for};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::StoredObject;

/// Build the storage router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/storage/products", get(list).post(upload))
}

/// Response after an upload.
#[derive(Debug, Serialize)]
pub struct Uploaded {
    pub success: bool,
    pub name: String,
    pub url: String,
}

/// GET /api/storage/products
#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<StoredObject>>, AppError> {
    Ok(Json(storage::product_images(state.store()).await?))
}

/// POST /api/storage/products (multipart field `file`)
#[instrument(skip(state, multipart))]
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Uploaded>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .map_or_else(|| content_type_for(&file_name).to_string(), str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        let name = object_name(&file_name, Utc::now().timestamp_millis());
        let url =
            storage::upload_product_image(state.store(), &name, bytes.to_vec(), &content_type)
                .await
                .map_err(AppError::Upload)?;
        tracing::info!(name = %name, "product image uploaded");
        return Ok(Json(Uploaded {
            success: true,
            name,
            url,
        }));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

/// `<millis>-<slugified stem>.<ext>`.
fn object_name(file_name: &str, millis: i64) -> String {
    let path = std::path::Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{millis}-{stem}.{}", ext.to_ascii_lowercase()),
        None => format!("{millis}-{stem}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name() {
        assert_eq!(object_name("Rose Oil.PNG", 42), "42-rose-oil.png");
        assert_eq!(object_name("###", 7), "7-image");
        assert_eq!(object_name("plain", 1), "1-plain");
    }
}
