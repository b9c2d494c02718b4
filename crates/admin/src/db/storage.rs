//! Storage buckets for product and ingredient images.

use crate::store::{HostedStore, StoreError, StoredObject};

/// Bucket holding product photography.
pub const PRODUCTS_BUCKET: &str = "products";
/// Preferred bucket for ingredient images.
pub const UPLOADS_BUCKET: &str = "uploads";
/// Fallback bucket when `uploads` rejects the upload.
pub const IMAGES_BUCKET: &str = "images";

/// Images in the `products` bucket with their public URLs.
///
/// # Errors
///
/// Returns the store error.
pub async fn product_images(store: &dyn HostedStore) -> Result<Vec<StoredObject>, StoreError> {
    store.list_objects(PRODUCTS_BUCKET, "").await
}

/// Upload a product image; returns its public URL.
///
/// # Errors
///
/// Returns the store error.
pub async fn upload_product_image(
    store: &dyn HostedStore,
    key: &str,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<String, StoreError> {
    store
        .upload(PRODUCTS_BUCKET, key, bytes, content_type)
        .await
}

/// Upload an ingredient image to `uploads`, retrying once on `images`.
///
/// The error reported when both fail is the one from `uploads`.
///
/// # Errors
///
/// Returns the first bucket's error when both uploads fail.
pub async fn upload_ingredient_image(
    store: &dyn HostedStore,
    key: &str,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<String, StoreError> {
    match store
        .upload(UPLOADS_BUCKET, key, bytes.clone(), content_type)
        .await
    {
        Ok(url) => Ok(url),
        Err(StoreError::NotConfigured) => Err(StoreError::NotConfigured),
        Err(first) => {
            tracing::warn!(error = %first, "upload to '{UPLOADS_BUCKET}' failed, trying '{IMAGES_BUCKET}'");
            store
                .upload(IMAGES_BUCKET, key, bytes, content_type)
                .await
                .map_err(|_| first)
        }
    }
}

/// Content type guessed from a file name's extension.
#[must_use]
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("b.svg"), "image/svg+xml");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
