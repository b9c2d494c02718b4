//! Local product image library under `<frontend>/public/images/products`.

use std::path::Path;

use serde::Serialize;

/// Extensions listed by the image picker (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "svg"];

/// URL prefix under which the directory is served.
pub const PUBLIC_PREFIX: &str = "/images/products";

/// One image in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFile {
    pub filename: String,
    pub path: String,
}

/// Whether `file_name` has one of [`ALLOWED_EXTENSIONS`].
#[must_use]
pub fn is_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// List image files in `dir`, sorted by name.
///
/// A missing or unreadable directory yields an empty list.
pub async fn list_product_images(dir: &Path) -> Vec<ImageFile> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "image directory not readable");
            return Vec::new();
        }
    };

    let mut images = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
                let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                if is_file && is_image(&name) {
                    images.push(ImageFile {
                        path: format!("{PUBLIC_PREFIX}/{name}"),
                        filename: name,
                    });
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "stopped listing images");
                break;
            }
        }
    }

    images.sort_by(|a, b| a.filename.cmp(&b.filename));
    images
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(is_image("serum.JPG"));
        assert!(is_image("logo.svg"));
        assert!(!is_image("notes.txt"));
        assert!(!is_image(".DS_Store"));
        assert!(!is_image("jpg"));
    }

    #[tokio::test]
    async fn test_lists_only_images_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.webp", "readme.md", "C.JPEG"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let images = list_product_images(dir.path()).await;
        let names: Vec<_> = images.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, ["C.JPEG", "a.webp", "b.png"]);
        assert_eq!(images[2].path, "/images/products/b.png");
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_product_images(&dir.path().join("nope")).await.is_empty());
    }
}
