//! File-backed CMS over the storefront's generated data files.
//!
//! Each collection lives in a TypeScript module holding one interface
//! declaration and one exported JSON literal:
//!
//! ```text
//! export interface BlogPost {
//!     id: string;
//!     ...
//! }
//!
//! export const blogPosts: BlogPost[] = [ ... ];
//! ```
//!
//! Reads locate the literal by its exact declaration prefix and parse it with
//! `serde_json` into typed records; nothing is ever evaluated. Writes
//! regenerate the whole file and replace it atomically.
//!
//! Within one process, writes to the same file are serialised by a
//! per-file lock. Across processes the last writer wins.

mod collections;

use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

pub use collections::{BLOG, ContentStore, FileReport, INGREDIENTS, LEGAL, SETTINGS};

/// Errors from the file-backed collection store.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The data file does not exist.
    #[error("{} does not exist", path.display())]
    Missing { path: PathBuf },

    /// The file exists but has no `export const ... =` declaration.
    #[error("{} has no `{export}` declaration", path.display())]
    MissingDeclaration { path: PathBuf, export: &'static str },

    /// The exported literal is not valid JSON for the collection.
    #[error("{} could not be parsed: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading the file failed for another reason.
    #[error("{} could not be read: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialising or writing the collection failed.
    #[error("Failed to write {label}")]
    Write {
        label: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Layout of one generated data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSpec {
    /// File name under the data directory.
    pub file_name: &'static str,
    /// Interface declaration written at the top of the file.
    pub interface: &'static str,
    /// Declaration prefix preceding the JSON literal.
    pub export: &'static str,
    /// Human name used in log lines and error messages.
    pub label: &'static str,
}

/// The in-memory form of a data file's exported literal.
pub trait Document: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Number of records, for reports.
    fn entries(&self) -> usize;
}

impl<T> Document for Vec<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn entries(&self) -> usize {
        self.len()
    }
}

impl Document for marom_core::SiteSettings {
    fn entries(&self) -> usize {
        1
    }
}

/// Extract and parse the literal following `export` in `text`.
///
/// Only the first JSON value after the prefix is read, so trailing `;` and
/// whatever follows it are ignored.
///
/// # Errors
///
/// `Ok(None)` when the declaration is absent; `Err` when the literal after
/// it does not parse as `D`.
pub fn parse_document<D: DeserializeOwned>(
    text: &str,
    export: &str,
) -> Result<Option<D>, serde_json::Error> {
    let Some(start) = text.find(export) else {
        return Ok(None);
    };
    let literal = text.get(start + export.len()..).unwrap_or_default();

    let mut values = serde_json::Deserializer::from_str(literal).into_iter::<D>();
    match values.next() {
        Some(value) => value.map(Some),
        None => Ok(None),
    }
}

/// Render a full file body: interface, blank line, export with a 4-space
/// pretty-printed literal, `;` and a trailing newline.
///
/// # Errors
///
/// Fails only if `D`'s `Serialize` impl fails.
pub fn render_document<D: Serialize>(spec: &DocumentSpec, doc: &D) -> Result<String, serde_json::Error> {
    let mut json = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
    doc.serialize(&mut serializer)?;
    let json = String::from_utf8_lossy(&json);

    Ok(format!("{}\n\n{}{json};\n", spec.interface, spec.export))
}

/// One generated data file holding a document of type `D`.
pub struct DataFile<D> {
    spec: DocumentSpec,
    path: PathBuf,
    lock: Mutex<()>,
    _doc: PhantomData<fn() -> D>,
}

impl<D: Document> DataFile<D> {
    /// Bind `spec` to a file inside `data_dir`.
    pub fn new(spec: DocumentSpec, data_dir: &Path) -> Self {
        Self {
            spec,
            path: data_dir.join(spec.file_name),
            lock: Mutex::new(()),
            _doc: PhantomData,
        }
    }

    /// The file's location on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn spec(&self) -> &DocumentSpec {
        &self.spec
    }

    /// Load the document, falling back to the empty document when the file
    /// is absent, has no declaration, or does not parse. Never fails.
    pub async fn read(&self) -> D {
        match self.try_read().await {
            Ok(doc) => doc,
            Err(ContentError::Missing { .. }) => {
                tracing::debug!(path = %self.path.display(), "data file missing, using empty {}", self.spec.label);
                D::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "unreadable {}, using empty collection", self.spec.label);
                D::default()
            }
        }
    }

    /// Load the document, reporting why it could not be read.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: missing file, I/O failure, missing
    /// declaration or parse failure.
    pub async fn try_read(&self) -> Result<D, ContentError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ContentError::Missing {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(ContentError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        parse_document(&text, self.spec.export)
            .map_err(|source| ContentError::Parse {
                path: self.path.clone(),
                source,
            })?
            .ok_or_else(|| ContentError::MissingDeclaration {
                path: self.path.clone(),
                export: self.spec.export,
            })
    }

    /// Replace the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Write`] if the file cannot be written.
    #[tracing::instrument(skip(self, doc), fields(file = self.spec.file_name, entries = doc.entries()))]
    pub async fn write(&self, doc: &D) -> Result<(), ContentError> {
        let _guard = self.lock.lock().await;
        self.write_locked(doc).await
    }

    /// Read-modify-write under the file lock.
    ///
    /// `f` sees the current document (empty if the file does not exist yet)
    /// and decides whether to persist: on `Err` nothing is written.
    ///
    /// # Errors
    ///
    /// A file that exists but cannot be read or parsed is reported and left
    /// untouched. Otherwise propagates `f`'s error, or a write failure
    /// converted into `E`.
    pub async fn update<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut D) -> Result<R, E> + Send,
        E: From<ContentError>,
    {
        let _guard = self.lock.lock().await;
        let mut doc = match self.try_read().await {
            Ok(doc) => doc,
            Err(ContentError::Missing { .. }) => D::default(),
            Err(e) => {
                tracing::warn!(error = %e, "refusing to overwrite unreadable {}", self.spec.label);
                return Err(e.into());
            }
        };
        let result = f(&mut doc)?;
        self.write_locked(&doc).await?;
        Ok(result)
    }

    /// Create the file with an empty document if it does not exist yet.
    ///
    /// Returns `true` when a file was created.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Write`] if the file cannot be created.
    pub async fn init(&self) -> Result<bool, ContentError> {
        let _guard = self.lock.lock().await;
        if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(false);
        }
        self.write_locked(&D::default()).await?;
        Ok(true)
    }

    async fn write_locked(&self, doc: &D) -> Result<(), ContentError> {
        let write_err = |source| ContentError::Write {
            label: self.spec.label,
            source,
        };

        let body = render_document(&self.spec, doc).map_err(|e| write_err(io::Error::other(e)))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        // Same directory as the target so the rename stays on one filesystem.
        let tmp = self
            .path
            .with_file_name(format!(".{}.{}.tmp", self.spec.file_name, uuid::Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&tmp, body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(write_err(e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(write_err(e));
        }

        tracing::info!(file = %self.path.display(), entries = doc.entries(), "wrote {}", self.spec.label);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marom_core::{BlogPost, BlogPostId, SiteSettings};

    use super::*;

    fn post(id: &str, content: &str) -> BlogPost {
        BlogPost {
            id: BlogPostId::new(id),
            title: "Rice water rinse".to_string(),
            slug: "rice-water-rinse".to_string(),
            excerpt: "Why it works".to_string(),
            content: content.to_string(),
            image: String::new(),
            date: "2025-01-01".to_string(),
            author: "Marom Team".to_string(),
            tags: vec!["hair".to_string()],
        }
    }

    #[test]
    fn test_render_layout() {
        let body = render_document(&BLOG, &Vec::<BlogPost>::new()).unwrap();
        assert!(body.starts_with("export interface BlogPost {\n"));
        assert!(body.ends_with("\n\nexport const blogPosts: BlogPost[] = [];\n"));
    }

    #[test]
    fn test_render_uses_four_space_indent() {
        let body = render_document(&BLOG, &vec![post("1", "<p>x</p>")]).unwrap();
        assert!(body.contains("= [\n    {\n        \"id\": \"1\",\n"));
    }

    #[test]
    fn test_parse_ignores_trailing_text() {
        let text = "export interface X {}\n\nexport const blogPosts: BlogPost[] = [];\n// trailing";
        let parsed: Option<Vec<BlogPost>> = parse_document(text, BLOG.export).unwrap();
        assert_eq!(parsed, Some(vec![]));
    }

    #[test]
    fn test_parse_missing_declaration() {
        let parsed: Option<Vec<BlogPost>> =
            parse_document("export const posts = [];", BLOG.export).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_parse_rejects_javascript_literals() {
        let text = "export const blogPosts: BlogPost[] = [{ id: '1' }];";
        assert!(parse_document::<Vec<BlogPost>>(text, BLOG.export).is_err());
    }

    #[tokio::test]
    async fn test_write_then_read_preserves_html() {
        let dir = tempfile::tempdir().unwrap();
        let file: DataFile<Vec<BlogPost>> = DataFile::new(BLOG, dir.path());
        let html = "<h2 class=\"x\">Tips &amp; tricks</h2>\n<p>ข้าว \"rice\" <br/></p>";
        let posts = vec![post("1", html), post("2", "")];

        file.write(&posts).await.unwrap();
        assert_eq!(file.read().await, posts);
        assert_eq!(file.try_read().await.unwrap(), posts);
    }

    #[tokio::test]
    async fn test_write_empty_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let file: DataFile<Vec<BlogPost>> = DataFile::new(BLOG, dir.path());
        file.write(&vec![post("1", "")]).await.unwrap();
        file.write(&Vec::new()).await.unwrap();
        assert!(file.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_read_never_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file: DataFile<Vec<BlogPost>> = DataFile::new(BLOG, dir.path());

        assert!(file.read().await.is_empty());
        assert!(matches!(
            file.try_read().await,
            Err(ContentError::Missing { .. })
        ));

        tokio::fs::write(file.path(), "export const other = [];")
            .await
            .unwrap();
        assert!(file.read().await.is_empty());
        assert!(matches!(
            file.try_read().await,
            Err(ContentError::MissingDeclaration { .. })
        ));

        tokio::fs::write(file.path(), "export const blogPosts: BlogPost[] = [{\"id\": 1}];")
            .await
            .unwrap();
        assert!(file.read().await.is_empty());
        assert!(matches!(
            file.try_read().await,
            Err(ContentError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_settings_document() {
        let dir = tempfile::tempdir().unwrap();
        let file: DataFile<SiteSettings> = DataFile::new(SETTINGS, dir.path());
        assert_eq!(file.read().await, SiteSettings::default());

        let mut settings = SiteSettings::default();
        settings.social_links.tiktok = "https://tiktok.com/@marom".to_string();
        file.write(&settings).await.unwrap();

        let text = tokio::fs::read_to_string(file.path()).await.unwrap();
        assert!(text.contains("export const siteSettings: SiteSettings = {\n    \"socialLinks\": {"));
        assert_eq!(file.read().await, settings);
    }

    #[tokio::test]
    async fn test_update_skips_write_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let file: DataFile<Vec<BlogPost>> = DataFile::new(BLOG, dir.path());
        file.write(&vec![post("1", "")]).await.unwrap();

        let result: Result<(), ContentError> = file
            .update(|posts| {
                posts.clear();
                Err(ContentError::Missing {
                    path: PathBuf::from("x"),
                })
            })
            .await;
        assert!(result.is_err());
        assert_eq!(file.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_unparseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let file: DataFile<Vec<BlogPost>> = DataFile::new(BLOG, dir.path());
        let original = "export const blogPosts: BlogPost[] = [{ id: '1', title: 'Existing' }];\n";
        tokio::fs::write(file.path(), original).await.unwrap();

        let result: Result<(), ContentError> = file
            .update(|posts| {
                posts.push(post("2", ""));
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(ContentError::Parse { .. })));
        assert_eq!(tokio::fs::read_to_string(file.path()).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_update_keeps_file_without_declaration() {
        let dir = tempfile::tempdir().unwrap();
        let file: DataFile<Vec<BlogPost>> = DataFile::new(BLOG, dir.path());
        let original = "export const posts = [];\n";
        tokio::fs::write(file.path(), original).await.unwrap();

        let result: Result<(), ContentError> = file.update(|_| Ok(())).await;

        assert!(matches!(result, Err(ContentError::MissingDeclaration { .. })));
        assert_eq!(tokio::fs::read_to_string(file.path()).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_update_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file: DataFile<Vec<BlogPost>> = DataFile::new(BLOG, dir.path());

        file.update(|posts| {
            posts.push(post("1", ""));
            Ok::<_, ContentError>(())
        })
        .await
        .unwrap();
        assert_eq!(file.try_read().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_serialised() {
        let dir = tempfile::tempdir().unwrap();
        let file = std::sync::Arc::new(DataFile::<Vec<BlogPost>>::new(BLOG, dir.path()));

        let mut handles = Vec::new();
        for i in 0..10 {
            let file = file.clone();
            handles.push(tokio::spawn(async move {
                file.update(|posts| {
                    posts.push(post(&i.to_string(), ""));
                    Ok::<_, ContentError>(())
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(file.read().await.len(), 10);
    }

    #[tokio::test]
    async fn test_init_creates_only_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let file: DataFile<Vec<BlogPost>> = DataFile::new(BLOG, &dir.path().join("app/data"));
        assert!(file.init().await.unwrap());
        assert!(!file.init().await.unwrap());
        assert!(file.try_read().await.unwrap().is_empty());
    }
}
