//! Integration test harness for the Marom admin dashboard.
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`
//! against a temporary storefront checkout and an in-memory hosted store,
//! so no network or Supabase project is needed.
//!
//! ```rust,ignore
//! let ctx = TestContext::new();
//! let (status, body) = ctx.get_json("/api/blog").await;
//! assert_eq!(status, StatusCode::OK);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use marom_admin::config::AdminConfig;
use marom_admin::state::AppState;
use marom_admin::store::{HostedStore, NullStore, Select, SharedStore, StoreError, StoredObject};

/// Hosted store double keeping tables and buckets in memory.
///
/// Supports the subset of `PostgREST` behaviour the admin relies on:
/// equality filters, limits, id-keyed patches and keyed upserts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    objects: Mutex<HashMap<String, Vec<(String, Vec<u8>)>>>,
    rejecting: Mutex<HashSet<String>>,
}

impl MemoryStore {
    /// Seed `table` with `rows`, replacing anything already there.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table.to_string(), rows);
    }

    /// Current rows of `table`.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every upload to `bucket` fail with `Bucket not found: <bucket>`.
    pub fn reject_uploads(&self, bucket: &str) {
        self.rejecting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(bucket.to_string());
    }

    /// Keys stored in `bucket`.
    pub fn object_keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(bucket)
            .map(|objects| objects.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default()
    }
}

fn field_matches(row: &Value, column: &str, expected: &str) -> bool {
    match row.get(column) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == expected,
        None => false,
    }
}

fn merge(row: &mut Value, patch: Value) {
    if let (Value::Object(target), Value::Object(fields)) = (row, patch) {
        target.extend(fields);
    }
}

#[async_trait]
impl HostedStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn select(&self, table: &str, query: &Select) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(rows) = tables.get(table) else {
            return Err(StoreError::MissingTable {
                table: table.to_string(),
            });
        };
        let matching = rows
            .iter()
            .filter(|row| {
                query
                    .filters()
                    .iter()
                    .all(|(column, value)| field_matches(row, column, value))
            })
            .take(query.max_rows().unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Value, StoreError> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| field_matches(row, "id", id)))
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        merge(row, patch);
        Ok(row.clone())
    }

    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> Result<Value, StoreError> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let rows = tables.entry(table.to_string()).or_default();
        let key = row.get(on_conflict).cloned();
        let existing = rows
            .iter_mut()
            .find(|existing| key.is_some() && existing.get(on_conflict) == key.as_ref());
        match existing {
            Some(existing) => {
                merge(existing, row);
                Ok(existing.clone())
            }
            None => {
                rows.push(row.clone());
                Ok(row)
            }
        }
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StoreError> {
        let rejected = self
            .rejecting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(bucket);
        if rejected {
            return Err(StoreError::Api {
                status: 400,
                code: None,
                message: format!("Bucket not found: {bucket}"),
            });
        }
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(bucket.to_string())
            .or_default()
            .push((key.to_string(), bytes));
        Ok(self.public_url(bucket, key))
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<StoredObject>, StoreError> {
        Ok(self
            .object_keys(bucket)
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .map(|key| StoredObject {
                url: self.public_url(bucket, &key),
                name: key,
            })
            .collect())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("https://store.test/storage/v1/object/public/{bucket}/{key}")
    }
}

/// A temporary storefront checkout plus the admin router built over it.
pub struct TestContext {
    pub dir: TempDir,
    pub store: Arc<MemoryStore>,
    app: Router,
}

impl TestContext {
    /// Context backed by an empty [`MemoryStore`].
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self::build(store.clone(), store)
    }

    /// Context whose hosted store is not configured.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::build(Arc::new(NullStore), Arc::new(MemoryStore::default()))
    }

    fn build(shared: SharedStore, store: Arc<MemoryStore>) -> Self {
        let dir = tempfile::tempdir().expect("create temp storefront");
        let state = AppState::with_store(AdminConfig::local(dir.path()), shared);
        let app = marom_admin::app(state);
        Self { dir, store, app }
    }

    /// A handle to the router for requests that need the raw response.
    #[must_use]
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// `<root>/app/data`.
    #[must_use]
    pub fn data_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("app").join("data")
    }

    /// `<root>/public/images/products`.
    #[must_use]
    pub fn images_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("public").join("images").join("products")
    }

    /// Write a file under the checkout, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_file(&self, path: &Path, contents: &[u8]) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directory");
        }
        std::fs::write(path, contents).expect("write fixture file");
    }

    /// Send a request and return the status and parsed JSON body
    /// (`Value::Null` when the body is empty or not JSON).
    ///
    /// # Panics
    ///
    /// Panics if the router fails to produce a response.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// GET `uri`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).expect("valid request");
        self.send(request).await
    }

    /// Send `body` as JSON with `method`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn send_json(&self, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.send(request).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
