//! Supabase `PostgREST` + Storage client.
//!
//! # API Reference
//!
//! - Tables: `{project}/rest/v1/{table}` with `PostgREST` query syntax
//!   (`select=`, `col=eq.value`, `order=col.desc`, `limit=`)
//! - Storage: `{project}/storage/v1/object/{bucket}/{key}`, public objects
//!   under `/storage/v1/object/public/{bucket}/{key}`
//! - Authentication: `apikey: <key>` and `Authorization: Bearer <key>`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use super::{HostedStore, Select, StoreError, StoredObject};
use crate::config::SupabaseConfig;

/// Upper bound on objects returned by one bucket listing.
const LIST_LIMIT: u32 = 1000;

/// Storage creates this marker inside otherwise empty folders.
const FOLDER_PLACEHOLDER: &str = ".emptyFolderPlaceholder";

/// Supabase client.
#[derive(Clone)]
pub struct SupabaseStore {
    inner: Arc<SupabaseStoreInner>,
}

struct SupabaseStoreInner {
    client: reqwest::Client,
    base_url: Url,
}

/// Error body shape shared (loosely) by `PostgREST` and Storage.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    name: String,
    /// `null` for folders.
    #[serde(default)]
    id: Option<String>,
}

impl SupabaseStore {
    /// Create a client for the given project.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &SupabaseConfig, timeout: Duration) -> Result<Self, StoreError> {
        let key = config.anon_key.expose_secret();
        let invalid_key = |e: reqwest::header::InvalidHeaderValue| {
            StoreError::Decode(format!("Invalid API key format: {e}"))
        };

        let mut apikey = HeaderValue::from_str(key).map_err(invalid_key)?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid_key)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseStoreInner {
                client,
                base_url: config.url.clone(),
            }),
        })
    }

    /// Build `{project}/{segments...}`, percent-encoding each segment.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, StoreError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Decode("Supabase URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        self.endpoint(["rest", "v1", table])
    }

    fn object_url(&self, bucket: &str, key: &str) -> Result<Url, StoreError> {
        self.endpoint(
            ["storage", "v1", "object", bucket]
                .into_iter()
                .chain(key.split('/').filter(|s| !s.is_empty())),
        )
    }

    /// Parse a JSON response, mapping non-2xx statuses to [`StoreError`].
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        table: Option<&str>,
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| StoreError::Decode(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(table, response).await)
    }

    async fn parse_error(table: Option<&str>, response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();

        let code = body.code.map(|c| match c {
            Value::String(s) => s,
            other => other.to_string(),
        });
        let message = body
            .message
            .or(body.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| if text.is_empty() { format!("HTTP {status}") } else { text });

        tracing::warn!(status, code = ?code, %message, table = ?table, "Supabase request failed");
        StoreError::from_api(table, status, code, message)
    }

    fn first_row(table: &str, rows: Vec<Value>, id: &str) -> Result<Value, StoreError> {
        rows.into_iter().next().ok_or_else(|| StoreError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        })
    }
}

#[async_trait]
impl HostedStore for SupabaseStore {
    fn backend(&self) -> &'static str {
        "supabase"
    }

    #[tracing::instrument(skip(self, query), fields(backend = "supabase"))]
    async fn select(&self, table: &str, query: &Select) -> Result<Vec<Value>, StoreError> {
        let url = self.table_url(table)?;
        let response = self
            .inner
            .client
            .get(url)
            .query(&query.to_query())
            .send()
            .await?;
        self.handle_response(Some(table), response).await
    }

    #[tracing::instrument(skip(self, patch), fields(backend = "supabase"))]
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Value, StoreError> {
        let url = self.table_url(table)?;
        let response = self
            .inner
            .client
            .patch(url)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        let rows: Vec<Value> = self.handle_response(Some(table), response).await?;
        Self::first_row(table, rows, id)
    }

    #[tracing::instrument(skip(self, row), fields(backend = "supabase"))]
    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> Result<Value, StoreError> {
        let key = row
            .get(on_conflict)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let url = self.table_url(table)?;
        let response = self
            .inner
            .client
            .post(url)
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&row)
            .send()
            .await?;
        let rows: Vec<Value> = self.handle_response(Some(table), response).await?;
        Self::first_row(table, rows, &key)
    }

    #[tracing::instrument(skip(self, bytes), fields(backend = "supabase", size = bytes.len()))]
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let url = self.object_url(bucket, key)?;
        let response = self
            .inner
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        let _: Value = self.handle_response(None, response).await?;
        Ok(self.public_url(bucket, key))
    }

    #[tracing::instrument(skip(self), fields(backend = "supabase"))]
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<StoredObject>, StoreError> {
        let url = self.endpoint(["storage", "v1", "object", "list", bucket])?;
        let body = json!({
            "prefix": prefix,
            "limit": LIST_LIMIT,
            "offset": 0,
            "sortBy": { "column": "name", "order": "asc" },
        });
        let response = self.inner.client.post(url).json(&body).send().await?;
        let entries: Vec<ObjectEntry> = self.handle_response(None, response).await?;

        Ok(entries
            .into_iter()
            .filter(|e| e.id.is_some() && e.name != FOLDER_PLACEHOLDER)
            .map(|e| {
                let key = if prefix.is_empty() {
                    e.name.clone()
                } else {
                    format!("{}/{}", prefix.trim_end_matches('/'), e.name)
                };
                StoredObject {
                    url: self.public_url(bucket, &key),
                    name: e.name,
                }
            })
            .collect())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.endpoint(
            ["storage", "v1", "object", "public", bucket]
                .into_iter()
                .chain(key.split('/').filter(|s| !s.is_empty())),
        )
        .map(String::from)
        .unwrap_or_default()
    }
}

impl std::fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStore")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}
