//! Hosted store access (Supabase tables and storage buckets).
//!
//! Handlers talk to the hosted backend through one interface,
//! [`HostedStore`], with two implementations chosen once at startup:
//!
//! - [`SupabaseStore`] - `PostgREST` (`/rest/v1`) and Storage (`/storage/v1`)
//!   over HTTPS.
//! - [`NullStore`] - used when credentials are absent or malformed; every
//!   call fails immediately with [`StoreError::NotConfigured`].
//!
//! Rows cross the trait as `serde_json::Value`; the typed repositories in
//! [`crate::db`] decode them into `marom_core` records.

mod null;
mod supabase;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use null::NullStore;
pub use supabase::SupabaseStore;

use crate::config::AdminConfig;

/// Errors from the hosted store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No credentials were configured.
    #[error("Supabase not configured")]
    NotConfigured,

    /// The table has not been created yet.
    #[error("The '{table}' table does not exist. Please run the setup SQL script.")]
    MissingTable { table: String },

    /// The remote service rejected the request.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// An update matched no row.
    #[error("No {table} row with id {id}")]
    NotFound { table: String, id: String },

    /// Transport failure (connect, timeout, TLS).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response could not be decoded into the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Classify a remote error body, recognising "table does not exist".
    ///
    /// Only undefined-relation errors count; a missing column (`42703`)
    /// stays an [`StoreError::Api`] with the remote message.
    #[must_use]
    pub fn from_api(table: Option<&str>, status: u16, code: Option<String>, message: String) -> Self {
        let missing = match code.as_deref() {
            Some("42P01" | "PGRST205") => true,
            Some(_) => false,
            None => message.starts_with("relation ") && message.ends_with("does not exist"),
        };
        match table {
            Some(table) if missing => Self::MissingTable {
                table: table.to_string(),
            },
            _ => Self::Api {
                status,
                code,
                message,
            },
        }
    }

    /// Whether the error means a table is missing.
    #[must_use]
    pub const fn is_missing_table(&self) -> bool {
        matches!(self, Self::MissingTable { .. })
    }
}

/// Sort direction for [`Select::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A row query: column projection, equality filters, ordering and limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    columns: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<(String, Direction)>,
    limit: Option<usize>,
}

impl Select {
    /// Every column of every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict/extend the projection, e.g. `*, customers(id, email)`.
    #[must_use]
    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    /// Keep rows where `column = value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn projection(&self) -> Option<&str> {
        self.columns.as_deref()
    }

    #[must_use]
    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    #[must_use]
    pub fn ordering(&self) -> Option<(&str, Direction)> {
        self.order.as_ref().map(|(c, d)| (c.as_str(), *d))
    }

    #[must_use]
    pub const fn max_rows(&self) -> Option<usize> {
        self.limit
    }

    /// Encode as `PostgREST` query parameters.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![(
            "select".to_string(),
            self.columns
                .as_deref()
                .map_or_else(|| "*".to_string(), |c| c.split_whitespace().collect()),
        )];
        for (column, value) in &self.filters {
            query.push((column.clone(), format!("eq.{value}")));
        }
        if let Some((column, direction)) = &self.order {
            let dir = match direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            };
            query.push(("order".to_string(), format!("{column}.{dir}")));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        query
    }
}

/// An object in a storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub name: String,
    pub url: String,
}

/// Access to hosted tables and buckets.
#[async_trait]
pub trait HostedStore: Send + Sync {
    /// Short name for logs (`supabase`, `null`, ...).
    fn backend(&self) -> &'static str;

    /// List rows of `table`.
    async fn select(&self, table: &str, query: &Select) -> Result<Vec<Value>, StoreError>;

    /// Patch the row with `id`; returns the updated row.
    ///
    /// Fails with [`StoreError::NotFound`] when no row matches.
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Value, StoreError>;

    /// Insert or update `row`, resolving conflicts on `on_conflict`.
    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> Result<Value, StoreError>;

    /// Store `bytes` at `key` in `bucket`; returns the public URL.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError>;

    /// List objects under `prefix` (empty for the bucket root).
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<StoredObject>, StoreError>;

    /// Public URL of an object; empty when the store is not configured.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// Shared handle to the configured store.
pub type SharedStore = Arc<dyn HostedStore>;

/// Pick the store implementation for `config`.
///
/// # Errors
///
/// Fails only if the HTTP client cannot be built.
pub fn connect(config: &AdminConfig) -> Result<SharedStore, StoreError> {
    match config.supabase() {
        Some(supabase) => {
            let store = SupabaseStore::new(supabase, config.supabase_timeout)?;
            tracing::info!(url = %supabase.url, "Supabase store configured");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("Supabase not configured; hosted features return errors");
            Ok(Arc::new(NullStore))
        }
    }
}

/// Decode rows into typed records.
///
/// # Errors
///
/// [`StoreError::Decode`] naming the table when a row does not match `T`.
pub fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(|row| decode_row(table, row)).collect()
}

/// Decode a single row.
///
/// # Errors
///
/// [`StoreError::Decode`] when the row does not match `T`.
pub fn decode_row<T: DeserializeOwned>(table: &str, row: Value) -> Result<T, StoreError> {
    serde_json::from_value(row).map_err(|e| StoreError::Decode(format!("{table}: {e}")))
}

/// Encode a patch or row as a JSON object.
///
/// # Errors
///
/// [`StoreError::Decode`] if `value` does not serialise to JSON.
pub fn encode<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Decode(e.to_string()))
}
