//! Store used when no Supabase credentials are configured.

use async_trait::async_trait;
use serde_json::Value;

use super::{HostedStore, Select, StoreError, StoredObject};

/// Answers every call with [`StoreError::NotConfigured`] without touching
/// the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

#[async_trait]
impl HostedStore for NullStore {
    fn backend(&self) -> &'static str {
        "null"
    }

    async fn select(&self, _table: &str, _query: &Select) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn update(&self, _table: &str, _id: &str, _patch: Value) -> Result<Value, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn upsert(&self, _table: &str, _row: Value, _on_conflict: &str) -> Result<Value, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn upload(
        &self,
        _bucket: &str,
        _key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn list_objects(&self, _bucket: &str, _prefix: &str) -> Result<Vec<StoredObject>, StoreError> {
        Err(StoreError::NotConfigured)
    }

    fn public_url(&self, _bucket: &str, _key: &str) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_every_call_fails_fast() {
        let store = NullStore;
        let calls = async {
            assert!(matches!(
                store.select("products", &Select::all()).await,
                Err(StoreError::NotConfigured)
            ));
            assert!(matches!(
                store.update("orders", "o1", json!({"status": "paid"})).await,
                Err(StoreError::NotConfigured)
            ));
            assert!(matches!(
                store.upsert("content_blocks", json!({}), "section_key").await,
                Err(StoreError::NotConfigured)
            ));
            assert!(matches!(
                store.upload("products", "a.png", vec![0], "image/png").await,
                Err(StoreError::NotConfigured)
            ));
            assert!(matches!(
                store.list_objects("products", "").await,
                Err(StoreError::NotConfigured)
            ));
        };
        tokio::time::timeout(Duration::from_millis(100), calls)
            .await
            .expect("null store must not block");

        assert_eq!(store.public_url("products", "a.png"), "");
        assert_eq!(StoreError::NotConfigured.to_string(), "Supabase not configured");
    }
}
