//! `content_blocks` table: JSON settings documents keyed by `section_key`.
//!
//! The `content` column holds the document as a JSON *string*, matching what
//! the storefront reads.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use marom_core::{BrandSettings, SmtpSettings};

use crate::store::{HostedStore, Select, StoreError};

pub const TABLE: &str = "content_blocks";

/// Load the document stored under `section_key`.
///
/// Returns `None` when there is no row or its content does not parse;
/// callers fall back to defaults.
///
/// # Errors
///
/// Returns the store error.
pub async fn get<T: DeserializeOwned>(
    store: &dyn HostedStore,
    section_key: &str,
) -> Result<Option<T>, StoreError> {
    let rows = store
        .select(
            TABLE,
            &Select::all()
                .columns("content")
                .eq("section_key", section_key)
                .limit(1),
        )
        .await?;

    let content = rows
        .into_iter()
        .next()
        .and_then(|mut row| row.get_mut("content").map(Value::take));

    Ok(content.and_then(|content| {
        let parsed = match content {
            Value::String(text) => serde_json::from_str(&text),
            other => serde_json::from_value(other),
        };
        parsed
            .map_err(|e| tracing::warn!(section_key, error = %e, "unparseable content block"))
            .ok()
    }))
}

/// Store `document` under `section_key`, creating or replacing the row.
///
/// # Errors
///
/// Returns the store error.
#[tracing::instrument(skip(store, document))]
pub async fn put<T: Serialize + Sync>(
    store: &dyn HostedStore,
    section_key: &str,
    document: &T,
) -> Result<(), StoreError> {
    let content =
        serde_json::to_string(document).map_err(|e| StoreError::Decode(e.to_string()))?;
    store
        .upsert(
            TABLE,
            json!({
                "section_key": section_key,
                "content": content,
                "updated_at": Utc::now(),
            }),
            "section_key",
        )
        .await?;
    Ok(())
}

/// SMTP settings, defaults when unset.
///
/// # Errors
///
/// Returns the store error.
pub async fn smtp(store: &dyn HostedStore) -> Result<SmtpSettings, StoreError> {
    Ok(get(store, SmtpSettings::SECTION_KEY).await?.unwrap_or_default())
}

/// Brand palette, defaults when unset.
///
/// # Errors
///
/// Returns the store error.
pub async fn brand(store: &dyn HostedStore) -> Result<BrandSettings, StoreError> {
    Ok(get(store, BrandSettings::SECTION_KEY).await?.unwrap_or_default())
}
