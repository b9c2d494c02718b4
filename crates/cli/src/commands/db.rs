//! Hosted database checks.

use tracing::{error, info, warn};

use marom_admin::config::AdminConfig;
use marom_admin::db::{ingredients, products};
use marom_admin::store::{self, StoreError};

/// Probe the `ingredients` table and the `products.ingredient_ids` column.
///
/// # Errors
///
/// Returns an error if the store is not configured or either probe fails.
pub async fn check(config: &AdminConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.supabase.is_none() {
        return Err(StoreError::NotConfigured.into());
    }
    let store = store::connect(config)?;
    let mut failures = 0;

    info!("Checking ingredients table...");
    match ingredients::probe(store.as_ref()).await {
        Ok(Some(row)) => info!(sample = %row, "ingredients table exists"),
        Ok(None) => info!("ingredients table exists (empty)"),
        Err(e) => {
            error!(error = %e, "ingredients table check failed");
            failures += 1;
        }
    }

    info!("Checking products.ingredient_ids column...");
    match products::probe_ingredient_ids(store.as_ref()).await {
        Ok(()) => info!("products.ingredient_ids column exists"),
        Err(e) => {
            if is_missing_column(&e) {
                warn!("Add the column with: ALTER TABLE products ADD COLUMN ingredient_ids uuid[];");
            }
            error!(error = %e, "products.ingredient_ids check failed");
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(format!("{failures} schema check(s) failed").into());
    }
    info!("Database schema OK");
    Ok(())
}

/// Whether `e` reports an undefined column (`42703`) rather than a missing
/// table or a transport failure.
fn is_missing_column(e: &StoreError) -> bool {
    match e {
        StoreError::Api { code, message, .. } => {
            code.as_deref() == Some("42703") || message.contains("ingredient_ids")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_gets_hint() {
        let err = StoreError::from_api(
            Some("products"),
            400,
            Some("42703".to_string()),
            "column products.ingredient_ids does not exist".to_string(),
        );
        assert!(!err.is_missing_table());
        assert!(is_missing_column(&err));
    }

    #[test]
    fn test_missing_table_gets_no_column_hint() {
        let err = StoreError::from_api(
            Some("products"),
            404,
            Some("42P01".to_string()),
            "relation \"products\" does not exist".to_string(),
        );
        assert!(err.is_missing_table());
        assert!(!is_missing_column(&err));
        assert!(!is_missing_column(&StoreError::NotConfigured));
    }
}
