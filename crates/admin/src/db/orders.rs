//! `orders` table.

use serde_json::json;

use marom_core::{Order, OrderId, OrderStatus};

use crate::store::{Direction, HostedStore, Select, StoreError, decode_row, decode_rows};

pub const TABLE: &str = "orders";

/// Projection joining each order with its customer.
pub const WITH_CUSTOMER: &str = "*, customers(id, email, full_name)";

/// All orders with customers, newest first.
///
/// # Errors
///
/// Returns the store error, or `Decode` if a row is malformed.
pub async fn list(store: &dyn HostedStore) -> Result<Vec<Order>, StoreError> {
    let rows = store
        .select(
            TABLE,
            &Select::all()
                .columns(WITH_CUSTOMER)
                .order_by("created_at", Direction::Descending),
        )
        .await?;
    decode_rows(TABLE, rows)
}

/// Set one order's status; other orders are untouched.
///
/// # Errors
///
/// `NotFound` when no order has `id`.
#[tracing::instrument(skip(store), fields(order_id = %id, status = %status))]
pub async fn update_status(
    store: &dyn HostedStore,
    id: &OrderId,
    status: OrderStatus,
) -> Result<Order, StoreError> {
    let row = store
        .update(TABLE, id.as_str(), json!({ "status": status }))
        .await?;
    tracing::info!("order status updated");
    decode_row(TABLE, row)
}
