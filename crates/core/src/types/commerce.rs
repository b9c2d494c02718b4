//! Orders and the customer rows joined onto them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CustomerId, OrderId};
use super::price::Price;
use super::status::OrderStatus;

/// A row of the `orders` table, optionally joined with its customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// Present when selected with `customers(id, email, full_name)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customers: Option<OrderCustomer>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub total_amount: Price,
    #[serde(default, deserialize_with = "items_or_empty")]
    pub items: Vec<OrderItem>,
    /// Stripe checkout session the order was paid through.
    #[serde(default)]
    pub stripe_session_id: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Display name of the customer, `N/A` when the join came back empty.
    #[must_use]
    pub fn customer_name(&self) -> &str {
        self.customers
            .as_ref()
            .and_then(|c| c.full_name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or("N/A")
    }

    /// Customer email, `N/A` when unknown.
    #[must_use]
    pub fn customer_email(&self) -> &str {
        self.customers
            .as_ref()
            .map(|c| c.email.as_str())
            .filter(|e| !e.is_empty())
            .unwrap_or("N/A")
    }

    /// First 20 characters of the payment session id, for compact display.
    #[must_use]
    pub fn short_session_id(&self) -> Option<String> {
        self.stripe_session_id
            .as_deref()
            .map(|s| s.chars().take(20).collect())
    }
}

/// Customer columns joined onto an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub id: CustomerId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// One line of an order's `items` JSON column.
///
/// The checkout has written items in a few shapes over time (`name` or
/// `product_name`, prices as numbers or strings), so every field is lenient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<Price>,
}

impl OrderItem {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.product_name.as_deref())
            .unwrap_or("Product")
    }

    /// Unit price multiplied by quantity; zero when no price was recorded.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.map_or_else(Price::default, |p| {
            Price::new(p.amount() * Decimal::from(self.quantity))
        })
    }
}

const fn default_quantity() -> u32 {
    1
}

/// Shipping address JSON column. Only the fields the dashboard shows are typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

fn items_or_empty<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<Price>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.to_string().parse::<Decimal>().ok().map(Price::new),
        serde_json::Value::String(s) => s.trim().parse::<Decimal>().ok().map(Price::new),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_order() -> serde_json::Value {
        serde_json::json!({
            "id": "o1",
            "customer_id": "c1",
            "status": "paid",
            "total_amount": 1180,
            "items": [
                {"name": "Moringa Shampoo", "quantity": 2, "price": 590},
                {"product_name": "Hair Oil", "price": "350.50"},
                "garbage"
            ],
            "stripe_session_id": "cs_test_a1b2c3d4e5f6g7h8i9j0k1l2",
            "shipping_address": {"address_line1": "1 Sukhumvit Rd", "city": "Bangkok"},
            "created_at": "2025-03-01T09:30:00.123456+00:00",
            "customers": {"id": "c1", "email": "a@b.co", "full_name": null}
        })
    }

    #[test]
    fn test_order_row_parses_leniently() {
        let order: Order = serde_json::from_value(sample_order()).unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].display_name(), "Hair Oil");
        assert_eq!(order.items[1].quantity, 1);
        assert_eq!(order.items[0].line_total().display(), "฿1,180.00");
        assert_eq!(order.items[1].line_total().display(), "฿350.50");
    }

    #[test]
    fn test_customer_fallbacks() {
        let order: Order = serde_json::from_value(sample_order()).unwrap();
        assert_eq!(order.customer_name(), "N/A");
        assert_eq!(order.customer_email(), "a@b.co");
        assert_eq!(order.short_session_id().unwrap(), "cs_test_a1b2c3d4e5f6");
    }

    #[test]
    fn test_items_not_an_array() {
        let mut row = sample_order();
        row["items"] = serde_json::json!(null);
        let order: Order = serde_json::from_value(row).unwrap();
        assert!(order.items.is_empty());
    }
}
