//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use marom_core::{OrderStatus, Price};

use crate::db::{orders, products};
use crate::filters;
use crate::routes::layout::{FlashQuery, Layout};
use crate::state::AppState;

/// One dashboard tile.
#[derive(Debug, Clone)]
pub struct MetricView {
    pub label: &'static str,
    pub value: String,
    pub href: &'static str,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub metrics: Vec<MetricView>,
    pub errors: Vec<String>,
}

/// Dashboard page handler.
///
/// Counts come from independent sources; a failing source shows a dash and
/// an inline error while the others still render.
#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> DashboardTemplate {
    let mut errors = Vec::new();
    let mut metric = |label, href, value: Result<String, String>| {
        let value = value.unwrap_or_else(|e| {
            if !errors.contains(&e) {
                errors.push(e);
            }
            "-".to_string()
        });
        MetricView { label, value, href }
    };

    let product_count = products::list(state.store())
        .await
        .map(|p| p.len().to_string())
        .map_err(|e| e.to_string());
    let order_stats = orders::list(state.store())
        .await
        .map_err(|e| e.to_string());
    let post_count = state.content().blog().read().await.len();
    let legal_count = state.content().legal().read().await.len();

    let (order_count, pending_count, revenue) = match order_stats {
        Ok(orders) => {
            let pending = orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count();
            let revenue: rust_decimal::Decimal = orders
                .iter()
                .filter(|o| matches!(o.status, OrderStatus::Paid | OrderStatus::Shipped))
                .map(|o| o.total_amount.amount())
                .sum();
            (
                Ok(orders.len().to_string()),
                Ok(pending.to_string()),
                Ok(Price::new(revenue).display()),
            )
        }
        Err(e) => (Err(e.clone()), Err(e.clone()), Err(e)),
    };

    let metrics = vec![
        metric("Products", "/products", product_count),
        metric("Orders", "/orders", order_count),
        metric("Pending orders", "/orders", pending_count),
        metric("Revenue", "/orders", revenue),
        metric("Blog posts", "/blog", Ok(post_count.to_string())),
        metric("Legal documents", "/legal", Ok(legal_count.to_string())),
    ];

    DashboardTemplate {
        layout: Layout::new("Dashboard", "/").with_flash(flash),
        metrics,
        errors,
    }
}
