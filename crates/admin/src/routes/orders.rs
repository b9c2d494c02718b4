//! Orders page with per-order status changes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use marom_core::{Order, OrderId, OrderStatus};

use crate::db::orders;
use crate::filters;
use crate::routes::layout::{FlashQuery, Layout, redirect_error, redirect_success};
use crate::state::AppState;

/// Build the orders page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(index))
        .route("/orders/{id}/status", post(change_status))
}

/// Status dropdown entry.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Order row.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub created_at: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<String>,
    pub total: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub session: Option<String>,
    pub ship_to: Option<String>,
    pub statuses: Vec<StatusOption>,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            created_at: order.created_at.format("%b %d, %Y %H:%M").to_string(),
            customer_name: order.customer_name().to_string(),
            customer_email: order.customer_email().to_string(),
            items: order
                .items
                .iter()
                .map(|item| format!("{} × {}", item.display_name(), item.quantity))
                .collect(),
            total: order.total_amount.display(),
            status: order.status.as_str(),
            status_label: order.status.label(),
            session: order.short_session_id(),
            ship_to: order.shipping_address.as_ref().map(|a| {
                [Some(a.city.as_str()), a.country.as_deref()]
                    .into_iter()
                    .flatten()
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
            statuses: OrderStatus::ALL
                .iter()
                .map(|s| StatusOption {
                    value: s.as_str(),
                    label: s.label(),
                    selected: *s == order.status,
                })
                .collect(),
        }
    }
}

/// Orders template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderRow>,
    pub load_error: Option<String>,
}

/// Status change form.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// GET /orders
#[instrument(skip(state))]
async fn index(State(state): State<AppState>, Query(flash): Query<FlashQuery>) -> OrdersTemplate {
    let (orders, load_error) = match orders::list(state.store()).await {
        Ok(orders) => (orders.iter().map(OrderRow::from).collect(), None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load orders");
            (Vec::new(), Some(e.to_string()))
        }
    };

    OrdersTemplate {
        layout: Layout::new("Orders", "/orders").with_flash(flash),
        orders,
        load_error,
    }
}

/// POST /orders/{id}/status
#[instrument(skip(state))]
async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Response {
    let status = match form.status.parse::<OrderStatus>() {
        Ok(status) => status,
        Err(e) => return redirect_error("/orders", &e.to_string()).into_response(),
    };

    match orders::update_status(state.store(), &OrderId::new(id.clone()), status).await {
        Ok(_) => redirect_success("/orders", &format!("Order marked {}", status.label()))
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, order_id = %id, "Failed to update order status");
            redirect_error("/orders", &e.to_string()).into_response()
        }
    }
}
