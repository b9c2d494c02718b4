//! Order API: list and status changes.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use marom_core::{Order, OrderId, OrderStatus};

use super::ApiJson;
use crate::db::orders;
use crate::error::AppError;
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/orders", get(list).patch(update_status))
}

/// Body of `PATCH /api/orders`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusUpdateRequest {
    pub id: Option<String>,
    pub status: Option<String>,
}

impl StatusUpdateRequest {
    /// Validate into an order id and status.
    ///
    /// # Errors
    ///
    /// `BadRequest` when either field is missing or the status is unknown.
    pub fn parse(self) -> Result<(OrderId, OrderStatus), AppError> {
        let missing = || AppError::BadRequest("Order ID and status are required".to_string());
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(missing)?;
        let status = self
            .status
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(missing)?;
        let status = status
            .trim()
            .parse::<OrderStatus>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok((OrderId::new(id.trim()), status))
    }
}

/// Response after a status change.
#[derive(Debug, Serialize)]
pub struct StatusUpdated {
    pub success: bool,
    pub order: Order,
}

/// GET /api/orders
#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(orders::list(state.store()).await?))
}

/// PATCH /api/orders
#[instrument(skip(state))]
async fn update_status(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<StatusUpdateRequest>,
) -> Result<Json<StatusUpdated>, AppError> {
    let (id, status) = request.parse()?;
    let order = orders::update_status(state.store(), &id, status).await?;
    Ok(Json(StatusUpdated {
        success: true,
        order,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(id: Option<&str>, status: Option<&str>) -> StatusUpdateRequest {
        StatusUpdateRequest {
            id: id.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_valid() {
        let (id, status) = request(Some("o-1"), Some("shipped")).parse().unwrap();
        assert_eq!(id.as_str(), "o-1");
        assert_eq!(status, OrderStatus::Shipped);
    }

    #[test]
    fn test_parse_missing_fields() {
        for req in [
            request(None, Some("paid")),
            request(Some("o-1"), None),
            request(Some("  "), Some("paid")),
        ] {
            let err = req.parse().unwrap_err();
            assert_eq!(err.to_string(), "Order ID and status are required");
        }
    }

    #[test]
    fn test_parse_unknown_status() {
        let err = request(Some("o-1"), Some("refunded")).parse().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.to_string(), "invalid order status: refunded");
    }
}
