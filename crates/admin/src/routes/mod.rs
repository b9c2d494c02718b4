//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness
//! GET  /health/ready                - Hosted store reachable
//!
//! # Pages
//! GET  /                            - Dashboard
//! GET  /products                    - Product listing
//! GET  /products/{id}               - Product editor
//! POST /products/{id}               - Save product
//! GET  /ingredients                 - Ingredient table editor
//! POST /ingredients/{id}            - Save ingredient (multipart, optional image)
//! GET  /orders                      - Orders
//! POST /orders/{id}/status          - Change order status
//! GET  /crm?tab=newsletter|contact  - Subscribers and contact messages
//! GET  /blog, /blog/new, /blog/{id} - Blog listing and editor
//! POST /blog/{id}/delete            - Delete post
//! GET  /legal, /legal/new, /legal/{id} - Legal documents
//! GET  /website-pages               - Storefront page links
//! GET  /settings                    - SMTP, brand and social settings
//!
//! # JSON API
//! GET/PUT   /api/blog, /api/legal, /api/ingredients, /api/socials
//! GET/PUT   /api/products
//! GET/PATCH /api/orders
//! GET       /api/images
//! POST      /api/test-smtp
//! GET/PATCH /api/catalog/ingredients
//! GET       /api/crm/leads, /api/crm/messages
//! GET/PUT   /api/settings/smtp, /api/settings/brand
//! GET/POST  /api/storage/products
//!
//! # Static
//! GET  /images/products/*           - Local product images
//! ```

pub mod api;
pub mod blog;
pub mod crm;
pub mod dashboard;
pub mod ingredients;
pub mod layout;
pub mod legal;
pub mod orders;
pub mod products;
pub mod settings;
pub mod website;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;
use crate::store::Select;

/// Largest accepted request body (image uploads).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Page and API routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/crm", get(crm::index))
        .route("/website-pages", get(website::index))
        .merge(products::router())
        .merge(ingredients::router())
        .merge(orders::router())
        .merge(blog::router())
        .merge(legal::router())
        .merge(settings::router())
        .merge(api::router())
}

/// The complete application: routes, health checks, static images and the
/// middleware stack.
pub fn app(state: AppState) -> Router {
    let images = ServeDir::new(state.config().product_images_dir());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/images/products", images)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the hosted store is unconfigured or
/// unreachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let probe = Select::all().columns("id").limit(1);
    match state.store().select(crate::db::products::TABLE, &probe).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, backend = state.store().backend(), "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
