//! JSON API mounted under `/api`.
//!
//! Every failure is answered with `{"error": "..."}` (see [`AppError`]).

pub mod catalog;
pub mod content;
pub mod crm;
pub mod images;
pub mod orders;
pub mod products;
pub mod settings;
pub mod smtp;
pub mod storage;

use axum::{
    Json, Router,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(content::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(images::router())
        .merge(smtp::router())
        .merge(catalog::router())
        .merge(crm::router())
        .merge(settings::router())
        .merge(storage::router())
}

/// JSON body extractor whose rejection is a JSON `400`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

/// `{"success": true}`.
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    #[must_use]
    pub const fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}
