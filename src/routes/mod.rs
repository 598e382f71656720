use crate::{error::AppError, AppState};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::get,
    Router,
};
use std::sync::Arc;

pub mod charts;
pub mod files;
pub mod insights;

/// Header carrying the acting user's id, set by the identity layer in front of us.
pub const USER_HEADER: &str = "x-user-id";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}

/// The user a request acts on behalf of.
#[derive(Debug, Clone)]
pub struct Owner(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Owner(value.to_string()))
            .ok_or_else(|| {
                tracing::warn!("Request without {} header", USER_HEADER);
                AppError::Unauthorized(format!("Missing {} header", USER_HEADER))
            })
    }
}
