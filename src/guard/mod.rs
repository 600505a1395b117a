use crate::error::MarketError;
use async_trait::async_trait;
use axum::{
    http::request::Parts,
    response::{IntoResponse, Response},
};

mod authority;
mod layer;

pub use authority::AuthorityGuard;
pub use layer::{GuardLayer, GuardMiddleware};

/// Ok(()) means allowed, Err(GuardError) means denied
pub type GuardResult = Result<(), GuardError>;

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<GuardError> for MarketError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Forbidden(msg) => MarketError::Forbidden(msg),
            GuardError::Unauthorized(msg) => MarketError::Unauthorized(msg),
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        MarketError::from(self).into_response()
    }
}

/// Route-level access check, run before the request body is read
///
/// Guards see the request head only; the body stays untouched until the
/// guard allows the request.
#[async_trait]
pub trait Guard: Send + Sync + 'static {
    async fn can_activate(&self, parts: &Parts) -> GuardResult;
}
