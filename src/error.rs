use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Dependency not found: {type_name}")]
    DependencyNotFound { type_name: String },

    #[error("Failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            MarketError::NotFound { .. } => StatusCode::NOT_FOUND,
            MarketError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MarketError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketError::Conflict(_) => StatusCode::CONFLICT,
            MarketError::DependencyNotFound { .. }
            | MarketError::DowncastFailed { .. }
            | MarketError::PasswordHash(_)
            | MarketError::Storage(_)
            | MarketError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for MarketError {
    fn from(errors: validator::ValidationErrors) -> Self {
        MarketError::Validation(errors.to_string())
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        MarketError::Storage(format!("row codec: {}", err))
    }
}

#[cfg(feature = "sea-orm-db")]
impl From<sea_orm::DbErr> for MarketError {
    fn from(err: sea_orm::DbErr) -> Self {
        MarketError::Storage(format!("Database error: {}", err))
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal Server Error".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
            self.to_string()
        };

        (
            status,
            Json(json!({
                "statusCode": status.as_u16(),
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        assert_eq!(MarketError::not_found("Item", 3).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            MarketError::Unauthorized("no token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(MarketError::Forbidden("owner".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(MarketError::Validation("size".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(MarketError::Conflict("email".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            MarketError::Storage("disk".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let response = MarketError::Internal("secret detail".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["statusCode"], 500);
        assert_eq!(body["message"], "Internal Server Error");
    }
}
