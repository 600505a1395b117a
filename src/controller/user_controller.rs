use crate::dto::{UserRequestDto, UserResponseDto};
use crate::error::Result;
use crate::service::UserService;
use axum::Json;
use puppymarket_macro::{controller, routes};
use std::sync::Arc;

#[controller(path = "/users")]
pub struct UserController {
    user_service: Arc<UserService>,
}

#[routes]
impl UserController {
    #[get("/{id}")]
    pub async fn detail(&self, #[param] id: i64) -> Result<Json<UserResponseDto>> {
        Ok(Json(self.user_service.get_user(id).await?))
    }

    /// Registers a member; the body is their bearer token
    #[post("")]
    pub async fn add_member(&self, #[body] dto: UserRequestDto) -> Result<String> {
        self.user_service.join(dto).await
    }
}
