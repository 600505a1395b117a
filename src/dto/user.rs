use crate::domain::{MidCategory, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration body of `POST /users`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserRequestDto {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 30))]
    pub nickname: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 511))]
    pub bit_category: i32,
    pub image_path: Option<String>,
    pub tel: Option<String>,
    pub si: Option<String>,
    pub gu: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub bit_category: i32,
    pub preferred_categories: Vec<MidCategory>,
    pub image_path: Option<String>,
    pub tel: Option<String>,
    pub si: Option<String>,
    pub gu: Option<String>,
}

impl From<User> for UserResponseDto {
    fn from(user: User) -> Self {
        Self {
            preferred_categories: user.preferred_categories(),
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            bit_category: user.bit_category,
            image_path: user.image_path,
            tel: user.tel,
            si: user.si,
            gu: user.gu,
        }
    }
}
