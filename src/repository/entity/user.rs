use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};

/// `users` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub bit_category: i32,
    pub image_path: Option<String>,
    pub tel: Option<String>,
    pub si: Option<String>,
    pub gu: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password: model.password,
            nickname: model.nickname,
            bit_category: model.bit_category,
            image_path: model.image_path,
            tel: model.tel,
            si: model.si,
            gu: model.gu,
        }
    }
}

impl From<crate::domain::User> for ActiveModel {
    fn from(user: crate::domain::User) -> Self {
        ActiveModel {
            id: if user.id == 0 { NotSet } else { Set(user.id) },
            email: Set(user.email),
            password: Set(user.password),
            nickname: Set(user.nickname),
            bit_category: Set(user.bit_category),
            image_path: Set(user.image_path),
            tel: Set(user.tel),
            si: Set(user.si),
            gu: Set(user.gu),
        }
    }
}
