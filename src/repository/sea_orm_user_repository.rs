use super::entity::user::{ActiveModel, Column, Entity};
use super::user_repository::{UserRepository, conflict_on_duplicate, email_key};
use crate::domain::User;
use crate::error::Result;
use async_trait::async_trait;
use puppymarket_macro::Injectable;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;

/// `UserRepository` over the `users` table
///
/// A unique violation on insert becomes `Conflict`. The table's unique index
/// has to cover `lower(email)` for the check to ignore case.
#[derive(Injectable)]
pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let model = Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let model = Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(Column::Email))).eq(email_key(email)))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(User::from))
    }

    async fn insert(&self, user: User) -> Result<User> {
        let key = email_key(&user.email);
        let model = ActiveModel::from(User { id: 0, ..user })
            .insert(self.db.as_ref())
            .await
            .map_err(|err| conflict_on_duplicate(err, &key))?;
        tracing::debug!(user_id = model.id, "users row inserted");
        Ok(model.into())
    }
}
