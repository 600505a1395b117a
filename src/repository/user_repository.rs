use super::database::{Database, Inserted, USERS};
use crate::domain::User;
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use puppymarket_macro::Injectable;
use std::sync::Arc;

/// Emails are unique regardless of case
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Case-insensitive lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Store a new member under a fresh id
    ///
    /// Fails with [`MarketError::Conflict`] when the email is taken; the check
    /// and the insert are one step.
    async fn insert(&self, user: User) -> Result<User>;
}

fn email_taken(email: &str) -> MarketError {
    MarketError::Conflict(format!("email {email} is already registered"))
}

#[derive(Injectable)]
pub struct InMemoryUserRepository {
    db: Arc<Database>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.db.get(USERS, id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        match self.db.unique_id(USERS, &email_key(email))? {
            Some(id) => self.db.get(USERS, id),
            None => Ok(None),
        }
    }

    async fn insert(&self, user: User) -> Result<User> {
        let key = email_key(&user.email);
        match self.db.insert_unique(USERS, &key, |id| User { id, ..user })? {
            Inserted::Created(user) => Ok(user),
            Inserted::Existing(_) => Err(email_taken(&key)),
        }
    }
}

#[cfg(feature = "sea-orm-db")]
pub(crate) fn conflict_on_duplicate(err: sea_orm::DbErr, email: &str) -> MarketError {
    match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => email_taken(email),
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> InMemoryUserRepository {
        InMemoryUserRepository {
            db: Arc::new(Database::new()),
        }
    }

    fn user(email: &str) -> User {
        User {
            id: 0,
            email: email.into(),
            password: "hash".into(),
            nickname: "bori".into(),
            bit_category: 0,
            image_path: None,
            tel: None,
            si: None,
            gu: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let repo = repository();
        let first = repo.insert(user("a@puppy.market")).await.unwrap();
        let second = repo.insert(user("b@puppy.market")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(repo.find_by_id(2).await.unwrap().unwrap().email, "b@puppy.market");
        assert!(repo.find_by_id(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let repo = repository();
        repo.insert(user("Bori@Puppy.Market")).await.unwrap();
        let found = repo.find_by_email(" bori@puppy.market").await.unwrap().unwrap();
        assert_eq!(found.email, "Bori@Puppy.Market");
        assert!(repo.find_by_email("coco@puppy.market").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_by_the_insert_itself() {
        let repo = repository();
        repo.insert(user("bori@puppy.market")).await.unwrap();
        assert!(matches!(
            repo.insert(user("BORI@puppy.market")).await,
            Err(MarketError::Conflict(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_of_one_email_keep_a_single_user() {
        let repo = Arc::new(repository());
        let tasks: Vec<_> = ["dup@puppy.market", "DUP@puppy.market", "Dup@Puppy.Market", "dup@PUPPY.market"]
            .into_iter()
            .map(|email| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.insert(user(email)).await })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert!(matches!(err, MarketError::Conflict(_))),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(repo.db.scan::<User>(USERS).unwrap().len(), 1);
    }
}
