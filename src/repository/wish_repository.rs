use super::database::{Database, Inserted, WISHES};
use crate::domain::Wish;
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use puppymarket_macro::Injectable;
use std::sync::Arc;

#[async_trait]
pub trait WishRepository: Send + Sync {
    /// Add a wish; an existing `(user_id, item_id)` pair is returned as is
    async fn insert(&self, user_id: i64, item_id: i64) -> Result<Wish>;

    async fn delete(&self, user_id: i64, item_id: i64) -> Result<bool>;

    async fn count_by_item(&self, item_id: i64) -> Result<i64>;

    async fn delete_by_item(&self, item_id: i64) -> Result<usize>;
}

fn pair_key(user_id: i64, item_id: i64) -> String {
    format!("{user_id}:{item_id}")
}

/// Wishes keyed by their `(user_id, item_id)` pair
#[derive(Injectable)]
pub struct InMemoryWishRepository {
    db: Arc<Database>,
}

#[async_trait]
impl WishRepository for InMemoryWishRepository {
    async fn insert(&self, user_id: i64, item_id: i64) -> Result<Wish> {
        let key = pair_key(user_id, item_id);
        match self.db.insert_unique(WISHES, &key, |id| Wish { id, user_id, item_id })? {
            Inserted::Created(wish) => Ok(wish),
            Inserted::Existing(id) => self
                .db
                .get(WISHES, id)?
                .ok_or_else(|| MarketError::Storage(format!("wish {key} lost its row"))),
        }
    }

    async fn delete(&self, user_id: i64, item_id: i64) -> Result<bool> {
        self.db.remove_unique(WISHES, &pair_key(user_id, item_id))
    }

    async fn count_by_item(&self, item_id: i64) -> Result<i64> {
        let count = self
            .db
            .scan::<Wish>(WISHES)?
            .iter()
            .filter(|wish| wish.item_id == item_id)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn delete_by_item(&self, item_id: i64) -> Result<usize> {
        let mut removed = 0;
        for wish in self.db.scan::<Wish>(WISHES)? {
            if wish.item_id == item_id && self.db.remove_unique(WISHES, &pair_key(wish.user_id, item_id))? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> InMemoryWishRepository {
        InMemoryWishRepository {
            db: Arc::new(Database::new()),
        }
    }

    #[tokio::test]
    async fn insert_is_idempotent_per_pair() {
        let repo = repository();
        let first = repo.insert(1, 10).await.unwrap();
        let again = repo.insert(1, 10).await.unwrap();
        assert_eq!(first, again);
        repo.insert(2, 10).await.unwrap();
        assert_eq!(repo.count_by_item(10).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn delete_of_missing_wish_is_a_no_op() {
        let repo = repository();
        assert!(!repo.delete(1, 10).await.unwrap());
        repo.insert(1, 10).await.unwrap();
        assert!(repo.delete(1, 10).await.unwrap());
        assert_eq!(repo.count_by_item(10).await.unwrap(), 0);
        repo.insert(1, 10).await.unwrap();
        assert_eq!(repo.count_by_item(10).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_by_item_only_touches_that_item() {
        let repo = repository();
        repo.insert(1, 10).await.unwrap();
        repo.insert(2, 10).await.unwrap();
        repo.insert(1, 11).await.unwrap();
        assert_eq!(repo.delete_by_item(10).await.unwrap(), 2);
        assert_eq!(repo.count_by_item(10).await.unwrap(), 0);
        assert_eq!(repo.count_by_item(11).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_wishes_from_one_member_store_one_row() {
        let repo = Arc::new(repository());
        for item_id in 1..=50 {
            let tasks: Vec<_> = (0..8)
                .map(|_| {
                    let repo = Arc::clone(&repo);
                    tokio::spawn(async move { repo.insert(7, item_id).await })
                })
                .collect();
            for task in tasks {
                task.await.unwrap().unwrap();
            }
            assert_eq!(repo.count_by_item(item_id).await.unwrap(), 1, "item {item_id}");
        }
    }
}
