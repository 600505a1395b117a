use super::database::{Database, ITEMS};
use crate::common::{Direction, Pageable, Sort, SortField};
use crate::domain::{BigCategory, Item, MidCategory};
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use puppymarket_macro::Injectable;
use std::cmp::Ordering;
use std::sync::Arc;

/// Filters for `GET /item/search`; `None` matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSearchCondition {
    pub name: Option<String>,
    pub big_category: Option<BigCategory>,
    pub mid_category: Option<MidCategory>,
}

impl ItemSearchCondition {
    pub fn matches(&self, item: &Item) -> bool {
        let name_matches = self
            .name
            .as_deref()
            .is_none_or(|name| item.name.to_lowercase().contains(&name.to_lowercase()));
        name_matches
            && self.big_category.is_none_or(|big| item.big_category == big)
            && self.mid_category.is_none_or(|mid| item.mid_category == mid)
    }
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Item>>;

    /// Insert when `item.id == 0`, otherwise overwrite the stored row
    ///
    /// Saving an id that no longer exists is `NotFound`; deleted items are
    /// never written back.
    async fn save(&self, item: Item) -> Result<Item>;

    /// Count one view on the stored row; `None` when the item is gone
    async fn increment_view_count(&self, id: i64) -> Result<Option<Item>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    async fn find_page(&self, pageable: &Pageable) -> Result<Vec<Item>>;

    /// Newest first
    async fn find_by_category(&self, big: BigCategory, mid: MidCategory) -> Result<Vec<Item>>;

    async fn search(&self, condition: &ItemSearchCondition, pageable: &Pageable)
        -> Result<Vec<Item>>;
}

#[derive(Injectable)]
pub struct InMemoryItemRepository {
    db: Arc<Database>,
}

/// Order by the sort field, ties broken by id in the same direction
pub fn sort_items(items: &mut [Item], sort: Sort) {
    items.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Id => Ordering::Equal,
            SortField::Price => a.price.cmp(&b.price),
            SortField::Name => a.name.cmp(&b.name),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
        .then(a.id.cmp(&b.id));
        match sort.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    });
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Item>> {
        self.db.get(ITEMS, id)
    }

    async fn save(&self, item: Item) -> Result<Item> {
        if item.id == 0 {
            return self.db.insert(ITEMS, |id| Item { id, ..item });
        }
        if self.db.replace(ITEMS, item.id, &item)? {
            Ok(item)
        } else {
            Err(MarketError::not_found("Item", item.id))
        }
    }

    async fn increment_view_count(&self, id: i64) -> Result<Option<Item>> {
        self.db.update(ITEMS, id, |item: &mut Item| item.view_count += 1)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.db.remove(ITEMS, id)
    }

    async fn find_page(&self, pageable: &Pageable) -> Result<Vec<Item>> {
        let mut items = self.db.scan::<Item>(ITEMS)?;
        sort_items(&mut items, pageable.sort);
        Ok(pageable.slice(items))
    }

    async fn find_by_category(&self, big: BigCategory, mid: MidCategory) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self
            .db
            .scan::<Item>(ITEMS)?
            .into_iter()
            .filter(|item| item.big_category == big && item.mid_category == mid)
            .collect();
        sort_items(&mut items, Sort::id_desc());
        Ok(items)
    }

    async fn search(
        &self,
        condition: &ItemSearchCondition,
        pageable: &Pageable,
    ) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self
            .db
            .scan::<Item>(ITEMS)?
            .into_iter()
            .filter(|item| condition.matches(item))
            .collect();
        sort_items(&mut items, pageable.sort);
        Ok(pageable.slice(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemStatus;
    use chrono::{Duration, Utc};

    fn repository() -> InMemoryItemRepository {
        InMemoryItemRepository {
            db: Arc::new(Database::new()),
        }
    }

    fn item(name: &str, price: i64, big: BigCategory, mid: MidCategory, age_days: i64) -> Item {
        let created = Utc::now() - Duration::days(age_days);
        Item {
            id: 0,
            seller_id: 1,
            name: name.into(),
            price,
            description: String::new(),
            big_category: big,
            mid_category: mid,
            status: ItemStatus::Sale,
            image_path: None,
            si: None,
            gu: None,
            view_count: 0,
            created_at: created,
            updated_at: created,
        }
    }

    async fn seeded() -> InMemoryItemRepository {
        let repo = repository();
        for it in [
            item("Chicken Jerky", 9_000, BigCategory::Small, MidCategory::Snack, 3),
            item("Rain Coat", 32_000, BigCategory::Big, MidCategory::Clothes, 1),
            item("Beef Jerky", 12_000, BigCategory::Small, MidCategory::Snack, 2),
            item("Rope Toy", 5_000, BigCategory::Middle, MidCategory::Toy, 5),
        ] {
            repo.save(it).await.unwrap();
        }
        repo
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[tokio::test]
    async fn pages_follow_the_requested_sort() {
        let repo = seeded().await;
        let newest = repo.find_page(&Pageable::new(0, 2, Sort::id_desc())).await.unwrap();
        assert_eq!(ids(&newest), vec![4, 3]);

        let cheapest = Sort::new(SortField::Price, Direction::Asc);
        let page = repo.find_page(&Pageable::new(0, 12, cheapest)).await.unwrap();
        assert_eq!(ids(&page), vec![4, 1, 3, 2]);

        let oldest = Sort::new(SortField::CreatedAt, Direction::Asc);
        let page = repo.find_page(&Pageable::new(1, 2, oldest)).await.unwrap();
        assert_eq!(ids(&page), vec![3, 2]);
    }

    #[tokio::test]
    async fn category_listing_is_exact_and_newest_first() {
        let repo = seeded().await;
        let snacks = repo
            .find_by_category(BigCategory::Small, MidCategory::Snack)
            .await
            .unwrap();
        assert_eq!(ids(&snacks), vec![3, 1]);
        assert!(repo
            .find_by_category(BigCategory::Big, MidCategory::Snack)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn search_matches_name_case_insensitively() {
        let repo = seeded().await;
        let condition = ItemSearchCondition {
            name: Some("JERKY".into()),
            ..Default::default()
        };
        let found = repo.search(&condition, &Pageable::new(0, 12, Sort::id_desc())).await.unwrap();
        assert_eq!(ids(&found), vec![3, 1]);

        let condition = ItemSearchCondition {
            name: Some("jerky".into()),
            big_category: Some(BigCategory::Small),
            mid_category: Some(MidCategory::Toy),
        };
        let found = repo.search(&condition, &Pageable::new(0, 12, Sort::id_desc())).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let repo = seeded().await;
        assert!(repo.delete(2).await.unwrap());
        assert!(!repo.delete(2).await.unwrap());
        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_never_brings_back_a_deleted_item() {
        let repo = seeded().await;
        let mut stale = repo.find_by_id(2).await.unwrap().unwrap();
        repo.delete(2).await.unwrap();

        stale.price = 1;
        assert!(matches!(repo.save(stale).await, Err(MarketError::NotFound { .. })));
        assert!(repo.increment_view_count(2).await.unwrap().is_none());
        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_views_are_all_counted() {
        let repo = Arc::new(seeded().await);
        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.increment_view_count(1).await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().unwrap().is_some());
        }
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().view_count, 64);
    }
}
