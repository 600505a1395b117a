use crate::common::{Pageable, Sort};
use crate::domain::{BigCategory, Item, ItemStatus, MidCategory, WishStatus};
use crate::dto::{
    ItemCategoryGetResponseDto, ItemCreateRequestDto, ItemCreateResponseDto,
    ItemDeleteResponseDto, ItemGetResponseDto, ItemResponseDto, ItemUpdateRequestDto,
    ItemUpdateResponseDto, WishResponseDto,
};
use crate::error::{MarketError, Result};
use crate::repository::{ItemRepository, ItemSearchCondition, UserRepository, WishRepository};
use crate::security::UserAuthentication;
use chrono::Utc;
use puppymarket_macro::Injectable;
use std::sync::Arc;
use validator::Validate;

/// Page size of the category-less search endpoint
pub const SEARCH_PAGE_SIZE: u64 = 12;

#[derive(Injectable)]
pub struct ItemService {
    items: Arc<dyn ItemRepository>,
    wishes: Arc<dyn WishRepository>,
    users: Arc<dyn UserRepository>,
}

impl ItemService {
    async fn find_item(&self, id: i64) -> Result<Item> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or_else(|| MarketError::not_found("Item", id))
    }

    fn ensure_owner(item: &Item, auth: &UserAuthentication) -> Result<()> {
        if item.is_owned_by(auth.user_id) {
            Ok(())
        } else {
            Err(MarketError::Forbidden(format!(
                "item {} belongs to another member",
                item.id
            )))
        }
    }

    pub async fn get_items(&self, pageable: Pageable) -> Result<Vec<ItemResponseDto>> {
        let items = self.items.find_page(&pageable).await?;
        Ok(items.into_iter().map(ItemResponseDto::from).collect())
    }

    /// Item detail; every read counts as a view
    pub async fn get_item(&self, id: i64) -> Result<ItemGetResponseDto> {
        let item = self
            .items
            .increment_view_count(id)
            .await?
            .ok_or_else(|| MarketError::not_found("Item", id))?;

        let seller = self.users.find_by_id(item.seller_id).await?;
        if seller.is_none() {
            tracing::warn!(item_id = id, seller_id = item.seller_id, "seller account missing");
        }
        let wish_count = self.wishes.count_by_item(id).await?;
        Ok(ItemGetResponseDto::new(item, seller.as_ref(), wish_count))
    }

    pub async fn create_item(
        &self,
        dto: ItemCreateRequestDto,
        auth: &UserAuthentication,
    ) -> Result<ItemCreateResponseDto> {
        dto.validate()?;
        let seller = self
            .users
            .find_by_id(auth.user_id)
            .await?
            .ok_or_else(|| MarketError::not_found("User", auth.user_id))?;

        let now = Utc::now();
        let item = self
            .items
            .save(Item {
                id: 0,
                seller_id: seller.id,
                name: dto.name,
                price: dto.price,
                description: dto.description,
                big_category: dto.big_category,
                mid_category: dto.mid_category,
                status: ItemStatus::default(),
                image_path: dto.image_path,
                si: seller.si,
                gu: seller.gu,
                view_count: 0,
                created_at: now,
                updated_at: now,
            })
            .await?;
        tracing::info!(item_id = item.id, seller_id = item.seller_id, "item listed");
        Ok(item.into())
    }

    pub async fn update_item(
        &self,
        id: i64,
        dto: ItemUpdateRequestDto,
        auth: &UserAuthentication,
    ) -> Result<ItemUpdateResponseDto> {
        dto.validate()?;
        let mut item = self.find_item(id).await?;
        Self::ensure_owner(&item, auth)?;

        item.name = dto.name;
        item.price = dto.price;
        item.description = dto.description;
        item.big_category = dto.big_category;
        item.mid_category = dto.mid_category;
        item.image_path = dto.image_path;
        item.updated_at = Utc::now();

        let item = self.items.save(item).await?;
        tracing::debug!(item_id = id, "item updated");
        Ok(item.into())
    }

    pub async fn update_item_status(
        &self,
        id: i64,
        status: ItemStatus,
        auth: &UserAuthentication,
    ) -> Result<ItemUpdateResponseDto> {
        let mut item = self.find_item(id).await?;
        Self::ensure_owner(&item, auth)?;

        if !item.transition_to(status)? {
            return Ok(item.into());
        }
        let item = self.items.save(item).await?;
        tracing::info!(item_id = id, status = %item.status, "item status changed");
        Ok(item.into())
    }

    /// Idempotent for the caller: repeated `WISH` keeps a single wish and
    /// `UNWISH` without a wish changes nothing
    pub async fn update_wish_status(
        &self,
        id: i64,
        status: WishStatus,
        auth: &UserAuthentication,
    ) -> Result<WishResponseDto> {
        self.find_item(id).await?;
        match status {
            WishStatus::Wish => {
                self.wishes.insert(auth.user_id, id).await?;
            }
            WishStatus::Unwish => {
                self.wishes.delete(auth.user_id, id).await?;
            }
        }
        Ok(WishResponseDto {
            item_id: id,
            wished: status == WishStatus::Wish,
            wish_count: self.wishes.count_by_item(id).await?,
        })
    }

    pub async fn delete_item(
        &self,
        id: i64,
        auth: &UserAuthentication,
    ) -> Result<ItemDeleteResponseDto> {
        let item = self.find_item(id).await?;
        if !auth.is_admin() {
            Self::ensure_owner(&item, auth)?;
        }

        let removed_wishes = self.wishes.delete_by_item(id).await?;
        self.items.delete(id).await?;
        tracing::info!(item_id = id, removed_wishes, by = auth.user_id, "item deleted");
        Ok(ItemDeleteResponseDto { id, removed_wishes })
    }

    /// Items of one big/mid category pair, newest first
    pub async fn get_category_item(
        &self,
        big_code: i64,
        mid_name: &str,
    ) -> Result<Vec<ItemCategoryGetResponseDto>> {
        let big = BigCategory::from_code(big_code)?;
        let mid = MidCategory::parse(mid_name)?;
        let items = self.items.find_by_category(big, mid).await?;
        Ok(items.into_iter().map(ItemCategoryGetResponseDto::from).collect())
    }

    pub async fn search(
        &self,
        condition: &ItemSearchCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<ItemCategoryGetResponseDto>> {
        let pageable = Pageable::new(page, size, Sort::id_desc());
        let items = self.items.search(condition, &pageable).await?;
        Ok(items.into_iter().map(ItemCategoryGetResponseDto::from).collect())
    }
}
