//! Request and response bodies of the `/item` endpoints.

use crate::domain::{BigCategory, Item, ItemStatus, MidCategory, User};
use crate::error::Result;
use crate::repository::ItemSearchCondition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreateRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0))]
    pub price: i64,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    pub big_category: BigCategory,
    pub mid_category: MidCategory,
    pub image_path: Option<String>,
}

/// Full replacement of the editable fields
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdateRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0))]
    pub price: i64,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    pub big_category: BigCategory,
    pub mid_category: MidCategory,
    pub image_path: Option<String>,
}

/// Row of `GET /item`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponseDto {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub big_category: BigCategory,
    pub mid_category: MidCategory,
    pub status: ItemStatus,
    pub image_path: Option<String>,
    pub si: Option<String>,
    pub gu: Option<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Item> for ItemResponseDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            big_category: item.big_category,
            mid_category: item.mid_category,
            status: item.status,
            image_path: item.image_path,
            si: item.si,
            gu: item.gu,
            view_count: item.view_count,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDto {
    pub id: i64,
    pub nickname: String,
    pub image_path: Option<String>,
}

impl From<&User> for SellerDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            nickname: user.nickname.clone(),
            image_path: user.image_path.clone(),
        }
    }
}

/// Body of `GET /item/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemGetResponseDto {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub big_category: BigCategory,
    pub mid_category: MidCategory,
    pub status: ItemStatus,
    pub image_path: Option<String>,
    pub si: Option<String>,
    pub gu: Option<String>,
    pub view_count: i64,
    pub wish_count: i64,
    /// `None` when the seller's account no longer exists
    pub seller: Option<SellerDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemGetResponseDto {
    pub fn new(item: Item, seller: Option<&User>, wish_count: i64) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            description: item.description,
            big_category: item.big_category,
            mid_category: item.mid_category,
            status: item.status,
            image_path: item.image_path,
            si: item.si,
            gu: item.gu,
            view_count: item.view_count,
            wish_count,
            seller: seller.map(SellerDto::from),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreateResponseDto {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub big_category: BigCategory,
    pub mid_category: MidCategory,
    pub status: ItemStatus,
    pub image_path: Option<String>,
    pub si: Option<String>,
    pub gu: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Item> for ItemCreateResponseDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            seller_id: item.seller_id,
            name: item.name,
            price: item.price,
            description: item.description,
            big_category: item.big_category,
            mid_category: item.mid_category,
            status: item.status,
            image_path: item.image_path,
            si: item.si,
            gu: item.gu,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdateResponseDto {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub big_category: BigCategory,
    pub mid_category: MidCategory,
    pub status: ItemStatus,
    pub image_path: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemUpdateResponseDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            description: item.description,
            big_category: item.big_category,
            mid_category: item.mid_category,
            status: item.status,
            image_path: item.image_path,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDeleteResponseDto {
    pub id: i64,
    pub removed_wishes: usize,
}

/// Row of the category listing and of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCategoryGetResponseDto {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub big_category: BigCategory,
    pub mid_category: MidCategory,
    pub status: ItemStatus,
    pub image_path: Option<String>,
    pub si: Option<String>,
    pub gu: Option<String>,
}

impl From<Item> for ItemCategoryGetResponseDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            big_category: item.big_category,
            mid_category: item.mid_category,
            status: item.status,
            image_path: item.image_path,
            si: item.si,
            gu: item.gu,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishResponseDto {
    pub item_id: i64,
    pub wished: bool,
    pub wish_count: i64,
}

/// Query string of `GET /item/search`
///
/// Categories stay raw strings so unknown tokens surface as a 400 with a
/// readable message instead of a query rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSearchQuery {
    pub name: Option<String>,
    pub mid_category: Option<String>,
    pub big_category: Option<String>,
    pub page: Option<u64>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ItemSearchQuery {
    pub fn condition(&self) -> Result<ItemSearchCondition> {
        Ok(ItemSearchCondition {
            name: non_blank(&self.name).map(str::to_string),
            big_category: non_blank(&self.big_category)
                .map(BigCategory::parse)
                .transpose()?,
            mid_category: non_blank(&self.mid_category)
                .map(MidCategory::parse)
                .transpose()?,
        })
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use serde_json::json;

    #[test]
    fn create_request_reads_camel_case() {
        let dto: ItemCreateRequestDto = serde_json::from_value(json!({
            "name": "Rain Coat",
            "price": 32000,
            "bigCategory": "BIG",
            "midCategory": "CLOTHES",
            "imagePath": "/img/coat.png"
        }))
        .unwrap();
        assert_eq!(dto.big_category, BigCategory::Big);
        assert_eq!(dto.description, "");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn create_request_rejects_negative_price_and_blank_name() {
        let dto: ItemCreateRequestDto = serde_json::from_value(json!({
            "name": "",
            "price": -1,
            "bigCategory": "SMALL",
            "midCategory": "FEED"
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn search_query_ignores_blank_filters() {
        let query = ItemSearchQuery {
            name: Some("  ".into()),
            mid_category: Some("toy".into()),
            big_category: None,
            page: None,
        };
        let condition = query.condition().unwrap();
        assert_eq!(condition.name, None);
        assert_eq!(condition.mid_category, Some(MidCategory::Toy));
        assert_eq!(query.page(), 0);
    }

    #[test]
    fn search_query_rejects_unknown_category() {
        let query = ItemSearchQuery {
            big_category: Some("HUGE".into()),
            ..Default::default()
        };
        assert!(matches!(query.condition(), Err(MarketError::Validation(_))));
    }
}
