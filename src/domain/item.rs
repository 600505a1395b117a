use crate::domain::{BigCategory, MidCategory};
use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sale state of an item
///
/// ```text
/// SALE <-> RESERVED
///   \        /
///    SOLD_OUT   (terminal)
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ItemStatus {
    #[default]
    Sale,
    Reserved,
    SoldOut,
}

impl ItemStatus {
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        self == next || self != ItemStatus::SoldOut
    }
}

/// Requested wish-list state for the calling member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum WishStatus {
    Wish,
    Unwish,
}

/// Last path segment of `PUT /item/{id}/{token}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusToken {
    Item(ItemStatus),
    Wish(WishStatus),
}

impl StatusToken {
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        if let Ok(status) = token.parse::<ItemStatus>() {
            return Ok(StatusToken::Item(status));
        }
        if let Ok(wish) = token.parse::<WishStatus>() {
            return Ok(StatusToken::Wish(wish));
        }
        Err(MarketError::Validation(format!(
            "'{token}' is neither an item status (SALE, RESERVED, SOLD_OUT) nor a wish status (WISH, UNWISH)"
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
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
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.seller_id == user_id
    }

    /// Move to `next`, refusing to leave `SOLD_OUT`
    pub fn transition_to(&mut self, next: ItemStatus) -> Result<bool> {
        if self.status == next {
            return Ok(false);
        }
        if !self.status.can_transition_to(next) {
            return Err(MarketError::Conflict(format!(
                "item {} is {} and cannot become {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(true)
    }
}
