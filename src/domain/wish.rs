use serde::{Deserialize, Serialize};

/// A member's bookmark on an item; unique per `(user_id, item_id)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wish {
    pub id: i64,
    pub user_id: i64,
    pub item_id: i64,
}
