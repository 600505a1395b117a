use crate::domain::MidCategory;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// A registered member
///
/// `id` is assigned by the repository on first save and never changes.
/// `password` holds an Argon2 PHC string, never the plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub bit_category: i32,
    pub image_path: Option<String>,
    pub tel: Option<String>,
    pub si: Option<String>,
    pub gu: Option<String>,
}

impl User {
    pub fn prefers(&self, category: MidCategory) -> bool {
        self.bit_category & category.bit() != 0
    }

    pub fn preferred_categories(&self) -> Vec<MidCategory> {
        MidCategory::iter().filter(|c| self.prefers(*c)).collect()
    }
}
