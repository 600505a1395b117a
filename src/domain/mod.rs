pub mod category;
pub mod item;
pub mod user;
pub mod wish;

pub use category::{BigCategory, MidCategory};
pub use item::{Item, ItemStatus, StatusToken, WishStatus};
pub use user::User;
pub use wish::Wish;
