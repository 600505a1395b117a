//! Persistence behind repository traits.
//!
//! The in-memory implementations share one [`Database`]. With the
//! `sea-orm-db` feature, users can live in Postgres instead.

pub mod database;
pub mod item_repository;
pub mod user_repository;
pub mod wish_repository;

#[cfg(feature = "sea-orm-db")]
pub mod entity;
#[cfg(feature = "sea-orm-db")]
pub mod sea_orm_user_repository;

pub use database::{Database, Inserted};
pub use item_repository::{InMemoryItemRepository, ItemRepository, ItemSearchCondition};
pub use user_repository::{InMemoryUserRepository, UserRepository};
pub use wish_repository::{InMemoryWishRepository, WishRepository};

#[cfg(feature = "sea-orm-db")]
pub use sea_orm_user_repository::SeaOrmUserRepository;
