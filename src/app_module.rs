use crate::controller::{ItemController, UserController};
use crate::repository::{
    InMemoryItemRepository, InMemoryUserRepository, InMemoryWishRepository, ItemRepository,
    UserRepository, WishRepository,
};
use crate::security::PasswordEncoder;
use crate::service::{ItemService, UserService};
use puppymarket_macro::module;

#[cfg(feature = "sea-orm-db")]
use crate::repository::SeaOrmUserRepository;

/// All tables kept in the shared in-memory [`Database`](crate::repository::Database)
#[module(
    bindings = [
        (dyn UserRepository => InMemoryUserRepository),
        (dyn ItemRepository => InMemoryItemRepository),
        (dyn WishRepository => InMemoryWishRepository),
    ],
    providers = [InMemoryUserRepository, InMemoryItemRepository, InMemoryWishRepository],
)]
pub struct InMemoryPersistenceModule;

/// Users in Postgres through SeaORM, items and wishes in memory.
/// Needs a `DatabaseConnection` in the container.
#[cfg(feature = "sea-orm-db")]
#[module(
    bindings = [
        (dyn UserRepository => SeaOrmUserRepository),
        (dyn ItemRepository => InMemoryItemRepository),
        (dyn WishRepository => InMemoryWishRepository),
    ],
    providers = [SeaOrmUserRepository, InMemoryItemRepository, InMemoryWishRepository],
)]
pub struct SeaOrmPersistenceModule;

/// Services and controllers. A persistence module has to be registered first.
#[module(
    providers = [PasswordEncoder, UserService, ItemService],
    controllers = [UserController, ItemController],
)]
pub struct AppModule;
