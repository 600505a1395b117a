use crate::di::Container;
use crate::error::Result;

/// Trait for types that can be built from the DI container
///
/// Implemented by `#[derive(Injectable)]` and by `#[controller]`. Types with
/// no dependencies (stores, configuration) implement it by hand or are
/// registered as ready-made instances.
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies from the container
    ///
    /// # Errors
    /// Returns [`MarketError::DependencyNotFound`](crate::MarketError) when a
    /// dependency has not been registered yet.
    fn inject(container: &Container) -> Result<Self>;
}
