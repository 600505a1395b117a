use crate::di::Container;
use crate::error::Result;

/// A group of providers, controllers and trait bindings
///
/// Implemented by the `#[module]` macro. Bindings and imports register first, then
/// providers and controllers in declaration order.
///
/// # Example
/// ```ignore
/// #[module(
///     providers = [UserService],
///     controllers = [UserController],
/// )]
/// pub struct UserModule;
/// ```
pub trait Module {
    /// Register all providers and controllers in this module
    fn register(container: &mut Container) -> Result<()>;
}
