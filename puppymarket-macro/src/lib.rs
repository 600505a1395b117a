use proc_macro::TokenStream;

mod controller;
mod http_methods;
mod injectable;
mod module;

/// Derive macro for making a struct injectable into the DI container
///
/// Every field must be an `Arc<T>` (resolved by type) or an `Arc<dyn Trait>`
/// (resolved through a trait binding).
///
/// # Example
/// ```ignore
/// use puppymarket::prelude::*;
///
/// #[derive(Injectable)]
/// pub struct UserService {
///     repository: Arc<dyn UserRepository>,
/// }
/// ```
#[proc_macro_derive(Injectable)]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable(input)
}

/// Attribute macro for defining a controller with automatic DI registration
///
/// # Example
/// ```ignore
/// #[controller(path = "/users")]
/// pub struct UserController {
///     user_service: Arc<UserService>,
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_attribute(attr, item)
}

/// Attribute macro turning an impl block of a controller into an axum router
///
/// Methods carrying an HTTP method attribute become routes below the
/// controller's base path. `#[pre_authorize(...)]` puts an authority guard in
/// front of the route and `#[status(...)]` overrides the success status.
///
/// # Example
/// ```ignore
/// #[routes]
/// impl ItemController {
///     #[post("")]
///     #[status(CREATED)]
///     #[pre_authorize("USER")]
///     pub async fn create(&self, auth: UserAuthentication, #[body] dto: ItemCreateRequestDto)
///         -> Result<Json<ItemCreateResponseDto>> {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::routes_attribute(attr, item)
}

/// Attribute macro for defining a module with providers, controllers,
/// trait bindings and imported modules
///
/// # Example
/// ```ignore
/// #[module(
///     bindings = [(dyn UserRepository => InMemoryUserRepository)],
///     providers = [InMemoryUserRepository, UserService],
///     controllers = [UserController],
/// )]
/// pub struct UserModule;
/// ```
#[proc_macro_attribute]
pub fn module(attr: TokenStream, item: TokenStream) -> TokenStream {
    module::module_attribute(attr, item)
}

/// HTTP GET method attribute for controller methods
#[proc_macro_attribute]
pub fn get(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("GET", attr, item)
}

/// HTTP POST method attribute for controller methods
#[proc_macro_attribute]
pub fn post(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("POST", attr, item)
}

/// HTTP PUT method attribute for controller methods
#[proc_macro_attribute]
pub fn put(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("PUT", attr, item)
}

/// HTTP DELETE method attribute for controller methods
#[proc_macro_attribute]
pub fn delete(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("DELETE", attr, item)
}

/// Authority predicate for a route: the caller must be authenticated and hold
/// at least one of the listed authorities.
/// Evaluated by the `#[routes]` macro; standalone use is a pass-through.
#[proc_macro_attribute]
pub fn pre_authorize(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Success status override for a route, e.g. `#[status(NO_CONTENT)]`.
/// Evaluated by the `#[routes]` macro; standalone use is a pass-through.
#[proc_macro_attribute]
pub fn status(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Parameter attribute for request body (JSON)
/// Wraps the parameter with axum::Json extractor
#[proc_macro_attribute]
pub fn body(_attr: TokenStream, item: TokenStream) -> TokenStream {
    // Pass-through, actual handling is done by #[routes] macro
    item
}

/// Parameter attribute for path parameters
/// Wraps the parameter with axum::extract::Path extractor
#[proc_macro_attribute]
pub fn param(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Parameter attribute for query string parameters
/// Wraps the parameter with axum::extract::Query extractor
#[proc_macro_attribute]
pub fn query(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}
