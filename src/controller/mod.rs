//! HTTP façades over the services.
//!
//! `#[controller(path = ...)]` makes a controller injectable and gives it a
//! base path; `#[routes]` turns its annotated methods into an axum router
//! whose routes are mounted below that base path.

pub mod item_controller;
pub mod user_controller;

pub use item_controller::ItemController;
pub use user_controller::UserController;

/// Join a controller base path and a route path
pub fn join_path(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match (base.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => base.to_string(),
        (_, false) => format!("{base}/{path}"),
    }
}
