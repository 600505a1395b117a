//! # PuppyMarket
//!
//! Backend of a classifieds marketplace for dog goods: members register, list
//! items for sale, move them through `SALE`/`RESERVED`/`SOLD_OUT`, and keep
//! a wish list.
//!
//! The HTTP layer is built from declarative controllers on top of axum:
//!
//! - **Dependency Injection**: type-keyed [`Container`] with `Arc<dyn Trait>`
//!   bindings and an `Injectable` derive
//! - **Controllers**: `#[controller]`/`#[routes]` generate the axum router,
//!   `#[pre_authorize]` puts an authority guard in front of a route
//! - **Modules**: `#[module]` groups providers, controllers and bindings
//! - **Interceptors**: request logging and bearer token authentication
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use puppymarket::app::{build_router, create_container};
//! use puppymarket::config::AppConfig;
//! use puppymarket::repository::Database;
//!
//! #[tokio::main]
//! async fn main() -> puppymarket::Result<()> {
//!     let container = create_container(AppConfig::default(), Database::new()).await?;
//!     let router = build_router(&container)?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//!     Ok(())
//! }
//! ```

// Lets macro-generated `::puppymarket::...` paths resolve inside this crate.
extern crate self as puppymarket;

pub mod app;
pub mod app_module;
pub mod common;
pub mod config;
pub mod controller;
pub mod di;
pub mod domain;
pub mod dto;
pub mod error;
pub mod guard;
pub mod interceptor;
pub mod lifecycle;
pub mod module;
pub mod repository;
pub mod security;
pub mod service;

// Re-export core types
pub use di::{Container, ContainerBuilder, Injectable};
pub use error::{MarketError, Result};
pub use module::Module;

// Re-export macros
pub use puppymarket_macro::{
    Injectable as DeriveInjectable, body, controller, delete, get, module, param, post,
    pre_authorize, put, query, routes, status,
};

pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use puppymarket::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::{PageRequest, Pageable, PageableDefault, Sort};
    pub use crate::di::{Container, ContainerBuilder, Injectable};
    pub use crate::error::{MarketError, Result};
    pub use crate::guard::{AuthorityGuard, Guard, GuardError, GuardLayer, GuardResult};
    pub use crate::interceptor::{Interceptor, InterceptorLayer, Next};
    pub use crate::lifecycle::{
        LifecycleError, LifecycleManager, OnModuleDestroy, OnModuleInit, shutdown_signal,
    };
    pub use crate::module::Module;
    pub use crate::security::{Authority, UserAuthentication};
    pub use crate::{
        DeriveInjectable as Injectable, body, controller, delete, get, module, param, post,
        pre_authorize, put, query, routes, status,
    };
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        extract::{Path, Query},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
