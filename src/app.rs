//! Application assembly: container wiring and the HTTP router.

use crate::app_module::{AppModule, InMemoryPersistenceModule};
use crate::config::AppConfig;
use crate::controller::{ItemController, UserController};
use crate::di::{Container, ContainerBuilder};
use crate::error::Result;
use crate::interceptor::{Interceptor, InterceptorLayer, LoggingInterceptor};
use crate::module::Module;
use crate::repository::Database;
use crate::security::{AuthenticationInterceptor, TokenStore};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Register infrastructure, pick a persistence module and resolve every
/// service and controller
pub async fn create_container(config: AppConfig, database: Database) -> Result<Container> {
    let mut container = ContainerBuilder::new()
        .register(config.security.clone())
        .register(database)
        .register(TokenStore::new())
        .build();

    register_persistence(&mut container, &config).await?;
    AppModule::register(&mut container)?;
    container.register(config);

    tracing::debug!(instances = container.len(), "container ready");
    Ok(container)
}

#[cfg(feature = "sea-orm-db")]
async fn register_persistence(container: &mut Container, config: &AppConfig) -> Result<()> {
    use crate::app_module::SeaOrmPersistenceModule;

    match config.database_url.as_deref() {
        Some(url) => {
            let connection = sea_orm::Database::connect(url).await?;
            tracing::info!("users stored through SeaORM");
            container.register(connection);
            SeaOrmPersistenceModule::register(container)
        }
        None => InMemoryPersistenceModule::register(container),
    }
}

#[cfg(not(feature = "sea-orm-db"))]
async fn register_persistence(container: &mut Container, config: &AppConfig) -> Result<()> {
    if config.database_url.is_some() {
        tracing::warn!("DATABASE_URL is set but the sea-orm-db feature is off; using memory");
    }
    InMemoryPersistenceModule::register(container)
}

/// Mount every controller and wrap the router in the interceptor chain
pub fn build_router(container: &Container) -> Result<Router> {
    let tokens = container.resolve::<TokenStore>()?;
    let interceptors: Vec<Arc<dyn Interceptor>> = vec![
        Arc::new(LoggingInterceptor),
        Arc::new(AuthenticationInterceptor::new(tokens)),
    ];

    Ok(Router::new()
        .merge(ItemController::router(container.resolve::<ItemController>()?))
        .merge(UserController::router(container.resolve::<UserController>()?))
        .layer(InterceptorLayer::new(interceptors))
        .layer(TraceLayer::new_for_http()))
}
