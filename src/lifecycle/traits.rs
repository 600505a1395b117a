use super::LifecycleError;
use async_trait::async_trait;

/// Called once before the server starts accepting requests
#[async_trait]
pub trait OnModuleInit: Send + Sync {
    async fn on_module_init(&mut self) -> Result<(), LifecycleError>;
}

/// Called during shutdown, in reverse registration order
#[async_trait]
pub trait OnModuleDestroy: Send + Sync {
    async fn on_module_destroy(&mut self) -> Result<(), LifecycleError>;
}
