use crate::di::Container;
use std::sync::Arc;

/// Builder for the container that holds process-wide infrastructure
///
/// Infrastructure instances (configuration, storage, token store) are
/// registered here before modules resolve the services that depend on them.
///
/// # Example
/// ```ignore
/// let container = ContainerBuilder::new()
///     .register(ConfigService::new())
///     .register(Database::new())
///     .build();
/// ```
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            container: Container::new(),
        }
    }

    /// Register a service instance
    pub fn register<T: 'static + Send + Sync>(mut self, instance: T) -> Self {
        self.container.register(instance);
        self
    }

    /// Bind a trait to an implementation registered with [`register`](Self::register)
    pub fn bind<Trait, Impl, F>(mut self, caster: F) -> Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        self.container.register_trait::<Trait, Impl, F>(caster);
        self
    }

    pub fn build(self) -> Container {
        self.container
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
