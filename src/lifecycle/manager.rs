use super::{LifecycleError, OnModuleDestroy, OnModuleInit, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

struct LifecycleHook<T: ?Sized> {
    service: Arc<RwLock<T>>,
    name: String,
}

/// Runs init hooks in registration order and destroy hooks in reverse
///
/// # Example
///
/// ```rust,ignore
/// let mut manager = LifecycleManager::new();
/// manager.register(Arc::clone(&database), "Database");
/// manager.call_module_init(Duration::from_secs(30)).await?;
/// // ... serve ...
/// manager.call_module_destroy().await?;
/// ```
#[derive(Default)]
pub struct LifecycleManager {
    on_init_hooks: Vec<LifecycleHook<dyn OnModuleInit>>,
    on_destroy_hooks: Vec<LifecycleHook<dyn OnModuleDestroy>>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service for both init and destroy hooks
    pub fn register<T>(&mut self, service: Arc<RwLock<T>>, name: impl Into<String>)
    where
        T: OnModuleInit + OnModuleDestroy + 'static,
    {
        let name = name.into();
        self.on_init_hooks.push(LifecycleHook {
            service: Arc::clone(&service) as Arc<RwLock<dyn OnModuleInit>>,
            name: name.clone(),
        });
        self.on_destroy_hooks.push(LifecycleHook {
            service: service as Arc<RwLock<dyn OnModuleDestroy>>,
            name,
        });
    }

    pub async fn call_module_init(&self, timeout: Duration) -> Result<()> {
        tokio::time::timeout(timeout, self.run_init_hooks())
            .await
            .map_err(|_| LifecycleError::Timeout {
                phase: "OnModuleInit",
                elapsed: timeout,
            })?
    }

    async fn run_init_hooks(&self) -> Result<()> {
        for hook in &self.on_init_hooks {
            tracing::debug!("Initializing: {}", hook.name);
            let mut service = hook.service.write().await;
            service.on_module_init().await.map_err(|e| {
                tracing::error!("OnModuleInit failed for {}: {}", hook.name, e);
                LifecycleError::hook_failed(&hook.name, e.to_string())
            })?;
        }
        tracing::info!("OnModuleInit complete ({} hooks)", self.on_init_hooks.len());
        Ok(())
    }

    /// Every hook runs even if an earlier one fails; the first error is returned
    pub async fn call_module_destroy(&self) -> Result<()> {
        let mut first_error = None;
        for hook in self.on_destroy_hooks.iter().rev() {
            tracing::debug!("Destroying: {}", hook.name);
            let mut service = hook.service.write().await;
            if let Err(e) = service.on_module_destroy().await {
                tracing::error!("OnModuleDestroy failed for {}: {}", hook.name, e);
                first_error.get_or_insert(LifecycleError::hook_failed(&hook.name, e.to_string()));
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail_destroy: bool,
    }

    #[async_trait]
    impl OnModuleInit for Recorder {
        async fn on_module_init(&mut self) -> Result<()> {
            self.log.lock().unwrap().push(format!("init {}", self.name));
            Ok(())
        }
    }

    #[async_trait]
    impl OnModuleDestroy for Recorder {
        async fn on_module_destroy(&mut self) -> Result<()> {
            self.log.lock().unwrap().push(format!("destroy {}", self.name));
            if self.fail_destroy {
                return Err(LifecycleError::shutdown_failed("boom"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn destroys_in_reverse_order_and_keeps_going_after_errors() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = LifecycleManager::new();
        for (name, fail_destroy) in [("db", false), ("cache", true)] {
            manager.register(
                Arc::new(RwLock::new(Recorder {
                    name,
                    log: Arc::clone(&log),
                    fail_destroy,
                })),
                name,
            );
        }

        manager.call_module_init(Duration::from_secs(1)).await.unwrap();
        let result = manager.call_module_destroy().await;

        assert!(matches!(result, Err(LifecycleError::HookFailed { ref service, .. }) if service == "cache"));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["init db", "init cache", "destroy cache", "destroy db"]
        );
    }
}
