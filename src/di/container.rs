use crate::error::{MarketError, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

type AnyArc = Arc<dyn Any + Send + Sync>;

/// Turns the stored `Arc<Impl>` into an `Arc<dyn Trait>`, boxed again as `Any`.
/// `None` means the stored instance was not of the bound implementation type.
type CasterFn = Arc<dyn Fn(AnyArc) -> Option<AnyArc> + Send + Sync>;

/// Thread-safe dependency injection container.
///
/// Instances are keyed by `TypeId` and shared as `Arc`s. Trait objects are
/// resolved through bindings recorded with [`Container::register_trait`].
#[derive(Clone, Default)]
pub struct Container {
    services: DashMap<TypeId, AnyArc>,
    trait_mappings: DashMap<TypeId, TypeId>,
    casters: DashMap<TypeId, CasterFn>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: 'static + Send + Sync>(&mut self, instance: T) -> &mut Self {
        self.services.insert(TypeId::of::<T>(), Arc::new(instance));
        self
    }

    pub fn register_trait<Trait, Impl, F>(&mut self, caster_fn: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        let trait_id = TypeId::of::<Trait>();
        self.trait_mappings.insert(trait_id, TypeId::of::<Impl>());

        let caster: CasterFn = Arc::new(move |instance: AnyArc| {
            let concrete = instance.downcast::<Impl>().ok()?;
            let trait_obj: Arc<Trait> = caster_fn(concrete);
            Some(Arc::new(trait_obj) as AnyArc)
        });

        self.casters.insert(trait_id, caster);
        self
    }

    pub fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let entry = self
            .services
            .get(&TypeId::of::<T>())
            .ok_or_else(|| MarketError::DependencyNotFound {
                type_name: type_name::<T>().to_string(),
            })?;
        entry
            .value()
            .clone()
            .downcast::<T>()
            .map_err(|_| MarketError::DowncastFailed {
                type_name: type_name::<T>().to_string(),
            })
    }

    pub fn resolve_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let requested = TypeId::of::<T>();

        let impl_type_id = *self
            .trait_mappings
            .get(&requested)
            .ok_or_else(|| MarketError::DependencyNotFound {
                type_name: format!("no binding for trait '{}'", type_name::<T>()),
            })?
            .value();

        let caster = self
            .casters
            .get(&requested)
            .map(|c| Arc::clone(c.value()))
            .ok_or_else(|| MarketError::DependencyNotFound {
                type_name: type_name::<T>().to_string(),
            })?;

        let instance = self
            .services
            .get(&impl_type_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| MarketError::DependencyNotFound {
                type_name: format!(
                    "implementation for trait '{}' not registered",
                    type_name::<T>()
                ),
            })?;

        let downcast_failed = || MarketError::DowncastFailed {
            type_name: format!("Arc<{}>", type_name::<T>()),
        };

        // The caster yields an Arc<dyn Any> wrapping the Arc<dyn Trait>.
        let wrapper = (*caster)(instance)
            .ok_or_else(downcast_failed)?
            .downcast::<Arc<T>>()
            .map_err(|_| downcast_failed())?;
        Ok(wrapper.as_ref().clone())
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.services.contains_key(&type_id) || self.trait_mappings.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sequence {
        start: i64,
    }

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct KoreanGreeter;

    impl Greeter for KoreanGreeter {
        fn greet(&self) -> String {
            "안녕하세요".to_string()
        }
    }

    #[test]
    fn register_and_resolve() {
        let mut container = Container::new();
        container.register(Sequence { start: 42 });
        let service = container.resolve::<Sequence>().unwrap();
        assert_eq!(service.start, 42);
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn register_and_resolve_trait() {
        let mut container = Container::new();
        container.register(KoreanGreeter);
        container.register_trait::<dyn Greeter, KoreanGreeter, _>(|i| i as Arc<dyn Greeter>);
        let greeter = container.resolve_trait::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "안녕하세요");
        assert!(container.contains::<dyn Greeter>());
    }

    #[test]
    fn missing_dependency_is_reported_by_name() {
        let container = Container::new();
        let err = container.resolve::<Sequence>().err().unwrap();
        assert!(matches!(err, MarketError::DependencyNotFound { ref type_name } if type_name.contains("Sequence")));
    }

    #[test]
    fn binding_without_implementation_fails() {
        let mut container = Container::new();
        container.register_trait::<dyn Greeter, KoreanGreeter, _>(|i| i as Arc<dyn Greeter>);
        assert!(matches!(
            container.resolve_trait::<dyn Greeter>(),
            Err(MarketError::DependencyNotFound { .. })
        ));
    }
}
