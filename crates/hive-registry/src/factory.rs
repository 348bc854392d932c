//! Factories and the shared factory table
//!
//! A factory produces a fresh, owned value of its `Output` type from a
//! `Config` value. Factories are stored type-erased in a [`FactoryRegistry`]
//! keyed by the output type; the config type is recorded next to each entry
//! so that a lookup with the wrong config type is reported instead of
//! miscast.
//!
//! ## Usage
//!
//! ```rust
//! use hive_registry::{Factory, Registry, RegistryResult};
//!
//! struct PortConfig {
//!     port: u16,
//! }
//!
//! struct Listener {
//!     port: u16,
//! }
//!
//! struct ListenerFactory;
//!
//! impl Factory for ListenerFactory {
//!     type Output = Listener;
//!     type Config = PortConfig;
//!
//!     fn generate(&self, _registry: &Registry, config: &PortConfig) -> RegistryResult<Listener> {
//!         Ok(Listener { port: config.port })
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.register_factory(ListenerFactory).unwrap();
//! registry.register_config::<Listener, _>(PortConfig { port: 8080 }).unwrap();
//! assert_eq!(registry.get::<Listener>().unwrap().port, 8080);
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::key::TypeKey;
use crate::registry::Registry;

/// Produces new instances of `Output` from a `Config`.
///
/// The registry passed to `generate` is the scope the request came through,
/// so a factory may resolve collaborators from it (including re-entrant
/// registrations on that same scope).
pub trait Factory: Send + Sync + 'static {
    /// Type of the produced value
    type Output: Send + Sync + 'static;

    /// Type of the configuration the factory consumes
    type Config: 'static;

    /// Build a new value
    fn generate(&self, registry: &Registry, config: &Self::Config) -> RegistryResult<Self::Output>;
}

/// Factory that builds `T::default()` from the empty config `()`
pub struct DefaultFactory<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> DefaultFactory<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for DefaultFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Factory for DefaultFactory<T>
where
    T: Default + Send + Sync + 'static,
{
    type Output = T;
    type Config = ();

    fn generate(&self, _registry: &Registry, _config: &()) -> RegistryResult<T> {
        Ok(T::default())
    }
}

type GenerateFn<T, C> = dyn Fn(&Registry, &C) -> RegistryResult<T> + Send + Sync;

/// A factory recovered from the table with its concrete types restored
pub struct TypedFactory<T, C> {
    generate: Box<GenerateFn<T, C>>,
}

impl<T, C> TypedFactory<T, C>
where
    T: Send + Sync + 'static,
    C: 'static,
{
    fn new<G>(generator: G) -> Self
    where
        G: Fn(&Registry, &C) -> RegistryResult<T> + Send + Sync + 'static,
    {
        Self {
            generate: Box::new(generator),
        }
    }

    /// Invoke the factory
    pub fn generate(&self, registry: &Registry, config: &C) -> RegistryResult<T> {
        (self.generate)(registry, config)
    }
}

struct FactoryEntry {
    config: TypeKey,
    factory: Arc<dyn Any + Send + Sync>,
}

/// Append-only table of factories, shared by every scope of one tree
pub struct FactoryRegistry {
    factories: RwLock<HashMap<TypeKey, FactoryEntry>>,
}

impl FactoryRegistry {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Register a named factory type
    pub fn register<F: Factory>(&self, factory: F) -> RegistryResult<()> {
        self.insert(TypedFactory::<F::Output, F::Config>::new(
            move |registry: &Registry, config: &F::Config| factory.generate(registry, config),
        ))
    }

    /// Register a closure as the factory for `T`
    pub fn register_fn<T, C, G>(&self, generator: G) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
        C: 'static,
        G: Fn(&Registry, &C) -> RegistryResult<T> + Send + Sync + 'static,
    {
        self.insert(TypedFactory::new(generator))
    }

    fn insert<T, C>(&self, factory: TypedFactory<T, C>) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
        C: 'static,
    {
        let key = TypeKey::of::<T>();
        let mut factories = self.factories.write();

        if factories.contains_key(&key) {
            return Err(RegistryError::duplicate_factory(key));
        }

        factories.insert(
            key,
            FactoryEntry {
                config: TypeKey::of::<C>(),
                factory: Arc::new(factory),
            },
        );

        debug!("Registered factory: {} (config {})", key, TypeKey::of::<C>());
        Ok(())
    }

    /// Find the factory for `T`, checked against the config type `C`
    pub fn lookup<T, C>(&self) -> RegistryResult<Arc<TypedFactory<T, C>>>
    where
        T: Send + Sync + 'static,
        C: 'static,
    {
        let key = TypeKey::of::<T>();
        let factories = self.factories.read();

        let entry = factories
            .get(&key)
            .ok_or_else(|| RegistryError::factory_not_found(key))?;

        let requested = TypeKey::of::<C>();
        if entry.config != requested {
            return Err(RegistryError::type_mismatch(
                key,
                format!(
                    "factory expects config {} but was asked with {}",
                    entry.config, requested
                ),
            ));
        }

        Arc::clone(&entry.factory)
            .downcast::<TypedFactory<T, C>>()
            .map_err(|_| RegistryError::type_mismatch(key, "factory downcast failed"))
    }

    /// Whether a factory exists for `T`
    pub fn contains<T: 'static>(&self) -> bool {
        self.factories.read().contains_key(&TypeKey::of::<T>())
    }

    /// Number of registered factories
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NumberConfig {
        initial_value: i32,
    }

    struct NumberFactory;

    impl Factory for NumberFactory {
        type Output = i32;
        type Config = NumberConfig;

        fn generate(&self, _registry: &Registry, config: &NumberConfig) -> RegistryResult<i32> {
            Ok(config.initial_value)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let factories = FactoryRegistry::new();
        let registry = Registry::new();
        factories.register(NumberFactory).unwrap();

        let factory = factories.lookup::<i32, NumberConfig>().unwrap();
        let value = factory
            .generate(&registry, &NumberConfig { initial_value: 4 })
            .unwrap();
        assert_eq!(value, 4);
        assert!(factories.contains::<i32>());
        assert_eq!(factories.len(), 1);
    }

    #[test]
    fn test_duplicate_factory_keeps_first() {
        let factories = FactoryRegistry::new();
        let registry = Registry::new();
        factories.register(NumberFactory).unwrap();

        let result = factories.register_fn(|_: &Registry, _: &NumberConfig| Ok(99i32));
        assert!(matches!(result, Err(RegistryError::DuplicateFactory { .. })));

        let factory = factories.lookup::<i32, NumberConfig>().unwrap();
        let value = factory
            .generate(&registry, &NumberConfig { initial_value: 1 })
            .unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn test_lookup_missing() {
        let factories = FactoryRegistry::new();
        let result = factories.lookup::<String, ()>();
        assert!(matches!(result, Err(RegistryError::FactoryNotFound { .. })));
    }

    #[test]
    fn test_lookup_with_wrong_config_is_mismatch() {
        let factories = FactoryRegistry::new();
        factories.register(NumberFactory).unwrap();

        let result = factories.lookup::<i32, ()>();
        match result {
            Err(RegistryError::TypeMismatch { message, .. }) => {
                assert!(message.contains("NumberConfig"));
            }
            _ => panic!("expected TypeMismatch"),
        }
    }

    #[test]
    fn test_default_factory() {
        let factories = FactoryRegistry::new();
        let registry = Registry::new();
        factories.register(DefaultFactory::<String>::new()).unwrap();

        let factory = factories.lookup::<String, ()>().unwrap();
        assert_eq!(factory.generate(&registry, &()).unwrap(), "");
    }
}
