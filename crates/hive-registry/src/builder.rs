//! Builder for root registries

use crate::error::RegistryResult;
use crate::factory::Factory;
use crate::provider::ServiceProvider;
use crate::registry::{RegisterOptions, Registry};

/// Builder pattern for configuring a root registry
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// Create a new builder around an empty root
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Register a named factory type
    pub fn factory<F: Factory>(self, factory: F) -> RegistryResult<Self> {
        self.registry.register_factory(factory)?;
        Ok(self)
    }

    /// Register a closure factory
    pub fn factory_fn<T, C, G>(self, generator: G) -> RegistryResult<Self>
    where
        T: Send + Sync + 'static,
        C: 'static,
        G: Fn(&Registry, &C) -> RegistryResult<T> + Send + Sync + 'static,
    {
        self.registry.register_factory_fn(generator)?;
        Ok(self)
    }

    /// Register an instance under the default id
    pub fn instance<T>(self, instance: T) -> RegistryResult<Self>
    where
        T: Send + Sync + 'static,
    {
        self.registry.register(instance)?;
        Ok(self)
    }

    /// Register an instance with explicit options
    pub fn instance_with<T>(self, instance: T, options: RegisterOptions) -> RegistryResult<Self>
    where
        T: Send + Sync + 'static,
    {
        self.registry.register_with(instance, options)?;
        Ok(self)
    }

    /// Run a provider against the registry being built
    pub fn provider<P: ServiceProvider>(self, provider: P) -> RegistryResult<Self> {
        provider.register(&self.registry)?;
        provider.validate(&self.registry)?;
        Ok(self)
    }

    /// Build the registry
    pub fn build(self) -> Registry {
        self.registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
