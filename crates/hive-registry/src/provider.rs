//! Service providers
//!
//! A `ServiceProvider` groups related registrations so that a module can
//! contribute its services and factories in one call. Providers only bundle
//! registrations the caller orders explicitly: there is no dependency graph
//! between them and nothing is wired automatically.
//!
//! ## Usage
//!
//! ```rust
//! use hive_registry::{ProviderSet, Registry, RegistryResult, ServiceProvider};
//!
//! struct StorageProvider;
//!
//! impl ServiceProvider for StorageProvider {
//!     fn name(&self) -> &'static str {
//!         "storage"
//!     }
//!
//!     fn register(&self, registry: &Registry) -> RegistryResult<()> {
//!         registry.register(String::from("/var/lib/app"))?;
//!         Ok(())
//!     }
//! }
//!
//! let registry = Registry::new();
//! let mut providers = ProviderSet::new();
//! providers.add(StorageProvider);
//! providers.register_all(&registry).unwrap();
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::RegistryResult;
use crate::registry::Registry;

// ============================================================================
// ServiceProvider Trait
// ============================================================================

/// Trait for modules that contribute registrations to a registry.
pub trait ServiceProvider: Send + Sync {
    /// Returns the name of this provider, used in log lines.
    fn name(&self) -> &'static str;

    /// Returns the priority of this provider.
    ///
    /// Lower values are registered first. Default is 100.
    fn priority(&self) -> u32 {
        100
    }

    /// Register services and factories with the registry.
    fn register(&self, registry: &Registry) -> RegistryResult<()>;

    /// Optional: check that what this provider needs is present.
    ///
    /// Called after every provider in the set has registered.
    #[allow(unused_variables)]
    fn validate(&self, registry: &Registry) -> RegistryResult<()> {
        Ok(())
    }
}

// ============================================================================
// ProviderSet
// ============================================================================

/// An ordered collection of service providers.
pub struct ProviderSet {
    providers: Vec<Arc<dyn ServiceProvider>>,
}

impl ProviderSet {
    /// Create a new empty set.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Add a service provider to the set.
    pub fn add<P: ServiceProvider + 'static>(&mut self, provider: P) -> &mut Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Add a shared service provider to the set.
    pub fn add_shared(&mut self, provider: Arc<dyn ServiceProvider>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in registration order.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.sorted().iter().map(|p| p.name()).collect()
    }

    /// Register every provider with the registry, then validate each.
    ///
    /// Providers run in ascending priority; equal priorities keep insertion
    /// order. The first error stops the run.
    pub fn register_all(&self, registry: &Registry) -> RegistryResult<()> {
        let sorted = self.sorted();

        info!("Registering {} service providers", sorted.len());

        for provider in &sorted {
            debug!(
                "Registering provider '{}' (priority: {})",
                provider.name(),
                provider.priority()
            );
            provider.register(registry)?;
        }

        for provider in &sorted {
            provider.validate(registry)?;
        }

        info!("All service providers registered successfully");
        Ok(())
    }

    fn sorted(&self) -> Vec<&Arc<dyn ServiceProvider>> {
        let mut sorted: Vec<_> = self.providers.iter().collect();
        sorted.sort_by_key(|p| p.priority());
        sorted
    }
}

impl Default for ProviderSet {
    fn default() -> Self {
        Self::new()
    }
}
