//! Registry-aware objects
//!
//! [`RegistryHandle`] is the piece an object embeds to carry a registry. The
//! handle can come from the application root, from an explicit registry, or
//! from another registry-aware object the new one is derived from. An object
//! may narrow its handle to a private child scope, shadowing ancestor
//! registrations for its own lifetime without affecting siblings or the
//! object it was derived from.
//!
//! ```rust
//! use hive_registry::{AppRegistry, RegistryAware, RegistryHandle};
//!
//! struct Widget {
//!     handle: RegistryHandle,
//! }
//!
//! impl RegistryAware for Widget {
//!     fn handle(&self) -> &RegistryHandle {
//!         &self.handle
//!     }
//!
//!     fn handle_mut(&mut self) -> &mut RegistryHandle {
//!         &mut self.handle
//!     }
//! }
//!
//! let app = AppRegistry::new();
//! app.root().register(1u8).unwrap();
//!
//! let outer = Widget { handle: RegistryHandle::from_app(&app) };
//! let mut inner = Widget { handle: RegistryHandle::derived_from(&outer) };
//! inner.handle_mut().narrow_scope();
//! inner.registry().register(2u8).unwrap();
//!
//! assert_eq!(*inner.registry().get::<u8>().unwrap(), 2);
//! assert_eq!(*outer.registry().get::<u8>().unwrap(), 1);
//! ```

use crate::app::AppRegistry;
use crate::registry::Registry;

/// A registry reference an object carries around
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    registry: Registry,
}

impl RegistryHandle {
    /// Use the application's default root
    pub fn from_app(app: &AppRegistry) -> Self {
        Self::with_registry(app.root().clone())
    }

    /// Use an explicitly supplied registry
    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    /// Copy the current registry of another registry-aware object
    pub fn derived_from<A: RegistryAware + ?Sized>(other: &A) -> Self {
        Self::with_registry(other.registry().clone())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn set_registry(&mut self, registry: Registry) {
        self.registry = registry;
    }

    /// Replace the handle with a fresh child scope of the current registry
    pub fn narrow_scope(&mut self) {
        self.registry = self.registry.create_scope();
    }
}

impl From<Registry> for RegistryHandle {
    fn from(registry: Registry) -> Self {
        Self::with_registry(registry)
    }
}

/// Implemented by objects that carry a [`RegistryHandle`]
pub trait RegistryAware {
    fn handle(&self) -> &RegistryHandle;

    fn handle_mut(&mut self) -> &mut RegistryHandle;

    /// The registry this object currently resolves through
    fn registry(&self) -> &Registry {
        self.handle().registry()
    }

    /// Point this object at another registry
    fn set_registry(&mut self, registry: Registry) {
        self.handle_mut().set_registry(registry);
    }
}

impl RegistryAware for RegistryHandle {
    fn handle(&self) -> &RegistryHandle {
        self
    }

    fn handle_mut(&mut self) -> &mut RegistryHandle {
        self
    }
}
