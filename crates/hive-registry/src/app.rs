//! Application-wide default registry
//!
//! There is no global instance. The embedding application creates one
//! [`AppRegistry`] at startup and passes it (or clones of it) to whatever
//! needs the default root, including [`RegistryHandle::from_app`].
//!
//! [`RegistryHandle::from_app`]: crate::aware::RegistryHandle::from_app

use crate::registry::Registry;

/// The default root registry of an application
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    root: Registry,
}

impl AppRegistry {
    /// Create a fresh, empty application root
    pub fn new() -> Self {
        Self {
            root: Registry::new(),
        }
    }

    /// The root registry
    pub fn root(&self) -> &Registry {
        &self.root
    }
}

impl From<Registry> for AppRegistry {
    fn from(root: Registry) -> Self {
        Self { root }
    }
}
