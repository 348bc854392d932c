//! Hierarchical, type-keyed service registry for Hive
//!
//! Callers register instances, or factories that build them, under a
//! `(type, id)` key and later resolve them by the same key from any scope of
//! the tree. Child scopes fall back to their parent on a miss, so a child
//! registration shadows an ancestor's for as long as it exists.
//!
//! ## Quick Start
//!
//! ```rust
//! use hive_registry::{RegisterOptions, Registry};
//!
//! let root = Registry::new();
//! root.register(1i32).unwrap();
//! root.register_with(2i32, RegisterOptions::new().id(7)).unwrap();
//!
//! let scope = root.create_scope();
//! scope.register(3i32).unwrap();
//!
//! assert_eq!(*scope.get::<i32>().unwrap(), 3);
//! assert_eq!(*scope.get_id::<i32>(7).unwrap(), 2);
//! assert_eq!(*root.get::<i32>().unwrap(), 1);
//! ```
//!
//! Factories are shared by the whole tree; see [`factory`]. Objects that
//! carry a registry around implement [`RegistryAware`].

pub mod app;
pub mod aware;
pub mod builder;
pub mod error;
pub mod factory;
pub mod key;
mod macros;
pub mod provider;
pub mod registry;
pub mod store;

pub use app::AppRegistry;
pub use aware::{RegistryAware, RegistryHandle};
pub use builder::RegistryBuilder;
pub use error::{RegistryError, RegistryResult};
pub use factory::{DefaultFactory, Factory, FactoryRegistry, TypedFactory};
pub use key::{ServiceId, TypeKey, DEFAULT_SERVICE_ID};
pub use provider::{ProviderSet, ServiceProvider};
pub use registry::{RegisterOptions, Registry};
pub use store::{ObjectStore, ServiceEntry};
