//! Hierarchical registry scopes
//!
//! A [`Registry`] is a cheap-to-clone handle to one scope. Each scope owns an
//! [`ObjectStore`], shares the tree-wide [`FactoryRegistry`], and keeps its
//! parent alive. Lookups that miss locally are delegated to the parent;
//! writes and removals never leave the local scope.
//!
//! Every operation on a scope runs under that scope's re-entrant lock, so a
//! factory may call back into the registry that invoked it. A lookup that
//! walks up the chain takes each ancestor's lock only for its own local
//! check: a registration racing on an ancestor may or may not be observed.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use parking_lot::ReentrantMutex;
use tracing::{debug, trace, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::factory::{Factory, FactoryRegistry};
use crate::key::{ServiceId, TypeKey, DEFAULT_SERVICE_ID};
use crate::store::ObjectStore;

/// Where and how a registration lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterOptions {
    pub id: ServiceId,
    pub allow_overwrite: bool,
}

impl RegisterOptions {
    pub fn new() -> Self {
        Self {
            id: DEFAULT_SERVICE_ID,
            allow_overwrite: false,
        }
    }

    /// Register under `id` instead of the default id
    pub fn id(mut self, id: ServiceId) -> Self {
        self.id = id;
        self
    }

    /// Replace an existing entry instead of failing
    pub fn allow_overwrite(mut self, allow: bool) -> Self {
        self.allow_overwrite = allow;
        self
    }
}

impl Default for RegisterOptions {
    fn default() -> Self {
        Self::new()
    }
}

struct Scope {
    store: ReentrantMutex<RefCell<ObjectStore>>,
    factories: Arc<FactoryRegistry>,
    parent: Option<Registry>,
    depth: usize,
}

/// Handle to one scope of a registry tree
#[derive(Clone)]
pub struct Registry {
    scope: Arc<Scope>,
}

impl Registry {
    /// Create a root registry with no factories and no services
    pub fn new() -> Self {
        Self {
            scope: Arc::new(Scope {
                store: ReentrantMutex::new(RefCell::new(ObjectStore::new())),
                factories: Arc::new(FactoryRegistry::new()),
                parent: None,
                depth: 0,
            }),
        }
    }

    /// Create a child scope.
    ///
    /// The child shares this tree's factories, starts with an empty store and
    /// keeps this scope alive for as long as it exists.
    pub fn create_scope(&self) -> Registry {
        let _guard = self.scope.store.lock();

        let child = Registry {
            scope: Arc::new(Scope {
                store: ReentrantMutex::new(RefCell::new(ObjectStore::new())),
                factories: Arc::clone(&self.scope.factories),
                parent: Some(self.clone()),
                depth: self.scope.depth + 1,
            }),
        };

        debug!("Created registry scope at depth {}", child.scope.depth);
        child
    }

    /// Register `instance` under the default id
    pub fn register<T>(&self, instance: T) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
    {
        self.register_with(instance, RegisterOptions::new())
    }

    /// Register `instance` with explicit options
    pub fn register_with<T>(&self, instance: T, options: RegisterOptions) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
    {
        let _guard = self.scope.store.lock();
        self.ensure_vacant::<T>(options)?;
        self.store_instance(instance, options)
    }

    /// Register a value produced by the `(T, C)` factory under the default id
    pub fn register_config<T, C>(&self, config: C) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
        C: 'static,
    {
        self.register_config_with::<T, C>(config, RegisterOptions::new())
    }

    /// Register a value produced by the `(T, C)` factory with explicit options
    pub fn register_config_with<T, C>(
        &self,
        config: C,
        options: RegisterOptions,
    ) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
        C: 'static,
    {
        let key = TypeKey::of::<T>();
        let _guard = self.scope.store.lock();

        // A missing factory is reported before an occupied slot, and an
        // occupied slot before a config type mismatch.
        if !self.scope.factories.contains::<T>() {
            return Err(RegistryError::factory_not_found(key));
        }
        self.ensure_vacant::<T>(options)?;
        let factory = self.scope.factories.lookup::<T, C>()?;

        let instance = factory.generate(self, &config).inspect_err(|err| {
            warn!("Factory for {} failed: {}", key, err);
        })?;

        // The factory may have registered the same key through this scope.
        self.ensure_vacant::<T>(options)?;
        self.store_instance(instance, options)
    }

    /// Register a value from the empty-config factory of `T`
    pub fn register_default<T>(&self, options: RegisterOptions) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
    {
        self.register_config_with::<T, ()>((), options)
    }

    /// Register a named factory type for the whole tree
    pub fn register_factory<F: Factory>(&self, factory: F) -> RegistryResult<()> {
        let _guard = self.scope.store.lock();
        self.scope.factories.register(factory)
    }

    /// Register a closure as the factory for `T` for the whole tree
    pub fn register_factory_fn<T, C, G>(&self, generator: G) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
        C: 'static,
        G: Fn(&Registry, &C) -> RegistryResult<T> + Send + Sync + 'static,
    {
        let _guard = self.scope.store.lock();
        self.scope.factories.register_fn(generator)
    }

    /// Resolve `T` under the default id
    pub fn get<T>(&self) -> RegistryResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.get_id(DEFAULT_SERVICE_ID)
    }

    /// Resolve `T` under `id`, searching this scope and then its ancestors
    pub fn get_id<T>(&self, id: ServiceId) -> RegistryResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.try_get_id(id)?
            .ok_or_else(|| RegistryError::service_not_found(TypeKey::of::<T>(), id))
    }

    /// Like [`get_id`](Self::get_id) but reports a miss as `None`
    pub fn try_get_id<T>(&self, id: ServiceId) -> RegistryResult<Option<Arc<T>>>
    where
        T: Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        let mut current = self;

        loop {
            let found = current.get_local::<T>(id)?;
            if found.is_some() {
                trace!("Resolved {} (id {}) at depth {}", key, id, current.scope.depth);
                return Ok(found);
            }

            match &current.scope.parent {
                Some(parent) => {
                    trace!("Delegating lookup of {} (id {}) to parent", key, id);
                    current = parent;
                }
                None => return Ok(None),
            }
        }
    }

    /// Like [`get`](Self::get) but reports a miss as `None`
    pub fn try_get<T>(&self) -> RegistryResult<Option<Arc<T>>>
    where
        T: Send + Sync + 'static,
    {
        self.try_get_id(DEFAULT_SERVICE_ID)
    }

    /// Build a fresh `T` with the `(T, C)` factory without storing it
    pub fn generate<T, C>(&self, config: C) -> RegistryResult<T>
    where
        T: Send + Sync + 'static,
        C: 'static,
    {
        let _guard = self.scope.store.lock();
        let factory = self.scope.factories.lookup::<T, C>()?;
        factory.generate(self, &config)
    }

    /// Remove the local entry for `T` under the default id
    pub fn unregister<T: 'static>(&self) -> RegistryResult<()> {
        self.unregister_id::<T>(DEFAULT_SERVICE_ID)
    }

    /// Remove the local entry for `T` under `id`; ancestors are never touched
    pub fn unregister_id<T: 'static>(&self, id: ServiceId) -> RegistryResult<()> {
        let guard = self.scope.store.lock();
        let removed = guard.borrow_mut().remove::<T>(id)?;
        drop(guard);

        debug!("Unregistered service: {} (id {})", removed.key(), removed.id());
        Ok(())
    }

    /// Whether `T` under `id` resolves from this scope or an ancestor
    pub fn contains<T: 'static>(&self, id: ServiceId) -> bool {
        let mut current = self;
        loop {
            if current.contains_local::<T>(id) {
                return true;
            }
            match &current.scope.parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Whether this scope itself holds `T` under `id`
    pub fn contains_local<T: 'static>(&self, id: ServiceId) -> bool {
        self.scope.store.lock().borrow().contains::<T>(id)
    }

    /// Number of entries held by this scope
    pub fn local_count(&self) -> usize {
        self.scope.store.lock().borrow().len()
    }

    /// `(type name, id)` of the entries held by this scope
    pub fn local_keys(&self) -> Vec<(&'static str, ServiceId)> {
        self.scope.store.lock().borrow().keys()
    }

    /// Number of factories registered in this tree
    pub fn factory_count(&self) -> usize {
        self.scope.factories.len()
    }

    /// The parent scope, if this is not a root
    pub fn parent(&self) -> Option<&Registry> {
        self.scope.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.scope.parent.is_none()
    }

    /// Distance from the root (the root is 0)
    pub fn depth(&self) -> usize {
        self.scope.depth
    }

    /// Whether both handles point at the same scope
    pub fn same_scope(&self, other: &Registry) -> bool {
        Arc::ptr_eq(&self.scope, &other.scope)
    }

    fn get_local<T>(&self, id: ServiceId) -> RegistryResult<Option<Arc<T>>>
    where
        T: Send + Sync + 'static,
    {
        self.scope.store.lock().borrow().get::<T>(id)
    }

    fn ensure_vacant<T: 'static>(&self, options: RegisterOptions) -> RegistryResult<()> {
        if !options.allow_overwrite && self.contains_local::<T>(options.id) {
            return Err(RegistryError::duplicate_service(TypeKey::of::<T>(), options.id));
        }
        Ok(())
    }

    // Callers hold the scope lock and have already checked for duplicates.
    fn store_instance<T>(&self, instance: T, options: RegisterOptions) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        let replaced = self
            .scope
            .store
            .lock()
            .borrow_mut()
            .put(options.id, instance, options.allow_overwrite)?;

        if replaced.is_some() {
            debug!("Overwrote service: {} (id {})", key, options.id);
        } else {
            debug!("Registered service: {} (id {})", key, options.id);
        }

        // The old value is dropped here, after the store borrow is released.
        drop(replaced);
        Ok(())
    }
}

// Dropping the last handle to a deep chain would otherwise recurse once per
// ancestor. Unlink uniquely owned parents one at a time instead.
impl Drop for Scope {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(registry) = parent {
            match Arc::try_unwrap(registry.scope) {
                Ok(mut scope) => parent = scope.parent.take(),
                Err(_) => break,
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("depth", &self.depth())
            .field("local_count", &self.local_count())
            .field("factory_count", &self.factory_count())
            .finish()
    }
}
