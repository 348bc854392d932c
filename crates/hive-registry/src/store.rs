//! Per-scope object storage
//!
//! Values are kept behind `Arc<dyn Any + Send + Sync>` and recovered with a
//! checked downcast, so a corrupted entry is reported as
//! [`RegistryError::TypeMismatch`] rather than reinterpreted.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{RegistryError, RegistryResult};
use crate::key::{ServiceId, TypeKey};

/// A stored instance tagged with its type key and id
pub struct ServiceEntry {
    key: TypeKey,
    id: ServiceId,
    instance: Arc<dyn Any + Send + Sync>,
}

impl ServiceEntry {
    fn new<T: Send + Sync + 'static>(id: ServiceId, instance: T) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            id,
            instance: Arc::new(instance),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn id(&self) -> ServiceId {
        self.id
    }

    fn downcast<T: Send + Sync + 'static>(&self) -> RegistryResult<Arc<T>> {
        Arc::clone(&self.instance)
            .downcast::<T>()
            .map_err(|_| {
                RegistryError::type_mismatch(
                    TypeKey::of::<T>(),
                    format!("entry {} (id {}) holds a different type", self.key, self.id),
                )
            })
    }
}

impl fmt::Debug for ServiceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceEntry")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}

/// Maps `(TypeKey, id)` to at most one entry
#[derive(Debug, Default)]
pub struct ObjectStore {
    entries: HashMap<TypeKey, HashMap<ServiceId, ServiceEntry>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `instance` at `(T, id)`.
    ///
    /// Returns the entry that was replaced, if any. Without `allow_overwrite`
    /// an occupied slot fails with `DuplicateService` and the store is left
    /// untouched.
    pub fn put<T: Send + Sync + 'static>(
        &mut self,
        id: ServiceId,
        instance: T,
        allow_overwrite: bool,
    ) -> RegistryResult<Option<ServiceEntry>> {
        let key = TypeKey::of::<T>();

        if !allow_overwrite && self.contains_key(key, id) {
            return Err(RegistryError::duplicate_service(key, id));
        }

        Ok(self
            .entries
            .entry(key)
            .or_default()
            .insert(id, ServiceEntry::new(id, instance)))
    }

    /// Shared handle to the entry at `(T, id)`, if any
    pub fn get<T: Send + Sync + 'static>(&self, id: ServiceId) -> RegistryResult<Option<Arc<T>>> {
        let key = TypeKey::of::<T>();
        match self.entries.get(&key).and_then(|ids| ids.get(&id)) {
            Some(entry) => entry.downcast::<T>().map(Some),
            None => Ok(None),
        }
    }

    /// Detach the entry at `(T, id)` and hand it back to the caller
    pub fn remove<T: 'static>(&mut self, id: ServiceId) -> RegistryResult<ServiceEntry> {
        let key = TypeKey::of::<T>();

        let ids = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| RegistryError::service_not_found(key, id))?;
        let entry = ids
            .remove(&id)
            .ok_or_else(|| RegistryError::service_not_found(key, id))?;

        if ids.is_empty() {
            self.entries.remove(&key);
        }
        Ok(entry)
    }

    /// Whether an entry exists at `(T, id)`
    pub fn contains<T: 'static>(&self, id: ServiceId) -> bool {
        self.contains_key(TypeKey::of::<T>(), id)
    }

    fn contains_key(&self, key: TypeKey, id: ServiceId) -> bool {
        self.entries
            .get(&key)
            .is_some_and(|ids| ids.contains_key(&id))
    }

    /// Number of entries across all types
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(type name, id)` of every entry, sorted
    pub fn keys(&self) -> Vec<(&'static str, ServiceId)> {
        let mut keys: Vec<_> = self
            .entries
            .values()
            .flat_map(HashMap::values)
            .map(|entry| (entry.key.name(), entry.id))
            .collect();
        keys.sort_unstable();
        keys
    }
}
