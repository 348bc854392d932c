//! Type keys and service ids

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Distinguishes several instances of the same type within one scope
pub type ServiceId = i32;

/// Id used when the caller does not name one
pub const DEFAULT_SERVICE_ID: ServiceId = 0;

/// Identifier for a registered type.
///
/// Equality, hashing and ordering only consider the `TypeId`; the name is
/// carried along for log lines and error messages.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Human-readable type name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashSet};

    #[test]
    fn test_equality_follows_type() {
        assert_eq!(TypeKey::of::<i32>(), TypeKey::of::<i32>());
        assert_ne!(TypeKey::of::<i32>(), TypeKey::of::<i64>());
        assert_ne!(TypeKey::of::<String>(), TypeKey::of::<&'static str>());
    }

    #[test]
    fn test_usable_as_map_key() {
        let hashed: HashSet<_> = [TypeKey::of::<u8>(), TypeKey::of::<u8>(), TypeKey::of::<u16>()]
            .into_iter()
            .collect();
        assert_eq!(hashed.len(), 2);

        let ordered: BTreeSet<_> = [TypeKey::of::<u8>(), TypeKey::of::<u16>(), TypeKey::of::<u8>()]
            .into_iter()
            .collect();
        assert_eq!(ordered.len(), 2);
    }

    #[test]
    fn test_name() {
        assert!(TypeKey::of::<String>().name().ends_with("String"));
        assert_eq!(TypeKey::of::<u64>().to_string(), "u64");
    }
}
