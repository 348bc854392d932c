//! Convenience macros
//!
//! Both macros take the registry as their first argument; there is no
//! implicit default registry.

/// Convenience macro for resolving services
///
/// ```rust
/// use hive_registry::{inject, Registry};
///
/// let registry = Registry::new();
/// registry.register(10u32).unwrap();
///
/// let value = inject!(registry, u32).unwrap();
/// assert_eq!(*value, 10);
/// assert!(inject!(registry, u32, 3).is_err());
/// ```
#[macro_export]
macro_rules! inject {
    ($registry:expr, $service_type:ty) => {
        $registry.get::<$service_type>()
    };
    ($registry:expr, $service_type:ty, $id:expr) => {
        $registry.get_id::<$service_type>($id)
    };
}

/// Convenience macro for registering services
///
/// ```rust
/// use hive_registry::{register_service, Registry};
///
/// let registry = Registry::new();
/// register_service!(registry, String::from("a")).unwrap();
/// register_service!(registry, String::from("b"), 1).unwrap();
/// assert_eq!(*registry.get_id::<String>(1).unwrap(), "b");
/// ```
#[macro_export]
macro_rules! register_service {
    ($registry:expr, $instance:expr) => {
        $registry.register($instance)
    };
    ($registry:expr, $instance:expr, $id:expr) => {
        $registry.register_with($instance, $crate::RegisterOptions::new().id($id))
    };
}
