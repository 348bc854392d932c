//! Multi-threaded use of a registry tree

use hive_registry::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

#[test]
fn test_thread_safe_resolution() {
    init_tracing();
    let registry = Registry::new();
    registry.register(String::from("shared")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || registry.get::<String>().unwrap())
        })
        .collect();

    let results: Vec<Arc<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for result in &results {
        assert!(Arc::ptr_eq(&results[0], result));
    }
}

#[test]
fn test_concurrent_registration_of_one_key() {
    init_tracing();
    let registry = Registry::new();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8u32)
        .map(|n| {
            let registry = registry.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.register(n).is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    assert!(registry.get::<u32>().is_ok());
}

#[test]
fn test_concurrent_distinct_ids() {
    init_tracing();
    let registry = Registry::new();

    let handles: Vec<_> = (0..16)
        .map(|id| {
            let registry = registry.clone();
            thread::spawn(move || {
                registry
                    .register_with(id as u64, RegisterOptions::new().id(id))
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.local_count(), 16);
    for id in 0..16 {
        assert_eq!(*registry.get_id::<u64>(id).unwrap(), id as u64);
    }
}

#[test]
fn test_scopes_on_separate_threads() {
    init_tracing();
    let root = Registry::new();
    root.register(0usize).unwrap();

    let handles: Vec<_> = (1..=4usize)
        .map(|n| {
            let scope = root.create_scope();
            thread::spawn(move || {
                scope.register(n).unwrap();
                *scope.get::<usize>().unwrap()
            })
        })
        .collect();

    let mut seen: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    seen.sort_unstable();

    assert_eq!(seen, vec![1, 2, 3, 4]);
    assert_eq!(*root.get::<usize>().unwrap(), 0);
}

#[test]
fn test_factories_registered_from_any_scope_are_shared() {
    init_tracing();
    let root = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let child = root.create_scope();
    let counter = Arc::clone(&calls);
    let handle = thread::spawn(move || {
        child
            .register_factory_fn(move |_: &Registry, seed: &u16| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(u32::from(*seed) * 2)
            })
            .unwrap();
    });
    handle.join().unwrap();

    assert_eq!(root.generate::<u32, _>(21u16).unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_factory_reentry_from_worker_threads() {
    init_tracing();
    let root = Registry::new();
    root.register(10u32).unwrap();
    root.register_factory_fn(|registry: &Registry, extra: &u32| {
        Ok(u64::from(*registry.get::<u32>()? + *extra))
    })
    .unwrap();

    let handles: Vec<_> = (0..4u32)
        .map(|n| {
            let scope = root.create_scope();
            thread::spawn(move || {
                scope.register_config::<u64, _>(n).unwrap();
                *scope.get::<u64>().unwrap()
            })
        })
        .collect();

    let mut values: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    values.sort_unstable();
    assert_eq!(values, vec![10, 11, 12, 13]);
}
