/// Tests for PlacementRegistry

use super::*;
use std::sync::Arc;
use glam::Vec3;
use crate::catalog::{Category, FurnitureSpec, FurnitureSpecDesc};
use crate::scene::WorldTransform;

// ============================================================================
// Helper Functions
// ============================================================================

fn instance(id: &str, x: f32) -> PlacedInstance {
    let spec = FurnitureSpec::from_desc(FurnitureSpecDesc::with_defaults(id, Category::Chair)).unwrap();
    PlacedInstance::new(Arc::new(spec), WorldTransform::from_position(Vec3::new(x, 0.45, 0.0)))
}

fn ids(registry: &PlacementRegistry) -> Vec<String> {
    registry.all().map(|(_, i)| i.spec().id().to_string()).collect()
}

// ============================================================================
// Add / capacity
// ============================================================================

#[test]
fn test_add_assigns_increasing_sequence() {
    let mut registry = PlacementRegistry::new(3);
    let a = registry.add(instance("a", 0.0)).unwrap();
    let b = registry.add(instance("b", 1.0)).unwrap();

    assert!(registry.get(a).unwrap().sequence() < registry.get(b).unwrap().sequence());
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.capacity_remaining(), 1);
}

#[test]
fn test_eleventh_add_is_rejected() {
    let mut registry = PlacementRegistry::default();
    for i in 0..10 {
        registry.add(instance(&format!("chair_{}", i), i as f32)).unwrap();
    }
    assert!(registry.is_full());

    let result = registry.add(instance("one_too_many", 11.0));
    assert_eq!(result, Err(Error::CapacityExceeded { capacity: 10 }));
    assert_eq!(registry.len(), 10);
}

#[test]
fn test_size_never_exceeds_capacity() {
    for capacity in 1..6 {
        let mut registry = PlacementRegistry::new(capacity);
        for i in 0..(capacity * 3) {
            let _ = registry.add(instance("x", i as f32));
            assert!(registry.len() <= capacity);
            if i % 4 == 3 {
                let oldest = registry.keys().next().unwrap();
                registry.remove(oldest);
            }
        }
        assert!(registry.len() <= capacity);
    }
}

// ============================================================================
// Remove / iteration order
// ============================================================================

#[test]
fn test_remove_keeps_order_consistent() {
    let mut registry = PlacementRegistry::new(5);
    let _a = registry.add(instance("a", 0.0)).unwrap();
    let b = registry.add(instance("b", 1.0)).unwrap();
    let _c = registry.add(instance("c", 2.0)).unwrap();

    assert!(registry.remove(b));
    assert!(!registry.remove(b));
    assert!(!registry.contains(b));
    assert_eq!(ids(&registry), vec!["a", "c"]);
    assert_eq!(registry.keys().count(), registry.len());
}

#[test]
fn test_iteration_is_insertion_order_after_slot_reuse() {
    let mut registry = PlacementRegistry::new(5);
    let a = registry.add(instance("a", 0.0)).unwrap();
    registry.add(instance("b", 1.0)).unwrap();
    registry.remove(a);
    // the freed slot is reused by "c", which must still iterate last
    registry.add(instance("c", 2.0)).unwrap();

    assert_eq!(ids(&registry), vec!["b", "c"]);
}

#[test]
fn test_take_returns_instance() {
    let mut registry = PlacementRegistry::new(2);
    let a = registry.add(instance("a", 0.0)).unwrap();
    let taken = registry.take(a).unwrap();
    assert_eq!(taken.spec().id(), "a");
    assert!(registry.is_empty());
}

#[test]
fn test_clear() {
    let mut registry = PlacementRegistry::new(3);
    registry.add(instance("a", 0.0)).unwrap();
    registry.add(instance("b", 1.0)).unwrap();
    registry.clear();
    assert!(registry.is_empty());
    assert_eq!(registry.all().count(), 0);
    assert_eq!(registry.capacity_remaining(), 3);
}

// ============================================================================
// Eviction
// ============================================================================

#[test]
fn test_evict_oldest_in_ascending_sequence() {
    let mut registry = PlacementRegistry::new(6);
    for name in ["a", "b", "c", "d", "e"] {
        registry.add(instance(name, 0.0)).unwrap();
    }

    let evicted = registry.evict_oldest(3);
    let sequences: Vec<u64> = evicted.iter().map(|(_, i)| i.sequence()).collect();
    let names: Vec<&str> = evicted.iter().map(|(_, i)| i.spec().id()).collect();

    assert_eq!(names, vec!["a", "b", "c"]);
    assert!(sequences.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(ids(&registry), vec!["d", "e"]);
    for (key, _) in &evicted {
        assert!(!registry.contains(*key));
    }
}

#[test]
fn test_evict_more_than_present() {
    let mut registry = PlacementRegistry::new(4);
    registry.add(instance("a", 0.0)).unwrap();
    registry.add(instance("b", 0.0)).unwrap();

    assert_eq!(registry.evict_oldest(10).len(), 2);
    assert!(registry.is_empty());
    assert!(registry.evict_oldest(1).is_empty());
}

#[test]
fn test_eviction_after_interleaved_removal() {
    let mut registry = PlacementRegistry::new(5);
    registry.add(instance("a", 0.0)).unwrap();
    let b = registry.add(instance("b", 0.0)).unwrap();
    registry.add(instance("c", 0.0)).unwrap();
    registry.remove(b);
    registry.add(instance("d", 0.0)).unwrap();

    let evicted: Vec<String> = registry
        .evict_oldest(2)
        .into_iter()
        .map(|(_, i)| i.spec().id().to_string())
        .collect();
    assert_eq!(evicted, vec!["a", "c"]);
}
