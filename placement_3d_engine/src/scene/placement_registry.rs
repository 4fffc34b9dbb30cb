/// PlacementRegistry - capacity-bounded set of placed instances.
///
/// Instances live in a SlotMap for stable keys; a separate order list keeps
/// insertion order so iteration and eviction are deterministic regardless
/// of slot reuse.

use slotmap::SlotMap;
use crate::error::{Error, Result};
use super::placed_instance::{InstanceKey, PlacedInstance};

const LOG_SOURCE: &str = "placement3d::Registry";

/// Default maximum number of placed instances
pub const DEFAULT_MAX_CAPACITY: usize = 10;

pub struct PlacementRegistry {
    /// Instances stored in a slot map for O(1) insert/remove
    instances: SlotMap<InstanceKey, PlacedInstance>,
    /// Keys in insertion order (oldest first)
    order: Vec<InstanceKey>,
    max_capacity: usize,
    next_sequence: u64,
}

impl PlacementRegistry {
    pub fn new(max_capacity: usize) -> Self {
        Self {
            instances: SlotMap::with_key(),
            order: Vec::with_capacity(max_capacity),
            max_capacity,
            next_sequence: 0,
        }
    }

    /// Add an instance and assign its insertion sequence number.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` when the registry already holds `max_capacity`
    /// instances; the registry is left unchanged.
    pub fn add(&mut self, mut instance: PlacedInstance) -> Result<InstanceKey> {
        if self.is_full() {
            crate::engine_warn!(LOG_SOURCE,
                "Rejected '{}': registry full ({}/{})",
                instance.spec().id(), self.len(), self.max_capacity);
            return Err(Error::CapacityExceeded { capacity: self.max_capacity });
        }

        instance.set_sequence(self.next_sequence);
        self.next_sequence += 1;

        let key = self.instances.insert(instance);
        self.order.push(key);
        crate::engine_debug!(LOG_SOURCE, "Added {:?} ({}/{})", key, self.len(), self.max_capacity);
        Ok(key)
    }

    /// Remove an instance. Returns false if the key is unknown.
    pub fn remove(&mut self, key: InstanceKey) -> bool {
        self.take(key).is_some()
    }

    /// Remove an instance and hand it back
    pub fn take(&mut self, key: InstanceKey) -> Option<PlacedInstance> {
        let instance = self.instances.remove(key)?;
        self.order.retain(|k| *k != key);
        Some(instance)
    }

    pub fn get(&self, key: InstanceKey) -> Option<&PlacedInstance> {
        self.instances.get(key)
    }

    pub fn get_mut(&mut self, key: InstanceKey) -> Option<&mut PlacedInstance> {
        self.instances.get_mut(key)
    }

    pub fn contains(&self, key: InstanceKey) -> bool {
        self.instances.contains_key(key)
    }

    /// All instances in insertion order
    pub fn all(&self) -> impl Iterator<Item = (InstanceKey, &PlacedInstance)> + '_ {
        self.order.iter().map(move |&key| (key, &self.instances[key]))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = InstanceKey> + '_ {
        self.order.iter().copied()
    }

    /// Remove every instance. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        let count = self.len();
        self.instances.clear();
        self.order.clear();
        if count > 0 {
            crate::engine_info!(LOG_SOURCE, "Cleared {} instances", count);
        }
    }

    /// Remove the `n` oldest instances (smallest sequence numbers first).
    ///
    /// Returns the removed instances with their keys, oldest first.
    pub fn evict_oldest(&mut self, n: usize) -> Vec<(InstanceKey, PlacedInstance)> {
        let n = n.min(self.order.len());
        let evicted: Vec<_> = self
            .order
            .drain(..n)
            .filter_map(|key| self.instances.remove(key).map(|instance| (key, instance)))
            .collect();

        for (key, instance) in &evicted {
            crate::engine_info!(LOG_SOURCE,
                "Evicted {:?} '{}' (sequence {})", key, instance.spec().id(), instance.sequence());
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.max_capacity
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn capacity_remaining(&self) -> usize {
        self.max_capacity.saturating_sub(self.len())
    }
}

impl Default for PlacementRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CAPACITY)
    }
}

#[cfg(test)]
#[path = "placement_registry_tests.rs"]
mod tests;
