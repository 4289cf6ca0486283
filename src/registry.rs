//! Process-wide registry of instance slots, keyed by managed type.
//!
//! The registry is created empty on first use and lives for the rest of the
//! process. A slot is inserted the first time any operation names its type
//! and is never removed, so the `&'static Slot` handed out stays valid and
//! every controller for a type, whatever its policy, sees the same slot.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::internal::sync::RwLock;
use crate::internal::Slot;
use crate::key::SlotKey;

#[cfg(feature = "ahash")]
type SlotHasher = ahash::RandomState;
#[cfg(not(feature = "ahash"))]
type SlotHasher = std::collections::hash_map::RandomState;

static REGISTRY: OnceLock<SlotRegistry> = OnceLock::new();

/// Type-indexed mapping from managed type to its slot.
pub(crate) struct SlotRegistry {
    slots: RwLock<HashMap<SlotKey, &'static Slot, SlotHasher>>,
}

impl SlotRegistry {
    fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::with_hasher(SlotHasher::default())),
        }
    }

    /// The process-wide registry.
    pub(crate) fn global() -> &'static SlotRegistry {
        REGISTRY.get_or_init(SlotRegistry::new)
    }

    /// Gets the slot for `key`, inserting an empty one on first use.
    pub(crate) fn slot(&self, key: SlotKey) -> &'static Slot {
        // Fast path: slot already registered
        if let Some(slot) = self.slots.read().get(&key).copied() {
            return slot;
        }

        // Slow path: only happens once per managed type
        let mut slots = self.slots.write();
        let slot: &'static Slot = *slots
            .entry(key)
            .or_insert_with(|| &*Box::leak(Box::new(Slot::new(key))));
        slot
    }

    /// Gets the slot for `key` without registering it.
    pub(crate) fn find(&self, key: &SlotKey) -> Option<&'static Slot> {
        self.slots.read().get(key).copied()
    }

    /// All registered slots, ordered by type name.
    pub(crate) fn slots(&self) -> Vec<&'static Slot> {
        let mut slots: Vec<&'static Slot> = self.slots.read().values().copied().collect();
        slots.sort_by_key(|slot| slot.key().display_name());
        slots
    }

    /// Returns the number of registered slots.
    pub(crate) fn len(&self) -> usize {
        self.slots.read().len()
    }
}
