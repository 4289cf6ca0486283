//! Slot key types for the instance registry.

use std::any::TypeId;

/// Key identifying the instance slot of one managed type.
///
/// The key is derived from the managed type alone. Neither the concurrency
/// policy nor the access mode participates, so every `Singularity<T, M>`
/// naming the same `T` addresses the same slot.
///
/// # Examples
///
/// ```rust
/// use singularity::{SlotKey, key_of_type};
/// use std::any::TypeId;
///
/// let key = key_of_type::<String>();
/// assert_eq!(key.id(), TypeId::of::<String>());
/// assert_eq!(key.display_name(), "alloc::string::String");
///
/// // Equality and hashing only look at the TypeId
/// assert_eq!(key, SlotKey::new(TypeId::of::<String>(), "String"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SlotKey {
    id: TypeId,
    name: &'static str,
}

impl SlotKey {
    /// Creates a key from a `TypeId` and a display name.
    pub const fn new(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// The managed type's `TypeId`.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Get the type name for display
    ///
    /// This is the `std::any::type_name` result when the key was built with
    /// [`key_of_type`].
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

// TypeId-only comparison: the name is diagnostic
impl PartialEq for SlotKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SlotKey {}

impl PartialOrd for SlotKey {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SlotKey {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for SlotKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// Helper function for creating slot keys
#[inline(always)]
pub fn key_of_type<T: 'static>() -> SlotKey {
    SlotKey::new(TypeId::of::<T>(), std::any::type_name::<T>())
}
