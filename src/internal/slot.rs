//! Instance slot: per-type storage for at most one live instance.

use std::any::Any;
use std::sync::{Arc, Weak};

use super::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::access::Access;
use crate::key::SlotKey;
use crate::metrics::SlotMetrics;

// Type-erased owner of the live instance, always an `Arc<T>` for the slot's `T`
type AnyOwner = Box<dyn Any + Send + Sync>;

/// The live contents of a slot.
///
/// Existence of a `Live` value is the `created` flag and its `access` is the
/// `get_enabled` flag, so global access can never be recorded for an empty
/// slot. The `Arc` inside is the only lasting strong reference to the
/// instance; handles given to callers are weak.
pub(crate) struct Live {
    owner: AnyOwner,
    pub(crate) access: Access,
}

impl Live {
    fn new<T: Send + Sync + 'static>(instance: Arc<T>, access: Access) -> Self {
        Self {
            owner: Box::new(instance),
            access,
        }
    }

    /// Weak reference to the instance.
    ///
    /// Slots are keyed by `TypeId` and only the controller for that type
    /// stores into them, so this is `None` only when asked for a type other
    /// than the slot's own.
    pub(crate) fn downgrade<T: Send + Sync + 'static>(&self) -> Option<Weak<T>> {
        self.owner.downcast_ref::<Arc<T>>().map(Arc::downgrade)
    }

    /// The owning reference, consuming the slot contents.
    pub(crate) fn into_owner<T: Send + Sync + 'static>(self) -> Option<Arc<T>> {
        self.owner.downcast::<Arc<T>>().ok().map(|owner| *owner)
    }
}

/// Storage for one managed type.
///
/// `exclusive` is the per-type lock taken by the `Exclusive` policy for a whole
/// operation. `state` is held only for the short check-and-commit steps and
/// never while user code runs. `borrows` is read-held by every outstanding
/// instance borrow and write-held by teardown, so the instance is dropped
/// only once no borrow can observe it.
///
/// Lock order: `borrows`, then `exclusive`, then `state`.
pub(crate) struct Slot {
    key: SlotKey,
    borrows: RwLock<()>,
    exclusive: Mutex<()>,
    state: Mutex<Option<Live>>,
    metrics: SlotMetrics,
}

impl Slot {
    pub(crate) fn new(key: SlotKey) -> Self {
        Self {
            key,
            borrows: RwLock::new(()),
            exclusive: Mutex::new(()),
            state: Mutex::new(None),
            metrics: SlotMetrics::new(),
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &SlotKey {
        &self.key
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &SlotMetrics {
        &self.metrics
    }

    /// Acquires the per-type lock; released when the guard drops.
    #[inline]
    pub(crate) fn lock_exclusive(&self) -> MutexGuard<'_, ()> {
        self.exclusive.lock()
    }

    /// Registers an outstanding borrow of the instance.
    #[inline]
    pub(crate) fn enter_borrow(&self) -> RwLockReadGuard<'_, ()> {
        self.borrows.read()
    }

    /// Waits until no borrow is outstanding and keeps new ones out.
    pub(crate) fn exclude_borrows(&self) -> RwLockWriteGuard<'_, ()> {
        self.borrows.write()
    }

    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        self.state.lock().is_some()
    }

    pub(crate) fn access(&self) -> Option<Access> {
        self.state.lock().as_ref().map(|live| live.access)
    }

    /// Runs `f` on the current contents under the state lock.
    ///
    /// `f` must not call back into the slot.
    pub(crate) fn inspect<R>(&self, f: impl FnOnce(Option<&Live>) -> R) -> R {
        f(self.state.lock().as_ref())
    }

    /// Stores `instance` if the slot is empty.
    ///
    /// Hands the instance back when the slot is already live, which only
    /// happens when unsynchronized callers race on the same type. The caller
    /// drops it outside the state lock.
    pub(crate) fn store<T: Send + Sync + 'static>(
        &self,
        instance: Arc<T>,
        access: Access,
    ) -> Result<(), Arc<T>> {
        let mut state = self.state.lock();
        if state.is_some() {
            return Err(instance);
        }
        *state = Some(Live::new(instance, access));
        Ok(())
    }

    /// Empties the slot, returning what it held.
    pub(crate) fn take(&self) -> Option<Live> {
        self.state.lock().take()
    }
}
