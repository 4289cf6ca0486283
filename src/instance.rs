//! Handles to the live instance.
//!
//! The controller owns the instance. Callers get an [`Instance`], a weak
//! handle that can be copied into dependents freely, and reach the value
//! through short scoped borrows. `destroy` waits for outstanding borrows and
//! then drops the value, so once it returns no handle can reach the old
//! instance and the next `create` starts from nothing.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use crate::error::{SingularityError, SingularityResult};
use crate::internal::sync::RwLockReadGuard;
use crate::internal::Slot;

/// Handle to one live instance of `T`.
///
/// Returned by `create`, `create_with_global_access` and `get`. A handle
/// never keeps the instance alive: after `destroy` every borrow through it
/// fails with [`SingularityError::AlreadyDestroyed`], even if a new instance
/// has been created since.
///
/// # Examples
///
/// ```
/// use singularity::{ConstructToken, Instance, Singular, Singularity, SingularityError};
///
/// struct Horizon { radius: u32 }
///
/// impl Singular for Horizon {
///     type Args = u32;
///     fn construct(radius: u32, _: ConstructToken) -> Self {
///         Horizon { radius }
///     }
/// }
///
/// struct Observatory { horizon: Instance<Horizon> }
///
/// let horizon = Singularity::<Horizon>::create(12).unwrap();
/// let observatory = Observatory { horizon: horizon.clone() };
///
/// assert_eq!(observatory.horizon.borrow().unwrap().radius, 12);
/// assert_eq!(observatory.horizon.with(|h| h.radius * 2).unwrap(), 24);
///
/// Singularity::<Horizon>::destroy().unwrap();
///
/// // The value is gone; the handle says so instead of dangling
/// assert!(!observatory.horizon.is_live());
/// assert!(matches!(
///     observatory.horizon.borrow(),
///     Err(SingularityError::AlreadyDestroyed(_))
/// ));
/// ```
pub struct Instance<T> {
    instance: Weak<T>,
    slot: &'static Slot,
}

impl<T> Instance<T> {
    pub(crate) fn new(instance: Weak<T>, slot: &'static Slot) -> Self {
        Self { instance, slot }
    }

    /// Borrows the instance until the returned guard is dropped.
    ///
    /// `destroy` for `T` blocks while any borrow is outstanding. Keep borrows
    /// short, do not call `destroy` or `reset` for `T` while holding one, and
    /// do not take a second borrow of `T` on the same thread while the first
    /// is held.
    ///
    /// # Errors
    ///
    /// [`SingularityError::AlreadyDestroyed`] if the instance behind this
    /// handle has been destroyed.
    pub fn borrow(&self) -> SingularityResult<InstanceRef<T>> {
        let gate = self.slot.enter_borrow();
        match self.instance.upgrade() {
            Some(instance) => Ok(InstanceRef { instance, _gate: gate }),
            None => Err(SingularityError::AlreadyDestroyed(self.slot.key().display_name())),
        }
    }

    /// Runs `f` on the instance and returns its result.
    ///
    /// Same contract as [`borrow`](Self::borrow), scoped to the closure.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> SingularityResult<R> {
        let instance = self.borrow()?;
        Ok(f(&instance))
    }

    /// Returns true until the instance behind this handle is destroyed.
    pub fn is_live(&self) -> bool {
        self.instance.strong_count() > 0
    }

    /// Returns true if both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.instance, &other.instance)
    }

    /// Name of the managed type.
    pub fn type_name(&self) -> &'static str {
        self.slot.key().display_name()
    }
}

impl<T> Clone for Instance<T> {
    fn clone(&self) -> Self {
        Self {
            instance: Weak::clone(&self.instance),
            slot: self.slot,
        }
    }
}

impl<T> fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name())
            .field("live", &self.is_live())
            .finish()
    }
}

/// Scoped borrow of a live instance, from [`Instance::borrow`].
///
/// Dereferences to `T`. The instance cannot be dropped while this guard
/// exists.
pub struct InstanceRef<T> {
    // Dropped before the gate, so teardown always holds the last reference
    instance: Arc<T>,
    _gate: RwLockReadGuard<'static, ()>,
}

impl<T> Deref for InstanceRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.instance
    }
}

impl<T: fmt::Debug> fmt::Debug for InstanceRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.instance, f)
    }
}
