//! The lifecycle controller.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::access::Access;
use crate::error::{SingularityError, SingularityResult};
use crate::instance::Instance;
use crate::internal::{Live, Slot};
use crate::key::key_of_type;
use crate::metrics::MetricsSnapshot;
use crate::observer;
use crate::policy::{self, ConcurrencyPolicy, Unsynchronized};
use crate::registry::SlotRegistry;
use crate::traits::{ConstructToken, Singular};

/// Explicit single-instance lifecycle for the managed type `T`.
///
/// `Singularity` is never instantiated; it names the controller for `T`
/// under the concurrency policy `M`. The managed type alternates between two
/// states, empty and live, starting empty:
///
/// | operation | empty | live |
/// |---|---|---|
/// | [`create`](Self::create) | constructs, becomes live | `AlreadyCreated` |
/// | [`create_with_global_access`](Self::create_with_global_access) | constructs, becomes live, `get` enabled | `AlreadyCreated` |
/// | [`get`](Self::get) | `NotCreated` | the instance, or `AccessNotEnabled` |
/// | [`destroy`](Self::destroy) | `AlreadyDestroyed` | tears down, becomes empty |
///
/// A refused operation changes nothing. The state belongs to `T` itself:
/// controllers with different policies share it.
///
/// The controller is the sole owner of the instance. `create` and `get`
/// return [`Instance`] handles that reach the value through scoped borrows;
/// `destroy` runs [`Singular::dispose`] and drops the value before it
/// returns. At most one value of `T` built through the controller exists at
/// any time.
///
/// # Examples
///
/// Factory usage: the handle is passed to dependents, no global access.
///
/// ```
/// use singularity::{ConstructToken, Instance, Singular, Singularity};
///
/// struct Database { url: String }
///
/// impl Singular for Database {
///     type Args = String;
///     fn construct(url: String, _: ConstructToken) -> Self {
///         Database { url }
///     }
/// }
///
/// struct Repository { db: Instance<Database> }
///
/// let db = Singularity::<Database>::create("postgres://localhost".to_string()).unwrap();
/// let repo = Repository { db: db.clone() };
/// assert_eq!(repo.db.borrow().unwrap().url, "postgres://localhost");
///
/// // A second instance is refused while the first is live
/// assert!(Singularity::<Database>::create("sqlite://".to_string()).is_err());
///
/// Singularity::<Database>::destroy().unwrap();
/// assert!(!repo.db.is_live());
/// ```
pub struct Singularity<T, M = Unsynchronized> {
    _marker: PhantomData<fn() -> (T, M)>,
}

impl<T, M> Singularity<T, M>
where
    T: Singular,
    M: ConcurrencyPolicy,
{
    #[inline]
    fn slot() -> &'static Slot {
        SlotRegistry::global().slot(key_of_type::<T>())
    }

    /// Constructs the instance with `args`; `get` stays refused.
    ///
    /// # Errors
    ///
    /// [`SingularityError::AlreadyCreated`] if an instance is live. The
    /// constructor is not run and the live instance is untouched.
    pub fn create(args: T::Args) -> SingularityResult<Instance<T>> {
        Self::create_with(args, Access::Local)
    }

    /// Constructs the instance with `args` and enables [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// [`SingularityError::AlreadyCreated`] if an instance is live.
    ///
    /// # Examples
    ///
    /// ```
    /// use singularity::{ConstructToken, Exclusive, Singular, Singularity};
    ///
    /// struct Clock { tick_ms: u64 }
    ///
    /// impl Singular for Clock {
    ///     type Args = u64;
    ///     fn construct(tick_ms: u64, _: ConstructToken) -> Self {
    ///         Clock { tick_ms }
    ///     }
    /// }
    ///
    /// let clock = Singularity::<Clock, Exclusive>::create_with_global_access(16).unwrap();
    ///
    /// // Elsewhere, without the handle
    /// let same = Singularity::<Clock, Exclusive>::get().unwrap();
    /// assert!(clock.ptr_eq(&same));
    /// assert_eq!(same.borrow().unwrap().tick_ms, 16);
    ///
    /// Singularity::<Clock, Exclusive>::destroy().unwrap();
    /// ```
    pub fn create_with_global_access(args: T::Args) -> SingularityResult<Instance<T>> {
        Self::create_with(args, Access::Global)
    }

    fn create_with(args: T::Args, access: Access) -> SingularityResult<Instance<T>> {
        let slot = Self::slot();
        let _guard = policy::enter::<M>(slot);

        if slot.is_live() {
            return Err(Self::refuse_create(slot));
        }

        let instance = Arc::new(T::construct(args, ConstructToken::new()));
        let handle = Instance::new(Arc::downgrade(&instance), slot);
        if let Err(instance) = slot.store(instance, access) {
            // Lost a race between unsynchronized creates; ours was never live
            drop(instance);
            return Err(Self::refuse_create(slot));
        }

        slot.metrics().record_created();
        observer::notify_created(slot.key(), access);
        Ok(handle)
    }

    /// Tears down the live instance and empties the slot.
    ///
    /// Waits for outstanding borrows of the instance, runs
    /// [`Singular::dispose`] and drops the value. Global access is cleared.
    /// Handles to the destroyed instance report it as destroyed from then on.
    ///
    /// # Errors
    ///
    /// [`SingularityError::AlreadyDestroyed`] if no instance is live.
    pub fn destroy() -> SingularityResult<()> {
        let slot = Self::slot();
        let _borrows = slot.exclude_borrows();
        let _guard = policy::enter::<M>(slot);

        match slot.take() {
            Some(live) => {
                Self::teardown(slot, live);
                Ok(())
            }
            None => {
                let error = SingularityError::AlreadyDestroyed(slot.key().display_name());
                slot.metrics().record_rejected_destroy();
                observer::notify_rejected(slot.key(), &error);
                Err(error)
            }
        }
    }

    /// Retrieves the live instance created with global access.
    ///
    /// Returns a handle to the same instance the matching
    /// [`create_with_global_access`](Self::create_with_global_access) returned.
    ///
    /// # Errors
    ///
    /// - [`SingularityError::NotCreated`] if no instance is live.
    /// - [`SingularityError::AccessNotEnabled`] if the live instance was
    ///   created with [`create`](Self::create).
    pub fn get() -> SingularityResult<Instance<T>> {
        let slot = Self::slot();
        let _guard = policy::enter::<M>(slot);

        let name = slot.key().display_name();
        let result = slot.inspect(|live| match live {
            None => Err(SingularityError::NotCreated(name)),
            Some(live) if !live.access.allows_get() => Err(SingularityError::AccessNotEnabled(name)),
            // The slot is keyed by T's TypeId, so it never holds another type
            Some(live) => live.downgrade::<T>().ok_or(SingularityError::NotCreated(name)),
        });

        match result {
            Ok(instance) => {
                slot.metrics().record_retrieved();
                observer::notify_retrieved(slot.key());
                Ok(Instance::new(instance, slot))
            }
            Err(error) => {
                slot.metrics().record_rejected_get();
                observer::notify_rejected(slot.key(), &error);
                Err(error)
            }
        }
    }

    /// Returns true if an instance is live.
    pub fn is_created() -> bool {
        let slot = Self::slot();
        let _guard = policy::enter::<M>(slot);
        slot.is_live()
    }

    /// Returns true if an instance is live and `get` is enabled for it.
    pub fn is_global_access_enabled() -> bool {
        Self::access().is_some_and(Access::allows_get)
    }

    /// Access mode of the live instance, or `None` when empty.
    pub fn access() -> Option<Access> {
        let slot = Self::slot();
        let _guard = policy::enter::<M>(slot);
        slot.access()
    }

    /// Empties the slot if an instance is live.
    ///
    /// Behaves like [`destroy`](Self::destroy) but never fails, which makes
    /// it suitable for returning a type to a known state between test cases.
    /// Returns whether an instance was released.
    pub fn reset() -> bool {
        let slot = Self::slot();
        let _borrows = slot.exclude_borrows();
        let _guard = policy::enter::<M>(slot);

        match slot.take() {
            Some(live) => {
                Self::teardown(slot, live);
                true
            }
            None => false,
        }
    }

    /// Lifecycle counters for `T`.
    pub fn metrics() -> MetricsSnapshot {
        Self::slot().metrics().snapshot()
    }

    /// Runs with the slot already emptied, borrows excluded and the policy
    /// guard held. The slot held the only strong reference, so the value is
    /// dropped here.
    fn teardown(slot: &Slot, live: Live) {
        if let Some(instance) = live.into_owner::<T>() {
            instance.dispose();
            drop(instance);
        }
        slot.metrics().record_destroyed();
        observer::notify_destroyed(slot.key());
    }

    fn refuse_create(slot: &Slot) -> SingularityError {
        let error = SingularityError::AlreadyCreated(slot.key().display_name());
        slot.metrics().record_rejected_create();
        observer::notify_rejected(slot.key(), &error);
        error
    }
}
