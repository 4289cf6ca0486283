//! Concurrency policies for the lifecycle controller.
//!
//! A policy decides how the operations of [`Singularity`](crate::Singularity)
//! are serialized against each other. It is picked per controller
//! instantiation through the `M` type parameter and carries no runtime state.
//! Both policies address the same per-type slot, so an instance created under
//! one policy can be retrieved or destroyed under the other.

use crate::internal::sync::MutexGuard;
use crate::internal::Slot;

mod sealed {
    pub trait Sealed {}
}

/// Serialization strategy for lifecycle operations.
///
/// This trait is sealed; [`Unsynchronized`] and [`Exclusive`] are the only
/// implementations.
pub trait ConcurrencyPolicy: sealed::Sealed + Send + Sync + 'static {
    /// Whether every operation runs under the managed type's lock.
    const SERIALIZED: bool;
    /// Short policy name for logs and reports.
    const NAME: &'static str;
}

/// No serialization beyond what memory safety requires.
///
/// Only correct when the managed type is created, retrieved and destroyed
/// from one logical thread. No per-type operation lock is taken, but each
/// operation still takes the slot's short internal state lock (and `destroy`
/// its borrow gate), so this policy is cheap rather than free. Concurrent
/// callers cannot corrupt the slot, but the outcome of racing operations is
/// unspecified: for example two racing
/// creates may both run the constructor before one of them is refused with
/// `AlreadyCreated` and its value dropped.
///
/// # Examples
///
/// ```rust
/// use singularity::{ConstructToken, Singular, Singularity, Unsynchronized};
///
/// struct Config { level: u8 }
///
/// impl Singular for Config {
///     type Args = u8;
///     fn construct(level: u8, _: ConstructToken) -> Self {
///         Config { level }
///     }
/// }
///
/// // Unsynchronized is the default policy
/// let config = Singularity::<Config, Unsynchronized>::create(3).unwrap();
/// assert_eq!(config.borrow().unwrap().level, 3);
/// Singularity::<Config>::destroy().unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unsynchronized;

/// Mutual exclusion per managed type.
///
/// Every operation holds the managed type's lock from its first check to its
/// last effect, constructor and teardown included, so operations on one type
/// are totally ordered. The lock is released on every exit path, including a
/// panicking constructor. Unrelated managed types never contend.
///
/// Calling back into the same type's controller from its constructor or its
/// `dispose` hook blocks forever.
///
/// # Examples
///
/// ```rust
/// use singularity::{ConstructToken, Exclusive, Singular, Singularity};
/// use std::thread;
///
/// struct Pool { size: usize }
///
/// impl Singular for Pool {
///     type Args = usize;
///     fn construct(size: usize, _: ConstructToken) -> Self {
///         Pool { size }
///     }
/// }
///
/// let handles: Vec<_> = (0..4)
///     .map(|i| thread::spawn(move || Singularity::<Pool, Exclusive>::create(i).is_ok()))
///     .collect();
/// let winners = handles
///     .into_iter()
///     .map(|h| h.join().unwrap())
///     .filter(|created| *created)
///     .count();
///
/// // Exactly one concurrent create wins
/// assert_eq!(winners, 1);
/// Singularity::<Pool, Exclusive>::destroy().unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exclusive;

impl sealed::Sealed for Unsynchronized {}
impl sealed::Sealed for Exclusive {}

impl ConcurrencyPolicy for Unsynchronized {
    const SERIALIZED: bool = false;
    const NAME: &'static str = "unsynchronized";
}

impl ConcurrencyPolicy for Exclusive {
    const SERIALIZED: bool = true;
    const NAME: &'static str = "exclusive";
}

/// Scoped guard for one lifecycle operation.
///
/// Holds the per-type lock under [`Exclusive`] and nothing otherwise.
pub(crate) type PolicyGuard<'a> = Option<MutexGuard<'a, ()>>;

/// Enters the guarded region of `slot` according to policy `M`.
#[inline]
pub(crate) fn enter<M: ConcurrencyPolicy>(slot: &Slot) -> PolicyGuard<'_> {
    if M::SERIALIZED {
        Some(slot.lock_exclusive())
    } else {
        None
    }
}
