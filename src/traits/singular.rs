//! Construction and teardown contract for managed types.

/// Capability to run a managed type's constructor.
///
/// Only the lifecycle controller can mint a token, so a type whose fields
/// are private and whose only constructor is [`Singular::construct`] can only
/// come into existence through [`Singularity`](crate::Singularity).
#[derive(Debug)]
pub struct ConstructToken {
    _private: (),
}

impl ConstructToken {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

/// A type whose single live instance is managed by
/// [`Singularity`](crate::Singularity).
///
/// `Args` is the constructor's argument list, usually a tuple. Each element
/// keeps the aliasing it is declared with: a value is moved in, an `Arc<E>`
/// shares a collaborator, a `&'static E` borrows one.
///
/// # Examples
///
/// ```
/// use singularity::{ConstructToken, Singular, Singularity};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
///
/// pub struct Event {
///     fired: AtomicU32,
/// }
///
/// pub struct Horizon {
///     level: i32,
///     by_pointer: Arc<Event>,
///     by_reference: &'static Event,
/// }
///
/// impl Singular for Horizon {
///     type Args = (i32, Arc<Event>, &'static Event);
///
///     fn construct((level, by_pointer, by_reference): Self::Args, _: ConstructToken) -> Self {
///         Horizon { level, by_pointer, by_reference }
///     }
///
///     fn dispose(&self) {
///         println!("Horizon at level {} going away", self.level);
///     }
/// }
///
/// static SHARED: Event = Event { fired: AtomicU32::new(0) };
/// let pointed = Arc::new(Event { fired: AtomicU32::new(0) });
///
/// let horizon = Singularity::<Horizon>::create((3, pointed.clone(), &SHARED)).unwrap();
///
/// // Mutations through the caller's aliases are visible through the instance
/// pointed.fired.fetch_add(1, Ordering::SeqCst);
/// SHARED.fired.fetch_add(2, Ordering::SeqCst);
/// let horizon = horizon.borrow().unwrap();
/// assert_eq!(horizon.by_pointer.fired.load(Ordering::SeqCst), 1);
/// assert_eq!(horizon.by_reference.fired.load(Ordering::SeqCst), 2);
/// drop(horizon);
///
/// Singularity::<Horizon>::destroy().unwrap();
/// ```
pub trait Singular: Send + Sync + Sized + 'static {
    /// Constructor argument list.
    type Args;

    /// Build the instance from its arguments.
    ///
    /// Called at most once per successful create, inside the controller's
    /// guarded region.
    fn construct(args: Self::Args, token: ConstructToken) -> Self;

    /// Structured teardown, run by `destroy` right before the value is
    /// dropped.
    ///
    /// Runs exactly once per live instance, inside the guarded region, after
    /// every outstanding borrow has ended. The default does nothing.
    fn dispose(&self) {}
}
