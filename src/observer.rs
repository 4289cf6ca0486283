//! Diagnostic observers for lifecycle traceability.
//!
//! Observers receive every lifecycle event of every managed type: successful
//! creates, destroys and retrievals, and refused operations with the error
//! returned to the caller. Events are delivered synchronously from inside the
//! operation's guarded region, so under the `Exclusive` policy the events of
//! one managed type arrive in the same total order as the operations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::access::Access;
use crate::error::SingularityError;
use crate::internal::sync::RwLock;
use crate::key::SlotKey;

/// Observer trait for lifecycle events.
///
/// # Performance
///
/// Observer calls are made synchronously while the operation is in progress,
/// and under `Exclusive` while the managed type's lock is held. Keep
/// implementations lightweight. An observer must not call back into the
/// controller of the type it is being notified about, nor borrow an instance
/// of that type.
///
/// # Examples
///
/// ```
/// use singularity::{Access, SingularityError, SingularityObserver, SlotKey, add_observer};
/// use std::sync::Arc;
///
/// struct AuditObserver {
///     component: String,
/// }
///
/// impl SingularityObserver for AuditObserver {
///     fn created(&self, key: &SlotKey, access: Access) {
///         println!("[{}] created {} ({:?})", self.component, key.display_name(), access);
///     }
///
///     fn destroyed(&self, key: &SlotKey) {
///         println!("[{}] destroyed {}", self.component, key.display_name());
///     }
///
///     fn rejected(&self, key: &SlotKey, error: &SingularityError) {
///         eprintln!("[{}] {} refused: {}", self.component, key.display_name(), error);
///     }
/// }
///
/// add_observer(Arc::new(AuditObserver { component: "boot".to_string() }));
/// ```
pub trait SingularityObserver: Send + Sync {
    /// Called after an instance was constructed and stored.
    ///
    /// # Arguments
    ///
    /// * `key` - The managed type's slot key
    /// * `access` - The access mode the instance was created with
    fn created(&self, key: &SlotKey, access: Access);

    /// Called after an instance was torn down and the slot emptied.
    fn destroyed(&self, key: &SlotKey);

    /// Called after `get` handed out the live instance.
    ///
    /// Retrievals can be frequent; the default ignores them.
    fn retrieved(&self, _key: &SlotKey) {}

    /// Called when an operation is refused.
    ///
    /// `error` is the same value returned to the caller.
    fn rejected(&self, key: &SlotKey, error: &SingularityError);
}

/// Process-wide list of registered observers.
///
/// Kept separate from the observer count so the common case of no observers
/// costs a single atomic load per operation.
struct Observers {
    observers: RwLock<Vec<Arc<dyn SingularityObserver>>>,
    count: AtomicUsize,
}

static OBSERVERS: Observers = Observers::new();

impl Observers {
    const fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            count: AtomicUsize::new(0),
        }
    }

    fn add(&self, observer: Arc<dyn SingularityObserver>) {
        let mut observers = self.observers.write();
        observers.push(observer);
        self.count.store(observers.len(), Ordering::Release);
    }

    fn clear(&self) {
        let mut observers = self.observers.write();
        observers.clear();
        self.count.store(0, Ordering::Release);
    }

    #[inline]
    fn has_observers(&self) -> bool {
        self.count.load(Ordering::Acquire) != 0
    }

    /// Runs `f` for each observer without holding the list lock, so an
    /// observer may itself register or clear observers.
    #[inline]
    fn each(&self, f: impl Fn(&dyn SingularityObserver)) {
        if !self.has_observers() {
            return;
        }
        let observers = self.observers.read().clone();
        for observer in &observers {
            f(observer.as_ref());
        }
    }
}

/// Registers an observer for the lifecycle events of every managed type.
///
/// Observers stay registered for the rest of the process or until
/// [`clear_observers`] is called.
pub fn add_observer(observer: Arc<dyn SingularityObserver>) {
    OBSERVERS.add(observer);
}

/// Removes every registered observer.
pub fn clear_observers() {
    OBSERVERS.clear();
}

/// Returns true if any observers are registered.
pub fn has_observers() -> bool {
    OBSERVERS.has_observers()
}

pub(crate) fn notify_created(key: &SlotKey, access: Access) {
    OBSERVERS.each(|observer| observer.created(key, access));
}

pub(crate) fn notify_destroyed(key: &SlotKey) {
    OBSERVERS.each(|observer| observer.destroyed(key));
}

pub(crate) fn notify_retrieved(key: &SlotKey) {
    OBSERVERS.each(|observer| observer.retrieved(key));
}

pub(crate) fn notify_rejected(key: &SlotKey, error: &SingularityError) {
    OBSERVERS.each(|observer| observer.rejected(key, error));
}

/// Built-in observer that logs events to stdout.
///
/// Refusals go to stderr. Useful during development; for production, forward
/// events into your logging infrastructure with a custom observer or enable
/// the `tracing` feature and use `TracingObserver`.
///
/// # Examples
///
/// ```
/// use singularity::{add_observer, LoggingObserver};
/// use std::sync::Arc;
///
/// add_observer(Arc::new(LoggingObserver::new()));
///
/// // All subsequent lifecycle events are logged to stdout
/// ```
pub struct LoggingObserver {
    prefix: String,
    log_retrievals: bool,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[singularity]".to_string(),
            log_retrievals: false,
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            log_retrievals: false,
        }
    }

    /// Also log every successful `get`.
    pub fn with_retrievals(mut self) -> Self {
        self.log_retrievals = true;
        self
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SingularityObserver for LoggingObserver {
    fn created(&self, key: &SlotKey, access: Access) {
        println!("{} Created: {} (access: {:?})", self.prefix, key.display_name(), access);
    }

    fn destroyed(&self, key: &SlotKey) {
        println!("{} Destroyed: {}", self.prefix, key.display_name());
    }

    fn retrieved(&self, key: &SlotKey) {
        if self.log_retrievals {
            println!("{} Retrieved: {}", self.prefix, key.display_name());
        }
    }

    fn rejected(&self, _key: &SlotKey, error: &SingularityError) {
        eprintln!("{} REFUSED: {}", self.prefix, error);
    }
}

/// Observer that forwards lifecycle events to `tracing`.
///
/// Successful operations are emitted at `debug`, retrievals at `trace` and
/// refusals at `warn`, all under the `singularity` target.
///
/// # Examples
///
/// ```
/// use singularity::{add_observer, TracingObserver};
/// use std::sync::Arc;
///
/// add_observer(Arc::new(TracingObserver));
/// ```
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl SingularityObserver for TracingObserver {
    fn created(&self, key: &SlotKey, access: Access) {
        tracing::debug!(target: "singularity", managed_type = key.display_name(), ?access, "created");
    }

    fn destroyed(&self, key: &SlotKey) {
        tracing::debug!(target: "singularity", managed_type = key.display_name(), "destroyed");
    }

    fn retrieved(&self, key: &SlotKey) {
        tracing::trace!(target: "singularity", managed_type = key.display_name(), "retrieved");
    }

    fn rejected(&self, key: &SlotKey, error: &SingularityError) {
        tracing::warn!(target: "singularity", managed_type = key.display_name(), %error, "refused");
    }
}
