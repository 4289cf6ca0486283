//! # singularity
//!
//! Explicit single-instance lifecycle management for Rust.
//!
//! A *singularity* is like a singleton with the magic taken out: a managed
//! type has at most one live instance, but that instance is created and
//! destroyed only when you say so, from whatever constructor arguments you
//! pass, and it is reachable from elsewhere only if you asked for that when
//! creating it.
//!
//! ## Features
//!
//! - **Explicit lifetime**: nothing is created lazily; the instance exists
//!   between `create` and `destroy`, and the cycle can repeat
//! - **Owned by the controller**: callers hold weak [`Instance`] handles, so
//!   `destroy` really drops the value and no stale copy outlives it
//! - **Arbitrary constructors**: any argument list, by value, shared pointer
//!   or reference, through [`Singular::Args`]
//! - **Factory or global**: pass the returned handle to dependents, or create
//!   with global access and retrieve it anywhere with `get`
//! - **Policy-based concurrency**: [`Unsynchronized`] for single-threaded use,
//!   [`Exclusive`] for a per-type lock that linearizes every operation
//! - **Typed errors**: every precondition violation is a
//!   [`SingularityError`], and a refused call changes nothing
//! - **Observability**: lifecycle observers, per-type counters and a registry
//!   report
//!
//! ## Quick Start
//!
//! ```rust
//! use singularity::{ConstructToken, Exclusive, Singular, Singularity, SingularityError};
//! use std::sync::Arc;
//!
//! pub struct Settings {
//!     verbose: bool,
//! }
//!
//! pub struct Engine {
//!     workers: usize,
//!     settings: Arc<Settings>,
//! }
//!
//! impl Singular for Engine {
//!     type Args = (usize, Arc<Settings>);
//!
//!     fn construct((workers, settings): Self::Args, _: ConstructToken) -> Self {
//!         Engine { workers, settings }
//!     }
//! }
//!
//! let settings = Arc::new(Settings { verbose: true });
//! let engine = Singularity::<Engine, Exclusive>::create_with_global_access((4, settings)).unwrap();
//! assert_eq!(engine.borrow().unwrap().workers, 4);
//!
//! // A second engine is refused while the first one is live
//! let second = Singularity::<Engine, Exclusive>::create((8, Arc::new(Settings { verbose: false })));
//! assert!(matches!(second, Err(SingularityError::AlreadyCreated(_))));
//!
//! // Code that was never handed the engine can retrieve it
//! let same = Singularity::<Engine, Exclusive>::get().unwrap();
//! assert!(same.with(|engine| engine.settings.verbose).unwrap());
//!
//! Singularity::<Engine, Exclusive>::destroy().unwrap();
//! assert!(!engine.is_live());
//! assert!(matches!(
//!     Singularity::<Engine, Exclusive>::get(),
//!     Err(SingularityError::NotCreated(_))
//! ));
//! ```
//!
//! ## Factory Usage
//!
//! ```rust
//! use singularity::{ConstructToken, Instance, Singular, Singularity, SingularityError};
//!
//! struct Connection { port: u16 }
//!
//! impl Singular for Connection {
//!     type Args = u16;
//!     fn construct(port: u16, _: ConstructToken) -> Self {
//!         Connection { port }
//!     }
//! }
//!
//! struct Session { conn: Instance<Connection> }
//!
//! let conn = Singularity::<Connection>::create(5432).unwrap();
//! let session = Session { conn: conn.clone() };
//! assert_eq!(session.conn.borrow().unwrap().port, 5432);
//!
//! // No global access was granted
//! assert!(matches!(
//!     Singularity::<Connection>::get(),
//!     Err(SingularityError::AccessNotEnabled(_))
//! ));
//!
//! Singularity::<Connection>::destroy().unwrap();
//! ```

// Module declarations
pub mod access;
pub mod diagnostics;
pub mod error;
pub mod instance;
pub mod key;
pub mod metrics;
pub mod observer;
pub mod policy;
pub mod traits;

// Internal modules
mod internal;
mod registry;
mod singularity;

// Re-export core types
pub use access::Access;
pub use diagnostics::{RegistryReport, SlotReport};
pub use error::{SingularityError, SingularityResult};
pub use instance::{Instance, InstanceRef};
pub use key::{key_of_type, SlotKey};
pub use metrics::{MetricsSnapshot, SlotMetrics};
pub use observer::{add_observer, clear_observers, has_observers, LoggingObserver, SingularityObserver};
pub use policy::{ConcurrencyPolicy, Exclusive, Unsynchronized};
pub use singularity::Singularity;
pub use traits::{ConstructToken, Singular};

#[cfg(feature = "tracing")]
pub use observer::TracingObserver;

/// Controller for `T` under the [`Exclusive`] policy.
pub type ExclusiveSingularity<T> = Singularity<T, Exclusive>;
