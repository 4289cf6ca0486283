/// Construction and teardown tests
///
/// Covers heterogeneous constructor arguments with their declared aliasing,
/// constructor side effects on refused creates and the dispose hook.

use singularity::{ConstructToken, Exclusive, Singular, Singularity, SingularityError};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

// ===== Heterogeneous arguments =====

#[derive(Debug)]
pub struct Event {
    fired: AtomicU32,
}

impl Event {
    pub const fn new() -> Self {
        Self { fired: AtomicU32::new(0) }
    }

    pub fn fire(&self) {
        self.fired.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> u32 {
        self.fired.load(Ordering::SeqCst)
    }
}

pub struct Horizon {
    by_value: Event,
    by_pointer: Arc<Event>,
    by_reference: &'static Event,
}

impl Singular for Horizon {
    type Args = (Event, Arc<Event>, &'static Event);

    fn construct((by_value, by_pointer, by_reference): Self::Args, _: ConstructToken) -> Self {
        Horizon { by_value, by_pointer, by_reference }
    }
}

static REFERENCED: Event = Event::new();

#[test]
fn test_arguments_keep_their_aliasing() {
    let by_value = Event::new();
    by_value.fire();
    let by_pointer = Arc::new(Event::new());

    let horizon = Singularity::<Horizon>::create_with_global_access((
        by_value,
        Arc::clone(&by_pointer),
        &REFERENCED,
    ))
    .unwrap();

    // Moved value: the instance owns it, mutations are private
    {
        let horizon = horizon.borrow().unwrap();
        assert_eq!(horizon.by_value.count(), 1);
        horizon.by_value.fire();
        assert_eq!(horizon.by_value.count(), 2);
    }

    // Shared pointer and reference alias the caller's objects
    by_pointer.fire();
    REFERENCED.fire();
    let retrieved = Singularity::<Horizon>::get().unwrap();
    {
        let retrieved = retrieved.borrow().unwrap();
        assert_eq!(retrieved.by_pointer.count(), 1);
        assert_eq!(retrieved.by_reference.count(), REFERENCED.count());
        assert!(Arc::ptr_eq(&retrieved.by_pointer, &by_pointer));
        assert!(std::ptr::eq(retrieved.by_reference, &REFERENCED));

        // And the other way around
        retrieved.by_pointer.fire();
    }
    assert_eq!(by_pointer.count(), 2);

    // Handles do not own the instance, only the controller does
    assert_eq!(Arc::strong_count(&by_pointer), 2);
    Singularity::<Horizon>::destroy().unwrap();

    // Destroy dropped the instance and with it its share of the pointer
    assert_eq!(Arc::strong_count(&by_pointer), 1);
    assert!(!horizon.is_live());
    assert!(!retrieved.is_live());
}

// ===== Constructor runs only on successful create =====

static GUARDED_BUILDS: AtomicU32 = AtomicU32::new(0);

struct Guarded;

impl Singular for Guarded {
    type Args = ();
    fn construct(_: (), _: ConstructToken) -> Self {
        GUARDED_BUILDS.fetch_add(1, Ordering::SeqCst);
        Guarded
    }
}

#[test]
fn test_refused_create_does_not_construct() {
    Singularity::<Guarded, Exclusive>::create(()).unwrap();
    assert_eq!(GUARDED_BUILDS.load(Ordering::SeqCst), 1);

    for _ in 0..5 {
        assert!(Singularity::<Guarded, Exclusive>::create(()).is_err());
        assert!(Singularity::<Guarded, Exclusive>::create_with_global_access(()).is_err());
    }
    assert_eq!(GUARDED_BUILDS.load(Ordering::SeqCst), 1);

    Singularity::<Guarded, Exclusive>::destroy().unwrap();
    Singularity::<Guarded, Exclusive>::create(()).unwrap();
    assert_eq!(GUARDED_BUILDS.load(Ordering::SeqCst), 2);
    Singularity::<Guarded, Exclusive>::destroy().unwrap();
}

// ===== Dispose hook =====

static DISPOSED: AtomicU32 = AtomicU32::new(0);
static DROPPED: AtomicU32 = AtomicU32::new(0);

struct Disposable {
    closed: AtomicBool,
}

impl Singular for Disposable {
    type Args = ();

    fn construct(_: (), _: ConstructToken) -> Self {
        Disposable { closed: AtomicBool::new(false) }
    }

    fn dispose(&self) {
        self.closed.store(true, Ordering::SeqCst);
        DISPOSED.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for Disposable {
    fn drop(&mut self) {
        DROPPED.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_dispose_runs_once_then_value_is_dropped() {
    let handle = Singularity::<Disposable>::create(()).unwrap();
    assert!(!handle.with(|d| d.closed.load(Ordering::SeqCst)).unwrap());

    Singularity::<Disposable>::destroy().unwrap();
    assert_eq!(DISPOSED.load(Ordering::SeqCst), 1);

    // Outstanding handles do not keep the value alive past destroy
    assert_eq!(DROPPED.load(Ordering::SeqCst), 1);
    assert!(!handle.is_live());
    drop(handle);
    assert_eq!(DROPPED.load(Ordering::SeqCst), 1);

    // A refused destroy disposes nothing
    assert!(Singularity::<Disposable>::destroy().is_err());
    assert_eq!(DISPOSED.load(Ordering::SeqCst), 1);

    // reset is a teardown too
    let second = Singularity::<Disposable>::create(()).unwrap();
    assert!(Singularity::<Disposable>::reset());
    assert!(!second.is_live());
    assert_eq!(DISPOSED.load(Ordering::SeqCst), 2);
    assert_eq!(DROPPED.load(Ordering::SeqCst), 2);
}

// ===== Private construction =====

mod sealed_service {
    use singularity::{ConstructToken, Singular};

    /// Fields are private; only the controller can build one
    pub struct Vault {
        secret: i64,
    }

    impl Vault {
        pub fn secret(&self) -> i64 {
            self.secret
        }
    }

    impl Singular for Vault {
        type Args = i64;
        fn construct(secret: i64, _: ConstructToken) -> Self {
            Vault { secret }
        }
    }
}

#[test]
fn test_private_type_created_only_through_controller() {
    use sealed_service::Vault;

    let vault = Singularity::<Vault>::create(42).unwrap();
    assert_eq!(vault.borrow().unwrap().secret(), 42);
    Singularity::<Vault>::destroy().unwrap();
}

// ===== Constructor arguments borrowed from the caller =====

static LEDGER: Mutex<Vec<String>> = Mutex::new(Vec::new());
static TOTAL: AtomicI64 = AtomicI64::new(0);

struct Accountant {
    ledger: &'static Mutex<Vec<String>>,
    total: &'static AtomicI64,
}

impl Accountant {
    fn book(&self, entry: &str, amount: i64) {
        self.ledger.lock().unwrap().push(entry.to_string());
        self.total.fetch_add(amount, Ordering::SeqCst);
    }
}

impl Singular for Accountant {
    type Args = (&'static Mutex<Vec<String>>, &'static AtomicI64);

    fn construct((ledger, total): Self::Args, _: ConstructToken) -> Self {
        Accountant { ledger, total }
    }
}

#[test]
fn test_effects_through_instance_visible_to_caller() {
    let accountant =
        Singularity::<Accountant, Exclusive>::create_with_global_access((&LEDGER, &TOTAL)).unwrap();
    accountant.with(|a| a.book("rent", -1200)).unwrap();
    Singularity::<Accountant, Exclusive>::get()
        .unwrap()
        .with(|a| a.book("salary", 3000))
        .unwrap();

    assert_eq!(*LEDGER.lock().unwrap(), vec!["rent".to_string(), "salary".to_string()]);
    assert_eq!(TOTAL.load(Ordering::SeqCst), 1800);

    Singularity::<Accountant, Exclusive>::destroy().unwrap();
    assert!(matches!(
        Singularity::<Accountant, Exclusive>::get(),
        Err(SingularityError::NotCreated(_))
    ));
}
