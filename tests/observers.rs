/// Observer tests
///
/// The observer list is process-wide, so every test here is `#[serial]` and
/// clears it before returning.

use serial_test::serial;
use singularity::{
    add_observer, clear_observers, has_observers, Access, ConstructToken, Exclusive,
    LoggingObserver, Singular, Singularity, SingularityError, SingularityObserver, SlotKey,
};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Created(&'static str, Access),
    Destroyed(&'static str),
    Retrieved(&'static str),
    Rejected(SingularityError),
}

/// Records events, optionally only those of one managed type.
#[derive(Default)]
struct RecordingObserver {
    only: Option<&'static str>,
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    fn for_type<T: 'static>() -> Self {
        Self {
            only: Some(std::any::type_name::<T>()),
            events: Mutex::new(Vec::new()),
        }
    }

    fn wants(&self, key: &SlotKey) -> bool {
        self.only.map_or(true, |name| name == key.display_name())
    }

    fn push(&self, key: &SlotKey, event: Event) {
        if self.wants(key) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl SingularityObserver for RecordingObserver {
    fn created(&self, key: &SlotKey, access: Access) {
        self.push(key, Event::Created(key.display_name(), access));
    }

    fn destroyed(&self, key: &SlotKey) {
        self.push(key, Event::Destroyed(key.display_name()));
    }

    fn retrieved(&self, key: &SlotKey) {
        self.push(key, Event::Retrieved(key.display_name()));
    }

    fn rejected(&self, key: &SlotKey, error: &SingularityError) {
        self.push(key, Event::Rejected(error.clone()));
    }
}

macro_rules! managed {
    ($name:ident) => {
        struct $name;

        impl Singular for $name {
            type Args = ();
            fn construct(_: (), _: ConstructToken) -> Self {
                $name
            }
        }
    };
}

managed!(Sequenced);
managed!(Refused);
managed!(Cleared);
managed!(Logged);
managed!(Alternating);

#[test]
#[serial]
fn test_events_follow_operation_order() {
    let observer = Arc::new(RecordingObserver::for_type::<Sequenced>());
    add_observer(observer.clone());
    let name = std::any::type_name::<Sequenced>();

    Singularity::<Sequenced>::create_with_global_access(()).unwrap();
    Singularity::<Sequenced>::get().unwrap();
    Singularity::<Sequenced>::destroy().unwrap();
    Singularity::<Sequenced>::create(()).unwrap();
    Singularity::<Sequenced>::destroy().unwrap();

    assert_eq!(
        observer.events(),
        vec![
            Event::Created(name, Access::Global),
            Event::Retrieved(name),
            Event::Destroyed(name),
            Event::Created(name, Access::Local),
            Event::Destroyed(name),
        ]
    );

    clear_observers();
}

#[test]
#[serial]
fn test_refusals_carry_the_returned_error() {
    let observer = Arc::new(RecordingObserver::for_type::<Refused>());
    add_observer(observer.clone());

    let not_created = Singularity::<Refused>::get().unwrap_err();
    let already_destroyed = Singularity::<Refused>::destroy().unwrap_err();
    Singularity::<Refused>::create(()).unwrap();
    let access_not_enabled = Singularity::<Refused>::get().unwrap_err();
    let already_created = Singularity::<Refused>::create(()).unwrap_err();
    Singularity::<Refused>::destroy().unwrap();

    let rejected: Vec<_> = observer
        .events()
        .into_iter()
        .filter_map(|event| match event {
            Event::Rejected(error) => Some(error),
            _ => None,
        })
        .collect();
    assert_eq!(rejected, vec![not_created, already_destroyed, access_not_enabled, already_created]);

    clear_observers();
}

#[test]
#[serial]
fn test_clear_observers_stops_delivery() {
    let observer = Arc::new(RecordingObserver::for_type::<Cleared>());
    add_observer(observer.clone());
    assert!(has_observers());

    Singularity::<Cleared>::create(()).unwrap();
    clear_observers();
    assert!(!has_observers());
    Singularity::<Cleared>::destroy().unwrap();

    assert_eq!(observer.events().len(), 1);
}

#[test]
#[serial]
fn test_logging_observer_smoke() {
    add_observer(Arc::new(LoggingObserver::with_prefix("[test]").with_retrievals()));
    add_observer(Arc::new(LoggingObserver::default()));

    Singularity::<Logged>::create_with_global_access(()).unwrap();
    Singularity::<Logged>::get().unwrap();
    assert!(Singularity::<Logged>::create(()).is_err());
    Singularity::<Logged>::destroy().unwrap();

    clear_observers();
}

/// Tracks the live count from the event stream alone.
struct LiveCounter {
    live: AtomicI64,
    violated: AtomicBool,
}

impl SingularityObserver for LiveCounter {
    fn created(&self, key: &SlotKey, _access: Access) {
        if key.display_name() == std::any::type_name::<Alternating>()
            && self.live.fetch_add(1, Ordering::SeqCst) != 0
        {
            self.violated.store(true, Ordering::SeqCst);
        }
    }

    fn destroyed(&self, key: &SlotKey) {
        if key.display_name() == std::any::type_name::<Alternating>()
            && self.live.fetch_sub(1, Ordering::SeqCst) != 1
        {
            self.violated.store(true, Ordering::SeqCst);
        }
    }

    fn rejected(&self, _key: &SlotKey, _error: &SingularityError) {}
}

#[test]
#[serial]
fn test_exclusive_events_alternate_under_contention() {
    type S = Singularity<Alternating, Exclusive>;

    let counter = Arc::new(LiveCounter {
        live: AtomicI64::new(0),
        violated: AtomicBool::new(false),
    });
    add_observer(counter.clone());

    let workers: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                for round in 0..250 {
                    if round % 2 == 0 {
                        let _ = S::create_with_global_access(());
                    } else {
                        let _ = S::destroy();
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    S::reset();
    clear_observers();

    // Events are delivered under the type's lock: created and destroyed
    // strictly alternate and the count never leaves {0, 1}
    assert!(!counter.violated.load(Ordering::SeqCst));
    assert_eq!(counter.live.load(Ordering::SeqCst), 0);
}
