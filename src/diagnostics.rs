//! Registry inspection.
//!
//! A [`RegistryReport`] lists every managed type the process has touched,
//! with its current state and lifecycle counters. Reports are point-in-time
//! copies taken slot by slot; they never hold a managed type's lock.

use std::fmt;

use crate::access::Access;
use crate::internal::Slot;
use crate::key::key_of_type;
use crate::metrics::MetricsSnapshot;
use crate::registry::SlotRegistry;

/// State of one managed type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlotReport {
    /// The managed type's name
    pub type_name: &'static str,
    /// Whether an instance is live
    pub created: bool,
    /// Access mode of the live instance
    pub access: Option<Access>,
    /// Lifecycle counters
    pub metrics: MetricsSnapshot,
}

impl SlotReport {
    fn of(slot: &Slot) -> Self {
        let access = slot.access();
        Self {
            type_name: slot.key().display_name(),
            created: access.is_some(),
            access,
            metrics: slot.metrics().snapshot(),
        }
    }
}

/// State of every managed type known to the registry.
///
/// # Examples
///
/// ```
/// use singularity::{diagnostics, ConstructToken, Singular, Singularity};
///
/// struct Telemetry;
///
/// impl Singular for Telemetry {
///     type Args = ();
///     fn construct(_: (), _: ConstructToken) -> Self {
///         Telemetry
///     }
/// }
///
/// let _telemetry = Singularity::<Telemetry>::create_with_global_access(()).unwrap();
///
/// let report = diagnostics::report();
/// let entry = report.find("Telemetry").unwrap();
/// assert!(entry.created);
/// assert_eq!(entry.metrics.created, 1);
/// println!("{}", report);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RegistryReport {
    /// One entry per registered slot, ordered by type name
    pub slots: Vec<SlotReport>,
}

impl RegistryReport {
    /// Number of managed types with a live instance.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.created).count()
    }

    /// Entry whose type name ends with `suffix`.
    ///
    /// Type names are fully qualified, so a bare type name works as suffix.
    pub fn find(&self, suffix: &str) -> Option<&SlotReport> {
        self.slots.iter().find(|slot| slot.type_name.ends_with(suffix))
    }

    /// Serialize the report as pretty-printed JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RegistryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Singularity registry: {} types, {} live", self.slots.len(), self.live_count())?;
        for slot in &self.slots {
            let state = match slot.access {
                Some(Access::Global) => "live (global)",
                Some(Access::Local) => "live",
                None => "empty",
            };
            writeln!(
                f,
                "  {} [{}] created={} destroyed={} retrieved={} rejected={}",
                slot.type_name,
                state,
                slot.metrics.created,
                slot.metrics.destroyed,
                slot.metrics.retrieved,
                slot.metrics.rejections(),
            )?;
        }
        Ok(())
    }
}

/// Report on every managed type touched so far.
pub fn report() -> RegistryReport {
    RegistryReport {
        slots: SlotRegistry::global().slots().into_iter().map(SlotReport::of).collect(),
    }
}

/// Report on one managed type, or `None` if no operation has named it yet.
///
/// Unlike the lifecycle operations, this never registers a slot.
pub fn slot_report<T: 'static>() -> Option<SlotReport> {
    SlotRegistry::global().find(&key_of_type::<T>()).map(SlotReport::of)
}

/// Number of managed types touched so far.
pub fn registered_types() -> usize {
    SlotRegistry::global().len()
}
