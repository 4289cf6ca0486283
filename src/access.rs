//! Access mode definitions.

/// Access mode chosen when an instance is created
///
/// Decides whether callers that were never handed the instance may retrieve
/// it through [`Singularity::get`](crate::Singularity::get). The mode is
/// picked per creation by the entry point used, not per type.
///
/// # Examples
///
/// ```rust
/// use singularity::{Access, ConstructToken, Singular, Singularity, SingularityError};
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
/// // Local: factory usage, the handle is the only way in
/// let horizon = Singularity::<Horizon>::create(7).unwrap();
/// assert_eq!(horizon.borrow().unwrap().radius, 7);
/// assert_eq!(Singularity::<Horizon>::access(), Some(Access::Local));
/// assert!(matches!(
///     Singularity::<Horizon>::get(),
///     Err(SingularityError::AccessNotEnabled(_))
/// ));
/// Singularity::<Horizon>::destroy().unwrap();
///
/// // Global: anyone naming the type can retrieve it
/// let horizon = Singularity::<Horizon>::create_with_global_access(9).unwrap();
/// assert_eq!(Singularity::<Horizon>::access(), Some(Access::Global));
/// let again = Singularity::<Horizon>::get().unwrap();
/// assert!(horizon.ptr_eq(&again));
/// Singularity::<Horizon>::destroy().unwrap();
///
/// assert_eq!(Singularity::<Horizon>::access(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Access {
    /// Retrieval through `get` is refused
    ///
    /// The instance is reachable only through the handle returned by
    /// `create`, which the caller passes to dependents explicitly.
    Local,
    /// Retrieval through `get` is permitted
    ///
    /// Set by `create_with_global_access` and cleared again by `destroy`.
    Global,
}

impl Access {
    /// True for [`Access::Global`].
    pub fn allows_get(self) -> bool {
        matches!(self, Access::Global)
    }
}
