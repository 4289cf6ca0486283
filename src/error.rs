//! Error types for singularity lifecycle operations.

use std::fmt;

/// Lifecycle errors
///
/// Every variant is a violated precondition of one lifecycle operation and
/// carries the managed type's name for diagnostics. A call that returns one of
/// these errors has not changed the state of the managed type.
///
/// # Examples
///
/// ```rust
/// use singularity::{ConstructToken, Singular, Singularity, SingularityError};
///
/// struct Horizon;
///
/// impl Singular for Horizon {
///     type Args = ();
///     fn construct(_: (), _: ConstructToken) -> Self {
///         Horizon
///     }
/// }
///
/// match Singularity::<Horizon>::destroy() {
///     Err(SingularityError::AlreadyDestroyed(type_name)) => {
///         assert!(type_name.ends_with("Horizon"));
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use singularity::SingularityError;
///
/// let already_created = SingularityError::AlreadyCreated("Horizon");
/// let not_created = SingularityError::NotCreated("Horizon");
///
/// // All errors implement Display
/// println!("Error: {}", already_created);
/// println!("Error: {}", not_created);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingularityError {
    /// `create` called while an instance is live
    AlreadyCreated(&'static str),
    /// `destroy` called while no instance is live
    AlreadyDestroyed(&'static str),
    /// `get` called while no instance is live
    NotCreated(&'static str),
    /// `get` called on an instance created without global access
    AccessNotEnabled(&'static str),
}

impl SingularityError {
    /// Name of the managed type the failed operation targeted.
    pub fn type_name(&self) -> &'static str {
        match self {
            SingularityError::AlreadyCreated(name)
            | SingularityError::AlreadyDestroyed(name)
            | SingularityError::NotCreated(name)
            | SingularityError::AccessNotEnabled(name) => name,
        }
    }
}

impl fmt::Display for SingularityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingularityError::AlreadyCreated(name) => write!(f, "Singularity already created: {}", name),
            SingularityError::AlreadyDestroyed(name) => write!(f, "Singularity already destroyed: {}", name),
            SingularityError::NotCreated(name) => write!(f, "Singularity not created: {}", name),
            SingularityError::AccessNotEnabled(name) => write!(f, "Global access not enabled for: {}", name),
        }
    }
}

impl std::error::Error for SingularityError {}

/// Result type for lifecycle operations
///
/// A convenience alias for `Result<T, SingularityError>`.
///
/// # Examples
///
/// ```rust
/// use singularity::{SingularityError, SingularityResult};
///
/// fn shutdown() -> SingularityResult<()> {
///     Err(SingularityError::AlreadyDestroyed("Horizon"))
/// }
///
/// assert!(shutdown().is_err());
/// ```
pub type SingularityResult<T> = Result<T, SingularityError>;
