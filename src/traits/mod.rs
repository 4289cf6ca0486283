//! Traits implemented by managed types.

pub mod singular;

pub use singular::{ConstructToken, Singular};
