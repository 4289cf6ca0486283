//! Internal implementation details.

pub(crate) mod slot;
pub(crate) mod sync;

pub(crate) use slot::{Live, Slot};
