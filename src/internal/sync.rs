//! Lock backends selected by the `parking-lot` feature.
//!
//! Both backends expose the same minimal surface: `new`, `lock` for mutexes
//! and `read`/`write` for reader-writer locks, all infallible. The std backend
//! recovers from poisoning; every critical section in this crate either
//! guards `()` or commits its mutation in a single assignment after all
//! checks, so a panic can never leave guarded data half written.

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(not(feature = "parking-lot"))]
pub(crate) use self::std_backend::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(not(feature = "parking-lot"))]
mod std_backend {
    use std::sync::PoisonError;

    pub(crate) use std::sync::{RwLockReadGuard, RwLockWriteGuard};

    pub(crate) type MutexGuard<'a, T> = std::sync::MutexGuard<'a, T>;

    pub(crate) struct Mutex<T>(std::sync::Mutex<T>);

    impl<T> Mutex<T> {
        pub(crate) const fn new(value: T) -> Self {
            Self(std::sync::Mutex::new(value))
        }

        #[inline]
        pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
            self.0.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    pub(crate) struct RwLock<T>(std::sync::RwLock<T>);

    impl<T> RwLock<T> {
        pub(crate) const fn new(value: T) -> Self {
            Self(std::sync::RwLock::new(value))
        }

        #[inline]
        pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
            self.0.read().unwrap_or_else(PoisonError::into_inner)
        }

        #[inline]
        pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
            self.0.write().unwrap_or_else(PoisonError::into_inner)
        }
    }
}
