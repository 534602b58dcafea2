//! # Snapshot Cells
//!
//! State shared between the simulation context and the network context.
//!
//! ## The Problem
//!
//! ```text
//! Simulation context:  RELOAD the rule table, edit world bindings
//! Network context:     READ the rule table for every outgoing packet
//!
//! Without discipline:  half-old, half-new table → inconsistent renames
//! With a long lock:    reload stalls every packet send
//! ```
//!
//! ## The Solution: Immutable Snapshots
//!
//! ```text
//!             ┌───────────────────────────┐
//!             │  Snapshot<T>              │
//!             │   RwLock<Arc<T>>  ──────────────► version N   (readers hold)
//!             │   generation: N+1         │
//!             └─────────────┬─────────────┘
//!                           └─────────────────► version N+1 (new readers)
//! ```
//!
//! Readers clone the `Arc` under a read lock held for a pointer copy and then
//! work lock-free against that version until they drop it. Writers swap in a
//! whole new version. A reader that started before a swap finishes against
//! the version it loaded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

/// An atomically replaceable, immutable value.
#[derive(Debug)]
pub struct Snapshot<T> {
    /// The current version.
    current: RwLock<Arc<T>>,
    /// Serializes read-modify-write updates against each other.
    update_lock: Mutex<()>,
    /// Number of swaps since creation.
    generation: AtomicU64,
}

impl<T> Snapshot<T> {
    /// Creates a cell holding `value` as generation 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(value)),
            update_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the current version.
    ///
    /// The returned `Arc` stays valid, and unchanged, across later swaps.
    #[inline]
    #[must_use]
    pub fn load(&self) -> Arc<T> {
        Arc::clone(&self.current.read())
    }

    /// Replaces the current version, returning the previous one.
    pub fn store(&self, value: T) -> Arc<T> {
        let _serial = self.update_lock.lock();
        self.swap(Arc::new(value))
    }

    /// Builds a new version from the current one and swaps it in.
    ///
    /// Concurrent `update` calls are serialized so none of them is lost.
    pub fn update<F>(&self, build: F) -> Arc<T>
    where
        F: FnOnce(&T) -> T,
    {
        let _serial = self.update_lock.lock();
        let current = self.load();
        let next = Arc::new(build(&*current));
        self.swap(Arc::clone(&next));
        next
    }

    /// Like [`Snapshot::update`], but publishes nothing when `build` returns
    /// `None`.
    pub fn try_update<F>(&self, build: F) -> Option<Arc<T>>
    where
        F: FnOnce(&T) -> Option<T>,
    {
        let _serial = self.update_lock.lock();
        let current = self.load();
        let next = Arc::new(build(&*current)?);
        self.swap(Arc::clone(&next));
        Some(next)
    }

    /// Number of swaps performed so far.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn swap(&self, next: Arc<T>) -> Arc<T> {
        let previous = std::mem::replace(&mut *self.current.write(), next);
        self.generation.fetch_add(1, Ordering::AcqRel);
        previous
    }
}

impl<T: Default> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_loaded_version_survives_swap() {
        let cell = Snapshot::new(vec![1, 2, 3]);
        let before = cell.load();

        let previous = cell.store(vec![9]);

        assert_eq!(*before, vec![1, 2, 3]);
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(*cell.load(), vec![9]);
        assert_eq!(cell.generation(), 1);
    }

    #[test]
    fn test_update_builds_from_current() {
        let cell = Snapshot::new(10u32);
        let next = cell.update(|value| value + 5);
        assert_eq!(*next, 15);
        assert_eq!(*cell.load(), 15);
    }

    #[test]
    fn test_try_update_none_keeps_version() {
        let cell = Snapshot::new(10u32);
        let before = cell.load();

        assert!(cell.try_update(|_| None).is_none());
        assert!(Arc::ptr_eq(&before, &cell.load()));
        assert_eq!(cell.generation(), 0);

        assert_eq!(cell.try_update(|value| Some(value * 2)).as_deref(), Some(&20));
        assert_eq!(cell.generation(), 1);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let cell = Arc::new(Snapshot::new(0u64));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    for _ in 0..100 {
                        cell.update(|value| value + 1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*cell.load(), 800);
        assert_eq!(cell.generation(), 800);
    }
}
