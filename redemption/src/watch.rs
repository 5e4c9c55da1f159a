//! Observer interfaces for scan and role events.
//!
//! The original system propagated role changes and scan activity through
//! live store listeners. Here that becomes an explicit subscription
//! interface: dashboards, notifiers and caches implement an observer trait
//! and subscribe to a [`Watchers`] registry; the engine and directory
//! notify after each committed change.
//!
//! Callbacks run synchronously on the notifying task and must be cheap;
//! anything slow should hand off to its own channel or task.

use std::sync::{Arc, RwLock};

use crate::types::{Role, StaffUser, VerificationScan};

/// Receives every scan record as it is appended.
pub trait ScanObserver: Send + Sync {
    /// Called once per scan, success or failure, after the decision is
    /// committed.
    fn scan_recorded(&self, scan: &VerificationScan);
}

/// Receives role elevations from the verifier directory.
pub trait RoleObserver: Send + Sync {
    /// Called once per actual elevation (idempotent re-assignments do not
    /// re-notify).
    fn role_elevated(&self, user: &StaffUser, previous: Role);
}

/// A shared registry of observers.
pub struct Watchers<T: ?Sized> {
    observers: Arc<RwLock<Vec<Arc<T>>>>,
}

impl<T: ?Sized> Watchers<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register an observer. There is no unsubscribe; observers live as
    /// long as the registry.
    pub fn subscribe(&self, observer: Arc<T>) {
        if let Ok(mut observers) = self.observers.write() {
            observers.push(observer);
        }
    }

    /// Invoke `f` for every registered observer.
    ///
    /// A poisoned registry skips notification rather than failing the
    /// operation that triggered it.
    pub fn notify(&self, f: impl Fn(&T)) {
        match self.observers.read() {
            Ok(observers) => {
                for observer in observers.iter() {
                    f(observer);
                }
            }
            Err(_) => {
                tracing::warn!("observer registry poisoned, skipping notification");
            }
        }
    }
}

impl<T: ?Sized> Default for Watchers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Watchers<T> {
    fn clone(&self) -> Self {
        Self {
            observers: Arc::clone(&self.observers),
        }
    }
}
