//! Reference-counted busy indicator shared across concurrent operations.
//!
//! The indicator is an owned, cloneable handle rather than an ambient
//! global: hosts and tests construct independent instances, and all clones
//! of one instance share the same counter. Visibility is `count > 0`, so
//! any number of overlapping operations compose additively and the
//! indicator only clears when the last one settles, in any order.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::warn;

#[derive(Clone, Default)]
pub struct LoadingCoordinator {
    active: Arc<AtomicUsize>,
}

impl LoadingCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one tracked operation as started.
    pub fn begin(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    /// Mark one tracked operation as settled. Clamped at zero: an unpaired
    /// call is a caller bug and is logged instead of underflowing.
    pub fn end(&self) {
        let clamped = self
            .active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                count.checked_sub(1)
            })
            .is_err();
        if clamped {
            warn!("loading coordinator end() without a matching begin()");
        }
    }

    /// True while at least one tracked operation is outstanding.
    pub fn is_visible(&self) -> bool {
        self.active() > 0
    }

    /// Number of outstanding operations.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Begin now, end when the guard drops. The guard owns exactly one
    /// increment/decrement pair, so the pairing holds on every exit path,
    /// including cancellation of the owning future.
    pub fn begin_scoped(&self) -> LoaderGuard {
        self.begin();
        LoaderGuard {
            coordinator: self.clone(),
        }
    }

    /// Await `op` with the indicator held for its whole lifetime. Errors
    /// from `op` propagate unchanged; the matching `end` still runs.
    pub async fn run<T, Fut>(&self, op: Fut) -> T
    where
        Fut: Future<Output = T>,
    {
        let _guard = self.begin_scoped();
        op.await
    }
}

#[must_use = "dropping the guard settles the tracked operation immediately"]
pub struct LoaderGuard {
    coordinator: LoadingCoordinator,
}

impl Drop for LoaderGuard {
    fn drop(&mut self) {
        self.coordinator.end();
    }
}
