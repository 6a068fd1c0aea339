//! Cycle invalidation via a shared generation counter.
//!
//! Every scan/config cycle snapshots the generation when it starts and checks
//! it again before acting on any resumed result.  `cancel_and_restart()` (or
//! an out-of-band [`CancelHandle::cancel`]) bumps the counter, so a cycle
//! that was suspended in a polling delay wakes up stale and aborts instead of
//! mutating state that now belongs to a newer cycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::application::error::ProvisioningError;

/// Clonable handle to the client's cycle generation.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    generation: Arc<AtomicU64>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates every cycle started before this call.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Begins a new cycle: returns a guard bound to the current generation.
    pub fn guard(&self) -> CycleGuard {
        CycleGuard {
            generation: Arc::clone(&self.generation),
            snapshot: self.generation.load(Ordering::SeqCst),
        }
    }
}

/// Per-cycle staleness check.
#[derive(Debug)]
pub struct CycleGuard {
    generation: Arc<AtomicU64>,
    snapshot: u64,
}

impl CycleGuard {
    /// `true` once a newer cycle has superseded this one.
    pub fn is_stale(&self) -> bool {
        self.generation.load(Ordering::SeqCst) != self.snapshot
    }

    /// Errors with [`ProvisioningError::Cancelled`] when stale; called before
    /// every exchange that follows a suspension point.
    pub fn check(&self) -> Result<(), ProvisioningError> {
        if self.is_stale() {
            Err(ProvisioningError::Cancelled)
        } else {
            Ok(())
        }
    }
}
