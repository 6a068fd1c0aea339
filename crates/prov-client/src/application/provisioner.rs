//! The provisioning state machine: the only surface callers may drive.
//!
//! One `Provisioner` is one client instance.  It is the sole owner and
//! mutator of [`ProvisioningPhase`], it sequences the session manager and the
//! two orchestrators, and it enforces the phase gates.  Exchanges are
//! strictly sequential: a method borrows the machine mutably for its whole
//! cycle, so no two protocol exchanges are ever in flight at once from one
//! instance.
//!
//! # Cancellation
//!
//! `cancel_and_restart()` bumps the shared generation counter and drops the
//! phase back to `Uninitialized`.  A cycle that was suspended in a polling
//! delay (for example, driven from another task via a shared handle) wakes
//! up, finds its [`CycleGuard`] stale, and aborts with `Cancelled` instead of
//! mutating state that now belongs to a newer cycle.  [`CancelHandle`] gives
//! out-of-band callers the same lever.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::cancel::CancelHandle;
use crate::application::config::{ConfigOrchestrator, ConnectionOutcome};
use crate::application::error::ProvisioningError;
use crate::application::scan::{ScanOrchestrator, ScanOutcome};
use crate::application::session::SessionManager;
use crate::application::transport::ProvTransport;
use crate::domain::config::ProvisionerConfig;
use crate::domain::credentials::WifiCredentials;
use crate::domain::phase::ProvisioningPhase;

/// Top-level provisioning controller for one client instance.
pub struct Provisioner {
    transport: Arc<dyn ProvTransport>,
    config: ProvisionerConfig,
    phase: ProvisioningPhase,
    cancel: CancelHandle,
}

impl Provisioner {
    pub fn new(transport: Arc<dyn ProvTransport>, config: ProvisionerConfig) -> Self {
        Self {
            transport,
            config,
            phase: ProvisioningPhase::Uninitialized,
            cancel: CancelHandle::new(),
        }
    }

    /// Current lifecycle phase (read-only; only this machine mutates it).
    pub fn phase(&self) -> ProvisioningPhase {
        self.phase
    }

    /// Handle for invalidating the running cycle from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Establishes the session, then runs the initial scan cycle.
    ///
    /// The scan is status-first, so a second instance started against the
    /// same device converges on the first one's scan instead of triggering
    /// another.
    ///
    /// # Errors
    ///
    /// A session failure leaves the phase at `Uninitialized`; scan failures
    /// follow the cycle failure rules (see [`Self::rescan`]).
    pub async fn start(&mut self) -> Result<ScanOutcome, ProvisioningError> {
        self.phase = ProvisioningPhase::Initializing;
        let session = SessionManager::new(self.transport.as_ref(), &self.config);
        if let Err(e) = session.establish().await {
            warn!(error = %e, "session negotiation failed");
            self.phase = ProvisioningPhase::Uninitialized;
            return Err(e);
        }
        self.phase = ProvisioningPhase::Ready;
        self.run_scan_cycle().await
    }

    /// Runs a fresh scan cycle; requires an established session.
    ///
    /// # Errors
    ///
    /// Rejects with [`ProvisioningError::NotReady`] before `Ready`.  On cycle
    /// failure the phase returns to `Ready` (session presumed intact), except
    /// for transport timeouts and cancellation, which drop it to
    /// `Uninitialized`.
    pub async fn rescan(&mut self) -> Result<ScanOutcome, ProvisioningError> {
        self.require_ready()?;
        self.run_scan_cycle().await
    }

    /// Validates and submits credentials, driving the attempt to its terminal
    /// outcome.
    ///
    /// Validation happens synchronously, before any network activity.  A
    /// device-reported connection failure is returned as
    /// [`ConnectionOutcome::Failed`]: the device has already been reset, the
    /// phase is back at `Ready`, and the caller decides whether to resubmit.
    /// After [`ConnectionOutcome::Connected`] the provisioning manager has
    /// been shut down on the device, so the phase drops to `Uninitialized`.
    ///
    /// # Errors
    ///
    /// Phase-gate and credential violations are synchronous; protocol and
    /// transport failures follow the cycle failure rules.
    pub async fn submit(
        &mut self,
        ssid: &str,
        passphrase: &str,
    ) -> Result<ConnectionOutcome, ProvisioningError> {
        self.require_ready()?;
        let credentials = WifiCredentials::new(ssid, passphrase)?;

        self.phase = ProvisioningPhase::Configuring;
        let guard = self.cancel.guard();
        let orchestrator = ConfigOrchestrator::new(self.transport.as_ref(), &self.config, guard);

        if let Err(e) = orchestrator.submit_and_apply(&credentials).await {
            self.phase = self.phase_after_cycle_failure(&e);
            return Err(e);
        }

        self.phase = ProvisioningPhase::Verifying;
        match orchestrator.await_outcome().await {
            Ok(outcome @ ConnectionOutcome::Connected { .. }) => {
                // The device-side manager is gone; a new session is needed
                // for any further work.
                self.phase = ProvisioningPhase::Uninitialized;
                Ok(outcome)
            }
            Ok(outcome @ ConnectionOutcome::Failed { .. }) => {
                self.phase = ProvisioningPhase::Ready;
                Ok(outcome)
            }
            Err(e) => {
                self.phase = self.phase_after_cycle_failure(&e);
                Err(e)
            }
        }
    }

    /// Invalidates any in-flight cycle and drops back to `Uninitialized`.
    ///
    /// A pending scheduled resumption of the old cycle will find its guard
    /// stale and abort without touching newer state.  Call [`Self::start`] to
    /// begin again.
    pub fn cancel_and_restart(&mut self) {
        debug!("cancelling current cycle");
        self.cancel.cancel();
        self.phase = ProvisioningPhase::Uninitialized;
    }

    async fn run_scan_cycle(&mut self) -> Result<ScanOutcome, ProvisioningError> {
        self.phase = ProvisioningPhase::Scanning;
        let guard = self.cancel.guard();
        let orchestrator = ScanOrchestrator::new(self.transport.as_ref(), &self.config, guard);
        match orchestrator.run().await {
            Ok(outcome) => {
                self.phase = ProvisioningPhase::Ready;
                Ok(outcome)
            }
            Err(e) => {
                self.phase = self.phase_after_cycle_failure(&e);
                Err(e)
            }
        }
    }

    fn require_ready(&self) -> Result<(), ProvisioningError> {
        if self.phase.is_ready() {
            Ok(())
        } else {
            Err(ProvisioningError::NotReady { phase: self.phase })
        }
    }

    /// Where a failed scan/config cycle leaves the machine.
    ///
    /// A transport timeout means the endpoint is probably unreachable, so the
    /// session is written off.  Protocol and device-status errors leave the
    /// session presumed intact.  Cancellation was already accompanied by a
    /// reset to `Uninitialized`.
    fn phase_after_cycle_failure(&self, error: &ProvisioningError) -> ProvisioningPhase {
        match error {
            ProvisioningError::Cancelled => ProvisioningPhase::Uninitialized,
            e if e.is_timeout() => ProvisioningPhase::Uninitialized,
            _ => ProvisioningPhase::Ready,
        }
    }
}
