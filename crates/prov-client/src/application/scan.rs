//! Scan orchestrator: drives one complete scan cycle.
//!
//! A cycle is status-first: before asking the device to scan, it queries the
//! scan status.  When several client instances are provisioning the same
//! device at once (two browser-style clients racing), the first one to reach
//! the device triggers the scan and the rest converge on its results instead
//! of re-triggering redundant scans.  The check is advisory, not a lock -
//! two clients that both observe "no scan yet" may still race, and the
//! device's last-writer-wins behavior is assumed.
//!
//! ```text
//! query status ─┬─ finished, count > 0 ──────────────► retrieve windows
//!               ├─ finished, count == 0 ─ scan start ─► re-query
//!               └─ in progress ─ sleep 1 s ───────────► re-query
//! ```

use prov_core::{
    decode_scan, encode_scan, ScanEntry, ScanResultRequest, ScanResultResponse, ScanStartCommand,
    ScanStatusResponse, WifiScanPayload, STATUS_SUCCESS,
};
use tokio::time;
use tracing::{debug, info};

use crate::application::cancel::CycleGuard;
use crate::application::error::ProvisioningError;
use crate::application::transport::{Endpoint, ProvTransport};
use crate::domain::config::ProvisionerConfig;

/// Result of one completed scan cycle.
///
/// `entries` holds the filtered results in device order; entries at or below
/// the RSSI threshold were dropped and counted in `discarded`, so
/// `entries.len() == reported_count - discarded` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub entries: Vec<ScanEntry>,
    /// Result count reported by the device before filtering.
    pub reported_count: u16,
    /// Entries dropped by the signal threshold.
    pub discarded: u16,
}

impl ScanOutcome {
    /// Number of entries available for display and pagination.
    pub fn display_count(&self) -> usize {
        self.entries.len()
    }
}

/// Drives one scan cycle; owns its cycle state for exactly that long.
pub struct ScanOrchestrator<'a> {
    transport: &'a dyn ProvTransport,
    config: &'a ProvisionerConfig,
    guard: CycleGuard,
}

impl<'a> ScanOrchestrator<'a> {
    pub fn new(
        transport: &'a dyn ProvTransport,
        config: &'a ProvisionerConfig,
        guard: CycleGuard,
    ) -> Self {
        Self {
            transport,
            config,
            guard,
        }
    }

    /// Runs the cycle to completion and returns the filtered result set.
    ///
    /// Polls status indefinitely while a scan is in progress: the only bound
    /// is each poll's own transport timeout.  Any decode error or unexpected
    /// status aborts the cycle; whether to retry is the caller's decision.
    pub async fn run(&self) -> Result<ScanOutcome, ProvisioningError> {
        let mut status = self.query_status().await?;

        if status.scan_finished && status.result_count == 0 {
            // Nobody has scanned yet; this instance triggers it.
            info!("no scan requested yet, starting one");
            self.start_scan().await?;
            status = self.query_status().await?;
        }

        while !status.scan_finished {
            debug!(
                "scan in progress, checking again in {:?}",
                self.config.timing.poll_interval()
            );
            time::sleep(self.config.timing.poll_interval()).await;
            self.guard.check()?;
            status = self.query_status().await?;
        }

        info!("scan finished with {} networks", status.result_count);
        self.retrieve_all(status.result_count).await
    }

    /// Issues the scan-start command with the configured parameters.
    ///
    /// The command is blocking: the device answers once the scan completes,
    /// which is why the generous per-request timeout applies here too.
    async fn start_scan(&self) -> Result<(), ProvisioningError> {
        let command = WifiScanPayload::CmdScanStart(ScanStartCommand {
            blocking: true,
            passive: self.config.scan.passive,
            group_channels: self.config.scan.group_channels,
            period_ms: self.config.scan.period_ms,
        });
        match self.exchange(&command, "scan start").await? {
            WifiScanPayload::RespScanStart { status } if status == STATUS_SUCCESS => Ok(()),
            WifiScanPayload::RespScanStart { status } => Err(ProvisioningError::DeviceStatus {
                context: "scan start",
                status,
            }),
            _ => Err(ProvisioningError::UnexpectedResponse {
                context: "scan start",
            }),
        }
    }

    async fn query_status(&self) -> Result<ScanStatusResponse, ProvisioningError> {
        match self
            .exchange(&WifiScanPayload::CmdScanStatus, "scan status")
            .await?
        {
            WifiScanPayload::RespScanStatus(s) if s.status == STATUS_SUCCESS => Ok(s),
            WifiScanPayload::RespScanStatus(s) => Err(ProvisioningError::DeviceStatus {
                context: "scan status",
                status: s.status,
            }),
            _ => Err(ProvisioningError::UnexpectedResponse {
                context: "scan status",
            }),
        }
    }

    /// Retrieves all `total` results in fixed-size windows, applying the
    /// signal filter as entries arrive.
    ///
    /// The cursor advances by the *requested* count each round, terminating
    /// exactly when it reaches the device-reported total.
    async fn retrieve_all(&self, total: u16) -> Result<ScanOutcome, ProvisioningError> {
        let threshold = self.config.scan.rssi_threshold_dbm;
        let mut entries = Vec::with_capacity(total as usize);
        let mut discarded = 0u16;
        let mut next_index = 0u16;

        while next_index < total {
            self.guard.check()?;
            let count = self.config.scan.results_per_request.min(total - next_index);
            let window = self.fetch_window(next_index, count).await?;
            next_index += count;

            for entry in window.entries {
                if entry.rssi > threshold {
                    entries.push(entry);
                } else {
                    debug!(rssi = entry.rssi, "discarded entry below signal threshold");
                    discarded += 1;
                }
            }
        }

        Ok(ScanOutcome {
            entries,
            reported_count: total,
            discarded,
        })
    }

    async fn fetch_window(
        &self,
        start_index: u16,
        count: u16,
    ) -> Result<ScanResultResponse, ProvisioningError> {
        let command = WifiScanPayload::CmdScanResult(ScanResultRequest { start_index, count });
        match self.exchange(&command, "scan results").await? {
            WifiScanPayload::RespScanResult(r) if r.status == STATUS_SUCCESS => Ok(r),
            WifiScanPayload::RespScanResult(r) => Err(ProvisioningError::DeviceStatus {
                context: "scan results",
                status: r.status,
            }),
            _ => Err(ProvisioningError::UnexpectedResponse {
                context: "scan results",
            }),
        }
    }

    /// Encodes, exchanges, and decodes one scan-endpoint round trip.
    async fn exchange(
        &self,
        command: &WifiScanPayload,
        context: &'static str,
    ) -> Result<WifiScanPayload, ProvisioningError> {
        let body = encode_scan(command).map_err(|e| ProvisioningError::protocol(context, e))?;
        let response = self
            .transport
            .exchange(Endpoint::Scan, body, self.config.timing.request_timeout())
            .await?;
        decode_scan(&response).map_err(|e| ProvisioningError::protocol(context, e))
    }
}
