//! Client configuration types.
//!
//! [`ProvisionerConfig`] is the single source of truth for all tuning
//! constants.  The defaults are the values proven on real devices; a TOML
//! file can override any subset of them (every field falls back to its
//! default when absent, so partial files and older files keep working).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// All runtime configuration for one provisioning client instance.
///
/// Build it once at startup (defaults, or defaults + TOML overrides) and pass
/// a reference to the orchestrators; nothing reads ambient global state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProvisionerConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

impl ProvisionerConfig {
    /// Parses a TOML override file.
    ///
    /// # Errors
    ///
    /// Returns the TOML parse error unchanged; absent fields are not errors.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Timeouts and polling cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Timeout for the one-shot session negotiation.  Short on purpose: a
    /// session that does not answer promptly usually means the endpoint is
    /// unreachable and the operator should intervene.
    #[serde(default = "default_session_timeout_ms")]
    pub session_timeout_ms: u64,

    /// Per-exchange timeout for everything after the session.  Generous,
    /// because a blocking scan-start answers only once the scan completes.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Delay between status polls, for both scan completion and connection
    /// verification.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Grace period between applying credentials and the first status check,
    /// giving the device's station interface time to attempt association.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl TimingConfig {
    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.session_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            session_timeout_ms: default_session_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

/// Scan parameters and result handling.
///
/// The scan parameters trade off result completeness, total scan duration,
/// and the risk of the device dropping the station that asked for the scan
/// while it hops channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// `true` = passive scan (listen only); `false` = active probing.
    #[serde(default)]
    pub passive: bool,

    /// Channels scanned per burst before the device pauses to keep its soft
    /// AP beaconing.
    #[serde(default = "default_group_channels")]
    pub group_channels: u8,

    /// Dwell time per channel in milliseconds.
    #[serde(default = "default_period_ms")]
    pub period_ms: u16,

    /// Result entries requested per retrieval window.
    #[serde(default = "default_results_per_request")]
    pub results_per_request: u16,

    /// Result entries shown per display page.
    #[serde(default = "default_results_per_page")]
    pub results_per_page: usize,

    /// Entries at or below this signal strength are discarded.
    #[serde(default = "default_rssi_threshold_dbm")]
    pub rssi_threshold_dbm: i8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            passive: false,
            group_channels: default_group_channels(),
            period_ms: default_period_ms(),
            results_per_request: default_results_per_request(),
            results_per_page: default_results_per_page(),
            rssi_threshold_dbm: default_rssi_threshold_dbm(),
        }
    }
}

// ── Serde default functions ───────────────────────────────────────────────────

fn default_session_timeout_ms() -> u64 {
    4_000
}

fn default_request_timeout_ms() -> u64 {
    13_000
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_settle_delay_ms() -> u64 {
    5_000
}

fn default_group_channels() -> u8 {
    3
}

fn default_period_ms() -> u16 {
    150
}

fn default_results_per_request() -> u16 {
    5
}

fn default_results_per_page() -> usize {
    5
}

fn default_rssi_threshold_dbm() -> i8 {
    -90
}

// ── Tests ─────────────────────────────────────────────────────────────────────
