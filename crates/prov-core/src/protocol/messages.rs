//! All SoftAP provisioning protocol message types.
//!
//! The device exposes three binary endpoints (session, scan, config), each
//! speaking its own small message family.  A family is a tagged union: every
//! payload starts with a one-byte message kind, and commands/responses are
//! interleaved in the same numbering so a response kind is always
//! `command kind + 1`.

use serde::{Deserialize, Serialize};

// ── Protocol constants ────────────────────────────────────────────────────────

/// The only security scheme this client speaks: sec0, i.e. no channel
/// security.  Security is implicit in the soft-AP association itself.
pub const SECURITY_VERSION_0: u8 = 0;

/// Device-level status code meaning "accepted / completed".
pub const STATUS_SUCCESS: u8 = 0;

/// Maximum SSID length in bytes (IEEE 802.11 limit).
pub const MAX_SSID_LEN: usize = 31;

/// Maximum WPA passphrase length in bytes.
pub const MAX_PASSPHRASE_LEN: usize = 63;

// ── Session family ────────────────────────────────────────────────────────────

/// Message kinds on the session endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SessionMsgKind {
    /// Client requests a sec0 session (carries an empty security context).
    Command = 0,
    /// Device grants or denies the session.
    Response = 1,
}

impl TryFrom<u8> for SessionMsgKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SessionMsgKind::Command),
            1 => Ok(SessionMsgKind::Response),
            _ => Err(()),
        }
    }
}

/// A message on the session endpoint.
///
/// There is exactly one negotiation exchange per client lifetime: the client
/// sends [`SessionData::Command`] and the device answers with
/// [`SessionData::Response`].  A `status` of [`STATUS_SUCCESS`] means the
/// (unsecured) session is granted; anything else is a denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionData {
    /// Sec0 session request.  The security context sub-message is empty by
    /// definition of the sec0 scheme, so the variant carries no fields.
    Command,
    /// Sec0 session grant/denial.
    Response {
        /// `0` = granted; nonzero = denied.
        status: u8,
    },
}

impl SessionData {
    /// Returns the [`SessionMsgKind`] discriminant for this message.
    pub fn kind(&self) -> SessionMsgKind {
        match self {
            SessionData::Command => SessionMsgKind::Command,
            SessionData::Response { .. } => SessionMsgKind::Response,
        }
    }
}

// ── Scan family ───────────────────────────────────────────────────────────────

/// Message kinds on the scan endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ScanMsgKind {
    CmdScanStart = 0,
    RespScanStart = 1,
    CmdScanStatus = 2,
    RespScanStatus = 3,
    CmdScanResult = 4,
    RespScanResult = 5,
}

impl TryFrom<u8> for ScanMsgKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ScanMsgKind::CmdScanStart),
            1 => Ok(ScanMsgKind::RespScanStart),
            2 => Ok(ScanMsgKind::CmdScanStatus),
            3 => Ok(ScanMsgKind::RespScanStatus),
            4 => Ok(ScanMsgKind::CmdScanResult),
            5 => Ok(ScanMsgKind::RespScanResult),
            _ => Err(()),
        }
    }
}

/// Parameters for starting a network scan.
///
/// These trade off result completeness against scan duration and the risk of
/// knocking the requesting station off the soft AP while the device hops
/// channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStartCommand {
    /// `true` = the device replies only once the scan completes.
    pub blocking: bool,
    /// `true` = passive scan (listen only); `false` = active probe requests.
    pub passive: bool,
    /// Number of channels to scan before pausing to issue soft-AP beacons.
    pub group_channels: u8,
    /// Dwell time per channel in milliseconds.
    pub period_ms: u16,
}

/// Device answer to a scan-status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatusResponse {
    /// `0` = query accepted; nonzero = device-side error.
    pub status: u8,
    /// `true` once a scan (requested by any client) has completed.
    pub scan_finished: bool,
    /// Number of results held by the device; `0` with `scan_finished = true`
    /// means no scan has been requested yet.
    pub result_count: u16,
}

/// Window of results to retrieve: `count` entries starting at `start_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResultRequest {
    pub start_index: u16,
    pub count: u16,
}

/// Authentication mode of a scanned access point.
///
/// Index into the device's fixed 6-entry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum WifiAuthMode {
    Open = 0,
    Wep = 1,
    WpaPsk = 2,
    Wpa2Psk = 3,
    WpaWpa2Psk = 4,
    Wpa2Enterprise = 5,
}

impl WifiAuthMode {
    /// Human-readable name as shown to the user.
    pub fn name(self) -> &'static str {
        match self {
            WifiAuthMode::Open => "None",
            WifiAuthMode::Wep => "WEP",
            WifiAuthMode::WpaPsk => "WPA",
            WifiAuthMode::Wpa2Psk => "WPA2",
            WifiAuthMode::WpaWpa2Psk => "WPA/WPA2",
            WifiAuthMode::Wpa2Enterprise => "WPA2 Enterprise",
        }
    }
}

impl std::fmt::Display for WifiAuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for WifiAuthMode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WifiAuthMode::Open),
            1 => Ok(WifiAuthMode::Wep),
            2 => Ok(WifiAuthMode::WpaPsk),
            3 => Ok(WifiAuthMode::Wpa2Psk),
            4 => Ok(WifiAuthMode::WpaWpa2Psk),
            5 => Ok(WifiAuthMode::Wpa2Enterprise),
            _ => Err(()),
        }
    }
}

/// One access point from the device's scan result list.
///
/// Immutable once received; the SSID is kept as raw bytes because 802.11
/// SSIDs are byte sequences, not guaranteed UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// Raw SSID bytes, at most [`MAX_SSID_LEN`] long.
    pub ssid: Vec<u8>,
    /// Received signal strength in dBm.
    pub rssi: i8,
    /// Authentication mode of the network.
    pub auth: WifiAuthMode,
}

impl ScanEntry {
    /// SSID decoded for display, with invalid UTF-8 replaced.
    pub fn ssid_lossy(&self) -> String {
        String::from_utf8_lossy(&self.ssid).into_owned()
    }
}

/// Device answer to a result-window request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResultResponse {
    /// `0` = request accepted; nonzero = device-side error.
    pub status: u8,
    /// The requested window of entries, in device order.
    pub entries: Vec<ScanEntry>,
}

/// A message on the scan endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiScanPayload {
    CmdScanStart(ScanStartCommand),
    RespScanStart { status: u8 },
    CmdScanStatus,
    RespScanStatus(ScanStatusResponse),
    CmdScanResult(ScanResultRequest),
    RespScanResult(ScanResultResponse),
}

impl WifiScanPayload {
    /// Returns the [`ScanMsgKind`] discriminant for this message.
    pub fn kind(&self) -> ScanMsgKind {
        match self {
            WifiScanPayload::CmdScanStart(_) => ScanMsgKind::CmdScanStart,
            WifiScanPayload::RespScanStart { .. } => ScanMsgKind::RespScanStart,
            WifiScanPayload::CmdScanStatus => ScanMsgKind::CmdScanStatus,
            WifiScanPayload::RespScanStatus(_) => ScanMsgKind::RespScanStatus,
            WifiScanPayload::CmdScanResult(_) => ScanMsgKind::CmdScanResult,
            WifiScanPayload::RespScanResult(_) => ScanMsgKind::RespScanResult,
        }
    }
}

// ── Config family ─────────────────────────────────────────────────────────────

/// Message kinds on the config endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ConfigMsgKind {
    CmdGetStatus = 0,
    RespGetStatus = 1,
    CmdSetConfig = 2,
    RespSetConfig = 3,
    CmdApplyConfig = 4,
    RespApplyConfig = 5,
}

impl TryFrom<u8> for ConfigMsgKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ConfigMsgKind::CmdGetStatus),
            1 => Ok(ConfigMsgKind::RespGetStatus),
            2 => Ok(ConfigMsgKind::CmdSetConfig),
            3 => Ok(ConfigMsgKind::RespSetConfig),
            4 => Ok(ConfigMsgKind::CmdApplyConfig),
            5 => Ok(ConfigMsgKind::RespApplyConfig),
            _ => Err(()),
        }
    }
}

/// State of the device's own station interface while it attempts to join the
/// configured network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum StationState {
    /// Association succeeded; provisioning is complete.
    Connected = 0,
    /// Association still in progress; poll again.
    Connecting = 1,
    /// Station dropped off the network.
    Disconnected = 2,
    /// Association attempt failed; see the fail reason.
    ConnectionFailed = 3,
}

impl TryFrom<u8> for StationState {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StationState::Connected),
            1 => Ok(StationState::Connecting),
            2 => Ok(StationState::Disconnected),
            3 => Ok(StationState::ConnectionFailed),
            _ => Err(()),
        }
    }
}

/// Why a connection attempt failed.
///
/// Index into the device's fixed 2-entry reason table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ConnectFailReason {
    AuthError = 0,
    NetworkNotFound = 1,
}

impl ConnectFailReason {
    /// Human-readable reason as shown to the user.
    pub fn name(self) -> &'static str {
        match self {
            ConnectFailReason::AuthError => "Auth Failed",
            ConnectFailReason::NetworkNotFound => "Network Not Found",
        }
    }
}

impl std::fmt::Display for ConnectFailReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for ConnectFailReason {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ConnectFailReason::AuthError),
            1 => Ok(ConnectFailReason::NetworkNotFound),
            _ => Err(()),
        }
    }
}

/// Device answer to a connection-status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigStatusResponse {
    /// Top-level status of the query itself.  Nonzero means the device is not
    /// yet ready to report a station state (distinct from a failed attempt).
    pub status: u8,
    /// Station association state.
    pub sta_state: StationState,
    /// Failure reason; only meaningful when `sta_state` is
    /// [`StationState::Disconnected`] or [`StationState::ConnectionFailed`].
    pub fail_reason: ConnectFailReason,
}

/// Credentials to program into the device's station interface.
///
/// Length constraints (SSID 1–31 bytes, passphrase empty or 8–63 bytes) are
/// enforced by the client before a message is built; the codec only guards
/// the wire limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetConfigCommand {
    pub ssid: Vec<u8>,
    pub passphrase: Vec<u8>,
}

/// A message on the config endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiConfigPayload {
    CmdGetStatus,
    RespGetStatus(ConfigStatusResponse),
    CmdSetConfig(SetConfigCommand),
    RespSetConfig { status: u8 },
    CmdApplyConfig,
    RespApplyConfig { status: u8 },
}

impl WifiConfigPayload {
    /// Returns the [`ConfigMsgKind`] discriminant for this message.
    pub fn kind(&self) -> ConfigMsgKind {
        match self {
            WifiConfigPayload::CmdGetStatus => ConfigMsgKind::CmdGetStatus,
            WifiConfigPayload::RespGetStatus(_) => ConfigMsgKind::RespGetStatus,
            WifiConfigPayload::CmdSetConfig(_) => ConfigMsgKind::CmdSetConfig,
            WifiConfigPayload::RespSetConfig { .. } => ConfigMsgKind::RespSetConfig,
            WifiConfigPayload::CmdApplyConfig => ConfigMsgKind::CmdApplyConfig,
            WifiConfigPayload::RespApplyConfig { .. } => ConfigMsgKind::RespApplyConfig,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
