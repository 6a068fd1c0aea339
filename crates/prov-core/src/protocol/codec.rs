//! Binary codec for the three provisioning message families.
//!
//! Wire format, per family:
//! ```text
//! session:  [sec_ver:1][kind:1][payload…]
//! scan:     [kind:1][payload…]
//! config:   [kind:1][payload…]
//! ```
//! All multi-byte integers are big-endian.  Variable-length byte strings
//! (SSIDs, passphrases) carry a one-byte length prefix; their maximum lengths
//! are protocol constants, so a single byte always suffices.

use thiserror::Error;

use crate::protocol::messages::{
    ConfigMsgKind, ConfigStatusResponse, ConnectFailReason, ScanEntry, ScanMsgKind,
    ScanResultRequest, ScanResultResponse, ScanStartCommand, ScanStatusResponse, SessionData,
    SessionMsgKind, SetConfigCommand, StationState, WifiAuthMode, WifiConfigPayload,
    WifiScanPayload, MAX_PASSPHRASE_LEN, MAX_SSID_LEN, SECURITY_VERSION_0,
};

/// Errors that can occur during message encoding or decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the minimum required length.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The kind byte is not a recognized value for this message family.
    #[error("unknown {family} message kind: 0x{kind:02X}")]
    UnknownMessageKind { family: &'static str, kind: u8 },

    /// The session message advertises a security scheme other than sec0.
    #[error("unsupported security scheme: {0}")]
    UnsupportedSecurityScheme(u8),

    /// The payload could not be parsed (field value out of range, truncated
    /// variable-length field, etc.).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A variable-length field exceeds its protocol limit and cannot be
    /// represented on the wire.
    #[error("{field} is {actual} bytes, wire limit is {max}")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

// ── Session family ────────────────────────────────────────────────────────────

/// Encodes a [`SessionData`] message for the session endpoint.
///
/// # Errors
///
/// Infallible today; returns [`ProtocolError`] for signature symmetry with
/// the other families.
pub fn encode_session(msg: &SessionData) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::with_capacity(4);
    buf.push(SECURITY_VERSION_0);
    buf.push(msg.kind() as u8);
    match msg {
        SessionData::Command => {
            // Empty sec0 security context: a zero-length prefixed field.
            buf.push(0x00);
        }
        SessionData::Response { status } => buf.push(*status),
    }
    Ok(buf)
}

/// Decodes one [`SessionData`] message from `bytes`.
///
/// # Errors
///
/// Returns [`ProtocolError::UnsupportedSecurityScheme`] when the message
/// advertises anything other than sec0, and the usual decode errors otherwise.
pub fn decode_session(bytes: &[u8]) -> Result<SessionData, ProtocolError> {
    if bytes.len() < 2 {
        return Err(ProtocolError::InsufficientData {
            needed: 2,
            available: bytes.len(),
        });
    }
    let sec_ver = bytes[0];
    if sec_ver != SECURITY_VERSION_0 {
        return Err(ProtocolError::UnsupportedSecurityScheme(sec_ver));
    }
    let kind = SessionMsgKind::try_from(bytes[1]).map_err(|_| ProtocolError::UnknownMessageKind {
        family: "session",
        kind: bytes[1],
    })?;
    let p = &bytes[2..];
    match kind {
        SessionMsgKind::Command => {
            require_len(p, 1, "Command.context")?;
            let ctx_len = p[0] as usize;
            require_len(p, 1 + ctx_len, "Command.context bytes")?;
            // The sec0 context carries no fields; its bytes are ignored.
            Ok(SessionData::Command)
        }
        SessionMsgKind::Response => {
            require_len(p, 1, "Response.status")?;
            Ok(SessionData::Response { status: p[0] })
        }
    }
}

// ── Scan family ───────────────────────────────────────────────────────────────

/// Encodes a [`WifiScanPayload`] message for the scan endpoint.
///
/// # Errors
///
/// Returns [`ProtocolError::FieldTooLong`] if a result entry's SSID exceeds
/// the wire limit.
pub fn encode_scan(msg: &WifiScanPayload) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    buf.push(msg.kind() as u8);
    match msg {
        WifiScanPayload::CmdScanStart(m) => {
            buf.push(m.blocking as u8);
            buf.push(m.passive as u8);
            buf.push(m.group_channels);
            buf.extend_from_slice(&m.period_ms.to_be_bytes());
        }
        WifiScanPayload::RespScanStart { status } => buf.push(*status),
        WifiScanPayload::CmdScanStatus => {} // empty payload
        WifiScanPayload::RespScanStatus(m) => {
            buf.push(m.status);
            buf.push(m.scan_finished as u8);
            buf.extend_from_slice(&m.result_count.to_be_bytes());
        }
        WifiScanPayload::CmdScanResult(m) => {
            buf.extend_from_slice(&m.start_index.to_be_bytes());
            buf.extend_from_slice(&m.count.to_be_bytes());
        }
        WifiScanPayload::RespScanResult(m) => {
            buf.push(m.status);
            buf.extend_from_slice(&(m.entries.len() as u16).to_be_bytes());
            for entry in &m.entries {
                write_prefixed_bytes(&mut buf, &entry.ssid, "ssid", MAX_SSID_LEN)?;
                buf.push(entry.rssi as u8);
                buf.push(entry.auth as u8);
            }
        }
    }
    Ok(buf)
}

/// Decodes one [`WifiScanPayload`] message from `bytes`.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the bytes are malformed.
pub fn decode_scan(bytes: &[u8]) -> Result<WifiScanPayload, ProtocolError> {
    if bytes.is_empty() {
        return Err(ProtocolError::InsufficientData {
            needed: 1,
            available: 0,
        });
    }
    let kind = ScanMsgKind::try_from(bytes[0]).map_err(|_| ProtocolError::UnknownMessageKind {
        family: "scan",
        kind: bytes[0],
    })?;
    let p = &bytes[1..];
    match kind {
        ScanMsgKind::CmdScanStart => {
            // 1 (blocking) + 1 (passive) + 1 (group) + 2 (period) = 5
            require_len(p, 5, "CmdScanStart")?;
            Ok(WifiScanPayload::CmdScanStart(ScanStartCommand {
                blocking: p[0] != 0,
                passive: p[1] != 0,
                group_channels: p[2],
                period_ms: u16::from_be_bytes([p[3], p[4]]),
            }))
        }
        ScanMsgKind::RespScanStart => {
            require_len(p, 1, "RespScanStart")?;
            Ok(WifiScanPayload::RespScanStart { status: p[0] })
        }
        ScanMsgKind::CmdScanStatus => Ok(WifiScanPayload::CmdScanStatus),
        ScanMsgKind::RespScanStatus => {
            // 1 (status) + 1 (finished) + 2 (count) = 4
            require_len(p, 4, "RespScanStatus")?;
            Ok(WifiScanPayload::RespScanStatus(ScanStatusResponse {
                status: p[0],
                scan_finished: p[1] != 0,
                result_count: u16::from_be_bytes([p[2], p[3]]),
            }))
        }
        ScanMsgKind::CmdScanResult => {
            require_len(p, 4, "CmdScanResult")?;
            Ok(WifiScanPayload::CmdScanResult(ScanResultRequest {
                start_index: u16::from_be_bytes([p[0], p[1]]),
                count: u16::from_be_bytes([p[2], p[3]]),
            }))
        }
        ScanMsgKind::RespScanResult => {
            require_len(p, 3, "RespScanResult")?;
            let status = p[0];
            let count = u16::from_be_bytes([p[1], p[2]]) as usize;
            let mut entries = Vec::with_capacity(count);
            let mut off = 3;
            for _ in 0..count {
                let (ssid, next) = read_prefixed_bytes(p, off, "ScanEntry.ssid")?;
                require_len(p, next + 2, "ScanEntry tail")?;
                let rssi = p[next] as i8;
                let auth = WifiAuthMode::try_from(p[next + 1]).map_err(|_| {
                    ProtocolError::MalformedPayload(format!(
                        "unknown auth mode: {}",
                        p[next + 1]
                    ))
                })?;
                entries.push(ScanEntry { ssid, rssi, auth });
                off = next + 2;
            }
            Ok(WifiScanPayload::RespScanResult(ScanResultResponse {
                status,
                entries,
            }))
        }
    }
}

// ── Config family ─────────────────────────────────────────────────────────────

/// Encodes a [`WifiConfigPayload`] message for the config endpoint.
///
/// # Errors
///
/// Returns [`ProtocolError::FieldTooLong`] if the SSID or passphrase exceeds
/// its wire limit.
pub fn encode_config(msg: &WifiConfigPayload) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    buf.push(msg.kind() as u8);
    match msg {
        WifiConfigPayload::CmdGetStatus => {} // empty payload
        WifiConfigPayload::RespGetStatus(m) => {
            buf.push(m.status);
            buf.push(m.sta_state as u8);
            buf.push(m.fail_reason as u8);
        }
        WifiConfigPayload::CmdSetConfig(m) => {
            write_prefixed_bytes(&mut buf, &m.ssid, "ssid", MAX_SSID_LEN)?;
            write_prefixed_bytes(&mut buf, &m.passphrase, "passphrase", MAX_PASSPHRASE_LEN)?;
        }
        WifiConfigPayload::RespSetConfig { status } => buf.push(*status),
        WifiConfigPayload::CmdApplyConfig => {} // empty payload
        WifiConfigPayload::RespApplyConfig { status } => buf.push(*status),
    }
    Ok(buf)
}

/// Decodes one [`WifiConfigPayload`] message from `bytes`.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the bytes are malformed.
pub fn decode_config(bytes: &[u8]) -> Result<WifiConfigPayload, ProtocolError> {
    if bytes.is_empty() {
        return Err(ProtocolError::InsufficientData {
            needed: 1,
            available: 0,
        });
    }
    let kind = ConfigMsgKind::try_from(bytes[0]).map_err(|_| ProtocolError::UnknownMessageKind {
        family: "config",
        kind: bytes[0],
    })?;
    let p = &bytes[1..];
    match kind {
        ConfigMsgKind::CmdGetStatus => Ok(WifiConfigPayload::CmdGetStatus),
        ConfigMsgKind::RespGetStatus => {
            // 1 (status) + 1 (sta_state) + 1 (fail_reason) = 3
            require_len(p, 3, "RespGetStatus")?;
            let sta_state = StationState::try_from(p[1]).map_err(|_| {
                ProtocolError::MalformedPayload(format!("unknown station state: {}", p[1]))
            })?;
            let fail_reason = ConnectFailReason::try_from(p[2]).map_err(|_| {
                ProtocolError::MalformedPayload(format!("unknown fail reason: {}", p[2]))
            })?;
            Ok(WifiConfigPayload::RespGetStatus(ConfigStatusResponse {
                status: p[0],
                sta_state,
                fail_reason,
            }))
        }
        ConfigMsgKind::CmdSetConfig => {
            let (ssid, after_ssid) = read_prefixed_bytes(p, 0, "CmdSetConfig.ssid")?;
            let (passphrase, _) = read_prefixed_bytes(p, after_ssid, "CmdSetConfig.passphrase")?;
            Ok(WifiConfigPayload::CmdSetConfig(SetConfigCommand {
                ssid,
                passphrase,
            }))
        }
        ConfigMsgKind::RespSetConfig => {
            require_len(p, 1, "RespSetConfig")?;
            Ok(WifiConfigPayload::RespSetConfig { status: p[0] })
        }
        ConfigMsgKind::CmdApplyConfig => Ok(WifiConfigPayload::CmdApplyConfig),
        ConfigMsgKind::RespApplyConfig => {
            require_len(p, 1, "RespApplyConfig")?;
            Ok(WifiConfigPayload::RespApplyConfig { status: p[0] })
        }
    }
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn require_len(buf: &[u8], needed: usize, context: &str) -> Result<(), ProtocolError> {
    if buf.len() < needed {
        Err(ProtocolError::MalformedPayload(format!(
            "{context}: need {needed} bytes, got {}",
            buf.len()
        )))
    } else {
        Ok(())
    }
}

/// Writes a 1-byte length prefix followed by the raw bytes.
fn write_prefixed_bytes(
    buf: &mut Vec<u8>,
    bytes: &[u8],
    field: &'static str,
    max: usize,
) -> Result<(), ProtocolError> {
    if bytes.len() > max {
        return Err(ProtocolError::FieldTooLong {
            field,
            max,
            actual: bytes.len(),
        });
    }
    buf.push(bytes.len() as u8);
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Reads a 1-byte length prefix and then that many bytes.
/// Returns the bytes and the offset of the byte after them.
fn read_prefixed_bytes(
    buf: &[u8],
    offset: usize,
    context: &str,
) -> Result<(Vec<u8>, usize), ProtocolError> {
    if buf.len() < offset + 1 {
        return Err(ProtocolError::MalformedPayload(format!(
            "{context}: need 1 byte for length prefix at offset {offset}"
        )));
    }
    let len = buf[offset] as usize;
    let start = offset + 1;
    if buf.len() < start + len {
        return Err(ProtocolError::MalformedPayload(format!(
            "{context}: field of length {len} at offset {start} exceeds buffer"
        )));
    }
    Ok((buf[start..start + len].to_vec(), start + len))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
