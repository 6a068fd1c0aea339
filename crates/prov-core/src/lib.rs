//! # prov-core
//!
//! Shared wire-protocol library for the SoftAP provisioning client: the three
//! binary message families, their codec, and the JSON custom-command types.
//!
//! This crate has zero dependencies on sockets, HTTP clients, or async
//! runtimes: it only turns typed messages into bytes and back.
//!
//! # Protocol overview
//!
//! A headless device that needs Wi-Fi credentials raises a temporary soft AP
//! and serves four HTTP endpoints while a visitor is associated with it:
//!
//! - **session** – sec0 (unsecured) session negotiation.  Every other
//!   exchange is gated on this succeeding once.
//! - **scan** – start a network scan, poll its status, and page through the
//!   results.
//! - **config** – submit credentials, apply them, and poll the device's own
//!   station state until the join attempt terminates.
//! - **custom** – JSON lifecycle commands: reset the provisioning manager,
//!   shut it down, and fetch the post-provisioning homepage URL.
//!
//! The binary families share one convention: a leading kind byte tags the
//! message, responses use `command kind + 1`, and a `status` byte of `0`
//! means success.

pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `prov_core::WifiScanPayload` instead of the full module path.
pub use protocol::codec::{
    decode_config, decode_scan, decode_session, encode_config, encode_scan, encode_session,
    ProtocolError,
};
pub use protocol::custom::{
    CustomCommand, CustomCommandRequest, CustomCommandResponse, CustomStatus,
};
pub use protocol::messages::{
    ConfigStatusResponse, ConnectFailReason, ScanEntry, ScanResultRequest, ScanResultResponse,
    ScanStartCommand, ScanStatusResponse, SessionData, SetConfigCommand, StationState,
    WifiAuthMode, WifiConfigPayload, WifiScanPayload, MAX_PASSPHRASE_LEN, MAX_SSID_LEN,
    STATUS_SUCCESS,
};
