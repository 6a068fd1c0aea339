//! JSON types for the custom-command endpoint.
//!
//! Unlike the three binary families, the custom endpoint speaks small JSON
//! objects: the request names one of three fixed commands, the response
//! carries a three-way status plus command-specific fields.
//!
//! ```json
//! {"command":"shutdown prov"}
//! {"status":"ok"}
//! {"command":"get homepage"}
//! {"status":"ok","uri":"http://192.168.4.1/index.html"}
//! ```
//!
//! The wire strings (including `"bad json"` rather than a numeric code) are
//! fixed by the device firmware and must not be renamed.

use serde::{Deserialize, Serialize};

/// The three auxiliary lifecycle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomCommand {
    /// Reset the device's provisioning manager so a new attempt can be made.
    #[serde(rename = "reset prov")]
    ResetProv,
    /// Tear down the provisioning manager after a successful attempt.
    #[serde(rename = "shutdown prov")]
    ShutdownProv,
    /// Ask for the post-provisioning redirect URL.
    #[serde(rename = "get homepage")]
    GetHomepage,
}

/// Request body for the custom endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCommandRequest {
    pub command: CustomCommand,
}

/// Three-way status in a custom-command response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "bad json")]
    BadJson,
    #[serde(rename = "bad command")]
    BadCommand,
}

/// Response body from the custom endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCommandResponse {
    pub status: CustomStatus,
    /// Redirect target; present only in a successful `get homepage` response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
