//! Credential validation.
//!
//! Constraints are enforced at construction so no network activity can ever
//! precede validation: an invalid SSID or passphrase is rejected
//! synchronously, before a single byte goes out.

use prov_core::{MAX_PASSPHRASE_LEN, MAX_SSID_LEN};
use thiserror::Error;

/// A credential constraint violation, reported before any network activity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("no SSID specified")]
    EmptySsid,

    #[error("SSID is {0} bytes, maximum is {MAX_SSID_LEN}")]
    SsidTooLong(usize),

    /// WPA requires at least 8 characters; an empty passphrase means an open
    /// network and is allowed.
    #[error("passphrase must be at least 8 characters or left blank for no security")]
    PassphraseTooShort(usize),

    #[error("passphrase is {0} bytes, maximum is {MAX_PASSPHRASE_LEN}")]
    PassphraseTooLong(usize),
}

/// Validated Wi-Fi credentials for one provisioning attempt.
///
/// Invariants held by construction: SSID is 1–31 bytes; passphrase is empty
/// (open network) or 8–63 bytes.  Lengths are measured in bytes, matching the
/// wire limits, so multi-byte UTF-8 input is bounded correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: Vec<u8>,
    passphrase: Vec<u8>,
}

impl WifiCredentials {
    /// Validates and builds credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] on any constraint violation.
    pub fn new(ssid: &str, passphrase: &str) -> Result<Self, CredentialError> {
        let ssid_len = ssid.len();
        if ssid_len == 0 {
            return Err(CredentialError::EmptySsid);
        }
        if ssid_len > MAX_SSID_LEN {
            return Err(CredentialError::SsidTooLong(ssid_len));
        }

        let pass_len = passphrase.len();
        if pass_len > 0 && pass_len < 8 {
            return Err(CredentialError::PassphraseTooShort(pass_len));
        }
        if pass_len > MAX_PASSPHRASE_LEN {
            return Err(CredentialError::PassphraseTooLong(pass_len));
        }

        Ok(Self {
            ssid: ssid.as_bytes().to_vec(),
            passphrase: passphrase.as_bytes().to_vec(),
        })
    }

    pub fn ssid(&self) -> &[u8] {
        &self.ssid
    }

    pub fn passphrase(&self) -> &[u8] {
        &self.passphrase
    }

    /// SSID decoded for display.
    pub fn ssid_lossy(&self) -> String {
        String::from_utf8_lossy(&self.ssid).into_owned()
    }

    /// `true` when the empty passphrase marks the target as an open network.
    pub fn is_open_network(&self) -> bool {
        self.passphrase.is_empty()
    }
}
