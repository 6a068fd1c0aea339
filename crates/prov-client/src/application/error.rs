//! The provisioning error taxonomy.
//!
//! Every failure propagates to the top-level caller: nothing is swallowed.
//! The variants separate the cases a caller handles differently: a phase gate
//! or credential violation never touched the network; a timeout means the
//! endpoint is probably gone; a protocol or device-status error means the
//! session is likely still fine and the cycle can simply be retried.
//!
//! A well-formed terminal connection failure from the device is *not* an
//! error: it is returned as `ConnectionOutcome::Failed` with its reason.

use prov_core::ProtocolError;
use thiserror::Error;

use crate::application::transport::TransportError;
use crate::domain::credentials::CredentialError;
use crate::domain::phase::ProvisioningPhase;

/// Errors surfaced by the provisioning state machine and its orchestrators.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// Operation invoked before the required phase; rejected synchronously
    /// with no network activity.
    #[error("provisioning endpoint not initialized (phase: {phase}); start over")]
    NotReady { phase: ProvisioningPhase },

    /// Credential constraints violated; rejected synchronously.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// The exchange itself failed (timeout, HTTP error, unreachable device).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response decoded incorrectly.
    #[error("{context}: {source}")]
    Protocol {
        context: &'static str,
        #[source]
        source: ProtocolError,
    },

    /// A JSON custom-command body could not be produced or parsed.
    #[error("{context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The device rejected a step with an unexpected nonzero status.
    #[error("{context} rejected with device status {status}")]
    DeviceStatus { context: &'static str, status: u8 },

    /// A well-formed response of the wrong message kind.
    #[error("{context}: unexpected response kind")]
    UnexpectedResponse { context: &'static str },

    /// The cycle was invalidated by `cancel_and_restart()` while suspended.
    #[error("provisioning cycle superseded by a newer request")]
    Cancelled,
}

impl ProvisioningError {
    /// Shorthand for wrapping a codec error with its protocol step.
    pub fn protocol(context: &'static str, source: ProtocolError) -> Self {
        Self::Protocol { context, source }
    }

    /// `true` when the cause was a transport-level timeout, the retryable
    /// "endpoint unreachable" condition.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport(TransportError::Timeout { .. })
        )
    }
}
