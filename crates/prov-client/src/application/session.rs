//! Session manager: the one-shot sec0 negotiation that gates everything else.

use prov_core::{decode_session, encode_session, SessionData, STATUS_SUCCESS};
use tracing::{debug, info};

use crate::application::error::ProvisioningError;
use crate::application::transport::{Endpoint, ProvTransport};
use crate::domain::config::ProvisionerConfig;

/// Negotiates the unsecured command session.
pub struct SessionManager<'a> {
    transport: &'a dyn ProvTransport,
    config: &'a ProvisionerConfig,
}

impl<'a> SessionManager<'a> {
    pub fn new(transport: &'a dyn ProvTransport, config: &'a ProvisionerConfig) -> Self {
        Self { transport, config }
    }

    /// Requests a sec0 session and verifies the grant.
    ///
    /// Not retried here: a session that fails usually means the endpoint is
    /// unreachable, which only the operator can fix (reconnect to the soft
    /// AP, rerun).
    ///
    /// # Errors
    ///
    /// Any non-grant (denial status, decode failure, timeout) is surfaced
    /// to the caller.
    pub async fn establish(&self) -> Result<(), ProvisioningError> {
        debug!("requesting sec0 session");
        let body = encode_session(&SessionData::Command)
            .map_err(|e| ProvisioningError::protocol("session request", e))?;
        let response = self
            .transport
            .exchange(Endpoint::Session, body, self.config.timing.session_timeout())
            .await?;
        match decode_session(&response)
            .map_err(|e| ProvisioningError::protocol("session response", e))?
        {
            SessionData::Response { status } if status == STATUS_SUCCESS => {
                info!("unsecured session granted");
                Ok(())
            }
            SessionData::Response { status } => Err(ProvisioningError::DeviceStatus {
                context: "session negotiation",
                status,
            }),
            SessionData::Command => Err(ProvisioningError::UnexpectedResponse {
                context: "session negotiation",
            }),
        }
    }
}
