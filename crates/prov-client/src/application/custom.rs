//! Custom command dispatch: the JSON side channel for lifecycle teardown.
//!
//! These are fire-and-confirm commands.  Failures here never escalate: once
//! the device reports a terminal connection outcome, the user *is*
//! provisioned (or not) regardless of whether the cleanup chain succeeds, so
//! a refused shutdown or missing homepage is logged and the chain stops.

use prov_core::{CustomCommand, CustomCommandRequest, CustomCommandResponse, CustomStatus};
use tracing::{info, warn};

use crate::application::error::ProvisioningError;
use crate::application::transport::{Endpoint, ProvTransport};
use crate::domain::config::ProvisionerConfig;

/// Client for the JSON custom-command endpoint.
pub struct CustomCommandClient<'a> {
    transport: &'a dyn ProvTransport,
    config: &'a ProvisionerConfig,
}

impl<'a> CustomCommandClient<'a> {
    pub fn new(transport: &'a dyn ProvTransport, config: &'a ProvisionerConfig) -> Self {
        Self { transport, config }
    }

    /// Sends one command and parses the JSON response.
    ///
    /// # Errors
    ///
    /// Transport failures and malformed JSON are surfaced; a well-formed
    /// non-`ok` status is returned to the caller to interpret.
    pub async fn send(
        &self,
        command: CustomCommand,
    ) -> Result<CustomCommandResponse, ProvisioningError> {
        let body = serde_json::to_vec(&CustomCommandRequest { command }).map_err(|e| {
            ProvisioningError::Json {
                context: "custom command request",
                source: e,
            }
        })?;
        let response = self
            .transport
            .exchange(Endpoint::Custom, body, self.config.timing.request_timeout())
            .await?;
        serde_json::from_slice(&response).map_err(|e| ProvisioningError::Json {
            context: "custom command response",
            source: e,
        })
    }

    /// Post-success chain: shut the provisioning manager down, then fetch the
    /// homepage URL to hand the user off to.
    ///
    /// Returns `None` when any step is refused or fails: the user is still
    /// considered provisioned, just without a clean redirect.
    pub async fn shutdown_then_homepage(&self) -> Option<String> {
        match self.send(CustomCommand::ShutdownProv).await {
            Ok(resp) if resp.status == CustomStatus::Ok => {
                info!("provisioning manager shut down");
            }
            Ok(resp) => {
                warn!(status = ?resp.status, "shutdown command refused");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "shutdown command failed");
                return None;
            }
        }

        match self.send(CustomCommand::GetHomepage).await {
            Ok(resp) if resp.status == CustomStatus::Ok => match resp.uri {
                Some(uri) => {
                    info!(%uri, "device homepage retrieved");
                    Some(uri)
                }
                None => {
                    warn!("homepage response was ok but carried no uri");
                    None
                }
            },
            Ok(resp) => {
                warn!(status = ?resp.status, "homepage command refused");
                None
            }
            Err(e) => {
                warn!(error = %e, "homepage command failed");
                None
            }
        }
    }

    /// Post-failure command: reset the provisioning manager so the caller can
    /// submit fresh credentials.
    pub async fn reset(&self) {
        match self.send(CustomCommand::ResetProv).await {
            Ok(resp) if resp.status == CustomStatus::Ok => {
                info!("provisioning manager reset");
            }
            Ok(resp) => warn!(status = ?resp.status, "reset command refused"),
            Err(e) => warn!(error = %e, "reset command failed"),
        }
    }
}
