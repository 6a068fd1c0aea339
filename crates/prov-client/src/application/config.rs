//! Config orchestrator: drives one credential-application attempt.
//!
//! The protocol is strictly sequential (submit, apply, settle, poll) and
//! every step is gated on the previous one succeeding.  The device's answer
//! to a status poll has two layers: a top-level status (nonzero = "not ready
//! to report yet", poll again) and, once that is zero, the station state that
//! decides the terminal outcome.

use prov_core::{
    decode_config, encode_config, ConfigStatusResponse, ConnectFailReason, SetConfigCommand,
    StationState, WifiConfigPayload, STATUS_SUCCESS,
};
use tokio::time;
use tracing::{debug, info, warn};

use crate::application::cancel::CycleGuard;
use crate::application::custom::CustomCommandClient;
use crate::application::error::ProvisioningError;
use crate::application::transport::{Endpoint, ProvTransport};
use crate::domain::config::ProvisionerConfig;
use crate::domain::credentials::WifiCredentials;

/// Terminal result of a provisioning attempt.
///
/// A device-reported failure is a legitimate outcome, not an error: the
/// caller decides whether to resubmit with different credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// The device joined the network.  `redirect_uri` is present when the
    /// post-provisioning handoff chain succeeded.
    Connected { redirect_uri: Option<String> },
    /// The device tried and failed, with the reason it reported.
    Failed { reason: ConnectFailReason },
}

/// Drives one config attempt; owns its attempt state for exactly that long.
pub struct ConfigOrchestrator<'a> {
    transport: &'a dyn ProvTransport,
    config: &'a ProvisionerConfig,
    guard: CycleGuard,
}

impl<'a> ConfigOrchestrator<'a> {
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

    /// Submits the credentials and tells the device to apply them.
    ///
    /// # Errors
    ///
    /// A nonzero status on either step aborts the attempt.
    pub async fn submit_and_apply(
        &self,
        credentials: &WifiCredentials,
    ) -> Result<(), ProvisioningError> {
        info!(ssid = %credentials.ssid_lossy(), open = credentials.is_open_network(), "submitting credentials");
        let submit = WifiConfigPayload::CmdSetConfig(SetConfigCommand {
            ssid: credentials.ssid().to_vec(),
            passphrase: credentials.passphrase().to_vec(),
        });
        match self.exchange(&submit, "set config").await? {
            WifiConfigPayload::RespSetConfig { status } if status == STATUS_SUCCESS => {}
            WifiConfigPayload::RespSetConfig { status } => {
                return Err(ProvisioningError::DeviceStatus {
                    context: "set config",
                    status,
                })
            }
            _ => {
                return Err(ProvisioningError::UnexpectedResponse {
                    context: "set config",
                })
            }
        }

        self.guard.check()?;
        match self
            .exchange(&WifiConfigPayload::CmdApplyConfig, "apply config")
            .await?
        {
            WifiConfigPayload::RespApplyConfig { status } if status == STATUS_SUCCESS => Ok(()),
            WifiConfigPayload::RespApplyConfig { status } => Err(ProvisioningError::DeviceStatus {
                context: "apply config",
                status,
            }),
            _ => Err(ProvisioningError::UnexpectedResponse {
                context: "apply config",
            }),
        }
    }

    /// Waits out the settle delay, then polls the connection status until the
    /// device reports a terminal outcome, firing the matching custom-command
    /// follow-up before returning.
    pub async fn await_outcome(&self) -> Result<ConnectionOutcome, ProvisioningError> {
        debug!(
            "giving the station {:?} to attempt association",
            self.config.timing.settle_delay()
        );
        time::sleep(self.config.timing.settle_delay()).await;

        loop {
            self.guard.check()?;
            let status = self.query_status().await?;

            if status.status != STATUS_SUCCESS {
                // Attempt not complete yet; the report itself is pending.
                debug!(status = status.status, "attempt not yet reported");
            } else {
                match status.sta_state {
                    StationState::Connected => {
                        info!("device joined the network");
                        let custom = CustomCommandClient::new(self.transport, self.config);
                        let redirect_uri = custom.shutdown_then_homepage().await;
                        return Ok(ConnectionOutcome::Connected { redirect_uri });
                    }
                    StationState::Connecting => {
                        debug!("station still connecting");
                    }
                    StationState::Disconnected | StationState::ConnectionFailed => {
                        warn!(reason = %status.fail_reason, "connection attempt failed");
                        CustomCommandClient::new(self.transport, self.config)
                            .reset()
                            .await;
                        return Ok(ConnectionOutcome::Failed {
                            reason: status.fail_reason,
                        });
                    }
                }
            }

            time::sleep(self.config.timing.poll_interval()).await;
        }
    }

    async fn query_status(&self) -> Result<ConfigStatusResponse, ProvisioningError> {
        // Unlike the scan endpoint, a nonzero top-level status here is a
        // normal "still pending" answer, so it is returned, not rejected.
        match self
            .exchange(&WifiConfigPayload::CmdGetStatus, "connection status")
            .await?
        {
            WifiConfigPayload::RespGetStatus(s) => Ok(s),
            _ => Err(ProvisioningError::UnexpectedResponse {
                context: "connection status",
            }),
        }
    }

    /// Encodes, exchanges, and decodes one config-endpoint round trip.
    async fn exchange(
        &self,
        command: &WifiConfigPayload,
        context: &'static str,
    ) -> Result<WifiConfigPayload, ProvisioningError> {
        let body = encode_config(command).map_err(|e| ProvisioningError::protocol(context, e))?;
        let response = self
            .transport
            .exchange(Endpoint::Config, body, self.config.timing.request_timeout())
            .await?;
        decode_config(&response).map_err(|e| ProvisioningError::protocol(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cancel::CancelHandle;
    use crate::infrastructure::transport::mock::MockTransport;

    fn resp(payload: &WifiConfigPayload) -> Vec<u8> {
        encode_config(payload).unwrap()
    }

    #[tokio::test]
    async fn test_submit_and_apply_issues_both_commands_in_order() {
        let transport = MockTransport::new();
        transport.enqueue(
            Endpoint::Config,
            resp(&WifiConfigPayload::RespSetConfig { status: 0 }),
        );
        transport.enqueue(
            Endpoint::Config,
            resp(&WifiConfigPayload::RespApplyConfig { status: 0 }),
        );
        let config = ProvisionerConfig::default();
        let orchestrator =
            ConfigOrchestrator::new(&transport, &config, CancelHandle::new().guard());
        let credentials = WifiCredentials::new("home", "hunter2hunter2").unwrap();

        orchestrator.submit_and_apply(&credentials).await.unwrap();

        let requests = transport.requests_for(Endpoint::Config);
        assert_eq!(requests.len(), 2);
        match decode_config(&requests[0]).unwrap() {
            WifiConfigPayload::CmdSetConfig(cmd) => {
                assert_eq!(cmd.ssid, b"home");
                assert_eq!(cmd.passphrase, b"hunter2hunter2");
            }
            other => panic!("expected CmdSetConfig first, got {other:?}"),
        }
        assert_eq!(
            decode_config(&requests[1]).unwrap(),
            WifiConfigPayload::CmdApplyConfig
        );
    }

    #[tokio::test]
    async fn test_submit_aborts_on_rejected_set_config() {
        let transport = MockTransport::new();
        transport.enqueue(
            Endpoint::Config,
            resp(&WifiConfigPayload::RespSetConfig { status: 2 }),
        );
        let config = ProvisionerConfig::default();
        let orchestrator =
            ConfigOrchestrator::new(&transport, &config, CancelHandle::new().guard());
        let credentials = WifiCredentials::new("home", "").unwrap();

        let result = orchestrator.submit_and_apply(&credentials).await;

        assert!(matches!(
            result,
            Err(ProvisioningError::DeviceStatus {
                context: "set config",
                status: 2,
            })
        ));
        // The apply command must not follow a failed submit.
        assert_eq!(transport.request_count(Endpoint::Config), 1);
    }
}
