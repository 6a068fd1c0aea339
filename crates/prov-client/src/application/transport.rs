//! The transport port: one request/response exchange with the device.
//!
//! The provisioning protocol never holds a connection open: every step is a
//! single POST of an opaque payload to one of four endpoints, answered with
//! an opaque payload or nothing at all.  This trait captures exactly that
//! contract so the orchestrators stay independent of the HTTP client; the
//! adapters live in `infrastructure::transport`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// The four device endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Sec0 session negotiation (binary).
    Session,
    /// Scan start / status / results (binary).
    Scan,
    /// Credential submit / apply / status (binary).
    Config,
    /// Lifecycle commands (JSON text).
    Custom,
}

impl Endpoint {
    /// Path of the endpoint on the device.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Session => "/prov-session",
            Endpoint::Scan => "/prov-scan",
            Endpoint::Config => "/prov-config",
            Endpoint::Custom => "/prov-custom",
        }
    }

    /// Whether the endpoint speaks the binary codec (`false` = JSON text).
    pub fn is_binary(self) -> bool {
        !matches!(self, Endpoint::Custom)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Errors from one exchange.
///
/// A timeout is deliberately a distinct variant from an application-level
/// failure: the surrounding polling loops retry *successful-but-pending*
/// answers by design, while a transport timeout is fatal to the whole cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No response arrived within the exchange's timeout.
    #[error("no response from {endpoint} within {timeout_ms} ms")]
    Timeout {
        endpoint: &'static str,
        timeout_ms: u64,
    },

    /// The device answered with a non-success HTTP status.
    #[error("{endpoint} answered HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
    },

    /// The request could not be performed at all.
    #[error("request to {endpoint} failed: {message}")]
    Request {
        endpoint: &'static str,
        message: String,
    },
}

/// One request/response exchange with explicit timeout; no retries of its own.
#[async_trait]
pub trait ProvTransport: Send + Sync {
    /// POSTs `body` to `endpoint` and resolves to the response payload, an
    /// application-level error, or a timeout.
    async fn exchange(
        &self,
        endpoint: Endpoint,
        body: Vec<u8>,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError>;
}
