//! HTTP adapter for the transport port.
//!
//! Every exchange is one POST to the device.  The binary endpoints take the
//! payload as opaque form bytes; the custom endpoint takes JSON text.  The
//! per-exchange timeout is applied on the request itself, and a reqwest
//! timeout is mapped to [`TransportError::Timeout`] so the orchestrators can
//! tell "no answer" apart from "bad answer".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::trace;

use crate::application::transport::{Endpoint, ProvTransport, TransportError};

/// Transport over plain HTTP to the device's soft-AP address.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport for a device base URL such as
    /// `http://192.168.4.1`.  A trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl ProvTransport for HttpTransport {
    async fn exchange(
        &self,
        endpoint: Endpoint,
        body: Vec<u8>,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.url_for(endpoint);
        let content_type = if endpoint.is_binary() {
            "application/x-www-form-urlencoded"
        } else {
            "text/plain"
        };
        trace!(%url, bytes = body.len(), "POST");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .header(ACCEPT, "text/plain")
            .timeout(timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        endpoint: endpoint.path(),
                        timeout_ms: timeout.as_millis() as u64,
                    }
                } else {
                    TransportError::Request {
                        endpoint: endpoint.path(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint: endpoint.path(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    endpoint: endpoint.path(),
                    timeout_ms: timeout.as_millis() as u64,
                }
            } else {
                TransportError::Request {
                    endpoint: endpoint.path(),
                    message: e.to_string(),
                }
            }
        })?;
        Ok(bytes.to_vec())
    }
}
