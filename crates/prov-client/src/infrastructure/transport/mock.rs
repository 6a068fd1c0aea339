//! Mock transport for testing the orchestrators without a device.
//!
//! Replies are scripted per endpoint and consumed in FIFO order, so a test
//! reads like the exchange sequence it exercises.  Every request body is
//! recorded, letting assertions decode exactly what went on the wire and in
//! what order.  Exchanging against an endpoint with no scripted reply is a
//! test bug and fails loudly as a request error.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::transport::{Endpoint, ProvTransport, TransportError};

/// A transport that replays scripted responses and records all requests.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<Endpoint, VecDeque<Result<Vec<u8>, TransportError>>>>,
    /// Every `(endpoint, body)` observed, in arrival order.
    pub requests: Mutex<Vec<(Endpoint, Vec<u8>)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next successful reply on `endpoint`.
    pub fn enqueue(&self, endpoint: Endpoint, body: Vec<u8>) {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(Ok(body));
    }

    /// Scripts the next failure on `endpoint`.
    pub fn enqueue_error(&self, endpoint: Endpoint, error: TransportError) {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(Err(error));
    }

    /// Number of requests observed on `endpoint`.
    pub fn request_count(&self, endpoint: Endpoint) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .count()
    }

    /// Request bodies observed on `endpoint`, in arrival order.
    pub fn requests_for(&self, endpoint: Endpoint) -> Vec<Vec<u8>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

#[async_trait]
impl ProvTransport for MockTransport {
    async fn exchange(
        &self,
        endpoint: Endpoint,
        body: Vec<u8>,
        _timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().unwrap().push((endpoint, body));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(|queue| queue.pop_front());
        reply.unwrap_or_else(|| {
            Err(TransportError::Request {
                endpoint: endpoint.path(),
                message: "no scripted reply for this exchange".to_string(),
            })
        })
    }
}
