//! Transport adapters for the [`ProvTransport`] port.
//!
//! [`ProvTransport`]: crate::application::transport::ProvTransport

pub mod http;
pub mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;
