//! prov-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! # What does prov-client do? (for beginners)
//!
//! A headless device that has no Wi-Fi credentials yet raises a temporary
//! soft AP.  Whoever associates with that AP can reach the device's
//! provisioning endpoints and hand it the credentials of the real network.
//! This crate is that client side:
//!
//! 1. Negotiates an (unsecured) session with the device's command endpoint;
//!    the soft-AP association itself is the trust boundary.
//! 2. Drives a network scan on the device to completion and pages through
//!    the results, filtering out entries too weak to be worth joining.
//! 3. Submits the chosen SSID and passphrase, applies them, and polls until
//!    the device reports whether its station interface actually joined.
//! 4. On success, shuts the provisioning manager down and fetches the
//!    device's homepage URL to hand the user off; on failure, resets the
//!    manager so the user can try different credentials.
//!
//! All of it runs over a single unreliable request/response channel, so
//! every exchange carries an explicit timeout and the whole flow is a
//! phase-gated state machine ([`application::Provisioner`]).

/// Application layer: orchestrators, state machine, and ports.
pub mod application;

/// Domain layer: pure types, validation, configuration.
pub mod domain;

/// Infrastructure layer: HTTP and mock transport adapters.
pub mod infrastructure;

pub use application::{
    ConnectionOutcome, Endpoint, ProvTransport, Provisioner, ProvisioningError, ScanOutcome,
    TransportError,
};
pub use domain::{CredentialError, Paginator, ProvisionerConfig, ProvisioningPhase, WifiCredentials};
