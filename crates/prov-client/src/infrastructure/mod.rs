//! Infrastructure layer: adapters behind the application-layer ports.

pub mod transport;
