//! Domain layer: pure types with no I/O or async dependencies.

pub mod config;
pub mod credentials;
pub mod pagination;
pub mod phase;

pub use config::{ProvisionerConfig, ScanConfig, TimingConfig};
pub use credentials::{CredentialError, WifiCredentials};
pub use pagination::Paginator;
pub use phase::ProvisioningPhase;
