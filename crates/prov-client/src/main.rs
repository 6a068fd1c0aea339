//! SoftAP provisioning client entry point.
//!
//! Drives a complete provisioning run from the terminal:
//!
//! ```text
//! main()
//!  └─ Provisioner::start()        -- session + initial scan
//!  └─ print scan results          -- paginated, strongest context for the user
//!  └─ Provisioner::submit()       -- when --ssid was given
//!       ├─ Connected  -> print the post-provisioning redirect URL
//!       └─ Failed     -> print the device-reported reason
//! ```
//!
//! Without `--ssid` the run stops after printing the scan results, which is
//! handy for checking what the device can see before committing credentials.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use prov_client::application::ConnectionOutcome;
use prov_client::domain::{Paginator, ProvisionerConfig};
use prov_client::infrastructure::transport::HttpTransport;
use prov_client::{Provisioner, ScanOutcome};

/// Provision a headless device's Wi-Fi credentials over its soft AP.
#[derive(Debug, Parser)]
#[command(name = "prov-client", version, about)]
struct Args {
    /// Base URL of the device's provisioning endpoints.
    #[arg(long, env = "PROV_BASE_URL", default_value = "http://192.168.4.1")]
    base_url: String,

    /// Network to join.  When omitted, only the scan is performed.
    #[arg(long)]
    ssid: Option<String>,

    /// WPA passphrase.  Leave empty to provision an open network.
    #[arg(long, default_value = "")]
    passphrase: String,

    /// Optional TOML file overriding the default tuning constants.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            ProvisionerConfig::from_toml_str(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => ProvisionerConfig::default(),
    };

    info!(base_url = %args.base_url, "provisioning client starting");

    let transport = Arc::new(HttpTransport::new(&args.base_url));
    let mut provisioner = Provisioner::new(transport, config.clone());

    let scan = provisioner
        .start()
        .await
        .context("session negotiation or initial scan failed")?;
    print_scan_results(&scan, config.scan.results_per_page);

    let Some(ssid) = args.ssid else {
        info!("no --ssid given; scan-only run complete");
        return Ok(());
    };

    println!("Connecting to {ssid} …");
    match provisioner
        .submit(&ssid, &args.passphrase)
        .await
        .context("provisioning attempt failed")?
    {
        ConnectionOutcome::Connected { redirect_uri } => {
            println!("Success: device joined {ssid}.");
            match redirect_uri {
                Some(uri) => println!("Device homepage: {uri}"),
                None => println!("Device homepage unavailable; provisioning still complete."),
            }
        }
        ConnectionOutcome::Failed { reason } => {
            println!("Connection failed: {reason}.");
            println!("The device has been reset; rerun with different credentials.");
        }
    }

    Ok(())
}

/// Prints the filtered result set page by page, the way a UI would show it.
fn print_scan_results(scan: &ScanOutcome, page_size: usize) {
    println!(
        "Found {} network(s) ({} reported, {} below signal threshold):",
        scan.display_count(),
        scan.reported_count,
        scan.discarded
    );

    let mut paginator = Paginator::new(scan.display_count(), page_size);
    loop {
        if paginator.page_count() > 1 {
            println!(
                "-- page {}/{} --",
                paginator.current_page() + 1,
                paginator.page_count()
            );
        }
        for entry in &scan.entries[paginator.page_range()] {
            println!(
                "  {:<32}  {:>4} dBm  {}",
                entry.ssid_lossy(),
                entry.rssi,
                entry.auth
            );
        }
        if !paginator.next_page() {
            break;
        }
    }
}
