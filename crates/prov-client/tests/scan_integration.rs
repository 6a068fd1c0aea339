//! Integration tests for the scan cycle, driven through the public
//! `Provisioner` API against a scripted mock transport.
//!
//! The scripts mirror real device behavior: the status-first probe, the
//! 1-second completion polling, windowed result retrieval, and the signal
//! filter.  Time is paused, so polling delays elapse instantly and the
//! exchange *sequence* is what gets verified.

use std::sync::Arc;

use prov_client::application::transport::Endpoint;
use prov_client::domain::{Paginator, ProvisionerConfig, ProvisioningPhase};
use prov_client::infrastructure::transport::MockTransport;
use prov_client::{ProvTransport, Provisioner, ProvisioningError, TransportError};
use prov_core::{
    decode_scan, encode_scan, encode_session, ScanEntry, ScanResultResponse, ScanStatusResponse,
    SessionData, WifiAuthMode, WifiScanPayload,
};

// ── Script helpers ────────────────────────────────────────────────────────────

fn session_grant() -> Vec<u8> {
    encode_session(&SessionData::Response { status: 0 }).unwrap()
}

fn scan_status(scan_finished: bool, result_count: u16) -> Vec<u8> {
    encode_scan(&WifiScanPayload::RespScanStatus(ScanStatusResponse {
        status: 0,
        scan_finished,
        result_count,
    }))
    .unwrap()
}

fn scan_page(entries: &[(&str, i8)]) -> Vec<u8> {
    encode_scan(&WifiScanPayload::RespScanResult(ScanResultResponse {
        status: 0,
        entries: entries
            .iter()
            .map(|(ssid, rssi)| ScanEntry {
                ssid: ssid.as_bytes().to_vec(),
                rssi: *rssi,
                auth: WifiAuthMode::Wpa2Psk,
            })
            .collect(),
    }))
    .unwrap()
}

fn scan_start_accepted() -> Vec<u8> {
    encode_scan(&WifiScanPayload::RespScanStart { status: 0 }).unwrap()
}

fn new_provisioner(transport: &Arc<MockTransport>) -> Provisioner {
    Provisioner::new(
        Arc::clone(transport) as Arc<dyn ProvTransport>,
        ProvisionerConfig::default(),
    )
}

/// Decodes every request the scan endpoint received.
fn scan_requests(transport: &MockTransport) -> Vec<WifiScanPayload> {
    transport
        .requests_for(Endpoint::Scan)
        .iter()
        .map(|body| decode_scan(body).expect("client requests must decode"))
        .collect()
}

// ── Scenario A: poll twice, then retrieve 7 results in two windows ────────────

#[tokio::test(start_paused = true)]
async fn test_scan_polls_until_finished_then_retrieves_in_windows() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue(Endpoint::Session, session_grant());
    // Another client's scan is in flight: two in-progress polls, then done.
    transport.enqueue(Endpoint::Scan, scan_status(false, 0));
    transport.enqueue(Endpoint::Scan, scan_status(false, 0));
    transport.enqueue(Endpoint::Scan, scan_status(true, 7));
    transport.enqueue(
        Endpoint::Scan,
        scan_page(&[
            ("net-0", -40),
            ("net-1", -45),
            ("net-2", -50),
            ("net-3", -55),
            ("net-4", -60),
        ]),
    );
    transport.enqueue(Endpoint::Scan, scan_page(&[("net-5", -65), ("net-6", -70)]));

    let mut provisioner = new_provisioner(&transport);
    let outcome = provisioner.start().await.expect("scan must complete");

    assert_eq!(outcome.display_count(), 7);
    assert_eq!(outcome.reported_count, 7);
    assert_eq!(outcome.discarded, 0);
    assert_eq!(provisioner.phase(), ProvisioningPhase::Ready);

    // Exactly two result requests: (0, 5) then (5, 2), nothing more.
    let requests = scan_requests(&transport);
    let windows: Vec<_> = requests
        .iter()
        .filter_map(|r| match r {
            WifiScanPayload::CmdScanResult(w) => Some((w.start_index, w.count)),
            _ => None,
        })
        .collect();
    assert_eq!(windows, vec![(0, 5), (5, 2)]);

    // Display pagination over the 7 filtered entries: 2 pages of 5 and 2.
    let mut paginator = Paginator::new(outcome.display_count(), 5);
    assert_eq!(paginator.page_count(), 2);
    assert_eq!(paginator.page_range(), 0..5);
    assert!(!paginator.has_prev());
    assert!(paginator.next_page());
    assert_eq!(paginator.page_range(), 5..7);
    assert!(!paginator.has_next());
}

// ── Scenario B: signal filter drops weak entries and counts them ──────────────

#[tokio::test(start_paused = true)]
async fn test_entries_at_or_below_threshold_are_discarded() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue(Endpoint::Session, session_grant());
    transport.enqueue(Endpoint::Scan, scan_status(true, 3));
    transport.enqueue(
        Endpoint::Scan,
        scan_page(&[("strong", -50), ("weak", -92), ("weaker", -95)]),
    );

    let mut provisioner = new_provisioner(&transport);
    let outcome = provisioner.start().await.expect("scan must complete");

    assert_eq!(outcome.display_count(), 1);
    assert_eq!(outcome.entries[0].ssid_lossy(), "strong");
    assert_eq!(outcome.discarded, 2);
    // Filtered count always equals reported minus discarded.
    assert_eq!(
        outcome.display_count(),
        (outcome.reported_count - outcome.discarded) as usize
    );
}

#[tokio::test(start_paused = true)]
async fn test_entry_exactly_at_threshold_is_discarded() {
    // The filter keeps rssi > -90, so -90 itself is dropped.
    let transport = Arc::new(MockTransport::new());
    transport.enqueue(Endpoint::Session, session_grant());
    transport.enqueue(Endpoint::Scan, scan_status(true, 2));
    transport.enqueue(Endpoint::Scan, scan_page(&[("edge", -90), ("ok", -89)]));

    let mut provisioner = new_provisioner(&transport);
    let outcome = provisioner.start().await.expect("scan must complete");

    assert_eq!(outcome.display_count(), 1);
    assert_eq!(outcome.entries[0].ssid_lossy(), "ok");
}

// ── Status-first probing ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_finished_scan_is_reused_without_a_new_scan_start() {
    // Another instance already completed a scan; this one must converge on
    // it instead of re-triggering.
    let transport = Arc::new(MockTransport::new());
    transport.enqueue(Endpoint::Session, session_grant());
    transport.enqueue(Endpoint::Scan, scan_status(true, 2));
    transport.enqueue(Endpoint::Scan, scan_page(&[("a", -40), ("b", -50)]));

    let mut provisioner = new_provisioner(&transport);
    provisioner.start().await.expect("scan must complete");

    let starts = scan_requests(&transport)
        .iter()
        .filter(|r| matches!(r, WifiScanPayload::CmdScanStart(_)))
        .count();
    assert_eq!(starts, 0, "a finished scan must not be re-triggered");
}

#[tokio::test(start_paused = true)]
async fn test_no_scan_yet_triggers_exactly_one_blocking_start() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue(Endpoint::Session, session_grant());
    // Finished with zero results = nobody has scanned yet.
    transport.enqueue(Endpoint::Scan, scan_status(true, 0));
    transport.enqueue(Endpoint::Scan, scan_start_accepted());
    transport.enqueue(Endpoint::Scan, scan_status(true, 1));
    transport.enqueue(Endpoint::Scan, scan_page(&[("only", -40)]));

    let mut provisioner = new_provisioner(&transport);
    let outcome = provisioner.start().await.expect("scan must complete");
    assert_eq!(outcome.display_count(), 1);

    let starts: Vec<_> = scan_requests(&transport)
        .into_iter()
        .filter_map(|r| match r {
            WifiScanPayload::CmdScanStart(cmd) => Some(cmd),
            _ => None,
        })
        .collect();
    assert_eq!(starts.len(), 1);
    // The standard parameters: blocking active scan, 3 channels per burst,
    // 150 ms dwell.
    assert!(starts[0].blocking);
    assert!(!starts[0].passive);
    assert_eq!(starts[0].group_channels, 3);
    assert_eq!(starts[0].period_ms, 150);
}

// ── Failure paths ─────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_device_status_error_aborts_cycle_but_keeps_session() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue(Endpoint::Session, session_grant());
    transport.enqueue(
        Endpoint::Scan,
        encode_scan(&WifiScanPayload::RespScanStatus(ScanStatusResponse {
            status: 4,
            scan_finished: false,
            result_count: 0,
        }))
        .unwrap(),
    );

    let mut provisioner = new_provisioner(&transport);
    let result = provisioner.start().await;

    assert!(matches!(
        result,
        Err(ProvisioningError::DeviceStatus { status: 4, .. })
    ));
    // The session is presumed intact; a retry is allowed without start().
    assert_eq!(provisioner.phase(), ProvisioningPhase::Ready);

    transport.enqueue(Endpoint::Scan, scan_status(true, 1));
    transport.enqueue(Endpoint::Scan, scan_page(&[("again", -40)]));
    let outcome = provisioner.rescan().await.expect("retry must succeed");
    assert_eq!(outcome.display_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_scan_transport_timeout_drops_to_uninitialized() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue(Endpoint::Session, session_grant());
    transport.enqueue_error(
        Endpoint::Scan,
        TransportError::Timeout {
            endpoint: "/prov-scan",
            timeout_ms: 13_000,
        },
    );

    let mut provisioner = new_provisioner(&transport);
    let result = provisioner.start().await;

    assert!(result.err().expect("must fail").is_timeout());
    assert_eq!(provisioner.phase(), ProvisioningPhase::Uninitialized);
}

#[tokio::test(start_paused = true)]
async fn test_garbage_response_is_a_protocol_error() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue(Endpoint::Session, session_grant());
    transport.enqueue(Endpoint::Scan, vec![0xDE, 0xAD, 0xBE, 0xEF]);

    let mut provisioner = new_provisioner(&transport);
    let result = provisioner.start().await;

    assert!(matches!(result, Err(ProvisioningError::Protocol { .. })));
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_cancel_invalidates_a_suspended_scan_cycle() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue(Endpoint::Session, session_grant());
    // Initial scan completes normally so the machine reaches Ready.
    transport.enqueue(Endpoint::Scan, scan_status(true, 1));
    transport.enqueue(Endpoint::Scan, scan_page(&[("first", -40)]));
    // The rescan sees a scan in progress and parks in the 1 s polling delay.
    transport.enqueue(Endpoint::Scan, scan_status(false, 0));

    let mut provisioner = new_provisioner(&transport);
    provisioner.start().await.expect("initial scan");
    let cancel = provisioner.cancel_handle();

    let cycle = tokio::spawn(async move {
        let result = provisioner.rescan().await;
        (provisioner, result)
    });

    // Cancel while the cycle is suspended in its polling delay.
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    cancel.cancel();

    let (provisioner, result) = cycle.await.expect("cycle task must not panic");
    assert!(matches!(result, Err(ProvisioningError::Cancelled)));
    assert_eq!(provisioner.phase(), ProvisioningPhase::Uninitialized);
    // The stale cycle must not have issued another status poll after waking.
    assert_eq!(transport.request_count(Endpoint::Scan), 3);
}
