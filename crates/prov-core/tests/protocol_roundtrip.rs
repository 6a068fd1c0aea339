//! Integration tests for the prov-core codec.
//!
//! Rather than enumerating every message in isolation, these tests replay the
//! conversations a real provisioning run produces (session grant, a full
//! scan cycle, a full config cycle) through the public encode/decode API,
//! checking that both directions of each exchange survive the wire.

use prov_core::{
    decode_config, decode_scan, decode_session, encode_config, encode_scan, encode_session,
    ConfigStatusResponse, ConnectFailReason, ScanEntry, ScanResultRequest, ScanResultResponse,
    ScanStartCommand, ScanStatusResponse, SessionData, SetConfigCommand, StationState,
    WifiAuthMode, WifiConfigPayload, WifiScanPayload, STATUS_SUCCESS,
};

#[test]
fn test_session_negotiation_exchange() {
    // Client side: build and encode the sec0 request.
    let request_bytes = encode_session(&SessionData::Command).expect("encode command");

    // Device side: decode the request, answer with a grant.
    assert_eq!(decode_session(&request_bytes).unwrap(), SessionData::Command);
    let response_bytes = encode_session(&SessionData::Response {
        status: STATUS_SUCCESS,
    })
    .expect("encode response");

    // Client side: the grant comes back intact.
    match decode_session(&response_bytes).unwrap() {
        SessionData::Response { status } => assert_eq!(status, STATUS_SUCCESS),
        other => panic!("expected Response, got {other:?}"),
    }
}

#[test]
fn test_full_scan_cycle_exchanges() {
    // Status probe → "no scan yet".
    let probe = encode_scan(&WifiScanPayload::CmdScanStatus).unwrap();
    assert_eq!(decode_scan(&probe).unwrap(), WifiScanPayload::CmdScanStatus);

    let no_scan_yet = encode_scan(&WifiScanPayload::RespScanStatus(ScanStatusResponse {
        status: 0,
        scan_finished: true,
        result_count: 0,
    }))
    .unwrap();
    match decode_scan(&no_scan_yet).unwrap() {
        WifiScanPayload::RespScanStatus(s) => {
            assert!(s.scan_finished);
            assert_eq!(s.result_count, 0);
        }
        other => panic!("expected RespScanStatus, got {other:?}"),
    }

    // Scan start with the standard parameters.
    let start = encode_scan(&WifiScanPayload::CmdScanStart(ScanStartCommand {
        blocking: true,
        passive: false,
        group_channels: 3,
        period_ms: 150,
    }))
    .unwrap();
    match decode_scan(&start).unwrap() {
        WifiScanPayload::CmdScanStart(cmd) => {
            assert!(cmd.blocking);
            assert!(!cmd.passive);
            assert_eq!(cmd.group_channels, 3);
            assert_eq!(cmd.period_ms, 150);
        }
        other => panic!("expected CmdScanStart, got {other:?}"),
    }

    // Windowed retrieval: (start_index 5, count 2) answered with two entries.
    let window = encode_scan(&WifiScanPayload::CmdScanResult(ScanResultRequest {
        start_index: 5,
        count: 2,
    }))
    .unwrap();
    assert_eq!(
        decode_scan(&window).unwrap(),
        WifiScanPayload::CmdScanResult(ScanResultRequest {
            start_index: 5,
            count: 2,
        })
    );

    let page = encode_scan(&WifiScanPayload::RespScanResult(ScanResultResponse {
        status: 0,
        entries: vec![
            ScanEntry {
                ssid: b"home-2.4".to_vec(),
                rssi: -48,
                auth: WifiAuthMode::WpaWpa2Psk,
            },
            ScanEntry {
                ssid: b"neighbour".to_vec(),
                rssi: -91,
                auth: WifiAuthMode::Wpa2Enterprise,
            },
        ],
    }))
    .unwrap();
    match decode_scan(&page).unwrap() {
        WifiScanPayload::RespScanResult(r) => {
            assert_eq!(r.entries.len(), 2);
            assert_eq!(r.entries[0].ssid_lossy(), "home-2.4");
            assert_eq!(r.entries[1].rssi, -91);
        }
        other => panic!("expected RespScanResult, got {other:?}"),
    }
}

#[test]
fn test_full_config_cycle_exchanges() {
    // Submit credentials.
    let submit = encode_config(&WifiConfigPayload::CmdSetConfig(SetConfigCommand {
        ssid: b"home-2.4".to_vec(),
        passphrase: b"correct horse".to_vec(),
    }))
    .unwrap();
    match decode_config(&submit).unwrap() {
        WifiConfigPayload::CmdSetConfig(cmd) => {
            assert_eq!(cmd.ssid, b"home-2.4");
            assert_eq!(cmd.passphrase, b"correct horse");
        }
        other => panic!("expected CmdSetConfig, got {other:?}"),
    }

    let accepted = encode_config(&WifiConfigPayload::RespSetConfig { status: 0 }).unwrap();
    assert_eq!(
        decode_config(&accepted).unwrap(),
        WifiConfigPayload::RespSetConfig { status: 0 }
    );

    // Apply, then poll: connecting → connected.
    let apply = encode_config(&WifiConfigPayload::CmdApplyConfig).unwrap();
    assert_eq!(
        decode_config(&apply).unwrap(),
        WifiConfigPayload::CmdApplyConfig
    );

    let connecting = encode_config(&WifiConfigPayload::RespGetStatus(ConfigStatusResponse {
        status: 0,
        sta_state: StationState::Connecting,
        fail_reason: ConnectFailReason::AuthError,
    }))
    .unwrap();
    match decode_config(&connecting).unwrap() {
        WifiConfigPayload::RespGetStatus(s) => {
            assert_eq!(s.sta_state, StationState::Connecting)
        }
        other => panic!("expected RespGetStatus, got {other:?}"),
    }

    let connected = encode_config(&WifiConfigPayload::RespGetStatus(ConfigStatusResponse {
        status: 0,
        sta_state: StationState::Connected,
        fail_reason: ConnectFailReason::AuthError,
    }))
    .unwrap();
    match decode_config(&connected).unwrap() {
        WifiConfigPayload::RespGetStatus(s) => {
            assert_eq!(s.sta_state, StationState::Connected)
        }
        other => panic!("expected RespGetStatus, got {other:?}"),
    }
}

#[test]
fn test_families_do_not_cross_decode() {
    // A config RespGetStatus decoded as a scan payload must not silently
    // produce a valid scan message with the same kind byte and garbage
    // fields that happen to parse: the scan RespScanStart (kind 1) only
    // needs one status byte, so the bytes *do* parse.  This test documents
    // that family separation is the caller's responsibility: each endpoint
    // decodes only its own family.
    let config_bytes = encode_config(&WifiConfigPayload::RespGetStatus(ConfigStatusResponse {
        status: 0,
        sta_state: StationState::Connected,
        fail_reason: ConnectFailReason::AuthError,
    }))
    .unwrap();
    let as_scan = decode_scan(&config_bytes).unwrap();
    assert_eq!(as_scan, WifiScanPayload::RespScanStart { status: 0 });
}
