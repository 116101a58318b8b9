//! Integration tests for the SNTP client

use rs_openbot::hal::MockSocket;
use rs_openbot::{NtpClient, SyncedClock};
use std::net::SocketAddr;
use std::time::Duration;

fn server_addr() -> SocketAddr {
    "129.6.15.28:123".parse().unwrap()
}

/// A 48-byte server reply carrying the given transmit timestamp.
fn reply_with_seconds(seconds: u32) -> Vec<u8> {
    let mut packet = vec![0u8; 48];
    packet[0] = 0x24; // LI 0, version 4, mode 4 (server)
    packet[40..44].copy_from_slice(&seconds.to_be_bytes());
    packet
}

#[test]
fn round_trip_yields_unix_time() {
    let mut socket = MockSocket::new();
    // 2024-01-01T00:00:00Z in NTP seconds
    socket.queue_response(&reply_with_seconds(3_913_056_000));

    let mut client = NtpClient::new(socket, server_addr());
    let fix = client.fetch_time().unwrap();

    assert_eq!(fix, Some(1_704_067_200));
}

#[test]
fn request_packet_is_well_formed() {
    let mut socket = MockSocket::new();
    socket.queue_response(&reply_with_seconds(3_913_056_000));

    let mut client = NtpClient::new(socket, server_addr());
    client.fetch_time().unwrap();

    let socket = client.into_socket();
    let (packet, dest) = &socket.sent[0];
    assert_eq!(dest, &server_addr());
    assert_eq!(packet.len(), 48);
    assert_eq!(&packet[0..4], &[0xE3, 0x00, 0x06, 0xEC]);
    assert_eq!(&packet[12..16], b"1N14");
}

#[test]
fn stale_datagrams_never_satisfy_a_fetch() {
    let mut socket = MockSocket::new();
    // A perfectly valid reply that was already queued before the request
    // went out. It must be drained, not returned.
    socket.queue_stale(&reply_with_seconds(3_913_056_000));

    let mut client = NtpClient::new(socket, server_addr());
    let fix = client.fetch_time().unwrap();

    assert_eq!(fix, None);
}

#[test]
fn fresh_reply_wins_over_stale_backlog() {
    let mut socket = MockSocket::new();
    socket.queue_stale(&reply_with_seconds(1_000_000));
    socket.queue_response(&reply_with_seconds(3_913_056_000));

    let mut client = NtpClient::new(socket, server_addr());
    let fix = client.fetch_time().unwrap();

    assert_eq!(fix, Some(1_704_067_200));
}

#[test]
fn runt_replies_are_skipped() {
    let mut socket = MockSocket::new();
    socket.queue_response(&[0x24; 10]);
    socket.queue_response(&reply_with_seconds(3_913_056_000));

    let mut client = NtpClient::new(socket, server_addr());
    let fix = client.fetch_time().unwrap();

    assert_eq!(fix, Some(1_704_067_200));
}

#[test]
fn silent_server_spends_the_whole_budget_once() {
    let mut client = NtpClient::new(MockSocket::new(), server_addr())
        .with_timeout(Duration::from_millis(750));

    let fix = client.fetch_time().unwrap();
    assert_eq!(fix, None);

    // One blocking wait covering (almost) the full timeout
    let socket = client.into_socket();
    assert_eq!(socket.recv_timeouts.len(), 1);
    assert!(socket.recv_timeouts[0] >= Duration::from_millis(700));
    assert!(socket.recv_timeouts[0] <= Duration::from_millis(750));
}

#[test]
fn transport_faults_surface_as_errors() {
    let mut socket = MockSocket::new();
    socket.fail_sends = true;

    let mut client = NtpClient::new(socket, server_addr());
    assert!(client.fetch_time().is_err());
}

#[test]
fn synced_clock_carries_a_fix_forward() {
    let mut clock = SyncedClock::new();
    assert!(clock.needs_resync(0, 3_600_000));

    // Fix lands at t=10s of uptime
    clock.record(Some(1_704_067_200), 10_000);
    assert!(!clock.needs_resync(20_000, 3_600_000));

    // 90 seconds of uptime later the wall clock moved 90 seconds
    assert_eq!(clock.now(100_000), Some(1_704_067_290));

    // A failed fetch keeps the old anchor ticking
    clock.record(None, 200_000);
    assert_eq!(clock.now(200_000), Some(1_704_067_390));

    // An hour after the anchor, a resync is due again
    assert!(clock.needs_resync(10_000 + 3_600_000, 3_600_000));
}
