//! SNTP time fetch over UDP.
//!
//! The sign needs wall-clock time for exactly one thing: printing the
//! projected closing time next to the status message. A single SNTP
//! exchange per resync interval is plenty; there is no drift tracking
//! and no sub-second math.
//!
//! # Wire Format
//!
//! Requests and replies are both 48-byte datagrams:
//!
//! | Offset | Field | Request value |
//! |--------|-------|---------------|
//! | 0 | LI / Version / Mode | `0xE3` (LI 3, version 4, mode 3 client) |
//! | 1 | Stratum | `0` |
//! | 2 | Poll | `6` |
//! | 3 | Precision | `0xEC` |
//! | 12..16 | Reference ID | `"1N14"` |
//! | 40..44 | Transmit Timestamp, seconds | `0` in request; parsed from reply |
//!
//! Everything else is zero. Only the Transmit Timestamp seconds word of
//! the reply is read; it counts seconds since 1900-01-01, which
//! [`ntp_to_unix`] shifts onto the Unix epoch.
//!
//! # Fetch Protocol
//!
//! [`NtpClient::fetch_time`] drains any stale datagrams still queued on
//! the socket, sends one request, then waits up to the configured
//! timeout for a reply of at least 48 bytes. Runt datagrams are consumed
//! and ignored without resetting the deadline. The first qualifying
//! reply wins.
//!
//! # Example
//!
//! ```rust
//! use rs_openbot::ntp::{NtpClient, ntp_to_unix};
//! use rs_openbot::hal::MockSocket;
//!
//! let mut reply = [0u8; 48];
//! reply[40..44].copy_from_slice(&3_913_056_000u32.to_be_bytes());
//!
//! let mut socket = MockSocket::new();
//! socket.queue_response(&reply);
//!
//! let server = "203.0.113.1:123".parse().unwrap();
//! let mut client = NtpClient::new(socket, server);
//! let fix = client.fetch_time().unwrap();
//! assert_eq!(fix, Some(1_704_067_200));
//! ```

use crate::traits::EpochSeconds;

#[cfg(feature = "std")]
use core::net::SocketAddr;
#[cfg(feature = "std")]
use core::time::Duration;
#[cfg(feature = "std")]
use log::{debug, info, warn};
#[cfg(feature = "std")]
use std::time::Instant;

#[cfg(feature = "std")]
use crate::traits::{TimeSync, UdpTransport};

/// Size of an SNTP request or reply datagram in bytes.
pub const NTP_PACKET_LEN: usize = 48;

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch (1970-01-01).
pub const NTP_EPOCH_OFFSET: i64 = 2_208_988_800;

/// Byte offset of the Transmit Timestamp seconds word in a reply.
const TRANSMIT_SECONDS_OFFSET: usize = 40;

/// Client tag placed in the Reference ID field of the request.
const REFERENCE_ID: &[u8; 4] = b"1N14";

// ============================================================================
// Wire Format Helpers
// ============================================================================

/// Build a 48-byte SNTP request.
///
/// The first word asks for version 4, mode 3 (client), with the leap
/// indicator set to 3 (clock unsynchronized). Poll is 2^6 seconds and
/// precision is 2^-20. Servers answer regardless of the Reference ID
/// bytes; `"1N14"` is just this client's tag.
pub fn build_request_packet() -> [u8; NTP_PACKET_LEN] {
    let mut packet = [0u8; NTP_PACKET_LEN];
    packet[0] = 0xE3;
    packet[1] = 0;
    packet[2] = 6;
    packet[3] = 0xEC;
    packet[12..16].copy_from_slice(REFERENCE_ID);
    packet
}

/// Extract the Transmit Timestamp seconds word from a reply.
///
/// The word is big-endian and counts seconds since 1900-01-01. Fractional
/// seconds in the following word are ignored.
pub fn transmit_seconds(packet: &[u8; NTP_PACKET_LEN]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&packet[TRANSMIT_SECONDS_OFFSET..TRANSMIT_SECONDS_OFFSET + 4]);
    u32::from_be_bytes(word)
}

/// Convert NTP seconds (since 1900) to Unix seconds (since 1970).
///
/// # Examples
///
/// ```
/// use rs_openbot::ntp::ntp_to_unix;
///
/// // 2024-01-01 00:00:00 UTC
/// assert_eq!(ntp_to_unix(3_913_056_000), 1_704_067_200);
/// ```
#[inline]
pub const fn ntp_to_unix(ntp_seconds: u32) -> EpochSeconds {
    ntp_seconds as EpochSeconds - NTP_EPOCH_OFFSET
}

// ============================================================================
// SNTP Client
// ============================================================================

/// Single-shot SNTP client over a [`UdpTransport`].
///
/// One call to [`fetch_time`](Self::fetch_time) performs one exchange.
/// The socket is held for the life of the client, so the local port stays
/// bound between resyncs and any late replies from a previous exchange
/// are drained before the next request goes out.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct NtpClient<S: UdpTransport> {
    socket: S,
    server: SocketAddr,
    timeout: Duration,
}

#[cfg(feature = "std")]
impl<S: UdpTransport> NtpClient<S> {
    /// How long `fetch_time` waits for a reply unless overridden.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a client that queries `server` over `socket`.
    pub fn new(socket: S, server: SocketAddr) -> Self {
        Self {
            socket,
            server,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Override the reply timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The server this client queries.
    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// Point the client at a different server.
    ///
    /// Takes effect on the next [`fetch_time`](Self::fetch_time) call; no
    /// I/O happens here.
    pub fn set_server(&mut self, server: SocketAddr) {
        self.server = server;
    }

    /// The configured reply timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Perform one SNTP exchange.
    ///
    /// Returns `Ok(Some(secs))` with Unix time on success, `Ok(None)` if
    /// no qualifying reply arrived within the timeout, and `Err` only for
    /// transport faults.
    ///
    /// The timeout window opens after the request is sent. Datagrams
    /// shorter than 48 bytes are consumed and ignored; they neither
    /// satisfy the exchange nor extend the deadline.
    pub fn fetch_time(&mut self) -> Result<Option<EpochSeconds>, S::Error> {
        let mut buf = [0u8; NTP_PACKET_LEN];

        let mut stale = 0usize;
        while self.socket.try_recv(&mut buf)?.is_some() {
            stale += 1;
        }
        if stale > 0 {
            debug!("dropped {} stale datagram(s) before request", stale);
        }

        let packet = build_request_packet();
        self.socket.send_to(&packet, self.server)?;
        debug!("request sent to {}", self.server);
        let deadline = Instant::now() + self.timeout;

        loop {
            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(d) if !d.is_zero() => d,
                _ => break,
            };
            match self.socket.recv_timeout(&mut buf, remaining)? {
                Some((n, _)) if n >= NTP_PACKET_LEN => {
                    let fix = ntp_to_unix(transmit_seconds(&buf));
                    info!("time fix: unix {}", fix);
                    return Ok(Some(fix));
                }
                Some((n, _)) => {
                    debug!("ignoring runt datagram of {} bytes", n);
                }
                None => break,
            }
        }

        warn!("no reply from {} within {:?}", self.server, self.timeout);
        Ok(None)
    }

    /// Consume the client and recover its socket.
    pub fn into_socket(self) -> S {
        self.socket
    }
}

#[cfg(feature = "std")]
impl<S: UdpTransport> TimeSync for NtpClient<S> {
    type Error = S::Error;

    fn fetch_time(&mut self) -> Result<Option<EpochSeconds>, S::Error> {
        NtpClient::fetch_time(self)
    }
}

// ============================================================================
// Synced Clock
// ============================================================================

/// Wall-clock time carried forward from the last fix.
///
/// The sign's main loop runs on a monotonic millisecond counter. This
/// type anchors that counter to Unix time whenever a fix comes in, and
/// extrapolates between fixes.
///
/// A failed fix (`record` with `None`) keeps the previous anchor, so a
/// flaky server degrades accuracy instead of resetting the clock.
///
/// # Example
///
/// ```rust
/// use rs_openbot::ntp::SyncedClock;
///
/// let mut clock = SyncedClock::new();
/// assert_eq!(clock.now(0), None);
///
/// clock.record(Some(1_704_067_200), 10_000);
/// assert_eq!(clock.now(12_500), Some(1_704_067_202));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SyncedClock {
    anchor: Option<EpochSeconds>,
    anchored_at_ms: u64,
}

impl SyncedClock {
    /// Create an unsynced clock.
    pub const fn new() -> Self {
        Self {
            anchor: None,
            anchored_at_ms: 0,
        }
    }

    /// Record the outcome of a fetch at monotonic time `now_ms`.
    ///
    /// `Some` re-anchors the clock; `None` leaves the previous anchor in
    /// place.
    pub fn record(&mut self, fix: Option<EpochSeconds>, now_ms: u64) {
        if let Some(epoch) = fix {
            self.anchor = Some(epoch);
            self.anchored_at_ms = now_ms;
        }
    }

    /// Current Unix time extrapolated from the last anchor.
    ///
    /// Returns `None` until the first successful fix. A `now_ms` earlier
    /// than the anchor point reads as the anchor itself.
    pub fn now(&self, now_ms: u64) -> Option<EpochSeconds> {
        self.anchor
            .map(|epoch| epoch + (now_ms.saturating_sub(self.anchored_at_ms) / 1000) as i64)
    }

    /// True once at least one fix has been recorded.
    pub const fn is_synced(&self) -> bool {
        self.anchor.is_some()
    }

    /// True if the anchor is missing or older than `interval_ms`.
    pub fn needs_resync(&self, now_ms: u64, interval_ms: u64) -> bool {
        match self.anchor {
            None => true,
            Some(_) => now_ms.saturating_sub(self.anchored_at_ms) >= interval_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Wire Format Tests
    // =========================================================================

    #[test]
    fn request_packet_header_bytes() {
        let packet = build_request_packet();
        assert_eq!(packet.len(), NTP_PACKET_LEN);
        assert_eq!(packet[0], 0xE3);
        assert_eq!(packet[1], 0);
        assert_eq!(packet[2], 6);
        assert_eq!(packet[3], 0xEC);
    }

    #[test]
    fn request_packet_reference_id() {
        let packet = build_request_packet();
        assert_eq!(&packet[12..16], b"1N14");
    }

    #[test]
    fn request_packet_remaining_bytes_are_zero() {
        let packet = build_request_packet();
        for (i, &b) in packet.iter().enumerate() {
            if matches!(i, 0..=3 | 12..=15) {
                continue;
            }
            assert_eq!(b, 0, "byte {} should be zero", i);
        }
    }

    #[test]
    fn transmit_seconds_reads_big_endian_word_at_40() {
        let mut packet = [0u8; NTP_PACKET_LEN];
        packet[40] = 0xE9;
        packet[41] = 0x3A;
        packet[42] = 0x8A;
        packet[43] = 0x00;
        assert_eq!(transmit_seconds(&packet), 0xE93A_8A00);
    }

    #[test]
    fn ntp_to_unix_known_instant() {
        // 2024-01-01 00:00:00 UTC
        assert_eq!(ntp_to_unix(3_913_056_000), 1_704_067_200);
    }

    #[test]
    fn ntp_to_unix_epoch_boundaries() {
        // NTP zero is 1900, which predates Unix zero by the full offset.
        assert_eq!(ntp_to_unix(0), -NTP_EPOCH_OFFSET);
        // Unix zero.
        assert_eq!(ntp_to_unix(NTP_EPOCH_OFFSET as u32), 0);
    }

    // =========================================================================
    // Synced Clock Tests
    // =========================================================================

    #[test]
    fn clock_starts_unsynced() {
        let clock = SyncedClock::new();
        assert!(!clock.is_synced());
        assert_eq!(clock.now(123_456), None);
        assert!(clock.needs_resync(0, 3_600_000));
    }

    #[test]
    fn clock_extrapolates_from_anchor() {
        let mut clock = SyncedClock::new();
        clock.record(Some(1_704_067_200), 10_000);
        assert!(clock.is_synced());
        assert_eq!(clock.now(10_000), Some(1_704_067_200));
        assert_eq!(clock.now(10_999), Some(1_704_067_200));
        assert_eq!(clock.now(11_000), Some(1_704_067_201));
        assert_eq!(clock.now(70_000), Some(1_704_067_260));
    }

    #[test]
    fn failed_fix_keeps_previous_anchor() {
        let mut clock = SyncedClock::new();
        clock.record(Some(1_704_067_200), 0);
        clock.record(None, 5_000);
        assert_eq!(clock.now(5_000), Some(1_704_067_205));
    }

    #[test]
    fn clock_reanchors_on_new_fix() {
        let mut clock = SyncedClock::new();
        clock.record(Some(1_704_067_200), 0);
        clock.record(Some(1_704_070_800), 1_000);
        assert_eq!(clock.now(2_000), Some(1_704_070_801));
    }

    #[test]
    fn needs_resync_after_interval() {
        let mut clock = SyncedClock::new();
        clock.record(Some(1_704_067_200), 1_000);
        assert!(!clock.needs_resync(1_000, 3_600_000));
        assert!(!clock.needs_resync(3_600_999, 3_600_000));
        assert!(clock.needs_resync(3_601_000, 3_600_000));
    }

    #[test]
    fn now_before_anchor_reads_as_anchor() {
        let mut clock = SyncedClock::new();
        clock.record(Some(1_704_067_200), 50_000);
        assert_eq!(clock.now(40_000), Some(1_704_067_200));
    }

    // =========================================================================
    // Client Tests (mock transport)
    // =========================================================================

    use crate::hal::MockSocket;

    fn reply_with_seconds(secs: u32) -> [u8; NTP_PACKET_LEN] {
        let mut packet = [0u8; NTP_PACKET_LEN];
        packet[40..44].copy_from_slice(&secs.to_be_bytes());
        packet
    }

    fn test_server() -> SocketAddr {
        "203.0.113.1:123".parse().unwrap()
    }

    #[test]
    fn fetch_returns_unix_time_from_reply() {
        let mut socket = MockSocket::new();
        socket.queue_response(&reply_with_seconds(3_913_056_000));

        let mut client = NtpClient::new(socket, test_server());
        assert_eq!(client.fetch_time().unwrap(), Some(1_704_067_200));
    }

    #[test]
    fn fetch_sends_one_well_formed_request() {
        let mut socket = MockSocket::new();
        socket.queue_response(&reply_with_seconds(3_913_056_000));

        let mut client = NtpClient::new(socket, test_server());
        client.fetch_time().unwrap();

        let socket = client.into_socket();
        assert_eq!(socket.sent.len(), 1);
        let (ref datagram, addr) = socket.sent[0];
        assert_eq!(addr, test_server());
        assert_eq!(datagram.len(), NTP_PACKET_LEN);
        assert_eq!(datagram[0], 0xE3);
        assert_eq!(&datagram[12..16], b"1N14");
    }

    #[test]
    fn set_server_redirects_the_next_fetch() {
        let mut socket = MockSocket::new();
        socket.queue_response(&reply_with_seconds(3_913_056_000));

        let mut client = NtpClient::new(socket, test_server());
        let other: SocketAddr = "203.0.113.9:123".parse().unwrap();
        client.set_server(other);
        client.fetch_time().unwrap();

        let socket = client.into_socket();
        assert_eq!(socket.sent[0].1, other);
    }

    #[test]
    fn fetch_times_out_as_none() {
        let socket = MockSocket::new();
        let mut client =
            NtpClient::new(socket, test_server()).with_timeout(Duration::from_millis(5000));
        assert_eq!(client.fetch_time().unwrap(), None);

        // The whole budget goes to a single blocking receive.
        let socket = client.into_socket();
        assert_eq!(socket.recv_timeouts.len(), 1);
        assert!(socket.recv_timeouts[0] <= Duration::from_millis(5000));
        assert!(socket.recv_timeouts[0] >= Duration::from_millis(4900));
    }

    #[test]
    fn stale_datagrams_are_drained_not_answered() {
        let mut socket = MockSocket::new();
        // A perfectly valid looking reply that was already queued before
        // the request went out. It must not satisfy the exchange.
        socket.queue_stale(&reply_with_seconds(1));

        let mut client =
            NtpClient::new(socket, test_server()).with_timeout(Duration::from_millis(100));
        assert_eq!(client.fetch_time().unwrap(), None);

        let socket = client.into_socket();
        assert_eq!(socket.sent.len(), 1);
    }

    #[test]
    fn stale_datagram_does_not_shadow_real_reply() {
        let mut socket = MockSocket::new();
        socket.queue_stale(&reply_with_seconds(1));
        socket.queue_response(&reply_with_seconds(3_913_056_000));

        let mut client = NtpClient::new(socket, test_server());
        assert_eq!(client.fetch_time().unwrap(), Some(1_704_067_200));
    }

    #[test]
    fn runt_datagram_is_ignored_and_polling_continues() {
        let mut socket = MockSocket::new();
        socket.queue_response(&[0u8; 20]);
        socket.queue_response(&reply_with_seconds(3_913_056_000));

        let mut client = NtpClient::new(socket, test_server());
        assert_eq!(client.fetch_time().unwrap(), Some(1_704_067_200));

        let socket = client.into_socket();
        assert_eq!(socket.recv_timeouts.len(), 2);
    }

    #[test]
    fn runt_datagrams_alone_end_in_timeout() {
        let mut socket = MockSocket::new();
        socket.queue_response(&[0u8; 47]);
        socket.queue_response(&[0u8; 1]);

        let mut client =
            NtpClient::new(socket, test_server()).with_timeout(Duration::from_millis(100));
        assert_eq!(client.fetch_time().unwrap(), None);
    }

    #[test]
    fn first_qualifying_reply_wins() {
        let mut socket = MockSocket::new();
        socket.queue_response(&reply_with_seconds(3_913_056_000));
        socket.queue_response(&reply_with_seconds(9));

        let mut client = NtpClient::new(socket, test_server());
        assert_eq!(client.fetch_time().unwrap(), Some(1_704_067_200));

        // The second reply is still queued; the client stopped reading.
        let socket = client.into_socket();
        assert_eq!(socket.incoming.len(), 1);
    }

    #[test]
    fn oversized_datagram_still_qualifies() {
        let mut big = [0u8; 60];
        big[40..44].copy_from_slice(&3_913_056_000u32.to_be_bytes());

        let mut socket = MockSocket::new();
        socket.queue_response(&big);

        let mut client = NtpClient::new(socket, test_server());
        assert_eq!(client.fetch_time().unwrap(), Some(1_704_067_200));
    }

    #[test]
    fn transport_fault_is_an_error() {
        let mut socket = MockSocket::new();
        socket.fail_sends = true;

        let mut client = NtpClient::new(socket, test_server());
        assert!(client.fetch_time().is_err());
    }
}
