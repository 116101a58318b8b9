//! Network abstraction traits for UDP transport and time sync.
//!
//! This module defines traits for network connectivity, enabling the SNTP
//! client to run against real sockets on desktop and ESP32, and against
//! mocks in tests.
//!
//! # Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`UdpTransport`] | Datagram send/receive for the SNTP exchange |
//! | [`TimeSync`] | A source of wall-clock time (SNTP, or anything else) |
//!
//! # SNTP Exchange
//!
//! The sign speaks plain SNTP over UDP:
//!
//! ```text
//! local:2390  --- 48-byte request -->  pool.ntp.org:123
//! local:2390  <-- 48-byte reply   ---  pool.ntp.org:123
//! ```
//!
//! Only the Transmit Timestamp seconds field of the reply is used; the
//! sign has no need for sub-second accuracy.

use core::net::SocketAddr;
use core::time::Duration;

/// Seconds since the Unix epoch (1970-01-01 00:00:00 UTC).
///
/// Signed so that arithmetic around the epoch and NTP era boundaries
/// stays well-defined.
pub type EpochSeconds = i64;

// ============================================================================
// UDP Transport Trait (Sync-First Design)
// ============================================================================

/// UDP transport trait for datagram exchange.
///
/// This trait uses a **sync-first design** that works on both ESP32 (blocking
/// I/O over lwIP sockets) and desktop (`std::net::UdpSocket`). The design
/// prioritizes embedded compatibility; there is no async surface because an
/// SNTP exchange is a single request/reply.
///
/// # Implementation Notes
///
/// - `try_recv` must never block; it drains whatever is already queued
/// - `recv_timeout` blocks for at most the given duration
/// - The socket should be bound once at construction and reused for the
///   life of the client
///
/// # Example
///
/// ```rust,ignore
/// use rs_openbot::traits::UdpTransport;
///
/// fn drain<S: UdpTransport>(socket: &mut S) -> Result<(), S::Error> {
///     let mut buf = [0u8; 64];
///     while socket.try_recv(&mut buf)?.is_some() {}
///     Ok(())
/// }
/// ```
pub trait UdpTransport {
    /// Error type for socket operations.
    type Error;

    /// Send a datagram to the given address (blocking).
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<usize, Self::Error>;

    /// Try to receive a queued datagram (non-blocking).
    ///
    /// Returns `Ok(None)` if nothing is waiting. This must never block.
    /// If the datagram is larger than `buf`, the excess is discarded and
    /// the returned length is `buf.len()`.
    fn try_recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, Self::Error>;

    /// Receive a datagram, waiting at most `timeout`.
    ///
    /// Returns `Ok(None)` if the timeout elapses with nothing received.
    /// A zero timeout behaves like [`try_recv`](Self::try_recv).
    fn recv_timeout(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<(usize, SocketAddr)>, Self::Error>;
}

// ============================================================================
// Time Sync Trait
// ============================================================================

/// A source of wall-clock time.
///
/// The canonical implementation is [`NtpClient`](crate::ntp::NtpClient),
/// which performs one SNTP exchange per call. The trait exists so the sign
/// controller and demos can be fed canned time in tests.
///
/// # Return Value
///
/// - `Ok(Some(secs))`: a fix was obtained; `secs` is Unix time
/// - `Ok(None)`: the source had no answer (for SNTP, the server did not
///   reply in time); callers keep their previous notion of time
/// - `Err(_)`: the transport itself failed
pub trait TimeSync {
    /// Error type for sync operations.
    type Error;

    /// Attempt to obtain the current Unix time.
    fn fetch_time(&mut self) -> Result<Option<EpochSeconds>, Self::Error>;
}
