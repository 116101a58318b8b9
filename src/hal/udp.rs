//! [`UdpTransport`] over `std::net::UdpSocket`.
//!
//! Used on desktop and on ESP32, where esp-idf provides the `std`
//! networking stack over lwIP. The socket is bound once and reused for
//! every exchange, so the sign keeps one local port for its whole
//! uptime.
//!
//! # Example
//!
//! ```rust
//! use rs_openbot::hal::StdUdpTransport;
//! use rs_openbot::traits::UdpTransport;
//!
//! let mut socket = StdUdpTransport::bind(0).unwrap();
//! let mut buf = [0u8; 48];
//! assert!(socket.try_recv(&mut buf).unwrap().is_none());
//! ```

use core::net::SocketAddr;
use core::time::Duration;
use std::io;
use std::net::UdpSocket;

use log::debug;

use crate::traits::UdpTransport;

/// A bound UDP socket implementing [`UdpTransport`].
///
/// Blocking mode is managed per call: `try_recv` flips the socket to
/// non-blocking, `recv_timeout` back to blocking with a read timeout.
#[derive(Debug)]
pub struct StdUdpTransport {
    socket: UdpSocket,
}

impl StdUdpTransport {
    /// Bind a socket on all interfaces at `local_port`.
    ///
    /// Port 0 asks the OS for an ephemeral port.
    pub fn bind(local_port: u16) -> io::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", local_port))?;
        debug!("udp socket bound on {}", socket.local_addr()?);
        Ok(Self { socket })
    }

    /// Wrap an already bound socket.
    pub fn from_socket(socket: UdpSocket) -> Self {
        Self { socket }
    }

    /// The local address the socket is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl UdpTransport for StdUdpTransport {
    type Error = io::Error;

    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        self.socket.send_to(buf, addr)
    }

    fn try_recv(&mut self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>> {
        self.socket.set_nonblocking(true)?;
        match self.socket.recv_from(buf) {
            Ok((n, from)) => Ok(Some((n, from))),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn recv_timeout(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> io::Result<Option<(usize, SocketAddr)>> {
        // set_read_timeout rejects a zero duration
        if timeout.is_zero() {
            return self.try_recv(buf);
        }
        self.socket.set_nonblocking(false)?;
        self.socket.set_read_timeout(Some(timeout))?;
        match self.socket.recv_from(buf) {
            Ok((n, from)) => Ok(Some((n, from))),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
