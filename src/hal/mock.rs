//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware and network traits,
//! enabling development and testing on desktop without a sign attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockPin`] | [`DigitalOutput`] | Records every state written to the line |
//! | [`MockMotor`] | [`MotorDriver`] | Tracks the current direction and drive history |
//! | [`MockSocket`] | [`UdpTransport`] | Scripted datagram exchange |
//!
//! # Example
//!
//! ```rust
//! use rs_openbot::sign::SignController;
//! use rs_openbot::messages::SpaceState;
//! use rs_openbot::hal::MockMotor;
//! use rs_openbot::traits::Direction;
//!
//! // Create controller with mock motor
//! let mut sign = SignController::new(MockMotor::new());
//! sign.set_state(SpaceState::Open, 0).unwrap();
//!
//! // Verify via the mock's public fields
//! assert_eq!(sign.motor().direction, Direction::Clockwise);
//! assert_eq!(sign.motor().drive_log, vec![Direction::Clockwise]);
//! ```
//!
//! [`DigitalOutput`]: crate::traits::DigitalOutput
//! [`MotorDriver`]: crate::traits::MotorDriver
//! [`UdpTransport`]: crate::traits::UdpTransport

use core::net::{IpAddr, Ipv4Addr, SocketAddr};
use core::time::Duration;

use alloc::vec::Vec;

use crate::traits::{DigitalOutput, Direction, MotorDriver, PinState, UdpTransport};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock digital output for testing.
///
/// Records every state written so tests can check both where a line
/// ended up and how it got there.
///
/// # Example
///
/// ```rust
/// use rs_openbot::hal::MockPin;
/// use rs_openbot::traits::{DigitalOutput, PinState};
///
/// let mut pin = MockPin::new();
/// pin.activate().unwrap();
/// pin.deactivate().unwrap();
///
/// assert_eq!(pin.state, PinState::Inactive);
/// assert_eq!(pin.history, vec![PinState::Active, PinState::Inactive]);
/// ```
#[derive(Debug, Default)]
pub struct MockPin {
    /// Current line state.
    pub state: PinState,
    /// Every state written, in order.
    pub history: Vec<PinState>,
}

impl MockPin {
    /// Creates a new mock pin, inactive with an empty history.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DigitalOutput for MockPin {
    type Error = ();

    fn set_state(&mut self, state: PinState) -> Result<(), ()> {
        self.state = state;
        self.history.push(state);
        Ok(())
    }
}

/// Mock motor driver for testing.
///
/// Records all drive calls for verification. Use the public fields to
/// inspect state after test operations.
///
/// # Example
///
/// ```rust
/// use rs_openbot::hal::MockMotor;
/// use rs_openbot::traits::{MotorDriver, Direction};
///
/// let mut motor = MockMotor::new();
/// motor.drive(Direction::Clockwise).unwrap();
/// motor.stop().unwrap();
///
/// assert_eq!(motor.direction, Direction::Stop);
/// assert_eq!(motor.drive_log, vec![Direction::Clockwise, Direction::Stop]);
/// ```
#[derive(Debug, Default)]
pub struct MockMotor {
    /// Current direction.
    pub direction: Direction,
    /// Every direction driven, in order.
    pub drive_log: Vec<Direction>,
}

impl MockMotor {
    /// Creates a new mock motor, stopped with an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MotorDriver for MockMotor {
    type Error = ();

    fn drive(&mut self, direction: Direction) -> Result<(), ()> {
        self.direction = direction;
        self.drive_log.push(direction);
        Ok(())
    }
}

// ============================================================================
// Network Mocks
// ============================================================================

/// Mock UDP transport for testing.
///
/// Datagrams live in two queues. Whatever is in `incoming` can be
/// received right away; it stands in for packets that were already
/// sitting on the socket. Datagrams queued with
/// [`queue_response`](Self::queue_response) are held back until
/// `send_to` is called, which models a server that only answers
/// requests.
///
/// # Example
///
/// ```rust
/// use rs_openbot::hal::MockSocket;
/// use rs_openbot::traits::UdpTransport;
/// use core::time::Duration;
///
/// let mut socket = MockSocket::new();
/// socket.queue_response(&[7u8; 48]);
///
/// // Nothing receivable before the request goes out.
/// let mut buf = [0u8; 48];
/// assert_eq!(socket.try_recv(&mut buf).unwrap(), None);
///
/// socket.send_to(&[0u8; 48], "203.0.113.1:123".parse().unwrap()).unwrap();
/// let (n, _) = socket.recv_timeout(&mut buf, Duration::from_secs(1)).unwrap().unwrap();
/// assert_eq!(n, 48);
/// ```
#[derive(Debug)]
pub struct MockSocket {
    /// Datagrams receivable immediately.
    pub incoming: Vec<Vec<u8>>,
    /// Datagrams released into `incoming` when `send_to` is called.
    pub responses: Vec<Vec<u8>>,
    /// Every datagram sent, with its destination.
    pub sent: Vec<(Vec<u8>, SocketAddr)>,
    /// Timeout passed to each `recv_timeout` call.
    pub recv_timeouts: Vec<Duration>,
    /// When true, `send_to` fails.
    pub fail_sends: bool,
    /// Source address reported for received datagrams.
    pub peer: SocketAddr,
}

impl MockSocket {
    /// Creates a new mock socket with empty queues.
    pub fn new() -> Self {
        Self {
            incoming: Vec::new(),
            responses: Vec::new(),
            sent: Vec::new(),
            recv_timeouts: Vec::new(),
            fail_sends: false,
            peer: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 1)), 123),
        }
    }

    /// Queue a datagram as already sitting on the socket.
    pub fn queue_stale(&mut self, datagram: &[u8]) {
        self.incoming.push(datagram.to_vec());
    }

    /// Queue a datagram to be delivered after the next send.
    pub fn queue_response(&mut self, datagram: &[u8]) {
        self.responses.push(datagram.to_vec());
    }

    fn pop_incoming(&mut self, buf: &mut [u8]) -> Option<(usize, SocketAddr)> {
        if self.incoming.is_empty() {
            return None;
        }
        let datagram = self.incoming.remove(0);
        let n = datagram.len().min(buf.len());
        buf[..n].copy_from_slice(&datagram[..n]);
        Some((n, self.peer))
    }
}

impl Default for MockSocket {
    fn default() -> Self {
        Self::new()
    }
}

impl UdpTransport for MockSocket {
    type Error = ();

    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<usize, ()> {
        if self.fail_sends {
            return Err(());
        }
        self.sent.push((buf.to_vec(), addr));
        self.incoming.append(&mut self.responses);
        Ok(buf.len())
    }

    fn try_recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, ()> {
        Ok(self.pop_incoming(buf))
    }

    fn recv_timeout(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<(usize, SocketAddr)>, ()> {
        self.recv_timeouts.push(timeout);
        Ok(self.pop_incoming(buf))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // MockPin Tests
    // =========================================================================

    #[test]
    fn mock_pin_default() {
        let pin = MockPin::new();
        assert_eq!(pin.state, PinState::Inactive);
        assert!(pin.history.is_empty());
    }

    #[test]
    fn mock_pin_records_history() {
        let mut pin = MockPin::new();
        pin.activate().unwrap();
        pin.activate().unwrap();
        pin.deactivate().unwrap();

        assert_eq!(pin.state, PinState::Inactive);
        assert_eq!(
            pin.history,
            vec![PinState::Active, PinState::Active, PinState::Inactive]
        );
    }

    // =========================================================================
    // MockMotor Tests
    // =========================================================================

    #[test]
    fn mock_motor_default() {
        let motor = MockMotor::new();
        assert_eq!(motor.direction, Direction::Stop);
        assert!(motor.drive_log.is_empty());
    }

    #[test]
    fn mock_motor_records_drives() {
        let mut motor = MockMotor::new();
        motor.drive(Direction::Clockwise).unwrap();
        motor.drive(Direction::CounterClockwise).unwrap();
        motor.stop().unwrap();

        assert_eq!(motor.direction, Direction::Stop);
        assert_eq!(
            motor.drive_log,
            vec![
                Direction::Clockwise,
                Direction::CounterClockwise,
                Direction::Stop
            ]
        );
    }

    // =========================================================================
    // MockSocket Tests
    // =========================================================================

    fn dest() -> SocketAddr {
        "203.0.113.1:123".parse().unwrap()
    }

    #[test]
    fn mock_socket_default() {
        let socket = MockSocket::new();
        assert!(socket.incoming.is_empty());
        assert!(socket.responses.is_empty());
        assert!(socket.sent.is_empty());
        assert!(socket.recv_timeouts.is_empty());
    }

    #[test]
    fn stale_datagrams_are_receivable_immediately() {
        let mut socket = MockSocket::new();
        socket.queue_stale(&[1, 2, 3]);

        let mut buf = [0u8; 8];
        let (n, from) = socket.try_recv(&mut buf).unwrap().unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buf[..n], &[1, 2, 3]);
        assert_eq!(from, socket.peer);
        assert_eq!(socket.try_recv(&mut buf).unwrap(), None);
    }

    #[test]
    fn responses_held_until_send() {
        let mut socket = MockSocket::new();
        socket.queue_response(&[9u8; 4]);

        let mut buf = [0u8; 8];
        assert_eq!(socket.try_recv(&mut buf).unwrap(), None);

        socket.send_to(&[0u8; 2], dest()).unwrap();
        assert!(socket.try_recv(&mut buf).unwrap().is_some());
    }

    #[test]
    fn send_is_recorded() {
        let mut socket = MockSocket::new();
        let sent = socket.send_to(&[5, 6], dest()).unwrap();
        assert_eq!(sent, 2);
        assert_eq!(socket.sent.len(), 1);
        assert_eq!(socket.sent[0].0, vec![5, 6]);
        assert_eq!(socket.sent[0].1, dest());
    }

    #[test]
    fn send_failure_is_injectable() {
        let mut socket = MockSocket::new();
        socket.fail_sends = true;
        assert!(socket.send_to(&[0u8; 2], dest()).is_err());
        assert!(socket.sent.is_empty());
    }

    #[test]
    fn oversized_datagram_truncates_to_buffer() {
        let mut socket = MockSocket::new();
        socket.queue_stale(&[7u8; 64]);

        let mut buf = [0u8; 48];
        let (n, _) = socket.try_recv(&mut buf).unwrap().unwrap();
        assert_eq!(n, 48);
        assert_eq!(buf, [7u8; 48]);
    }

    #[test]
    fn recv_timeout_records_each_wait() {
        let mut socket = MockSocket::new();
        let mut buf = [0u8; 8];

        assert_eq!(
            socket
                .recv_timeout(&mut buf, Duration::from_millis(100))
                .unwrap(),
            None
        );
        assert_eq!(
            socket
                .recv_timeout(&mut buf, Duration::from_millis(50))
                .unwrap(),
            None
        );
        assert_eq!(
            socket.recv_timeouts,
            vec![Duration::from_millis(100), Duration::from_millis(50)]
        );
    }

    #[test]
    fn fifo_ordering_across_queues() {
        let mut socket = MockSocket::new();
        socket.queue_stale(&[1]);
        socket.queue_response(&[2]);
        socket.queue_response(&[3]);
        socket.send_to(&[0], dest()).unwrap();

        let mut buf = [0u8; 4];
        let order: Vec<u8> = (0..3)
            .map(|_| {
                let (n, _) = socket.try_recv(&mut buf).unwrap().unwrap();
                assert_eq!(n, 1);
                buf[0]
            })
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }
}
