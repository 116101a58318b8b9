//! Trait definitions for hardware abstraction and networking.
//!
//! This module defines the core abstractions that allow rs-openbot to:
//! - Run on different hardware (ESP32, desktop mock)
//! - Use different network implementations
//!
//! # Submodules
//!
//! - `hardware`: Digital output lines and the dial motor driver
//! - `network`: UDP transport and time sync traits
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`DigitalOutput`]: A single motor enable line
//! - [`MotorDriver`]: Two-direction dial motor control
//!
//! # Networking
//!
//! Time comes in over UDP:
//!
//! - [`UdpTransport`]: Datagram send/receive for the SNTP exchange
//! - [`TimeSync`]: A source of wall-clock time

pub mod hardware;
pub mod network;

pub use hardware::*;
pub use network::*;
