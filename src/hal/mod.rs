//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `udp`: `std::net::UdpSocket` transport (requires `std` feature)
//! - `esp32`: ESP32 GPIO and WiFi for the real sign (requires `esp32` feature)

pub mod mock;

#[cfg(feature = "std")]
pub mod udp;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "std")]
pub use udp::*;

#[cfg(feature = "esp32")]
pub use esp32::*;
