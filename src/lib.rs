//! # rs-openbot
//!
//! Controller for the Leeds Hackspace "open/closed" status sign: a motorised
//! dial swept by a two-pin driver, an SNTP client for wall-clock time, and
//! the status message tables the space announces itself with.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for digital outputs, motor drive, and UDP transport
//! - **Dial motor**: Two-pin driver with break-before-make switching and timed sweeps
//! - **SNTP client**: Single-shot time fetch with stale-datagram drain and bounded wait
//! - **Status messages**: Open/closed announcement tables with duration and closing time
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and network abstractions
//! - `motor` - Two-pin dial motor driver
//! - `ntp` - SNTP time fetch and the synced wall clock
//! - `messages` - Status message tables and rendering
//! - `sign` - Main controller that ties switch state, dial, and messages together
//! - `hal` - Concrete implementations (mock for testing, std UDP, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_openbot::{DualPinMotor, SignController, SpaceState, hal::MockPin};
//!
//! // Create a controller with mock pins
//! let motor = DualPinMotor::new(MockPin::new(), MockPin::new()).unwrap();
//! let mut sign = SignController::new(motor);
//!
//! // Someone flips the switch to "open" at t=0
//! sign.set_state(SpaceState::Open, 0).unwrap();
//! assert!(sign.is_sweeping());
//!
//! // Update in your main loop; the sweep stops after the configured run time
//! sign.update(2_000).unwrap();
//! assert!(!sign.is_sweeping());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Status message tables and announcement rendering.
pub mod messages;
/// Two-pin dial motor driver.
pub mod motor;
/// SNTP time fetch and the synced wall clock.
pub mod ntp;
/// Main sign controller coordinating switch state, dial sweeps, and messages.
pub mod sign;
/// Core traits for hardware and network abstraction.
pub mod traits;

/// Shared configuration system for desktop and ESP32.
pub mod config;

// Re-exports for convenience
pub use messages::{
    compose_announcement, messages_for, pick, SpaceState, StatusMessage, CLOSED_MESSAGES,
    OPEN_MESSAGES,
};
pub use motor::DualPinMotor;
pub use ntp::SyncedClock;
#[cfg(feature = "std")]
pub use ntp::NtpClient;
pub use sign::SignController;
pub use traits::{
    // Hardware
    DigitalOutput,
    Direction,
    // Network
    EpochSeconds,
    MotorDriver,
    PinState,
    TimeSync,
    UdpTransport,
};

// Config re-exports
pub use config::{Config, DeviceConfig, NtpConfig, SignConfig, WifiConfig};
