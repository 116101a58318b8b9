//! ESP32-C3 SuperMini hardware abstraction layer for the status sign.
//!
//! This module provides hardware implementations for the ESP32-C3 SuperMini
//! board driving the hackspace "open/closed" sign: a geared dial motor on two
//! GPIO enable lines, a toggle switch input, and WiFi for SNTP.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Motor Driver**: L9110S dual-channel H-bridge (one channel used)
//! - **Switch**: open/closed toggle to ground
//! - **Dial**: hour selector potentiometer on ADC
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod gpio;

pub use gpio::Esp32Pin;

#[cfg(feature = "wifi")]
mod wifi;
#[cfg(feature = "wifi")]
pub use wifi::Esp32Wifi;

/// Pin assignments for SuperMini ESP32-C3.
///
/// These constants match the sign's wiring:
/// - Dial motor via L9110S on GPIO2-3
/// - Open/closed switch on GPIO4
/// - Hour dial potentiometer on GPIO5 (ADC)
pub mod pins {
    // =========================================================================
    // Dial Motor (L9110S)
    // =========================================================================

    /// Clockwise enable line (A-1A on L9110S), sweeps the sign to "open"
    pub const DIAL_CW: i32 = 2;

    /// Counterclockwise enable line (A-1B on L9110S), sweeps to "closed"
    pub const DIAL_CCW: i32 = 3;

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Open/closed toggle switch (active low, internal pull-up)
    pub const SWITCH: i32 = 4;

    /// Hour dial potentiometer wiper (ADC1)
    pub const HOUR_DIAL: i32 = 5;
}
