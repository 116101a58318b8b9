//! Hardware abstraction traits for the sign's dial motor.
//!
//! This module defines the hardware interfaces that allow rs-openbot to
//! work across different platforms (ESP32, desktop mocks, etc.).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`DigitalOutput`] | A single digital output line (motor enable pin) |
//! | [`MotorDriver`] | Two-direction dial motor control |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_openbot::traits::{MotorDriver, Direction};
//! use rs_openbot::hal::MockMotor;
//!
//! let mut motor = MockMotor::new();
//! motor.drive(Direction::Clockwise).unwrap();
//! assert_eq!(motor.direction, Direction::Clockwise);
//!
//! motor.stop().unwrap();
//! assert_eq!(motor.direction, Direction::Stop);
//! ```

/// Direction of dial travel.
///
/// The dial motor is wired through two enable lines; the direction selects
/// which one is driven. Exactly one of the three variants is ever applied
/// to the pins, so the pin pair never ends up both asserted.
///
/// # Default
///
/// Defaults to [`Stop`](Self::Stop) so an uninitialized driver never moves
/// the dial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Sweep toward the "open" face of the sign.
    Clockwise,
    /// Sweep toward the "closed" face of the sign.
    CounterClockwise,
    /// Motor idle, both enable lines released.
    #[default]
    Stop,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_openbot::Direction;
    ///
    /// assert_eq!(Direction::Clockwise.as_str(), "clockwise");
    /// assert_eq!(Direction::CounterClockwise.as_str(), "counterclockwise");
    /// assert_eq!(Direction::Stop.as_str(), "stop");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Clockwise => "clockwise",
            Direction::CounterClockwise => "counterclockwise",
            Direction::Stop => "stop",
        }
    }

    /// Parse a direction from text input.
    ///
    /// Supports multiple text formats:
    /// - Full names: `"clockwise"`, `"counterclockwise"`, `"stop"`
    /// - Abbreviations: `"cw"`, `"ccw"`, `"stopped"`
    /// - Numeric: `"1"` (clockwise), `"-1"` (counterclockwise), `"0"` (stop)
    ///
    /// Input is trimmed and case-insensitive. Anything else is rejected
    /// with `None`, so an out-of-range direction cannot get past this
    /// boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_openbot::Direction;
    ///
    /// assert_eq!(Direction::from_text("clockwise"), Some(Direction::Clockwise));
    /// assert_eq!(Direction::from_text("CCW"), Some(Direction::CounterClockwise));
    /// assert_eq!(Direction::from_text(" 0 "), Some(Direction::Stop));
    /// assert_eq!(Direction::from_text("sideways"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        let mut lowered = heapless::String::<24>::new();
        for c in s.trim().chars() {
            if lowered.push(c.to_ascii_lowercase()).is_err() {
                return None;
            }
        }
        match lowered.as_str() {
            "clockwise" | "cw" | "1" => Some(Direction::Clockwise),
            "counterclockwise" | "ccw" | "-1" => Some(Direction::CounterClockwise),
            "stop" | "stopped" | "0" => Some(Direction::Stop),
            _ => None,
        }
    }
}

/// Logical state of a digital output line.
///
/// "Active" means the line is asserted and the winding it enables is
/// energized; the electrical polarity behind that is the pin
/// implementation's concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PinState {
    /// Line asserted.
    Active,
    /// Line released.
    #[default]
    Inactive,
}

impl PinState {
    /// Returns true for [`Active`](Self::Active).
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, PinState::Active)
    }
}

/// A single digital output line.
///
/// Implement this for your platform's GPIO. The sign only ever writes
/// pins; there is no input side.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_openbot::traits::{DigitalOutput, PinState};
///
/// struct MyPin { /* hardware handle */ }
///
/// impl DigitalOutput for MyPin {
///     type Error = ();
///
///     fn set_state(&mut self, state: PinState) -> Result<(), ()> {
///         // Write the GPIO register...
///         Ok(())
///     }
/// }
/// ```
pub trait DigitalOutput {
    /// Error type for pin operations.
    type Error;

    /// Drive the line to the given state.
    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error>;

    /// Convenience method to assert the line.
    fn activate(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Active)
    }

    /// Convenience method to release the line.
    fn deactivate(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Inactive)
    }
}

/// Dial motor driver trait.
///
/// Implement this for whatever moves the sign's dial. The canonical
/// implementation is [`DualPinMotor`](crate::motor::DualPinMotor), which
/// maps each direction onto a pair of [`DigitalOutput`] lines.
///
/// Because [`Direction`] is a closed enum, implementations never see an
/// out-of-range direction; the three-way mapping is total.
pub trait MotorDriver {
    /// Error type for motor operations.
    type Error;

    /// Apply a direction to the motor.
    ///
    /// Driving [`Direction::Stop`] must release both windings.
    fn drive(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Convenience method to stop the motor.
    fn stop(&mut self) -> Result<(), Self::Error> {
        self.drive(Direction::Stop)
    }
}
