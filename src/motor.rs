//! Dual-pin dial motor driver.
//!
//! The sign's dial is moved by a small geared motor wired through two
//! enable lines, one per direction. This module maps [`Direction`] onto
//! that pin pair.
//!
//! # Pin Protocol
//!
//! | Direction | CW line | CCW line |
//! |-----------|---------|----------|
//! | `Clockwise` | active | inactive |
//! | `CounterClockwise` | inactive | active |
//! | `Stop` | inactive | inactive |
//!
//! The opposing line is always released before the new one is asserted,
//! so the pair never passes through a both-active state. Driving both
//! lines at once would fight the motor windings against each other.
//!
//! # Example
//!
//! ```rust
//! use rs_openbot::motor::DualPinMotor;
//! use rs_openbot::traits::{Direction, MotorDriver};
//! use rs_openbot::hal::MockPin;
//!
//! let mut motor = DualPinMotor::new(MockPin::new(), MockPin::new()).unwrap();
//! motor.drive(Direction::Clockwise).unwrap();
//! assert!(motor.cw_pin().state.is_active());
//! assert!(!motor.ccw_pin().state.is_active());
//! ```

use crate::traits::{DigitalOutput, Direction, MotorDriver, PinState};

/// Dial motor driven through a clockwise and a counterclockwise enable line.
///
/// Both lines are released at construction, so a freshly built motor is
/// always stopped. The last commanded direction is tracked and available
/// via [`direction`](Self::direction).
#[derive(Debug)]
pub struct DualPinMotor<P: DigitalOutput> {
    cw: P,
    ccw: P,
    direction: Direction,
}

impl<P: DigitalOutput> DualPinMotor<P> {
    /// Build a motor from its two enable lines and release both.
    ///
    /// # Errors
    ///
    /// Fails if either line cannot be driven inactive.
    pub fn new(cw: P, ccw: P) -> Result<Self, P::Error> {
        let mut motor = Self {
            cw,
            ccw,
            direction: Direction::Stop,
        };
        motor.cw.deactivate()?;
        motor.ccw.deactivate()?;
        Ok(motor)
    }

    /// The last direction successfully applied.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Borrow the clockwise enable line.
    pub fn cw_pin(&self) -> &P {
        &self.cw
    }

    /// Borrow the counterclockwise enable line.
    pub fn ccw_pin(&self) -> &P {
        &self.ccw
    }

    /// Consume the motor and recover its pins.
    pub fn into_pins(self) -> (P, P) {
        (self.cw, self.ccw)
    }
}

impl<P: DigitalOutput> MotorDriver for DualPinMotor<P> {
    type Error = P::Error;

    /// Apply a direction to the pin pair.
    ///
    /// The opposing line is released before the new line is asserted.
    /// If a pin write fails partway, the motor is left with at most one
    /// line asserted, never both; the tracked direction is only updated
    /// once both writes succeed.
    fn drive(&mut self, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            Direction::Clockwise => {
                self.ccw.deactivate()?;
                self.cw.activate()?;
            }
            Direction::CounterClockwise => {
                self.cw.deactivate()?;
                self.ccw.activate()?;
            }
            Direction::Stop => {
                self.cw.deactivate()?;
                self.ccw.deactivate()?;
            }
        }
        self.direction = direction;
        Ok(())
    }
}
