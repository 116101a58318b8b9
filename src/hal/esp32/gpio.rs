//! Dial motor enable lines on ESP32 GPIO.
//!
//! Each line of the dual-pin motor driver is one push-pull GPIO output.
//! The driver board used on the sign takes active-high enables; boards
//! with inverted inputs can use [`Esp32Pin::new_active_low`].

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::sys::EspError;

use crate::traits::{DigitalOutput, PinState};

/// A single GPIO output line implementing [`DigitalOutput`].
///
/// The pin type is erased to [`AnyOutputPin`] so the two lines of a
/// [`DualPinMotor`](crate::motor::DualPinMotor) share one concrete type.
/// Downgrade a concrete pin before handing it over:
///
/// ```ignore
/// use rs_openbot::hal::esp32::Esp32Pin;
/// use rs_openbot::motor::DualPinMotor;
///
/// let peripherals = Peripherals::take()?;
/// let cw = Esp32Pin::new(peripherals.pins.gpio2.downgrade_output())?;
/// let ccw = Esp32Pin::new(peripherals.pins.gpio3.downgrade_output())?;
/// let motor = DualPinMotor::new(cw, ccw)?;
/// ```
pub struct Esp32Pin<'d> {
    driver: PinDriver<'d, AnyOutputPin, Output>,
    active_high: bool,
}

impl<'d> Esp32Pin<'d> {
    /// Configure an active-high output, released (low) to start.
    pub fn new(pin: AnyOutputPin) -> Result<Self, EspError> {
        Self::with_polarity(pin, true)
    }

    /// Configure an active-low output, released (high) to start.
    pub fn new_active_low(pin: AnyOutputPin) -> Result<Self, EspError> {
        Self::with_polarity(pin, false)
    }

    fn with_polarity(pin: AnyOutputPin, active_high: bool) -> Result<Self, EspError> {
        let driver = PinDriver::output(pin)?;
        let mut this = Self {
            driver,
            active_high,
        };
        this.set_state(PinState::Inactive)?;
        Ok(this)
    }
}

impl DigitalOutput for Esp32Pin<'_> {
    type Error = EspError;

    fn set_state(&mut self, state: PinState) -> Result<(), EspError> {
        if state.is_active() == self.active_high {
            self.driver.set_high()
        } else {
            self.driver.set_low()
        }
    }
}
