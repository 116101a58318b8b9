//! Sign controller: state, dial sweeps, and announcements.
//!
//! [`SignController`] owns the dial motor and tracks what the sign is
//! currently showing. State changes start a timed sweep; a later call to
//! [`update`](SignController::update) with the current monotonic time
//! stops the motor once the sweep window has passed. Nothing in here
//! sleeps, so the controller drops into any main loop.
//!
//! # Example
//!
//! ```rust
//! use rs_openbot::sign::SignController;
//! use rs_openbot::messages::SpaceState;
//! use rs_openbot::traits::Direction;
//! use rs_openbot::hal::MockMotor;
//!
//! let mut sign = SignController::new(MockMotor::new());
//!
//! // Somebody opened up at t=1000ms.
//! assert!(sign.set_state(SpaceState::Open, 1000).unwrap());
//! assert_eq!(sign.motor().direction, Direction::Clockwise);
//!
//! // The sweep window (1500ms by default) ends at t=2500ms.
//! assert!(!sign.update(2499).unwrap());
//! assert!(sign.update(2500).unwrap());
//! assert_eq!(sign.motor().direction, Direction::Stop);
//! ```

use alloc::string::String;

use log::{debug, info};
use rand::Rng;

use crate::config::SignConfig;
use crate::messages::{compose_announcement, SpaceState};
use crate::traits::{Direction, EpochSeconds, MotorDriver};

/// Highest hour count the dial face carries.
pub const MAX_DIAL_HOURS: u8 = 8;

/// How long a sweep runs unless configured otherwise, in milliseconds.
pub const DEFAULT_MOTOR_RUN_MS: u64 = 1500;

/// Which way the dial sweeps to show a state.
#[inline]
pub const fn sweep_direction(state: SpaceState) -> Direction {
    match state {
        SpaceState::Open => Direction::Clockwise,
        SpaceState::Closed => Direction::CounterClockwise,
    }
}

/// Drives the dial to match the space state and composes announcements.
///
/// The controller is time-driven rather than blocking: [`set_state`]
/// starts the motor and records when it should stop, and the owner is
/// expected to call [`update`] regularly with the current monotonic
/// millisecond count.
///
/// [`set_state`]: Self::set_state
/// [`update`]: Self::update
#[derive(Debug)]
pub struct SignController<M: MotorDriver> {
    motor: M,
    state: SpaceState,
    dial_hours: u8,
    motor_run_ms: u64,
    tz_offset_minutes: i32,
    stop_at_ms: Option<u64>,
}

impl<M: MotorDriver> SignController<M> {
    /// Create a controller with default settings.
    ///
    /// The sign starts out assuming the space is closed, with the dial
    /// reading one hour. The motor is not touched; call
    /// [`resweep`](Self::resweep) to seat the dial if its position is
    /// unknown.
    pub fn new(motor: M) -> Self {
        Self {
            motor,
            state: SpaceState::Closed,
            dial_hours: 1,
            motor_run_ms: DEFAULT_MOTOR_RUN_MS,
            tz_offset_minutes: 0,
            stop_at_ms: None,
        }
    }

    /// Create a controller configured from [`SignConfig`].
    pub fn with_config(motor: M, config: &SignConfig) -> Self {
        Self {
            motor,
            state: SpaceState::Closed,
            dial_hours: 1,
            motor_run_ms: config.motor_run_ms,
            tz_offset_minutes: config.tz_offset_minutes,
            stop_at_ms: None,
        }
    }

    /// Override the sweep duration.
    pub fn with_motor_run_ms(mut self, motor_run_ms: u64) -> Self {
        self.motor_run_ms = motor_run_ms;
        self
    }

    /// Override the timezone used for closing-time labels.
    pub fn with_tz_offset_minutes(mut self, minutes: i32) -> Self {
        self.tz_offset_minutes = minutes;
        self
    }

    /// The state the sign currently shows.
    #[inline]
    pub const fn state(&self) -> SpaceState {
        self.state
    }

    /// The dial's hour reading.
    #[inline]
    pub const fn hours(&self) -> u8 {
        self.dial_hours
    }

    /// True while a sweep is in progress.
    #[inline]
    pub const fn is_sweeping(&self) -> bool {
        self.stop_at_ms.is_some()
    }

    /// Borrow the motor.
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// Consume the controller and recover the motor.
    pub fn into_motor(self) -> M {
        self.motor
    }

    /// Record the dial's hour reading, clamped to the dial face.
    pub fn set_hours(&mut self, hours: u8) {
        self.dial_hours = hours.clamp(1, MAX_DIAL_HOURS);
    }

    /// Switch the sign to a new state.
    ///
    /// Starts a sweep in the matching direction and returns `Ok(true)`.
    /// Setting the state the sign already shows is a no-op returning
    /// `Ok(false)`; the switch is polled, not edge-triggered, so repeat
    /// readings must not restart the motor.
    pub fn set_state(&mut self, state: SpaceState, now_ms: u64) -> Result<bool, M::Error> {
        if state == self.state {
            return Ok(false);
        }
        self.sweep_to(state, now_ms)?;
        Ok(true)
    }

    /// Sweep the dial to the current state again.
    ///
    /// Used at boot, when the dial's physical position is unknown.
    pub fn resweep(&mut self, now_ms: u64) -> Result<(), M::Error> {
        self.sweep_to(self.state, now_ms)
    }

    fn sweep_to(&mut self, state: SpaceState, now_ms: u64) -> Result<(), M::Error> {
        let direction = sweep_direction(state);
        self.motor.drive(direction)?;
        self.state = state;
        self.stop_at_ms = Some(now_ms + self.motor_run_ms);
        info!(
            "sign {}: sweeping {} for {} ms",
            state.as_str(),
            direction.as_str(),
            self.motor_run_ms
        );
        Ok(())
    }

    /// Advance the controller to monotonic time `now_ms`.
    ///
    /// Stops the motor once the sweep window has passed, returning
    /// `Ok(true)` on the call that issues the stop. A new `set_state`
    /// during a sweep restarts the window from its own `now_ms`.
    pub fn update(&mut self, now_ms: u64) -> Result<bool, M::Error> {
        match self.stop_at_ms {
            Some(stop_at) if now_ms >= stop_at => {
                self.motor.stop()?;
                self.stop_at_ms = None;
                debug!("sweep finished, motor stopped");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Compose an announcement for the current state.
    ///
    /// When `now` is known the open-state announcement carries the
    /// projected closing time.
    pub fn announcement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: Option<EpochSeconds>,
    ) -> String {
        compose_announcement(
            rng,
            self.state,
            self.dial_hours,
            now,
            self.tz_offset_minutes,
        )
    }
}
