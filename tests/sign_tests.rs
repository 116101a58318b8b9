//! Integration tests for the sign controller

use rand::rngs::mock::StepRng;
use rs_openbot::config::SignConfig;
use rs_openbot::hal::MockMotor;
use rs_openbot::{Direction, SignController, SpaceState};

// 2024-01-01T00:00:00Z
const NEW_YEAR: i64 = 1_704_067_200;

fn rng() -> StepRng {
    StepRng::new(0, 1)
}

#[test]
fn boot_resweep_aligns_the_dial() {
    let mut sign = SignController::new(MockMotor::new());
    assert_eq!(sign.state(), SpaceState::Closed);
    assert_eq!(sign.motor().direction, Direction::Stop);

    // Fresh boot: sweep toward the state we believe we are in
    sign.resweep(0).unwrap();
    assert_eq!(sign.motor().direction, Direction::CounterClockwise);
    assert!(sign.is_sweeping());

    sign.update(2_000).unwrap();
    assert_eq!(sign.motor().direction, Direction::Stop);
    assert!(!sign.is_sweeping());
}

#[test]
fn switch_flip_drives_a_full_cycle() {
    let mut sign = SignController::new(MockMotor::new());

    // Open at t=0: dial sweeps clockwise
    assert!(sign.set_state(SpaceState::Open, 0).unwrap());
    assert_eq!(sign.motor().direction, Direction::Clockwise);

    // Mid-sweep the motor keeps running
    sign.update(1_000).unwrap();
    assert!(sign.is_sweeping());

    // Default run time is 1500ms
    sign.update(1_500).unwrap();
    assert_eq!(sign.motor().direction, Direction::Stop);

    // Close much later: dial sweeps back counterclockwise
    assert!(sign.set_state(SpaceState::Closed, 60_000).unwrap());
    assert_eq!(sign.motor().direction, Direction::CounterClockwise);
    sign.update(61_500).unwrap();
    assert_eq!(sign.motor().direction, Direction::Stop);
}

#[test]
fn repeated_switch_readings_do_not_restart_the_sweep() {
    let mut sign = SignController::new(MockMotor::new());

    assert!(sign.set_state(SpaceState::Open, 0).unwrap());

    // The switch is still read as "open" on every poll
    assert!(!sign.set_state(SpaceState::Open, 400).unwrap());
    assert!(!sign.set_state(SpaceState::Open, 1_400).unwrap());

    // The original window still ends on time
    sign.update(1_500).unwrap();
    assert!(!sign.is_sweeping());

    // And a later repeat reading stays inert
    assert!(!sign.set_state(SpaceState::Open, 9_000).unwrap());
    assert_eq!(sign.motor().direction, Direction::Stop);
}

#[test]
fn flip_mid_sweep_reverses_immediately() {
    let mut sign = SignController::new(MockMotor::new());

    sign.set_state(SpaceState::Open, 0).unwrap();
    assert_eq!(sign.motor().direction, Direction::Clockwise);

    // Someone flips back while the dial is still moving
    assert!(sign.set_state(SpaceState::Closed, 700).unwrap());
    assert_eq!(sign.motor().direction, Direction::CounterClockwise);

    // The run window restarts from the flip
    sign.update(1_500).unwrap();
    assert!(sign.is_sweeping());
    sign.update(2_200).unwrap();
    assert!(!sign.is_sweeping());
}

#[test]
fn sweep_time_follows_the_config() {
    let config = SignConfig::default().with_motor_run_ms(300);
    let mut sign = SignController::with_config(MockMotor::new(), &config);

    sign.set_state(SpaceState::Open, 0).unwrap();
    sign.update(299).unwrap();
    assert!(sign.is_sweeping());
    sign.update(300).unwrap();
    assert!(!sign.is_sweeping());
}

#[test]
fn hour_dial_is_clamped_to_the_face() {
    let mut sign = SignController::new(MockMotor::new());

    sign.set_hours(3);
    assert_eq!(sign.hours(), 3);

    sign.set_hours(0);
    assert_eq!(sign.hours(), 1);

    sign.set_hours(200);
    assert_eq!(sign.hours(), 8);
}

#[test]
fn closed_announcements_are_a_single_sentence() {
    let sign = SignController::new(MockMotor::new());
    let text = sign.announcement(&mut rng(), None);

    assert!(text.ends_with('.'));
    assert!(!text.contains("hours"));
    assert!(!text.contains("Until"));
}

#[test]
fn open_announcements_carry_the_dial_hours() {
    let mut sign = SignController::new(MockMotor::new());
    sign.set_state(SpaceState::Open, 0).unwrap();
    sign.set_hours(4);

    let text = sign.announcement(&mut rng(), None);
    assert!(text.contains("4 hours"));
    assert!(!text.contains("Until"));
}

#[test]
fn open_announcements_carry_the_closing_time_when_synced() {
    let config = SignConfig::default().with_tz_offset_minutes(0);
    let mut sign = SignController::with_config(MockMotor::new(), &config);
    sign.set_state(SpaceState::Open, 0).unwrap();
    sign.set_hours(4);

    let text = sign.announcement(&mut rng(), Some(NEW_YEAR));
    assert!(text.contains("4 hours"));
    assert!(text.ends_with("(Until ~4:00)"));
}

#[test]
fn timezone_offset_shifts_the_closing_label() {
    let config = SignConfig::default().with_tz_offset_minutes(60);
    let mut sign = SignController::with_config(MockMotor::new(), &config);
    sign.set_state(SpaceState::Open, 0).unwrap();
    sign.set_hours(2);

    // Midnight UTC is 01:00 local, plus two hours on the dial
    let text = sign.announcement(&mut rng(), Some(NEW_YEAR));
    assert!(text.ends_with("(Until ~3:00)"));
}
