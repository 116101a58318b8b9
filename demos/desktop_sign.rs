//! Desktop simulation of the status sign.
//!
//! This example runs the sign controller against mock pins, so you can
//! exercise the whole open/closed flow from a terminal:
//! - Flip the "switch" by typing `open` or `closed`
//! - Turn the "hour dial" by typing a digit
//! - Watch the dial motor sweep and the announcement it would publish
//!
//! On startup the example attempts one real SNTP fetch so announcements
//! carry a closing time. Without network access it runs clockless.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_sign
//! ```
//!
//! Commands: `open`, `closed`, `1`-`8` (hours), `msg`, `time`, `quit`.

use rs_openbot::hal::udp::StdUdpTransport;
use rs_openbot::hal::MockPin;
use rs_openbot::{Config, DualPinMotor, NtpClient, SignController, SpaceState, SyncedClock};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

fn main() -> io::Result<()> {
    env_logger::init();

    println!("=================================");
    println!("  rs-openbot Desktop Sign");
    println!("=================================");
    println!();

    // Central configuration - modify this for your setup
    let config = Config::default();
    // Example of customization:
    // let config = Config::default()
    //     .with_ntp(rs_openbot::NtpConfig::default()
    //         .with_server("uk.pool.ntp.org")
    //         .with_timeout_ms(2_000))
    //     .with_sign(rs_openbot::SignConfig::default()
    //         .with_motor_run_ms(500)
    //         .with_tz_offset_minutes(60));

    let boot = Instant::now();
    let now_ms = || boot.elapsed().as_millis() as u64;

    // Mock pins never fail, so the hardware calls below just unwrap
    let motor = DualPinMotor::new(MockPin::new(), MockPin::new()).unwrap();
    let mut sign = SignController::with_config(motor, &config.sign);
    let mut rng = rand::thread_rng();

    // One best-effort time fix so closing times render
    let mut clock = SyncedClock::new();
    match fetch_time_once(&config) {
        Ok(Some(fix)) => {
            clock.record(Some(fix), now_ms());
            println!("[OK] Time synced: unix {}", fix);
        }
        Ok(None) => println!("[WARN] No SNTP reply, running clockless"),
        Err(e) => println!("[WARN] SNTP unavailable ({}), running clockless", e),
    }

    println!();
    println!("Commands:");
    println!("  open / closed   flip the switch");
    println!("  1-8             set the hour dial");
    println!("  msg             print a fresh announcement");
    println!("  time            print the synced wall clock");
    println!("  quit            exit");
    println!();

    let stdin = io::stdin();
    loop {
        print!("sign [{}]> ", sign.state().as_str());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        if let Ok(hours) = input.parse::<u8>() {
            sign.set_hours(hours);
            println!("hour dial at {}", sign.hours());
            continue;
        }

        match input {
            "quit" | "exit" => break,
            "msg" => println!("{}", sign.announcement(&mut rng, clock.now(now_ms()))),
            "time" => match clock.now(now_ms()) {
                Some(unix) => println!("unix {}", unix),
                None => println!("clock not synced"),
            },
            _ => match SpaceState::from_text(input) {
                Some(state) => {
                    if sign.set_state(state, now_ms()).unwrap() {
                        run_sweep(&mut sign, &now_ms);
                        println!("{}", sign.announcement(&mut rng, clock.now(now_ms())));
                    } else {
                        println!("already {}", state.as_str());
                    }
                }
                None => println!("unknown command '{}'", input),
            },
        }
    }

    println!("Bye!");
    Ok(())
}

/// Drive the controller through a full sweep, printing the motor state.
fn run_sweep(sign: &mut SignController<DualPinMotor<MockPin>>, now_ms: &impl Fn() -> u64) {
    println!("dial sweeping {}...", sign.motor().direction().as_str());
    while sign.is_sweeping() {
        sign.update(now_ms()).unwrap();
        thread::sleep(Duration::from_millis(20));
    }
    println!("dial stopped");
}

/// Single SNTP round trip on an ephemeral port.
fn fetch_time_once(config: &Config) -> io::Result<Option<i64>> {
    let server = config.ntp.server_addr()?;
    let transport = StdUdpTransport::bind(0)?;
    let mut client = NtpClient::new(transport, server).with_timeout(config.ntp.timeout());
    client.fetch_time()
}
