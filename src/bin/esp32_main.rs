//! ESP32-C3 SuperMini hackspace status sign controller.
//!
//! This is the main entry point for the physical sign. It runs a 20Hz
//! control loop that:
//! - Polls the open/closed toggle switch
//! - Sweeps the dial motor when the state changes
//! - Fetches wall-clock time over SNTP (hourly, WiFi permitting)
//! - Logs a status announcement whenever the sign changes state
//!
//! # Hardware Setup
//!
//! See the [`pins`](rs_openbot::hal::esp32::pins) module for the wiring.
//!
//! # Build
//!
//! ```bash
//! # Flash with credentials baked in at compile time
//! WIFI_SSID=MyNet WIFI_PASSWORD=secret cargo run --features wifi --release
//! ```

use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use rs_openbot::hal::esp32::{Esp32Pin, Esp32Wifi};
use rs_openbot::hal::udp::StdUdpTransport;
use rs_openbot::{Config, DualPinMotor, NtpClient, SignController, SpaceState, SyncedClock};
use std::thread;
use std::time::{Duration, Instant};

/// Main loop interval in milliseconds (20Hz = 50ms)
const LOOP_INTERVAL_MS: u64 = 50;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    println!();
    println!("================================");
    println!("  rs-openbot Status Sign");
    println!("================================");
    println!();

    // =========================================================================
    // Configuration
    // =========================================================================
    let mut config = Config::default().with_wifi(
        rs_openbot::WifiConfig::default()
            .with_ssid(option_env!("WIFI_SSID").unwrap_or(""))
            .with_password(option_env!("WIFI_PASSWORD").unwrap_or("")),
    );
    if let Some(server) = option_env!("NTP_SERVER") {
        config = config.with_ntp(rs_openbot::NtpConfig::default().with_server(server));
    }

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Initialize Dial Motor (L9110S on GPIO2/3)
    // =========================================================================
    let cw = Esp32Pin::new(peripherals.pins.gpio2.downgrade_output())?;
    let ccw = Esp32Pin::new(peripherals.pins.gpio3.downgrade_output())?;
    let motor = DualPinMotor::new(cw, ccw)?;
    println!("[OK] Dial motor initialized (GPIO2/3)");

    // =========================================================================
    // Initialize Switch (toggle to ground on GPIO4)
    // =========================================================================
    let mut switch = PinDriver::input(peripherals.pins.gpio4)?;
    switch.set_pull(Pull::Up)?;
    println!("[OK] Switch initialized (GPIO4, active low)");

    // =========================================================================
    // Initialize WiFi
    // =========================================================================
    let wifi = if config.wifi.is_configured() {
        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;
        let wifi = Esp32Wifi::new(peripherals.modem, sysloop, Some(nvs), &config.wifi)?;
        println!("[OK] WiFi connected: {:?}", wifi.ip_addr());
        Some(wifi)
    } else {
        println!("[SKIP] WiFi not configured (set WIFI_SSID/WIFI_PASSWORD)");
        None
    };

    // =========================================================================
    // Initialize SNTP Client
    // =========================================================================
    let mut ntp = if wifi.is_some() {
        match config.ntp.server_addr() {
            Ok(server) => {
                let transport = StdUdpTransport::bind(config.ntp.local_port)?;
                println!("[OK] SNTP client ready ({})", server);
                Some(NtpClient::new(transport, server).with_timeout(config.ntp.timeout()))
            }
            Err(e) => {
                println!("[WARN] Cannot resolve '{}': {}", config.ntp.server, e);
                None
            }
        }
    } else {
        println!("[SKIP] SNTP needs WiFi");
        None
    };

    // =========================================================================
    // Initialize Clock and Controller
    // =========================================================================
    let boot = Instant::now();
    let now_ms = || boot.elapsed().as_millis() as u64;

    let mut clock = SyncedClock::new();
    let mut sign = SignController::with_config(motor, &config.sign);
    let mut rng = rand::thread_rng();

    // Align the dial with the switch position read at boot. Exactly one
    // sweep starts here whether or not the switch matches the default state.
    let initial = if switch.is_low() {
        SpaceState::Open
    } else {
        SpaceState::Closed
    };
    if !sign.set_state(initial, now_ms())? {
        sign.resweep(now_ms())?;
    }
    println!("[OK] Sign starts {}", sign.state().as_str());

    println!();
    println!("Controls:");
    println!("  Flip switch: open or close the space");
    println!();
    println!("Starting control loop (20Hz)...");
    println!();

    // =========================================================================
    // Main Control Loop (20Hz)
    // =========================================================================
    loop {
        let now = now_ms();

        // ---------------------------------------------------------------------
        // Hourly SNTP resync
        // ---------------------------------------------------------------------
        if let Some(ref mut client) = ntp {
            if clock.needs_resync(now, config.ntp.resync_interval_ms) && !sign.is_sweeping() {
                match client.fetch_time() {
                    Ok(fix) => clock.record(fix, now),
                    Err(e) => println!("[WARN] SNTP transport error: {}", e),
                }
            }
        }

        // ---------------------------------------------------------------------
        // Switch polling
        // ---------------------------------------------------------------------
        // TODO: read the hour dial pot on GPIO5 (ADC1) and feed sign.set_hours
        let wanted = if switch.is_low() {
            SpaceState::Open
        } else {
            SpaceState::Closed
        };
        if sign.set_state(wanted, now)? {
            let announcement = sign.announcement(&mut rng, clock.now(now));
            println!("{}", announcement);
        }

        // ---------------------------------------------------------------------
        // Update controller (stops the motor when the sweep window ends)
        // ---------------------------------------------------------------------
        sign.update(now)?;

        // Sleep until next tick
        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}
