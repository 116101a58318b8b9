//! Shared configuration system for desktop and ESP32.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_openbot::config::{Config, NtpConfig, SignConfig};
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_ntp(NtpConfig::default().with_server("uk.pool.ntp.org"))
//!     .with_sign(SignConfig::default().with_tz_offset_minutes(60));
//! ```

use core::time::Duration;

use heapless::String as HString;

/// Maximum length for short config strings (hostnames, device names)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    // Keep whole characters only; a split UTF-8 sequence must never be pushed
    let valid_end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= MAX_SHORT_STRING)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// WiFi connection configuration
    pub wifi: WifiConfig,
    /// SNTP client configuration
    pub ntp: NtpConfig,
    /// Sign controller configuration
    pub sign: SignConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Config {
    /// Set WiFi configuration
    pub fn with_wifi(mut self, wifi: WifiConfig) -> Self {
        self.wifi = wifi;
        self
    }

    /// Set NTP configuration
    pub fn with_ntp(mut self, ntp: NtpConfig) -> Self {
        self.ntp = ntp;
        self
    }

    /// Set sign configuration
    pub fn with_sign(mut self, sign: SignConfig) -> Self {
        self.sign = sign;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// NTP Config
// ============================================================================

/// SNTP client configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NtpConfig {
    /// Time server hostname or IP
    pub server: ShortString,
    /// Time server port
    pub port: u16,
    /// Local UDP port to bind
    pub local_port: u16,
    /// Reply timeout in milliseconds
    pub timeout_ms: u32,
    /// How often to refresh the clock, in milliseconds
    pub resync_interval_ms: u64,
}

impl Default for NtpConfig {
    fn default() -> Self {
        Self {
            server: short_string("pool.ntp.org"),
            port: 123,
            local_port: 2390,
            timeout_ms: 5000,
            resync_interval_ms: 3_600_000,
        }
    }
}

impl NtpConfig {
    /// Set the time server
    pub fn with_server(mut self, server: &str) -> Self {
        self.server = short_string(server);
        self
    }

    /// Set the server port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the local UDP port
    pub fn with_local_port(mut self, port: u16) -> Self {
        self.local_port = port;
        self
    }

    /// Set the reply timeout
    pub fn with_timeout_ms(mut self, ms: u32) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Set the resync interval
    pub fn with_resync_interval_ms(mut self, ms: u64) -> Self {
        self.resync_interval_ms = ms;
        self
    }

    /// The reply timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.timeout_ms))
    }

    /// Resolve the configured server to a socket address.
    ///
    /// Hostnames go through DNS; the first resolved address wins.
    #[cfg(feature = "std")]
    pub fn server_addr(&self) -> std::io::Result<core::net::SocketAddr> {
        use std::net::ToSocketAddrs;

        (self.server.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "time server resolved to no addresses",
                )
            })
    }
}

// ============================================================================
// Sign Config
// ============================================================================

/// Sign controller configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignConfig {
    /// How long a dial sweep runs, in milliseconds
    pub motor_run_ms: u64,
    /// Local timezone offset from UTC, in minutes
    pub tz_offset_minutes: i32,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            motor_run_ms: 1500,
            tz_offset_minutes: 0,
        }
    }
}

impl SignConfig {
    /// Set the sweep duration
    pub fn with_motor_run_ms(mut self, ms: u64) -> Self {
        self.motor_run_ms = ms;
        self
    }

    /// Set the timezone offset
    pub fn with_tz_offset_minutes(mut self, minutes: i32) -> Self {
        self.tz_offset_minutes = minutes;
        self
    }
}

// ============================================================================
// WiFi Config
// ============================================================================

/// WiFi connection configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WifiConfig {
    /// WiFi network SSID
    pub ssid: ShortString,
    /// WiFi password
    pub password: ShortString,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u32,
    /// Maximum connection retry attempts (0 = unlimited)
    pub max_retries: u8,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: ShortString::new(),
            password: ShortString::new(),
            connect_timeout_ms: 30_000,
            max_retries: 5,
        }
    }
}

impl WifiConfig {
    /// Set the SSID
    pub fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid = short_string(ssid);
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = short_string(password);
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout_ms(mut self, ms: u32) -> Self {
        self.connect_timeout_ms = ms;
        self
    }

    /// Set the maximum retry count
    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Check if WiFi credentials are configured
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name
    pub name: ShortString,
    /// Device ID (for spaces with more than one sign)
    pub id: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-openbot"),
            id: short_string("sign1"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the device ID
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = short_string(id);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
