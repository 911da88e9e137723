//! Timings and endpoint defaults shared by the sketches.
//!
//! Credentials and endpoint overrides are read by the firmware crates at
//! compile time (`SSID`, `PASSWORD`, `DWEET_HOST`, `DWEET_PORT`,
//! `THING_NAME`); the values here are what they fall back to.

/// Time the LED spends in each state in the blink demo.
pub const BLINK_HALF_PERIOD_MS: u64 = 3000;

/// Interval between link status checks while joining a network.
pub const WIFI_POLL_INTERVAL_MS: u64 = 1000;

/// Delay after a failed TCP connect before the client tries again.
pub const CONNECT_RETRY_DELAY_MS: u64 = 2000;

/// How long the client waits for the server to start answering, and for
/// each further chunk once it has.
pub const RESPONSE_TIMEOUT_MS: u64 = 5000;

/// Delay between two successful readings.
pub const POST_INTERVAL_MS: u64 = 3000;

pub const SERVER_PORT: u16 = 80;

/// Pause after a failed accept before the server listens again.
pub const ACCEPT_RETRY_DELAY_MS: u64 = 500;

pub const DEFAULT_DWEET_HOST: &str = "dweet.io";
pub const DEFAULT_DWEET_PORT: u16 = 80;
pub const DEFAULT_THING_NAME: &str = "sensor01";

/// Parse an optional port from the build environment.
///
/// Missing or malformed values fall back to `default`.
pub fn parse_port(value: Option<&str>, default: u16) -> u16 {
    match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => match raw.parse::<u16>() {
            Ok(port) if port != 0 => port,
            _ => {
                log::warn!("invalid port {raw:?}, using {default}");
                default
            }
        },
        _ => default,
    }
}
