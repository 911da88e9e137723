//! Station credentials and helpers for describing scanned networks.

use core::fmt::{self, Write as _};

use heapless::String;

pub const MAX_SSID_LEN: usize = 32;
pub const MAX_PASSWORD_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsError {
    SsidEmpty,
    SsidTooLong { len: usize },
    PasswordTooLong { len: usize },
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialsError::SsidEmpty => f.write_str("SSID is empty"),
            CredentialsError::SsidTooLong { len } => {
                write!(f, "SSID is {len} bytes, max {MAX_SSID_LEN}")
            }
            CredentialsError::PasswordTooLong { len } => {
                write!(f, "password is {len} bytes, max {MAX_PASSWORD_LEN}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

impl Credentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, CredentialsError> {
        if ssid.is_empty() {
            return Err(CredentialsError::SsidEmpty);
        }
        let ssid = String::try_from(ssid)
            .map_err(|_| CredentialsError::SsidTooLong { len: ssid.len() })?;
        let password = String::try_from(password).map_err(|_| {
            CredentialsError::PasswordTooLong {
                len: password.len(),
            }
        })?;
        Ok(Self { ssid, password })
    }

    /// An empty password means the network has no authentication.
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

/// Authentication scheme advertised by an access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Open,
    Wep,
    WpaPsk,
    Wpa2Psk,
    WpaWpa2Psk,
    Wpa2Enterprise,
    Wpa3Psk,
    Wpa2Wpa3Psk,
    WapiPsk,
    Unknown,
}

impl AuthMode {
    pub fn name(self) -> &'static str {
        match self {
            AuthMode::Open => "open",
            AuthMode::Wep => "WEP",
            AuthMode::WpaPsk => "WPA_PSK",
            AuthMode::Wpa2Psk => "WPA2_PSK",
            AuthMode::WpaWpa2Psk => "WPA_WPA2_PSK",
            AuthMode::Wpa2Enterprise => "WPA2_ENTERPRISE",
            AuthMode::Wpa3Psk => "WPA3_PSK",
            AuthMode::Wpa2Wpa3Psk => "WPA2_WPA3_PSK",
            AuthMode::WapiPsk => "WAPI_PSK",
            AuthMode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Format a BSSID as `aa:bb:cc:dd:ee:ff`.
pub fn format_bssid(bssid: &[u8; 6]) -> String<17> {
    let mut out = String::new();
    for (i, byte) in bssid.iter().enumerate() {
        if i > 0 {
            let _ = out.push(':');
        }
        // 6 * 2 hex digits + 5 separators fits exactly.
        let _ = write!(out, "{byte:02x}");
    }
    out
}
