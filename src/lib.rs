//! Shared logic for the three ESP32-C3 sketches in this repository.
//!
//! Nothing here touches a peripheral directly: pins are `embedded-hal`
//! outputs and sockets are `embedded-io-async` streams, so every piece can be
//! exercised on the host with `cargo test`.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dweet;
pub mod error;
pub mod led;
pub mod sensor;
pub mod server;
pub mod wifi;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};

/// Longest valid UTF-8 prefix of `bytes`.
pub(crate) fn utf8_prefix(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    }
}
