//! Single-client HTTP handler that switches the LED.
//!
//! Requests are not parsed properly: bytes are collected into a line buffer
//! and the LED is switched as soon as the current line ends with `GET /H` or
//! `GET /L`. The first empty line ends the request and the control page is
//! sent back.

use embedded_hal::digital::OutputPin;
use embedded_io_async::{Read, Write};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::led::{self, LedCommand, LedState};
use crate::utf8_prefix;

pub const LINE_CAPACITY: usize = 128;
const READ_CHUNK_SIZE: usize = 64;

const ON_SUFFIX: &[u8] = b"GET /H";
const OFF_SUFFIX: &[u8] = b"GET /L";

/// Response sent to every client once its request headers are in.
pub const PAGE: &str = "HTTP/1.1 200 OK\r\n\
Content-type:text/html\r\n\
\r\n\
<br>Click <a href=\"H\">here</a> to turn the lamp on<br>\r\n\
Click <a href=\"L\">here</a> to turn the lamp off\r\n\
\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    Pending,
    Command(LedCommand),
    EndOfHeaders,
}

/// Raw request bytes of the current line; a multibyte character takes as
/// many slots as it has bytes.
#[derive(Debug, Default)]
pub struct RequestScanner {
    line: heapless::Vec<u8, LINE_CAPACITY>,
}

impl RequestScanner {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn line(&self) -> &[u8] {
        &self.line
    }

    pub fn feed(&mut self, byte: u8) -> Scan {
        match byte {
            b'\n' if self.line.is_empty() => Scan::EndOfHeaders,
            b'\n' => {
                self.line.clear();
                Scan::Pending
            }
            b'\r' => Scan::Pending,
            _ => {
                // Overlong lines keep their head; the request line is what matters.
                if self.line.push(byte).is_err() {
                    return Scan::Pending;
                }
                self.matched()
            }
        }
    }

    fn matched(&self) -> Scan {
        if self.line.ends_with(ON_SUFFIX) {
            Scan::Command(LedCommand::On)
        } else if self.line.ends_with(OFF_SUFFIX) {
            Scan::Command(LedCommand::Off)
        } else {
            Scan::Pending
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    /// LED commands applied while reading the request.
    pub commands: usize,
    /// Last state the LED was driven to, if any command was seen.
    pub state: Option<LedState>,
    /// Whether the page was sent.
    pub answered: bool,
}

/// Serve one client: switch the LED on matching request lines and answer
/// with [`PAGE`] once the headers end.
///
/// Returns without answering if the client hangs up first.
pub async fn handle_client<S, P>(stream: &mut S, pin: &mut P) -> Result<Outcome>
where
    S: Read + Write,
    P: OutputPin,
{
    let mut scanner = RequestScanner::new();
    let mut outcome = Outcome::default();
    let mut buf = [0u8; READ_CHUNK_SIZE];

    loop {
        let n = stream.read(&mut buf).await.map_err(Error::io)?;
        if n == 0 {
            debug!("server: client closed before end of headers");
            return Ok(outcome);
        }
        debug!("server: {:?}", utf8_prefix(&buf[..n]));

        for &byte in &buf[..n] {
            match scanner.feed(byte) {
                Scan::Pending => {}
                Scan::Command(command) => {
                    let state = LedState::from(command);
                    if led::apply(pin, state).is_err() {
                        warn!("server: failed to drive LED to {:?}", state);
                    }
                    outcome.commands += 1;
                    outcome.state = Some(state);
                }
                Scan::EndOfHeaders => {
                    stream.write_all(PAGE.as_bytes()).await.map_err(Error::io)?;
                    stream.flush().await.map_err(Error::io)?;
                    outcome.answered = true;
                    return Ok(outcome);
                }
            }
        }
    }
}
