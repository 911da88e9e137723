//! Plain-HTTP client for publishing readings to dweet.io.
//!
//! The exchange is one `GET` per reading with `Connection: close`; the
//! response is only logged, line by line.

use core::fmt::Write as _;

use embassy_futures::select::{Either, select};
use embedded_io_async::{Read, Write};
use heapless::String;
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::sensor::Reading;
use crate::utf8_prefix;

pub const REQUEST_CAPACITY: usize = 256;
pub const RESPONSE_LINE_CAPACITY: usize = 256;
const READ_CHUNK_SIZE: usize = 256;

pub type Request = String<REQUEST_CAPACITY>;

/// Where readings are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target<'a> {
    pub host: &'a str,
    pub port: u16,
    pub thing: &'a str,
}

/// Request target for one reading.
///
/// The query keys and the doubled `&&` separator are what the dashboards
/// consuming this thing already expect.
pub fn request_path(thing: &str, reading: &Reading) -> Result<Request> {
    let mut path = Request::new();
    write!(
        path,
        "/dweet/for/{}?temperatura={}&&humedad={}",
        thing, reading.temperature, reading.humidity
    )?;
    Ok(path)
}

pub fn build_request(target: &Target<'_>, reading: &Reading) -> Result<Request> {
    let path = request_path(target.thing, reading)?;
    let mut request = Request::new();
    write!(
        request,
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, target.host
    )?;
    Ok(request)
}

/// Write the request for `reading` and flush it.
pub async fn send_reading<S: Write>(
    stream: &mut S,
    target: &Target<'_>,
    reading: &Reading,
) -> Result<()> {
    let request = build_request(target, reading)?;
    debug!("dweet: {}", request.lines().next().unwrap_or_default());
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(Error::io)?;
    stream.flush().await.map_err(Error::io)?;
    Ok(())
}

/// Extract the status code from an HTTP status line.
pub fn parse_status_line(line: &str) -> Option<u16> {
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    let code = parts.next()?;
    if code.len() != 3 {
        return None;
    }
    code.parse().ok()
}

/// Splits a response into lines on `\r`, dropping `\n`.
///
/// Lines longer than the buffer are emitted in pieces. Bytes that are not
/// valid UTF-8 cut the emitted line short.
#[derive(Debug, Default)]
pub struct LineSplitter {
    line: heapless::Vec<u8, RESPONSE_LINE_CAPACITY>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; `emit` is called for each completed line.
    pub fn push(&mut self, byte: u8, emit: &mut impl FnMut(&str)) {
        match byte {
            b'\r' => self.flush(emit),
            b'\n' => {}
            _ => {
                if self.line.push(byte).is_err() {
                    self.flush(emit);
                    let _ = self.line.push(byte);
                }
            }
        }
    }

    /// Emit whatever is left once the stream ends.
    pub fn finish(&mut self, emit: &mut impl FnMut(&str)) {
        if !self.line.is_empty() {
            self.flush(emit);
        }
    }

    fn flush(&mut self, emit: &mut impl FnMut(&str)) {
        emit(utf8_prefix(&self.line));
        self.line.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseSummary {
    pub status: Option<u16>,
    pub lines: usize,
    pub bytes: usize,
}

impl ResponseSummary {
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }

    fn record(&mut self, line: &str) {
        if self.lines == 0 {
            self.status = parse_status_line(line);
        }
        self.lines += 1;
        info!("{}", line);
    }
}

/// Read the response until the server closes the connection or goes quiet,
/// logging every line.
///
/// Every read is raced against a fresh `idle()` future. If it completes before
/// the first byte arrives the call fails with [`Error::Timeout`]; once data
/// has arrived it marks the end of the response. Fails with
/// [`Error::Closed`] if the server closes without sending anything.
pub async fn read_response<S, F, T>(stream: &mut S, mut idle: F) -> Result<ResponseSummary>
where
    S: Read,
    F: FnMut() -> T,
    T: Future<Output = ()>,
{
    let mut summary = ResponseSummary::default();
    let mut splitter = LineSplitter::new();
    let mut buf = [0u8; READ_CHUNK_SIZE];

    loop {
        let n = match select(stream.read(&mut buf), idle()).await {
            Either::First(read) => read.map_err(Error::io)?,
            Either::Second(()) if summary.bytes == 0 => return Err(Error::Timeout),
            Either::Second(()) => {
                debug!("dweet: server went quiet after {} bytes", summary.bytes);
                break;
            }
        };
        if n == 0 {
            break;
        }
        summary.bytes += n;
        for &byte in &buf[..n] {
            splitter.push(byte, &mut |line| summary.record(line));
        }
    }
    splitter.finish(&mut |line| summary.record(line));

    if summary.bytes == 0 {
        return Err(Error::Closed);
    }
    if !summary.is_success() {
        warn!("dweet: unexpected status {:?}", summary.status);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use core::future::{pending, ready};

    use embedded_io_async::ErrorKind;
    use futures_lite::future::block_on;

    use super::*;
    use crate::testing::MockStream;

    const TARGET: Target<'static> = Target {
        host: "dweet.io",
        port: 80,
        thing: "sensor01",
    };

    const READING: Reading = Reading {
        temperature: 23,
        humidity: 35,
    };

    #[test]
    fn path_carries_reading() {
        let path = request_path("sensor01", &READING).unwrap();
        assert_eq!(path, "/dweet/for/sensor01?temperatura=23&&humedad=35");
    }

    #[test]
    fn request_is_http11_with_close() {
        let request = build_request(&TARGET, &READING).unwrap();
        assert_eq!(
            request,
            "GET /dweet/for/sensor01?temperatura=23&&humedad=35 HTTP/1.1\r\n\
             Host: dweet.io\r\n\
             Connection: close\r\n\r\n"
        );
    }

    #[test]
    fn oversized_thing_name_overflows() {
        let thing = "t".repeat(REQUEST_CAPACITY);
        let target = Target {
            thing: &thing,
            ..TARGET
        };
        assert_eq!(build_request(&target, &READING), Err(Error::Overflow));
    }

    #[test]
    fn send_writes_and_flushes() {
        let mut stream = MockStream::default();
        block_on(send_reading(&mut stream, &TARGET, &READING)).unwrap();
        assert!(stream.written_str().starts_with("GET /dweet/for/sensor01?"));
        assert!(stream.written_str().ends_with("\r\n\r\n"));
        assert_eq!(stream.flushes, 1);
    }

    #[test]
    fn send_reports_write_failure() {
        let mut stream = MockStream::failing_writes(ErrorKind::ConnectionReset);
        let err = block_on(send_reading(&mut stream, &TARGET, &READING)).unwrap_err();
        assert_eq!(err, Error::Io(ErrorKind::ConnectionReset));
    }

    #[test]
    fn status_line_parsing() {
        assert_eq!(parse_status_line("HTTP/1.1 200 OK"), Some(200));
        assert_eq!(parse_status_line("HTTP/1.0 404 Not Found"), Some(404));
        assert_eq!(parse_status_line("Content-Type: text/html"), None);
        assert_eq!(parse_status_line("HTTP/1.1 20 OK"), None);
        assert_eq!(parse_status_line(""), None);
    }

    #[test]
    fn splitter_breaks_on_carriage_return() {
        let mut lines = Vec::new();
        let mut splitter = LineSplitter::new();
        for &b in b"HTTP/1.1 200 OK\r\nServer: x\r\n\r\n{}" {
            splitter.push(b, &mut |l| lines.push(l.to_string()));
        }
        splitter.finish(&mut |l| lines.push(l.to_string()));
        assert_eq!(lines, ["HTTP/1.1 200 OK", "Server: x", "", "{}"]);
    }

    #[test]
    fn splitter_emits_long_lines_in_pieces() {
        let mut lines = Vec::new();
        let mut splitter = LineSplitter::new();
        let long = vec![b'a'; RESPONSE_LINE_CAPACITY + 10];
        for &b in &long {
            splitter.push(b, &mut |l| lines.push(l.len()));
        }
        splitter.finish(&mut |l| lines.push(l.len()));
        assert_eq!(lines, [RESPONSE_LINE_CAPACITY, 10]);
    }

    #[test]
    fn splitter_keeps_multibyte_text() {
        let mut lines = Vec::new();
        let mut splitter = LineSplitter::new();
        for &b in "temp 23 °C\r\nhum 35 %".as_bytes() {
            splitter.push(b, &mut |l| lines.push(l.to_string()));
        }
        splitter.finish(&mut |l| lines.push(l.to_string()));
        assert_eq!(lines, ["temp 23 °C", "hum 35 %"]);
    }

    #[test]
    fn splitter_cuts_invalid_utf8() {
        let mut lines = Vec::new();
        let mut splitter = LineSplitter::new();
        for &b in b"ok\xff\xfebad\r" {
            splitter.push(b, &mut |l| lines.push(l.to_string()));
        }
        assert_eq!(lines, ["ok"]);
    }

    #[test]
    fn response_across_chunks() {
        let mut stream = MockStream::with_chunks([
            &b"HTTP/1.1 20"[..],
            &b"0 OK\r\nContent-Type: application/json\r\n"[..],
            &b"\r\n{\"this\":\"succeeded\"}"[..],
        ]);
        let summary = block_on(read_response(&mut stream, pending::<()>)).unwrap();
        assert_eq!(summary.status, Some(200));
        assert!(summary.is_success());
        assert_eq!(summary.lines, 4);
        assert_eq!(summary.bytes, 71);
    }

    #[test]
    fn error_status_is_reported_not_failed() {
        let mut stream = MockStream::with_chunks(["HTTP/1.1 503 Service Unavailable\r\n\r\n"]);
        let summary = block_on(read_response(&mut stream, pending::<()>)).unwrap();
        assert_eq!(summary.status, Some(503));
        assert!(!summary.is_success());
    }

    #[test]
    fn empty_response_is_closed() {
        let mut stream = MockStream::default();
        assert_eq!(
            block_on(read_response(&mut stream, pending::<()>)),
            Err(Error::Closed)
        );
    }

    #[test]
    fn quiet_peer_after_data_ends_response() {
        let mut stream =
            MockStream::open_after(["HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n{}"]);
        let summary = block_on(read_response(&mut stream, || ready(()))).unwrap();
        assert_eq!(summary.status, Some(200));
        assert_eq!(summary.lines, 4);
    }

    #[test]
    fn silent_peer_times_out() {
        let mut stream = MockStream::open_after(std::iter::empty::<&[u8]>());
        assert_eq!(
            block_on(read_response(&mut stream, || ready(()))),
            Err(Error::Timeout)
        );
    }

    #[test]
    fn read_error_propagates() {
        let mut stream = MockStream::with_chunks(["HTTP/1.1 200 OK\r\n"]);
        stream.fail_read = Some(ErrorKind::TimedOut);
        assert_eq!(
            block_on(read_response(&mut stream, pending::<()>)),
            Err(Error::Io(ErrorKind::TimedOut))
        );
    }
}
