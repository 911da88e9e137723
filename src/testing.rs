//! In-memory socket used by the host tests.

use std::collections::VecDeque;

use embedded_io_async::{ErrorKind, ErrorType, Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MockError(pub(crate) ErrorKind);

impl embedded_io_async::Error for MockError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Stream that replays scripted chunks and records everything written.
///
/// Once the script runs out, reads return 0 (peer closed) unless `fail_read`
/// is set, or never complete if `stay_open` is set.
#[derive(Default)]
pub(crate) struct MockStream {
    pub(crate) incoming: VecDeque<Vec<u8>>,
    pub(crate) written: Vec<u8>,
    pub(crate) flushes: usize,
    pub(crate) fail_read: Option<ErrorKind>,
    pub(crate) fail_write: Option<ErrorKind>,
    pub(crate) stay_open: bool,
}

impl MockStream {
    pub(crate) fn with_chunks<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        Self {
            incoming: chunks.into_iter().map(|c| c.as_ref().to_vec()).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing_writes(kind: ErrorKind) -> Self {
        Self {
            fail_write: Some(kind),
            ..Self::default()
        }
    }

    /// Peer that sends `chunks` and then keeps the connection open silently.
    pub(crate) fn open_after<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        Self {
            stay_open: true,
            ..Self::with_chunks(chunks)
        }
    }

    pub(crate) fn written_str(&self) -> &str {
        core::str::from_utf8(&self.written).unwrap()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.incoming.iter().map(Vec::len).sum()
    }
}

impl ErrorType for MockStream {
    type Error = MockError;
}

impl Read for MockStream {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, MockError> {
        let Some(chunk) = self.incoming.front_mut() else {
            if self.stay_open {
                core::future::pending::<()>().await;
            }
            return match self.fail_read {
                Some(kind) => Err(MockError(kind)),
                None => Ok(0),
            };
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        chunk.drain(..n);
        if chunk.is_empty() {
            self.incoming.pop_front();
        }
        Ok(n)
    }
}

impl Write for MockStream {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, MockError> {
        if let Some(kind) = self.fail_write {
            return Err(MockError(kind));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), MockError> {
        self.flushes += 1;
        Ok(())
    }
}
