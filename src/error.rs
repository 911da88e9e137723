use core::fmt;

use embedded_io_async::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The underlying stream failed.
    Io(ErrorKind),
    /// The peer closed the connection before the exchange finished.
    Closed,
    /// The peer sent nothing within the allowed time.
    Timeout,
    /// A fixed-size buffer was too small for the data.
    Overflow,
}

impl Error {
    pub(crate) fn io<E: embedded_io_async::Error>(err: E) -> Self {
        Error::Io(err.kind())
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_error: core::fmt::Error) -> Self {
        Error::Overflow
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(kind) => write!(f, "i/o error: {kind:?}"),
            Error::Closed => f.write_str("connection closed"),
            Error::Timeout => f.write_str("timed out"),
            Error::Overflow => f.write_str("buffer overflow"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
