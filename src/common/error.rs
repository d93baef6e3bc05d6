use thiserror::Error;

/// Errors returned by the codec, the timer-driven transports and
/// [`read_packet`](crate::read_packet).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The packet type nibble is undefined, the QoS bits are 3, or the packet
    /// is not the type the call site expects.
    #[error("malformed header")]
    MalformedHeader,

    /// Remaining length needs a 5th byte or exceeds `268,435,455`.
    #[error("malformed remaining length")]
    MalformedRemainingLength,

    /// A declared length runs past the end of the available bytes.
    #[error("truncated buffer")]
    TruncatedBuffer,

    /// More topic filters than the caller's capacity.
    #[error("too many topic filters")]
    TooManyFilters,

    /// The target buffer cannot hold the encoded packet.
    #[error("buffer too short")]
    BufferTooShort,

    /// A string field longer than a 2-byte length prefix can describe.
    #[error("string too long: {0} bytes")]
    StringTooLong(usize),

    /// Trying to read a non-utf8 string.
    #[error("invalid string")]
    InvalidString,

    /// Invalid QoS value.
    #[error("invalid qos: `{0}`")]
    InvalidQos(u8),

    /// Unknown protocol name or level in a connect packet.
    #[error("invalid protocol level: `{0}`")]
    InvalidProtocol(u8),

    /// Invalid connect flags.
    #[error("invalid connect flags: `{0}`")]
    InvalidConnectFlags(u8),

    /// Invalid connack flags (not 0 or 1).
    #[error("invalid connack flags: `{0}`")]
    InvalidConnackFlags(u8),

    /// Invalid connect return code (value > 5).
    #[error("invalid connect return code: `{0}`")]
    InvalidConnectReturnCode(u8),

    /// Opening the connection failed; no socket is left open.
    #[error("connect failure: {0:?}")]
    ConnectFailure(IoErrorKind),

    /// Reading from or writing to an open connection failed.
    #[error("io failure: {0:?}")]
    IoFailure(IoErrorKind),
}

/// IoErrorKind for both std and no-std environments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoErrorKind {
    UnexpectedEof,
    InvalidData,
    WriteZero,
    TimedOut,
    ConnectionRefused,
    ConnectionReset,
    Other,
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::IoFailure(IoErrorKind::TimedOut) | Error::ConnectFailure(IoErrorKind::TimedOut)
        )
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Error::IoFailure(IoErrorKind::UnexpectedEof))
    }
}

pub trait ToError {
    fn to_error(self) -> Error;
}

#[cfg(feature = "std")]
impl From<std::io::ErrorKind> for IoErrorKind {
    fn from(kind: std::io::ErrorKind) -> IoErrorKind {
        match kind {
            std::io::ErrorKind::UnexpectedEof => IoErrorKind::UnexpectedEof,
            std::io::ErrorKind::InvalidData | std::io::ErrorKind::InvalidInput => {
                IoErrorKind::InvalidData
            }
            std::io::ErrorKind::WriteZero => IoErrorKind::WriteZero,
            std::io::ErrorKind::TimedOut => IoErrorKind::TimedOut,
            std::io::ErrorKind::ConnectionRefused => IoErrorKind::ConnectionRefused,
            std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe => IoErrorKind::ConnectionReset,
            _ => IoErrorKind::Other,
        }
    }
}

#[cfg(feature = "std")]
impl ToError for std::io::Error {
    fn to_error(self) -> Error {
        Error::IoFailure(self.kind().into())
    }
}

#[cfg(feature = "embedded-io")]
impl From<embedded_io::ErrorKind> for IoErrorKind {
    fn from(kind: embedded_io::ErrorKind) -> IoErrorKind {
        match kind {
            embedded_io::ErrorKind::InvalidData | embedded_io::ErrorKind::InvalidInput => {
                IoErrorKind::InvalidData
            }
            embedded_io::ErrorKind::WriteZero => IoErrorKind::WriteZero,
            embedded_io::ErrorKind::TimedOut => IoErrorKind::TimedOut,
            embedded_io::ErrorKind::ConnectionRefused => IoErrorKind::ConnectionRefused,
            embedded_io::ErrorKind::ConnectionReset
            | embedded_io::ErrorKind::ConnectionAborted
            | embedded_io::ErrorKind::BrokenPipe => IoErrorKind::ConnectionReset,
            _ => IoErrorKind::Other,
        }
    }
}

#[cfg(feature = "embedded-io")]
impl Error {
    pub(crate) fn from_embedded<E: embedded_io::Error>(err: E) -> Error {
        Error::IoFailure(err.kind().into())
    }
}

#[cfg(feature = "embedded-io")]
impl<E: embedded_io::Error> ToError for embedded_io::ReadExactError<E> {
    fn to_error(self) -> Error {
        match self {
            embedded_io::ReadExactError::UnexpectedEof => {
                Error::IoFailure(IoErrorKind::UnexpectedEof)
            }
            embedded_io::ReadExactError::Other(e) => Error::from_embedded(e),
        }
    }
}
