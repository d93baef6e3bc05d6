//! Bounded-wait byte transports and a framed packet reader on top of them.

#[cfg(feature = "embedded-io")]
mod embedded;
#[cfg(feature = "std")]
mod tcp;


#[cfg(feature = "embedded-io")]
pub use embedded::EmbeddedTransport;
#[cfg(feature = "std")]
pub use tcp::{ConnectOptions, TcpTransport};

use crate::{Clock, Error, IoErrorKind, Timer};

/// A connected byte stream whose every call is bounded by a budget in
/// milliseconds. Budgets above [`Timer::MAX_MS`] are clamped to it.
pub trait Transport {
    /// Fill `buf` completely.
    ///
    /// Returns `Ok(0)` when not a single byte arrived within `timeout_ms`,
    /// `buf.len()` otherwise. Running out of time after part of `buf` was
    /// filled is `IoFailure(TimedOut)`, and a peer closing the stream is
    /// `IoFailure(UnexpectedEof)`.
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Error>;

    /// Send all of `buf` before `timeout_ms` passes, returning `buf.len()`.
    fn write(&mut self, buf: &[u8], timeout_ms: u32) -> Result<usize, Error>;

    /// Close the connection.
    fn disconnect(self) -> Result<(), Error>
    where
        Self: Sized;
}

/// Read one complete packet into `buf` before `timer` expires.
///
/// The fixed header is read a byte at a time so that nothing past the packet
/// is consumed. Returns the total packet length, or `0` when no packet
/// started before the deadline.
pub fn read_packet<T, C>(
    transport: &mut T,
    clock: &C,
    buf: &mut [u8],
    timer: &Timer,
) -> Result<usize, Error>
where
    T: Transport + ?Sized,
    C: Clock,
{
    if buf.is_empty() {
        return Err(Error::BufferTooShort);
    }
    if transport.read(&mut buf[..1], timer.remaining_ms(clock))? == 0 {
        return Ok(0);
    }

    let mut len = 1;
    let mut remaining_len = 0;
    let mut shift = 0;
    loop {
        if len > 4 {
            return Err(Error::MalformedRemainingLength);
        }
        if len >= buf.len() {
            return Err(Error::BufferTooShort);
        }
        read_rest(transport, clock, &mut buf[len..len + 1], timer)?;
        let byte = buf[len];
        len += 1;
        remaining_len |= usize::from(byte & 0x7F) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            break;
        }
    }

    let total = len + remaining_len;
    if total > buf.len() {
        return Err(Error::BufferTooShort);
    }
    if remaining_len > 0 {
        read_rest(transport, clock, &mut buf[len..total], timer)?;
    }
    Ok(total)
}

/// Read bytes of a packet already started, where silence is a timeout.
fn read_rest<T, C>(transport: &mut T, clock: &C, buf: &mut [u8], timer: &Timer) -> Result<(), Error>
where
    T: Transport + ?Sized,
    C: Clock,
{
    match transport.read(buf, timer.remaining_ms(clock))? {
        0 => Err(Error::IoFailure(IoErrorKind::TimedOut)),
        _ => Ok(()),
    }
}
