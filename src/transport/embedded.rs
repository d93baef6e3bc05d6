use embedded_io::{Read, ReadReady, Write, WriteReady};
use log::{debug, trace};

use super::Transport;
use crate::{Clock, Error, IoErrorKind, Timer};

/// Transport over any blocking `embedded_io` device that can report
/// readiness, timed by a user supplied [`Clock`].
///
/// Waiting is a busy loop on `read_ready`/`write_ready`.
pub struct EmbeddedTransport<T, C> {
    io: T,
    clock: C,
}

impl<T, C> EmbeddedTransport<T, C>
where
    T: Read + Write + ReadReady + WriteReady,
    C: Clock,
{
    pub fn new(io: T, clock: C) -> Self {
        EmbeddedTransport { io, clock }
    }

    pub fn into_inner(self) -> (T, C) {
        (self.io, self.clock)
    }
}

impl<T, C> Transport for EmbeddedTransport<T, C>
where
    T: Read + Write + ReadReady + WriteReady,
    C: Clock,
{
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Error> {
        let mut timer = Timer::new();
        timer.countdown_ms(&self.clock, timeout_ms);

        let mut filled = 0;
        while filled < buf.len() {
            if self.io.read_ready().map_err(Error::from_embedded)? {
                match self.io.read(&mut buf[filled..]).map_err(Error::from_embedded)? {
                    0 => return Err(Error::IoFailure(IoErrorKind::UnexpectedEof)),
                    n => filled += n,
                }
            } else if timer.expired(&self.clock) {
                trace!("read timed out after {}ms, {} bytes", timeout_ms, filled);
                if filled == 0 {
                    return Ok(0);
                }
                return Err(Error::IoFailure(IoErrorKind::TimedOut));
            } else {
                core::hint::spin_loop();
            }
        }
        Ok(filled)
    }

    fn write(&mut self, buf: &[u8], timeout_ms: u32) -> Result<usize, Error> {
        let mut timer = Timer::new();
        timer.countdown_ms(&self.clock, timeout_ms);

        let mut sent = 0;
        while sent < buf.len() {
            if self.io.write_ready().map_err(Error::from_embedded)? {
                match self.io.write(&buf[sent..]).map_err(Error::from_embedded)? {
                    0 => return Err(Error::IoFailure(IoErrorKind::WriteZero)),
                    n => sent += n,
                }
            } else if timer.expired(&self.clock) {
                trace!("write timed out after {}ms, {} bytes", timeout_ms, sent);
                return Err(Error::IoFailure(IoErrorKind::TimedOut));
            } else {
                core::hint::spin_loop();
            }
        }
        self.io.flush().map_err(Error::from_embedded)?;
        Ok(sent)
    }

    fn disconnect(mut self) -> Result<(), Error> {
        debug!("disconnecting");
        self.io.flush().map_err(Error::from_embedded)
    }
}
