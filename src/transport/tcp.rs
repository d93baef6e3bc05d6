use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream as StdTcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, trace, warn};
use mio::net::TcpStream;
use mio::{Events, Interest, Poll, Token};

use super::Transport;
use crate::{Error, IoErrorKind, SystemClock, Timer, ToError};

const STREAM: Token = Token(0);

/// Options applied while opening a [`TcpTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Bound on the blocking connect, per resolved address. `None` leaves it
    /// to the operating system.
    pub connect_timeout: Option<Duration>,
    /// Set `TCP_NODELAY` on the socket.
    pub nodelay: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        ConnectOptions {
            connect_timeout: None,
            nodelay: true,
        }
    }
}

/// Plain TCP transport waiting on socket readiness with `mio`.
pub struct TcpTransport {
    stream: TcpStream,
    poll: Poll,
    events: Events,
    clock: SystemClock,
}

impl TcpTransport {
    pub fn connect(addr: &str, port: u16) -> Result<Self, Error> {
        Self::connect_with(addr, port, &ConnectOptions::default())
    }

    /// Resolve `addr` and connect to the first address accepting the
    /// connection. On failure no socket is left open.
    pub fn connect_with(addr: &str, port: u16, options: &ConnectOptions) -> Result<Self, Error> {
        let addrs = (addr, port).to_socket_addrs().map_err(|err| {
            warn!("failed to resolve {}:{}: {}", addr, port, err);
            Error::ConnectFailure(err.kind().into())
        })?;

        let mut last_err = IoErrorKind::InvalidData;
        for sock_addr in addrs {
            let stream = match options.connect_timeout {
                Some(timeout) => StdTcpStream::connect_timeout(&sock_addr, timeout),
                None => StdTcpStream::connect(sock_addr),
            };
            match stream.and_then(|stream| Self::setup(stream, options)) {
                Ok(transport) => {
                    debug!("connected to {}", sock_addr);
                    return Ok(transport);
                }
                Err(err) => {
                    warn!("failed to connect to {}: {}", sock_addr, err);
                    last_err = err.kind().into();
                }
            }
        }
        Err(Error::ConnectFailure(last_err))
    }

    fn setup(stream: StdTcpStream, options: &ConnectOptions) -> io::Result<Self> {
        stream.set_nodelay(options.nodelay)?;
        stream.set_nonblocking(true)?;
        let mut stream = TcpStream::from_std(stream);
        let poll = Poll::new()?;
        poll.registry()
            .register(&mut stream, STREAM, Interest::READABLE | Interest::WRITABLE)?;
        Ok(TcpTransport {
            stream,
            poll,
            events: Events::with_capacity(4),
            clock: SystemClock::new(),
        })
    }

    /// Block until the socket may be ready again. Returns `false` once the
    /// deadline has passed.
    fn wait(&mut self, timer: &Timer) -> Result<bool, Error> {
        let remaining = timer.remaining_ms(&self.clock);
        if remaining == 0 {
            return Ok(false);
        }
        let timeout = Duration::from_millis(u64::from(remaining));
        match self.poll.poll(&mut self.events, Some(timeout)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(true),
            Err(err) => Err(err.to_error()),
        }
    }
}

impl Transport for TcpTransport {
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut timer = Timer::new();
        timer.countdown_ms(&self.clock, timeout_ms);

        let mut filled = 0;
        while filled < buf.len() {
            match self.stream.read(&mut buf[filled..]) {
                Ok(0) => {
                    debug!("connection closed by peer");
                    return Err(Error::IoFailure(IoErrorKind::UnexpectedEof));
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    if !self.wait(&timer)? {
                        trace!("read timed out after {}ms, {} bytes", timeout_ms, filled);
                        if filled == 0 {
                            return Ok(0);
                        }
                        return Err(Error::IoFailure(IoErrorKind::TimedOut));
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err.to_error()),
            }
        }
        Ok(filled)
    }

    fn write(&mut self, buf: &[u8], timeout_ms: u32) -> Result<usize, Error> {
        let mut timer = Timer::new();
        timer.countdown_ms(&self.clock, timeout_ms);

        let mut sent = 0;
        while sent < buf.len() {
            match self.stream.write(&buf[sent..]) {
                Ok(0) => return Err(Error::IoFailure(IoErrorKind::WriteZero)),
                Ok(n) => sent += n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    if !self.wait(&timer)? {
                        trace!("write timed out after {}ms, {} bytes", timeout_ms, sent);
                        return Err(Error::IoFailure(IoErrorKind::TimedOut));
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err.to_error()),
            }
        }
        Ok(sent)
    }

    fn disconnect(mut self) -> Result<(), Error> {
        debug!("disconnecting");
        self.poll
            .registry()
            .deregister(&mut self.stream)
            .map_err(ToError::to_error)?;
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // already closed by the peer
            Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(err.to_error()),
        }
    }
}
