//! Non-blocking std-net transports for calls.
//!
//! Streams are switched to non-blocking mode so the scheduler's "read what
//! is available now" contract holds; `WouldBlock` is simply "no data this
//! tick". Peer loss shows up as a zero-byte read or a write failure and is
//! reported through `is_connected`.

use retromodem_core::{NetDialer, NetListener, NetStream};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Timeout for an outbound connect attempt.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a non-blocking write may retry before giving up.
const WRITE_STALL_LIMIT: Duration = Duration::from_secs(5);

/// One TCP call peer.
pub struct TcpNetStream {
    stream: TcpStream,
    peer: Option<SocketAddr>,
    connected: bool,
}

impl TcpNetStream {
    /// Wrap an accepted or connected stream, switching it to the modes the
    /// bridge expects (non-blocking, no Nagle).
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr().ok();
        Ok(TcpNetStream {
            stream,
            peer,
            connected: true,
        })
    }
}

impl NetStream for TcpNetStream {
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stream.read(buf) {
            // A ready zero-byte read is the peer closing.
            Ok(0) if !buf.is_empty() => {
                self.connected = false;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(err) => {
                self.connected = false;
                Err(err)
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let mut written = 0;
        let start = std::time::Instant::now();
        while written < data.len() {
            match self.stream.write(&data[written..]) {
                Ok(0) => {
                    self.connected = false;
                    return Err(io::Error::new(io::ErrorKind::WriteZero, "peer closed"));
                }
                Ok(n) => written += n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    if start.elapsed() > WRITE_STALL_LIMIT {
                        return Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            "peer not draining output",
                        ));
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
                Err(err) => {
                    self.connected = false;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

/// The inbound-call listener.
pub struct TcpNetListener {
    listener: TcpListener,
    port: u16,
    /// Peer seen by `has_pending` but not yet accepted by the call logic.
    pending: Option<TcpStream>,
}

impl TcpNetListener {
    pub fn bind(port: u16) -> io::Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port))?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();
        Ok(TcpNetListener {
            listener,
            port,
            pending: None,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl NetListener for TcpNetListener {
    fn has_pending(&mut self) -> bool {
        if self.pending.is_none() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    tracing::debug!("inbound connection from {peer}");
                    self.pending = Some(stream);
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {}
                Err(err) => tracing::warn!("accept failed: {err}"),
            }
        }
        self.pending.is_some()
    }

    fn accept(&mut self) -> io::Result<Box<dyn NetStream>> {
        let stream = match self.pending.take() {
            Some(stream) => stream,
            None => self.listener.accept().map(|(stream, _)| stream)?,
        };
        Ok(Box::new(TcpNetStream::new(stream)?))
    }
}

/// Outbound dialer with a bounded connect timeout.
pub struct TcpDialer {
    timeout: Duration,
}

impl TcpDialer {
    pub fn new() -> Self {
        TcpDialer {
            timeout: CONNECT_TIMEOUT,
        }
    }
}

impl Default for TcpDialer {
    fn default() -> Self {
        TcpDialer::new()
    }
}

impl NetDialer for TcpDialer {
    fn connect(&mut self, host: &str, port: u16) -> io::Result<Box<dyn NetStream>> {
        let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no address resolved");
        for addr in (host, port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(Box::new(TcpNetStream::new(stream)?)),
                Err(err) => last_err = err,
            }
        }
        Err(last_err)
    }
}
