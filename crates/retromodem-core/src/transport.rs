//! Transport abstraction for the serial (DTE) and network sides.
//!
//! All reads are non-blocking "what is available now" operations: a return
//! of 0 bytes means nothing is pending this tick, never end-of-stream. Peer
//! loss is reported through [`NetStream::is_connected`] and reconciled by
//! the scheduler, not by read errors.

use std::io;
use std::net::SocketAddr;

/// The serial side of the modem (the DTE-facing byte stream).
pub trait SerialPort {
    /// Read whatever bytes are pending, up to `buf.len()`. Returns 0 when
    /// nothing is available right now.
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write all of `data` to the DTE.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush buffered output toward the DTE.
    fn flush(&mut self) -> io::Result<()>;

    /// Change the line rate. Emulated ports may treat this as advisory.
    fn set_baud(&mut self, baud: u32) -> io::Result<()>;
}

/// One network peer of an active call.
pub trait NetStream {
    /// Read whatever bytes are pending, up to `buf.len()`. Returns 0 when
    /// nothing is available right now.
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write all of `data` to the peer.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Whether the peer is still reachable. Checked opportunistically each
    /// scheduler tick.
    fn is_connected(&self) -> bool;

    /// The peer address, when known.
    fn peer_addr(&self) -> Option<SocketAddr>;
}

/// The inbound-call listening socket.
pub trait NetListener {
    /// Whether a peer is waiting to be accepted. Must not consume the peer.
    fn has_pending(&mut self) -> bool;

    /// Accept the waiting peer. Only valid after `has_pending` returned
    /// true within the same tick.
    fn accept(&mut self) -> io::Result<Box<dyn NetStream>>;
}

/// Establishes outbound connections for dial-out.
pub trait NetDialer {
    /// Connect to `host:port`. May block for a bounded connect timeout.
    fn connect(&mut self, host: &str, port: u16) -> io::Result<Box<dyn NetStream>>;
}

/// The carrier-detect (DCD) output signal.
///
/// The core computes the final pin level (polarity already applied); the
/// implementation only has to drive it somewhere.
pub trait CarrierSignal {
    fn set_level(&mut self, level: bool);
}
