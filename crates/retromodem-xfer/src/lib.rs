//! # retromodem-xfer
//!
//! Byte-level translators that run inside an active call: the XMODEM block
//! receiver (checksum, CRC and 1K variants) and the Telnet IAC escaping and
//! negotiation rules. Both are push-style state machines fed one byte at a
//! time by the connected-mode bridge; neither owns any I/O.

pub mod telnet;
pub mod xmodem;

pub use telnet::{escape_iac, negotiate, Negotiation};
pub use xmodem::{crc16_xmodem, XmodemMode, XmodemReceiver, XmodemStep};
