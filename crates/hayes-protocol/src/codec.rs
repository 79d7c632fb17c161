//! Command-line accumulation and editing for Command Mode.
//!
//! The DTE sends one character at a time; the modem gathers them into a
//! line, honors backspace, and fires the line off for dispatch when a CR or
//! LF arrives. Characters past the capacity are dropped silently so a noisy
//! serial line never turns into an error storm.

use bytes::BytesMut;

/// Maximum accumulated command-line length. Overflow is dropped, not an
/// error.
pub const MAX_COMMAND_LENGTH: usize = 256;

/// Byte values treated as backspace by the line editor.
const BACKSPACE_BYTES: [u8; 3] = [0x08, 0x7F, 0x14];

/// Fold legacy 8-bit uppercase bytes (0xC1..=0xDA) down into the ASCII
/// letter range so 8-bit terminals can type commands. Used for parsing
/// only; the echoed byte is always the original.
pub fn fold_high_byte(byte: u8) -> u8 {
    if (0xC1..=0xDA).contains(&byte) {
        byte - 0x60
    } else {
        byte
    }
}

/// What a fed byte did to the line under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineInput {
    /// Byte accumulated (or dropped on overflow); keep feeding.
    Pending,
    /// Byte removed the last accumulated character.
    Erased,
    /// CR/LF seen; the gathered line is returned and the buffer cleared.
    Complete(String),
}

/// Accumulates Command Mode input one byte at a time.
#[derive(Debug, Default)]
pub struct CommandLine {
    buffer: BytesMut,
}

impl CommandLine {
    /// Create an empty command line.
    pub fn new() -> Self {
        CommandLine {
            buffer: BytesMut::with_capacity(MAX_COMMAND_LENGTH),
        }
    }

    /// Feed one byte from the serial side.
    ///
    /// The byte should already have been folded with [`fold_high_byte`] if
    /// the caller supports legacy 8-bit terminals.
    pub fn feed(&mut self, byte: u8) -> LineInput {
        if byte == b'\r' || byte == b'\n' {
            let line = String::from_utf8_lossy(&self.buffer).to_string();
            self.buffer.clear();
            return LineInput::Complete(line);
        }
        if BACKSPACE_BYTES.contains(&byte) {
            if !self.buffer.is_empty() {
                let new_len = self.buffer.len() - 1;
                self.buffer.truncate(new_len);
            }
            return LineInput::Erased;
        }
        if self.buffer.len() < MAX_COMMAND_LENGTH {
            self.buffer.extend_from_slice(&[byte]);
        } else {
            log::trace!("command line full, dropping byte 0x{byte:02X}");
        }
        LineInput::Pending
    }

    /// Number of characters gathered so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing has been gathered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard the line under construction.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
