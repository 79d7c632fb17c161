//! The "+++" escape sequence detector.
//!
//! Three consecutive '+' bytes on the serial side arm the detector and
//! record a timestamp; one second of serial silence afterwards drops the
//! modem from Data to Command mode. Any other byte resets the run counter,
//! so a data payload that merely contains "+++" followed by more bytes is
//! never misread as an operator escape.

use std::time::{Duration, Instant};

/// Silence required after the third '+' before the escape fires.
pub const ESCAPE_GUARD: Duration = Duration::from_millis(1000);

/// Tracks a run of '+' bytes and the guard timer.
#[derive(Debug, Default)]
pub struct EscapeDetector {
    run: u8,
    armed_at: Option<Instant>,
}

impl EscapeDetector {
    pub fn new() -> Self {
        EscapeDetector::default()
    }

    /// Account for one serial byte headed to the network side.
    pub fn note(&mut self, byte: u8, now: Instant) {
        if byte == b'+' {
            self.run = self.run.saturating_add(1);
            if self.run == 3 {
                self.armed_at = Some(now);
            }
        } else {
            self.run = 0;
        }
    }

    /// Whether three pluses have been seen without a disturbing byte.
    pub fn armed(&self) -> bool {
        self.run >= 3
    }

    /// Check the silence guard. Returns true exactly once when the escape
    /// fires, and disarms the detector.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.run >= 3 {
            if let Some(armed_at) = self.armed_at {
                if now.saturating_duration_since(armed_at) >= ESCAPE_GUARD {
                    self.reset();
                    return true;
                }
            }
        }
        false
    }

    /// Forget any partial or armed run.
    pub fn reset(&mut self) {
        self.run = 0;
        self.armed_at = None;
    }
}
