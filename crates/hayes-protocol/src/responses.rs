//! Modem result codes and their rendering.
//!
//! A result is sent after (almost) every command. In numeric mode the bare
//! code digit is sent; in verbose mode the classic name is sent, wrapped in
//! ANSI colors. Quiet mode suppresses the result entirely (the caller still
//! emits the leading line break).

use std::time::Duration;

/// The standard Hayes result codes, with their numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Ok = 0,
    Connect = 1,
    Ring = 2,
    NoCarrier = 3,
    Error = 4,
    /// Code 5 is reserved and renders as an empty string.
    Reserved = 5,
    NoDialtone = 6,
    Busy = 7,
    NoAnswer = 8,
}

impl ResultCode {
    /// Numeric form used when verbose results are off.
    pub fn numeric(&self) -> u8 {
        *self as u8
    }

    /// The classic verbose name. CONNECT and NO CARRIER are decorated with
    /// the serial speed / call duration by [`ResultFormatter::render`].
    pub fn verbose_name(&self) -> &'static str {
        match self {
            ResultCode::Ok => "OK",
            ResultCode::Connect => "CONNECT",
            ResultCode::Ring => "RING",
            ResultCode::NoCarrier => "NO CARRIER",
            ResultCode::Error => "ERROR",
            ResultCode::Reserved => "",
            ResultCode::NoDialtone => "NO DIALTONE",
            ResultCode::Busy => "BUSY",
            ResultCode::NoAnswer => "NO ANSWER",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            // black on green
            ResultCode::Ok | ResultCode::Connect => "\x1b[30;42m",
            // black on yellow
            ResultCode::Ring
            | ResultCode::NoCarrier
            | ResultCode::NoDialtone
            | ResultCode::Busy
            | ResultCode::NoAnswer => "\x1b[30;43m",
            // white on red
            ResultCode::Error => "\x1b[37;41m",
            ResultCode::Reserved => "\x1b[0m",
        }
    }
}

/// Format a call duration as `hh:mm:ss`.
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let mins = secs / 60;
    let hours = mins / 60;
    format!("{:02}:{:02}:{:02}", hours, mins % 60, secs % 60)
}

/// Renders result codes according to the active verbosity/quiet settings.
#[derive(Debug, Clone, Copy)]
pub struct ResultFormatter {
    /// Verbose (named) results instead of numeric codes.
    pub verbose: bool,
    /// Suppress result output entirely.
    pub quiet: bool,
}

impl ResultFormatter {
    /// Render a result code, or `None` when quiet mode swallows it.
    ///
    /// `speed` decorates CONNECT; `call_duration` decorates NO CARRIER.
    pub fn render(
        &self,
        code: ResultCode,
        speed: u32,
        call_duration: Duration,
    ) -> Option<String> {
        if self.quiet {
            return None;
        }
        if !self.verbose {
            return Some(format!("{}", code.numeric()));
        }
        let message = match code {
            ResultCode::Connect => format!("{} {}", code.verbose_name(), speed),
            ResultCode::NoCarrier => format!(
                "{} ({})",
                code.verbose_name(),
                format_duration(call_duration)
            ),
            _ => code.verbose_name().to_string(),
        };
        Some(format!("{} {} \x1b[0m", code.color(), message))
    }
}
