//! Core error types.

use crate::settings::SettingsError;
use thiserror::Error;

/// Errors that can escape the modem scheduler.
///
/// Protocol-level problems (bad AT parameters, XMODEM corruption, Telnet
/// noise) are handled in place and never surface here; only transport and
/// persistence failures do.
#[derive(Debug, Error)]
pub enum ModemError {
    /// Serial or network I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings collaborator failed.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}
