//! Collaborator boundaries.
//!
//! Wi-Fi association, SSH plumbing, inline HTTP/Gopher fetches and firmware
//! updates are external to the core. Each is a trait here; host builds wire
//! in real or stub implementations, tests wire in scripted ones.

use crate::config::SessionConfig;
use std::net::IpAddr;
use thiserror::Error;

/// Errors surfaced by collaborators.
#[derive(Debug, Error)]
pub enum CollabError {
    /// The feature is not available on this build.
    #[error("not supported on this build")]
    Unsupported,

    /// The operation was attempted and failed.
    #[error("{0}")]
    Failed(String),
}

/// Wi-Fi association, scanning and status.
pub trait WifiControl {
    /// Associate using the credentials in `config`. Returns progress and
    /// advice lines for the DTE.
    fn connect(&mut self, config: &SessionConfig) -> Vec<String>;

    /// Drop the association.
    fn disconnect(&mut self);

    /// Status lines for the ATI report (association state, addresses).
    fn status_lines(&self) -> Vec<String>;

    /// Scan for networks; one line per network, empty when none found.
    fn scan(&mut self) -> Vec<String>;

    /// The local address, when associated.
    fn local_ip(&self) -> Option<IpAddr>;
}

/// SSH dial-out boundary. The session plumbing reports asynchronously, so a
/// successful dial intentionally leaves the AT command pending.
pub trait SshDialer {
    fn dial(&mut self, host: &str, port: u16) -> Result<(), CollabError>;
}

/// Inline HTTP GET / Gopher fetches issued from command mode.
pub trait InlineFetcher {
    fn http_get(&mut self, url: &str) -> Result<Vec<u8>, CollabError>;
    fn gopher(&mut self, url: &str) -> Result<Vec<u8>, CollabError>;
}

/// One step of an in-progress firmware update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStep {
    /// Still working; call again next tick.
    Busy,
    /// Finished successfully.
    Done,
    /// Gave up.
    Failed(String),
}

/// Over-the-air firmware update client. Once armed via AT$FW the scheduler
/// hands every tick to the updater until it reports Done or Failed.
pub trait FirmwareUpdater {
    fn step(&mut self) -> UpdateStep;
}
