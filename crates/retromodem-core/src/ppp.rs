//! PPP session lifecycle hooks.
//!
//! The actual PPP implementation (LCP/IPCP, NAT, routing) is an external
//! collaborator behind [`PppEngine`]; the core only manages the session
//! lifecycle: a reserved dial target opens a listening session, serial
//! bytes are fed in as PPP frames, engine output is drained back to the
//! serial side while in Data mode, and any fatal status forces a hang-up.

use std::fmt;
use thiserror::Error;

/// Session status reported by the engine, mirroring the classic PPP error
/// taxonomy. Anything other than `Up`/`ClosedByUser` is fatal to the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PppStatus {
    /// Session negotiated and passing traffic.
    Up,
    /// Clean local shutdown.
    ClosedByUser,
    /// Invalid session parameter.
    InvalidParameter,
    /// Unable to open the session.
    OpenFailed,
    /// Invalid I/O device for the session.
    DeviceError,
    /// Out of resources.
    AllocFailed,
    /// Connection lost mid-session.
    ConnectionLost,
    /// Peer failed the authentication challenge.
    AuthFailed,
    /// Protocol negotiation failed.
    ProtocolError,
    /// Peer stopped responding.
    PeerDead,
    /// Idle timeout expired.
    IdleTimeout,
    /// Maximum connect time reached.
    ConnectTimeExceeded,
    /// Loopback detected on the link.
    LoopbackDetected,
}

impl PppStatus {
    /// Whether this status ends the call abnormally.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PppStatus::Up | PppStatus::ClosedByUser)
    }
}

impl fmt::Display for PppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PppStatus::Up => "PPP: Connected",
            PppStatus::ClosedByUser => "PPP: shutdown",
            PppStatus::InvalidParameter => "PPP: Invalid parameter",
            PppStatus::OpenFailed => "PPP: Unable to open PPP session",
            PppStatus::DeviceError => "PPP: Invalid I/O device",
            PppStatus::AllocFailed => "PPP: Unable to allocate resources",
            PppStatus::ConnectionLost => "PPP: Connection lost",
            PppStatus::AuthFailed => "PPP: Failed authentication challenge",
            PppStatus::ProtocolError => "PPP: Failed to meet protocol",
            PppStatus::PeerDead => "PPP: Connection timeout",
            PppStatus::IdleTimeout => "PPP: Idle Timeout",
            PppStatus::ConnectTimeExceeded => "PPP: Max connect time reached",
            PppStatus::LoopbackDetected => "PPP: Loopback detected",
        };
        f.write_str(text)
    }
}

/// Errors from opening a PPP session.
#[derive(Debug, Error)]
pub enum PppError {
    /// A session is already active.
    #[error("PPP already active")]
    AlreadyActive,

    /// The engine refused to open a session.
    #[error("{0}")]
    Session(PppStatus),
}

/// The external PPP implementation boundary.
pub trait PppEngine {
    /// Start listening for a peer on the serial line.
    fn listen(&mut self) -> Result<(), PppError>;

    /// Feed serial-side bytes into the session as PPP frames.
    fn input(&mut self, data: &[u8]);

    /// Drain bytes the session wants to send to the serial side.
    fn take_output(&mut self) -> Vec<u8>;

    /// Tear the session down cleanly.
    fn close(&mut self);

    /// Status changes since the last poll, if any.
    fn poll_status(&mut self) -> Option<PppStatus>;
}

/// An installed PPP engine plus the active-session flag.
pub struct PppLink {
    engine: Box<dyn PppEngine>,
    active: bool,
}

impl PppLink {
    /// Wrap an engine. The link starts inactive.
    pub fn new(engine: Box<dyn PppEngine>) -> Self {
        PppLink {
            engine,
            active: false,
        }
    }

    /// Open a listening session.
    pub fn open(&mut self) -> Result<(), PppError> {
        if self.active {
            return Err(PppError::AlreadyActive);
        }
        self.engine.listen()?;
        self.active = true;
        Ok(())
    }

    /// Whether a session is active (listening or up).
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feed serial bytes into the active session.
    pub fn input(&mut self, data: &[u8]) {
        if self.active {
            self.engine.input(data);
        }
    }

    /// Drain session output for the serial side.
    pub fn take_output(&mut self) -> Vec<u8> {
        if self.active {
            self.engine.take_output()
        } else {
            Vec::new()
        }
    }

    /// Close the session.
    pub fn close(&mut self) {
        if self.active {
            self.engine.close();
            self.active = false;
        }
    }

    /// Poll for a status event. A clean shutdown deactivates the link; a
    /// fatal status is returned for the scheduler to act on.
    pub fn poll_event(&mut self) -> Option<PppStatus> {
        let status = self.engine.poll_status()?;
        match status {
            PppStatus::Up => {
                log::debug!("ppp session up");
                Some(status)
            }
            PppStatus::ClosedByUser => {
                self.active = false;
                Some(status)
            }
            fatal => {
                log::warn!("ppp session failed: {fatal}");
                self.active = false;
                Some(fatal)
            }
        }
    }
}
