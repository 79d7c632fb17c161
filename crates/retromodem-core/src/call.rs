//! Call state and the ring/busy policy constants.

use crate::config::PinPolarity;
use std::time::{Duration, Instant};

/// Minimum gap between RING notifications for one pending caller.
pub const RING_WINDOW: Duration = Duration::from_secs(6);

/// Unanswered ring count beyond which a pending caller gets the busy
/// treatment instead of another RING.
pub const MAX_UNANSWERED_RINGS: u8 = 3;

/// What kind of peer an active call is bridged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerKind {
    /// A TCP stream (dial-out or answered inbound call).
    Tcp,
    /// A PPP session carried over the serial line.
    Ppp,
}

/// The call/carrier state. Mutated only by dial/answer/hangup and by
/// transport-level disconnect detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// No call, no pending caller.
    Idle,
    /// An inbound caller is waiting while the DTE is being rung.
    Ringing {
        /// RINGs emitted so far for this caller.
        ring_count: u8,
        /// When the last RING was emitted.
        last_ring: Instant,
    },
    /// A call is up.
    Connected {
        /// When the call connected; drives the NO CARRIER duration.
        since: Instant,
        /// What the call is bridged to.
        peer: PeerKind,
    },
}

impl CallState {
    /// Whether a call is up.
    pub fn is_connected(&self) -> bool {
        matches!(self, CallState::Connected { .. })
    }

    /// Elapsed call time, zero when no call is up.
    pub fn duration(&self, now: Instant) -> Duration {
        match self {
            CallState::Connected { since, .. } => now.saturating_duration_since(*since),
            _ => Duration::ZERO,
        }
    }
}

/// Compute the DCD pin level for the given call activity and polarity.
///
/// Normal polarity drives the pin active-low (asserted call pulls the line
/// down); inverted polarity drives it active-high.
pub fn carrier_level(call_active: bool, polarity: PinPolarity) -> bool {
    match polarity {
        PinPolarity::Normal => !call_active,
        PinPolarity::Inverted => call_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_carrier_level_polarity() {
        assert!(!carrier_level(true, PinPolarity::Normal));
        assert!(carrier_level(false, PinPolarity::Normal));
        assert!(carrier_level(true, PinPolarity::Inverted));
        assert!(!carrier_level(false, PinPolarity::Inverted));
    }

    #[test]
    fn test_duration_zero_when_idle() {
        let now = Instant::now();
        assert_eq!(CallState::Idle.duration(now), Duration::ZERO);
    }

    #[test]
    fn test_duration_tracks_connect_time() {
        let start = Instant::now();
        let call = CallState::Connected {
            since: start,
            peer: PeerKind::Tcp,
        };
        let later = start + Duration::from_secs(90);
        assert_eq!(call.duration(later), Duration::from_secs(90));
    }
}
