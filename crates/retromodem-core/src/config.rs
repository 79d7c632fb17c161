//! Session configuration.
//!
//! One mutable record owns every user-settable knob. It is mutated only by
//! the AT dispatcher and persisted through the settings collaborator; the
//! factory defaults reproduce the profile a fresh device ships with.

use serde::{Deserialize, Serialize};

/// Supported serial line rates, indexed by `SessionConfig::serial_speed`.
/// Index 0 is the boot default.
pub const BAUD_RATES: [u32; 9] = [9600, 300, 1200, 2400, 4800, 19200, 38400, 57600, 115200];

/// Number of speed-dial slots.
pub const SPEED_DIAL_SLOTS: usize = 10;

/// Default inbound listen port.
pub const DEFAULT_LISTEN_PORT: u16 = 6400;

/// Carrier-detect pin polarity. AT&P0 selects inverted, AT&P1 normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinPolarity {
    Inverted,
    Normal,
}

impl PinPolarity {
    /// The digit used on the AT surface and in profile listings.
    pub fn as_digit(&self) -> u8 {
        match self {
            PinPolarity::Inverted => 0,
            PinPolarity::Normal => 1,
        }
    }
}

/// Flow control kind. AT&K0 none, AT&K1 hardware, AT&K2 software.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowControlKind {
    None,
    Hardware,
    Software,
}

impl FlowControlKind {
    /// The digit used on the AT surface and in profile listings.
    pub fn as_digit(&self) -> u8 {
        match self {
            FlowControlKind::None => 0,
            FlowControlKind::Hardware => 1,
            FlowControlKind::Software => 2,
        }
    }

    /// Parse the AT&K digit. Out-of-domain values are rejected.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(FlowControlKind::None),
            1 => Some(FlowControlKind::Hardware),
            2 => Some(FlowControlKind::Software),
            _ => None,
        }
    }
}

/// The user-settable session profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Echo accepted command characters back to the DTE.
    pub echo: bool,
    /// Verbose (named) result codes instead of numeric ones.
    pub verbose_results: bool,
    /// Suppress result codes entirely.
    pub quiet_mode: bool,
    /// Answer inbound calls without ATA.
    pub auto_answer: bool,
    /// Carrier-detect pin polarity.
    pub pin_polarity: PinPolarity,
    /// Flow control kind (stored and reported; see DESIGN notes).
    pub flow_control: FlowControlKind,
    /// Index into [`BAUD_RATES`].
    pub serial_speed: usize,
    /// Telnet IAC translation on the call payload.
    pub telnet: bool,
    /// Message sent to a caller rejected by the busy/call-waiting path.
    pub busy_message: String,
    /// Speed-dial targets, `host:port` strings, slots 0-9.
    pub speed_dials: [String; SPEED_DIAL_SLOTS],
    /// Inbound listen port.
    pub listen_port: u16,
    /// Wi-Fi network name.
    pub ssid: String,
    /// Wi-Fi password.
    pub password: String,
}

impl SessionConfig {
    /// The profile a fresh device ships with.
    pub fn factory_defaults() -> Self {
        let mut speed_dials: [String; SPEED_DIAL_SLOTS] = Default::default();
        speed_dials[0] = "theoldnet.com:23".to_string();
        speed_dials[1] = "bbs.retrocampus.com:23".to_string();
        speed_dials[2] = "bbs.eotd.com:23".to_string();
        speed_dials[3] = "blackflag.acid.org:31337".to_string();
        speed_dials[4] = "bbs.starbase21.net:23".to_string();
        SessionConfig {
            echo: true,
            verbose_results: true,
            quiet_mode: false,
            auto_answer: true,
            pin_polarity: PinPolarity::Normal,
            flow_control: FlowControlKind::Software,
            serial_speed: 0,
            telnet: false,
            busy_message: "SORRY, SYSTEM IS CURRENTLY BUSY. PLEASE TRY AGAIN LATER.".to_string(),
            speed_dials,
            listen_port: DEFAULT_LISTEN_PORT,
            ssid: String::new(),
            password: String::new(),
        }
    }

    /// The active serial rate in bits per second.
    pub fn baud(&self) -> u32 {
        BAUD_RATES
            .get(self.serial_speed)
            .copied()
            .unwrap_or(BAUD_RATES[0])
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::factory_defaults()
    }
}
