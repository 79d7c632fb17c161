//! # retromodem-core
//!
//! The modem emulator core: a Hayes AT command dispatcher, the call/carrier
//! state machine, the connected-mode bridge with its Telnet/XMODEM/escape
//! handling, and PPP session lifecycle hooks, all driven by one cooperative
//! scheduler tick.
//!
//! Everything the core touches in the outside world is a trait: byte
//! transports ([`transport`]), settings persistence ([`settings`]), and the
//! Wi-Fi/SSH/fetch/firmware collaborators ([`external`]). Host binaries and
//! tests supply implementations; the core never performs I/O of its own
//! beyond those boundaries.
//!
//! ## Usage
//!
//! ```no_run
//! use retromodem_core::{Modem, ModemDeps};
//! use std::time::Instant;
//!
//! # fn deps() -> ModemDeps { unimplemented!() }
//! let mut modem = Modem::new(deps())?;
//! modem.start(Instant::now())?;
//! loop {
//!     modem.tick(Instant::now())?;
//!     if modem.reboot_requested() {
//!         break;
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(1));
//! }
//! # Ok::<(), retromodem_core::ModemError>(())
//! ```

mod bridge;
mod dispatch;

pub mod call;
pub mod config;
pub mod error;
pub mod escape;
pub mod external;
pub mod modem;
pub mod ppp;
pub mod settings;
pub mod transport;

pub use call::{CallState, PeerKind};
pub use config::{FlowControlKind, PinPolarity, SessionConfig, BAUD_RATES};
pub use error::ModemError;
pub use external::{CollabError, FirmwareUpdater, InlineFetcher, SshDialer, UpdateStep, WifiControl};
pub use modem::{Mode, Modem, ModemDeps};
pub use ppp::{PppEngine, PppError, PppLink, PppStatus};
pub use settings::{MemorySettings, SettingsError, SettingsStore, SETTINGS_VERSION};
pub use transport::{CarrierSignal, NetDialer, NetListener, NetStream, SerialPort};
