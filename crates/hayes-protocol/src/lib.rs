//! # hayes-protocol
//!
//! Hayes ("AT command") protocol definitions for the retromodem emulator:
//! the static command rule table with first-match-wins resolution, the
//! command-line editor used in Command Mode, and the standard modem result
//! codes with their numeric and verbose renderings.
//!
//! This crate is purely about the text protocol a DTE speaks to the modem.
//! It holds no connection or session state; that lives in `retromodem-core`.

pub mod codec;
pub mod commands;
pub mod responses;

pub use codec::{fold_high_byte, CommandLine, MAX_COMMAND_LENGTH};
pub use commands::{resolve, CommandId, Matcher, COMMAND_TABLE};
pub use responses::{format_duration, ResultCode, ResultFormatter};
