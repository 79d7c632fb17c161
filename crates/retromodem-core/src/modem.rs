//! The mode orchestrator.
//!
//! One `Modem` owns every piece of session state, so there is exactly one
//! writer, and is driven by a cooperative `tick`: connection intake, command-
//! or data-mode processing, PPP status, and disconnect reconciliation run
//! once per tick with no preemption. Nothing here blocks; intentional
//! pauses (baud switch, reboot, answer delay, keypress pagination) are
//! deferred actions with explicit deadlines.

use crate::call::{carrier_level, CallState, PeerKind, MAX_UNANSWERED_RINGS, RING_WINDOW};
use crate::config::{SessionConfig, BAUD_RATES};
use crate::error::ModemError;
use crate::escape::EscapeDetector;
use crate::external::{FirmwareUpdater, InlineFetcher, SshDialer, UpdateStep, WifiControl};
use crate::ppp::PppLink;
use crate::settings::SettingsStore;
use crate::transport::{CarrierSignal, NetDialer, NetListener, NetStream, SerialPort};
use hayes_protocol::codec::{fold_high_byte, CommandLine, LineInput};
use hayes_protocol::responses::{format_duration, ResultCode, ResultFormatter};
use retromodem_xfer::xmodem::XmodemReceiver;
use std::io;
use std::time::{Duration, Instant};

/// Firmware version reported in the banner.
pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pause between the answer RING echo and CONNECT.
const ANSWER_PAUSE: Duration = Duration::from_secs(1);

/// Pause before a reboot requested by AT$RB.
pub(crate) const REBOOT_PAUSE: Duration = Duration::from_millis(500);

/// Pause before a reboot requested by AT$HRESET.
pub(crate) const HARD_RESET_PAUSE: Duration = Duration::from_secs(3);

/// Announced delay before a baud-rate switch takes effect.
pub(crate) const BAUD_SWITCH_PAUSE: Duration = Duration::from_secs(5);

/// Upper bound on a keypress-pagination wait; after this the output
/// continues as if the key was pressed.
const KEY_WAIT_LIMIT: Duration = Duration::from_secs(30);

/// Whether serial input is interpreted as commands or call payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Command,
    Data,
}

/// The transport behind an active call.
pub enum CallTransport {
    /// A TCP-style byte stream.
    Stream(Box<dyn NetStream>),
    /// The PPP session installed in [`Modem::ppp`] substitutes for a
    /// network stream.
    Ppp,
}

/// Output that resumes after a keypress-pagination wait.
pub(crate) enum Continuation {
    /// Second half of AT&V: the stored profile.
    StoredProfile,
    /// Second page of the help text.
    HelpTail,
    /// Remaining Wi-Fi scan results.
    ScanPages { lines: Vec<String>, next: usize },
}

/// A bounded suspension point. While one is pending the scheduler hands
/// every tick to it, which reproduces the blocking pauses of the hardware
/// this emulates without spinning.
pub(crate) enum Deferred {
    ApplyBaud { index: usize, at: Instant },
    Reboot { at: Instant },
    CompleteAnswer { at: Instant, stream: Box<dyn NetStream> },
    AwaitKey { deadline: Instant, then: Continuation },
}

/// Everything the modem core needs from the outside world.
pub struct ModemDeps {
    pub serial: Box<dyn SerialPort>,
    pub listener: Option<Box<dyn NetListener>>,
    pub dialer: Box<dyn NetDialer>,
    pub carrier: Box<dyn CarrierSignal>,
    pub settings: Box<dyn SettingsStore>,
    pub wifi: Box<dyn WifiControl>,
    pub ssh: Box<dyn SshDialer>,
    pub fetcher: Box<dyn InlineFetcher>,
    pub updater: Box<dyn FirmwareUpdater>,
    /// PPP engine, when this build carries one.
    pub ppp: Option<PppLink>,
}

/// The emulated modem.
pub struct Modem {
    pub(crate) serial: Box<dyn SerialPort>,
    pub(crate) listener: Option<Box<dyn NetListener>>,
    pub(crate) dialer: Box<dyn NetDialer>,
    pub(crate) carrier: Box<dyn CarrierSignal>,
    pub(crate) settings: Box<dyn SettingsStore>,
    pub(crate) wifi: Box<dyn WifiControl>,
    pub(crate) ssh: Box<dyn SshDialer>,
    pub(crate) fetcher: Box<dyn InlineFetcher>,
    pub(crate) updater: Box<dyn FirmwareUpdater>,
    pub(crate) ppp: Option<PppLink>,

    pub(crate) config: SessionConfig,
    pub(crate) mode: Mode,
    pub(crate) call: CallState,
    pub(crate) transport: Option<CallTransport>,
    pub(crate) line: CommandLine,
    pub(crate) escape: EscapeDetector,
    pub(crate) xmodem: Option<XmodemReceiver>,
    pub(crate) awaiting_xmodem: Option<Instant>,
    pub(crate) deferred: Option<Deferred>,
    pub(crate) hex_echo: bool,
    pub(crate) tx_paused: bool,
    pub(crate) firmware_updating: bool,
    pub(crate) reboot_requested: bool,
}

impl Modem {
    /// Build a modem, loading the stored profile (or factory defaults).
    pub fn new(deps: ModemDeps) -> Result<Self, ModemError> {
        let ModemDeps {
            serial,
            listener,
            dialer,
            carrier,
            mut settings,
            wifi,
            ssh,
            fetcher,
            updater,
            ppp,
        } = deps;
        let config = settings.load()?;
        let mut modem = Modem {
            serial,
            listener,
            dialer,
            carrier,
            settings,
            wifi,
            ssh,
            fetcher,
            updater,
            ppp,
            config,
            mode: Mode::Command,
            call: CallState::Idle,
            transport: None,
            line: CommandLine::new(),
            escape: EscapeDetector::new(),
            xmodem: None,
            awaiting_xmodem: None,
            deferred: None,
            hex_echo: false,
            tx_paused: false,
            firmware_updating: false,
            reboot_requested: false,
        };
        modem.update_carrier();
        Ok(modem)
    }

    /// Print the boot banner and bring Wi-Fi up, as the device does after
    /// loading its profile.
    pub fn start(&mut self, now: Instant) -> Result<(), ModemError> {
        self.print_banner()?;
        let lines = self.wifi.connect(&self.config);
        for line in lines {
            self.send_line(&line)?;
        }
        self.emit_result(ResultCode::Ok, now)?;
        Ok(())
    }

    /// One scheduler pass. Never blocks; returns early when nothing is
    /// pending.
    pub fn tick(&mut self, now: Instant) -> Result<(), ModemError> {
        if self.reboot_requested {
            return Ok(());
        }
        if self.firmware_updating {
            self.firmware_update_tick(now)?;
            return Ok(());
        }
        self.handle_flow_control();
        if self.deferred.is_some() {
            // A pending pause owns the scheduler, like the blocking delays
            // it replaces.
            self.process_deferred(now)?;
            return Ok(());
        }
        if self.listener.as_mut().is_some_and(|l| l.has_pending()) {
            self.handle_incoming(now)?;
        }
        match self.mode {
            Mode::Command => self.command_mode_tick(now)?,
            Mode::Data => self.bridge_tick(now)?,
        }
        self.poll_ppp(now)?;
        self.restore_command_mode_if_disconnected(now)?;
        Ok(())
    }

    /// Whether AT$RB / AT$HRESET asked the host process to restart.
    pub fn reboot_requested(&self) -> bool {
        self.reboot_requested
    }

    /// Current mode (command vs. data).
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current call state.
    pub fn call_state(&self) -> CallState {
        self.call
    }

    /// The active session profile.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ========================================================================
    // Command Mode input
    // ========================================================================

    fn command_mode_tick(&mut self, now: Instant) -> Result<(), ModemError> {
        let mut byte = [0u8; 1];
        if self.serial.try_read(&mut byte)? == 0 {
            return Ok(());
        }
        let raw = byte[0];
        // Echo the original byte before any folding, so 8-bit characters
        // come back unmangled.
        if self.config.echo {
            self.serial.write_all(&[raw])?;
        }
        let folded = fold_high_byte(raw);
        match self.line.feed(folded) {
            LineInput::Complete(line) => self.dispatch_command(&line, now)?,
            LineInput::Erased => {}
            LineInput::Pending => {
                if self.hex_echo {
                    let hex = format!("{:X}", folded);
                    self.serial.write_all(hex.as_bytes())?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Inbound call policy
    // ========================================================================

    fn handle_incoming(&mut self, now: Instant) -> Result<(), ModemError> {
        let connected = self.call.is_connected();
        let ring_count = match self.call {
            CallState::Ringing { ring_count, .. } => ring_count,
            _ => 0,
        };

        // Busy / call-waiting: a second caller during a call, or a caller
        // that has gone unanswered past the ring limit.
        if connected || (!self.config.auto_answer && ring_count > MAX_UNANSWERED_RINGS) {
            let duration = self.call.duration(now);
            if !connected {
                self.call = CallState::Idle;
                self.update_carrier();
            }
            if let Some(listener) = self.listener.as_mut() {
                let mut peer = listener.accept()?;
                let notice = format!(
                    "{}\r\nCurrent call length: {}\r\n\r\n",
                    self.config.busy_message,
                    format_duration(duration)
                );
                // The caller may already be gone; it is being dropped
                // either way.
                if let Err(err) = peer.write_all(notice.as_bytes()) {
                    log::debug!("busy notice not delivered: {err}");
                }
            }
            return Ok(());
        }

        if !self.config.auto_answer {
            let last_ring = match self.call {
                CallState::Ringing { last_ring, .. } => Some(last_ring),
                _ => None,
            };
            let due = last_ring.map_or(true, |t| now.saturating_duration_since(t) > RING_WINDOW);
            if due {
                self.emit_result(ResultCode::Ring, now)?;
                self.call = CallState::Ringing {
                    ring_count: ring_count + 1,
                    last_ring: now,
                };
                self.update_carrier();
            }
            return Ok(());
        }

        // Auto-answer: accept now, announce the caller, connect after the
        // customary one-second pause.
        let stream = match self.listener.as_mut() {
            Some(listener) => listener.accept()?,
            None => return Ok(()),
        };
        if self.config.verbose_results {
            let caller = stream
                .peer_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            self.send_string(&format!("RING {caller}"))?;
        }
        self.deferred = Some(Deferred::CompleteAnswer {
            at: now + ANSWER_PAUSE,
            stream,
        });
        Ok(())
    }

    /// ATA: accept a pending inbound call immediately.
    pub(crate) fn answer_call(&mut self, now: Instant) -> Result<(), ModemError> {
        let pending = self.listener.as_mut().is_some_and(|l| l.has_pending());
        if !pending {
            self.emit_result(ResultCode::Error, now)?;
            return Ok(());
        }
        let stream = match self.listener.as_mut() {
            Some(listener) => listener.accept()?,
            None => return Ok(()),
        };
        self.connect_call(stream, now)
    }

    /// Shared post-conditions of a successful dial or answer.
    pub(crate) fn connect_call(
        &mut self,
        stream: Box<dyn NetStream>,
        now: Instant,
    ) -> Result<(), ModemError> {
        self.emit_result(ResultCode::Connect, now)?;
        self.transport = Some(CallTransport::Stream(stream));
        self.call = CallState::Connected {
            since: now,
            peer: PeerKind::Tcp,
        };
        self.mode = Mode::Data;
        self.update_carrier();
        self.serial.flush()?;
        Ok(())
    }

    // ========================================================================
    // Hang-up and disconnect reconciliation
    // ========================================================================

    /// Close the active transport, clear the call, report NO CARRIER with
    /// the elapsed duration. Safe to call with no call up; the duration is
    /// then 00:00:00.
    pub(crate) fn hang_up(&mut self, now: Instant) -> Result<(), ModemError> {
        let duration = self.call.duration(now);
        match self.transport.take() {
            Some(CallTransport::Stream(stream)) => drop(stream),
            Some(CallTransport::Ppp) => {
                if let Some(link) = self.ppp.as_mut() {
                    link.close();
                }
            }
            None => {}
        }
        self.call = CallState::Idle;
        self.mode = Mode::Command;
        self.update_carrier();
        self.xmodem = None;
        self.awaiting_xmodem = None;
        self.escape.reset();
        self.emit_result_with_duration(ResultCode::NoCarrier, duration)?;
        Ok(())
    }

    /// Detect a peer that disappeared mid-call and force the hang-up
    /// transition so Mode/CallState never stay inconsistent with the
    /// transport.
    fn restore_command_mode_if_disconnected(&mut self, now: Instant) -> Result<(), ModemError> {
        if self.mode != Mode::Data || !self.call.is_connected() {
            return Ok(());
        }
        let alive = match &self.transport {
            Some(CallTransport::Stream(stream)) => stream.is_connected(),
            Some(CallTransport::Ppp) => self.ppp.as_ref().is_some_and(|l| l.is_active()),
            None => false,
        };
        if alive {
            return Ok(());
        }
        log::debug!("transport lost, restoring command mode");
        let duration = self.call.duration(now);
        self.transport = None;
        self.call = CallState::Idle;
        self.mode = Mode::Command;
        self.update_carrier();
        self.xmodem = None;
        self.awaiting_xmodem = None;
        self.escape.reset();
        self.emit_result_with_duration(ResultCode::NoCarrier, duration)?;
        Ok(())
    }

    /// Surface PPP status changes; a fatal status ends the call.
    fn poll_ppp(&mut self, now: Instant) -> Result<(), ModemError> {
        if !matches!(self.transport, Some(CallTransport::Ppp)) {
            return Ok(());
        }
        let event = self.ppp.as_mut().and_then(|link| link.poll_event());
        if let Some(status) = event {
            if status.is_fatal() {
                self.send_string(&status.to_string())?;
                self.hang_up(now)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Deferred actions
    // ========================================================================

    fn process_deferred(&mut self, now: Instant) -> Result<(), ModemError> {
        let deferred = match self.deferred.take() {
            Some(deferred) => deferred,
            None => return Ok(()),
        };
        match deferred {
            Deferred::ApplyBaud { index, at } => {
                if now < at {
                    self.deferred = Some(Deferred::ApplyBaud { index, at });
                    return Ok(());
                }
                self.serial.set_baud(BAUD_RATES[index])?;
                self.config.serial_speed = index;
                self.emit_result(ResultCode::Ok, now)?;
            }
            Deferred::Reboot { at } => {
                if now < at {
                    self.deferred = Some(Deferred::Reboot { at });
                    return Ok(());
                }
                self.reboot_requested = true;
            }
            Deferred::CompleteAnswer { at, stream } => {
                if now < at {
                    self.deferred = Some(Deferred::CompleteAnswer { at, stream });
                    return Ok(());
                }
                self.connect_call(stream, now)?;
            }
            Deferred::AwaitKey { deadline, then } => {
                let mut resume = now >= deadline;
                let mut byte = [0u8; 1];
                // Swallow waiting input; only space resumes early.
                while !resume && self.serial.try_read(&mut byte)? == 1 {
                    if byte[0] == b' ' {
                        resume = true;
                    }
                }
                if resume {
                    self.serial.write_all(b"\r")?;
                    self.run_continuation(then, now)?;
                } else {
                    self.deferred = Some(Deferred::AwaitKey { deadline, then });
                }
            }
        }
        Ok(())
    }

    /// Schedule a keypress-pagination pause.
    pub(crate) fn await_key(&mut self, then: Continuation, now: Instant) -> io::Result<()> {
        self.serial.write_all(b"Press [Space] key")?;
        self.deferred = Some(Deferred::AwaitKey {
            deadline: now + KEY_WAIT_LIMIT,
            then,
        });
        Ok(())
    }

    fn run_continuation(&mut self, then: Continuation, now: Instant) -> Result<(), ModemError> {
        match then {
            Continuation::StoredProfile => {
                match self.settings.load() {
                    Ok(stored) => {
                        let lines = crate::dispatch::profile_lines(&stored, "Stored Profile:");
                        for line in lines {
                            self.send_line(&line)?;
                        }
                        self.emit_result(ResultCode::Ok, now)?;
                    }
                    Err(err) => {
                        log::warn!("stored profile unreadable: {err}");
                        self.emit_result(ResultCode::Error, now)?;
                    }
                }
            }
            Continuation::HelpTail => {
                for line in crate::dispatch::HELP_TAIL {
                    self.send_line(line)?;
                }
                self.emit_result(ResultCode::Ok, now)?;
            }
            Continuation::ScanPages { lines, next } => {
                let end = (next + crate::dispatch::SCAN_PAGE_SIZE).min(lines.len());
                for line in &lines[next..end] {
                    self.send_line(line)?;
                }
                if end < lines.len() {
                    self.await_key(Continuation::ScanPages { lines, next: end }, now)?;
                } else {
                    self.emit_result(ResultCode::Ok, now)?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Firmware update delegation
    // ========================================================================

    fn firmware_update_tick(&mut self, now: Instant) -> Result<(), ModemError> {
        match self.updater.step() {
            UpdateStep::Busy => {}
            UpdateStep::Done => {
                self.firmware_updating = false;
                self.send_string("Firmware update complete")?;
                self.emit_result(ResultCode::Ok, now)?;
            }
            UpdateStep::Failed(reason) => {
                self.firmware_updating = false;
                self.send_string(&reason)?;
                self.emit_result(ResultCode::Error, now)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Flow control
    // ========================================================================

    pub(crate) fn handle_flow_control(&mut self) {
        match self.config.flow_control {
            crate::config::FlowControlKind::None | crate::config::FlowControlKind::Hardware => {}
            crate::config::FlowControlKind::Software => {
                // TODO: honor XON/XOFF from the DTE and drive tx_paused.
            }
        }
    }

    // ========================================================================
    // Serial output helpers
    // ========================================================================

    /// Message wrapped in line breaks, as notices are framed.
    pub(crate) fn send_string(&mut self, msg: &str) -> io::Result<()> {
        self.serial.write_all(b"\r\n")?;
        self.serial.write_all(msg.as_bytes())?;
        self.serial.write_all(b"\r\n")
    }

    /// One line of listing output.
    pub(crate) fn send_line(&mut self, msg: &str) -> io::Result<()> {
        self.serial.write_all(msg.as_bytes())?;
        self.serial.write_all(b"\r\n")
    }

    /// Emit a result code using the live call duration.
    pub(crate) fn emit_result(&mut self, code: ResultCode, now: Instant) -> io::Result<()> {
        let duration = self.call.duration(now);
        self.emit_result_with_duration(code, duration)
    }

    /// Emit a result code with an explicit duration (used by hang-up paths
    /// that reset the call before reporting).
    pub(crate) fn emit_result_with_duration(
        &mut self,
        code: ResultCode,
        duration: Duration,
    ) -> io::Result<()> {
        self.serial.write_all(b"\r\n")?;
        let formatter = ResultFormatter {
            verbose: self.config.verbose_results,
            quiet: self.config.quiet_mode,
        };
        if let Some(text) = formatter.render(code, self.config.baud(), duration) {
            self.serial.write_all(text.as_bytes())?;
            self.serial.write_all(b"\r\n")?;
        }
        Ok(())
    }

    /// Recompute and drive the carrier-detect pin from the call state.
    pub(crate) fn update_carrier(&mut self) {
        let active = self.call != CallState::Idle;
        let level = carrier_level(active, self.config.pin_polarity);
        self.carrier.set_level(level);
    }

    /// The boot / help banner.
    pub(crate) fn print_banner(&mut self) -> io::Result<()> {
        self.send_line("+------------------------------------------------------+")?;
        self.send_line("|  RETROMODEM - HAYES-COMPATIBLE WI-FI MODEM EMULATOR  |")?;
        self.send_line(&format!(
            "|  Firmware version {:<35}|",
            FIRMWARE_VERSION
        ))?;
        self.send_line("+------------------------------------------------------+")?;
        self.send_line("")
    }
}
