//! AT command dispatch.
//!
//! A completed command line is trimmed, matched (uppercased) against the
//! rule table and routed to its handler. Handlers read value arguments from
//! the original case-preserving line, mutate the session through `self`,
//! and finish with exactly one result code - except dial/SSH/firmware
//! flows, which intentionally report later, and reboot, which ends the
//! process.

use crate::call::{CallState, PeerKind};
use crate::config::{FlowControlKind, PinPolarity, SessionConfig, BAUD_RATES};
use crate::error::ModemError;
use crate::modem::{
    CallTransport, Continuation, Deferred, Mode, Modem, BAUD_SWITCH_PAUSE, HARD_RESET_PAUSE,
    REBOOT_PAUSE,
};
use hayes_protocol::commands::{resolve, CommandId};
use hayes_protocol::responses::{format_duration, ResultCode};
use std::time::Instant;

/// Lines shown per page of Wi-Fi scan output.
pub(crate) const SCAN_PAGE_SIZE: usize = 10;

/// Default dial port when the target carries none.
const DEFAULT_DIAL_PORT: u16 = 23;

/// Default port for ATSSH targets.
const DEFAULT_SSH_PORT: u16 = 22;

/// Dial targets reserved for PPP-over-serial.
const PPP_TARGETS: [&str; 2] = ["PPP", "777"];

/// First help page.
const HELP_HEAD: &[&str] = &[
    "AT Command Summary:",
    "Dial Host:           ATDTHOST:PORT",
    "Speed Dial:          ATDSN (N=0-9)",
    "PPP Session:         ATDTPPP",
    "Set Speed Dial:      AT&ZN=HOST:PORT (where N is 0-9)",
    "Handle Telnet:       ATNETN (N=0,1)",
    "Network Information: ATI",
    "HTTP GET:            ATGET<URL>",
    "GOPHER Request:      ATGPH<URL>",
    "Auto Answer:         ATS0=N (N=0,1)",
    "Set BUSY Message:    AT$BM=YOUR BUSY MESSAGE",
    "Load Stored Profile: ATZ",
    "Save Profile:        AT&W",
    "Show Settings:       AT&V",
    "Reset To Defaults:   AT&F",
    "Pin Polarity:        AT&PN (N=0/INV,1/NORM)",
    "Echo On/Off:         ATE0 / ATE1",
    "Quiet Mode On/Off:   ATQ0 / ATQ1",
    "Verbose On/Off:      ATV1 / ATV0",
    "Set SSID:            AT$SSID=WIFISSID",
    "Set Password:        AT$PASS=PASSWORD",
];

/// Second help page, shown after the pagination pause.
pub(crate) const HELP_TAIL: &[&str] = &[
    "Set Baud Rate:       AT$SB=N (300,1200,2400,4800,9600,19200,38400,57600,115200)",
    "Flow Control:        AT&KN (N=0/N,1/HW,2/SW)",
    "Wi-Fi On/Off:        ATC1 / ATC0",
    "Hang Up:             ATH",
    "Enter CMD mode:      +++",
    "Exit CMD mode:       ATO",
    "Update Firmware:     AT$FW",
];

/// What a one-character binary parameter suffix asks for.
enum BinaryAction {
    Query,
    Set(bool),
    Invalid,
}

fn parse_binary(up: &str, prefix_len: usize) -> BinaryAction {
    match up.as_bytes().get(prefix_len) {
        Some(b'?') => BinaryAction::Query,
        Some(b'0') => BinaryAction::Set(false),
        Some(b'1') => BinaryAction::Set(true),
        _ => BinaryAction::Invalid,
    }
}

/// Profile listing shared by AT&V (active and stored halves).
pub(crate) fn profile_lines(config: &SessionConfig, title: &str) -> Vec<String> {
    let mut lines = vec![
        title.to_string(),
        format!("Baud: {}", config.baud()),
        format!("SSID: {}", config.ssid),
        format!("Password: {}", config.password),
        format!("BUSY Message: {}", config.busy_message),
        format!(
            "E{} Q{} V{} &K{} &P{} NET{} S0:{}",
            config.echo as u8,
            config.quiet_mode as u8,
            config.verbose_results as u8,
            config.flow_control.as_digit(),
            config.pin_polarity.as_digit(),
            config.telnet as u8,
            config.auto_answer as u8,
        ),
        "Speed Dial:".to_string(),
    ];
    for (slot, target) in config.speed_dials.iter().enumerate() {
        lines.push(format!("{slot}: {target}"));
    }
    lines
}

/// Split a dial target into host and port, defaulting the port.
fn split_target(target: &str, default_port: u16) -> (String, u16) {
    match target.split_once(':') {
        Some((host, port)) => (
            host.trim().to_string(),
            port.trim().parse().unwrap_or(0),
        ),
        None => (target.trim().to_string(), default_port),
    }
}

impl Modem {
    /// Route one completed command line.
    pub(crate) fn dispatch_command(&mut self, raw_line: &str, now: Instant) -> Result<(), ModemError> {
        let raw = raw_line.trim();
        if raw.is_empty() {
            return Ok(());
        }
        self.serial.write_all(b"\r\n")?;
        // ASCII-only fold keeps byte offsets aligned between the matching
        // copy and the case-preserving copy used for value arguments.
        let up = raw.to_ascii_uppercase();
        let id = match resolve(&up) {
            Some(id) => id,
            None => {
                self.serial
                    .write_all(b"Unknown command. Type AT? for help.")?;
                self.emit_result(ResultCode::Error, now)?;
                return Ok(());
            }
        };
        log::debug!("dispatching {id:?}");
        match id {
            CommandId::Attention => self.emit_result(ResultCode::Ok, now)?,
            CommandId::TelnetMode => self.cmd_telnet_mode(&up, now)?,
            CommandId::Answer => self.answer_call(now)?,
            CommandId::Help => self.cmd_help(now)?,
            CommandId::ReloadProfile => self.cmd_reload_profile(now)?,
            CommandId::WifiConnection => self.cmd_wifi_connection(&up, now)?,
            CommandId::NetworkInfo => self.cmd_network_info(now)?,
            CommandId::ProfileView => self.cmd_profile_view(now)?,
            CommandId::ProfileWrite => self.cmd_profile_write(now)?,
            CommandId::FirmwareUpdate => self.firmware_updating = true,
            CommandId::FactoryReset => self.cmd_factory_reset(now)?,
            CommandId::AutoAnswer => self.cmd_auto_answer(&up, now)?,
            CommandId::HexEcho => {
                self.hex_echo = up == "ATHEX=1";
                self.emit_result(ResultCode::Ok, now)?;
            }
            CommandId::Online => self.cmd_online(now)?,
            CommandId::WifiScan => self.cmd_wifi_scan(now)?,
            CommandId::IpAddress => self.cmd_ip_address(now)?,
            CommandId::HardReset => self.cmd_hard_reset(now)?,
            CommandId::Dial => self.cmd_dial(&up, now)?,
            CommandId::SshDial => self.cmd_ssh_dial(&up, now)?,
            CommandId::Echo => self.binary_toggle(&up, 3, |c| &mut c.echo, now)?,
            CommandId::Verbose => self.binary_toggle(&up, 3, |c| &mut c.verbose_results, now)?,
            CommandId::Quiet => self.binary_toggle(&up, 3, |c| &mut c.quiet_mode, now)?,
            CommandId::PinPolarity => self.cmd_pin_polarity(&up, now)?,
            CommandId::FlowControl => self.cmd_flow_control(&up, now)?,
            CommandId::BaudRate => self.cmd_baud_rate(&up, now)?,
            CommandId::BusyMessage => self.cmd_busy_message(&up, raw, now)?,
            CommandId::SpeedDial => self.cmd_speed_dial(&up, raw, now)?,
            CommandId::Ssid => self.cmd_ssid(&up, raw, now)?,
            CommandId::Password => self.cmd_password(&up, raw, now)?,
            CommandId::Hangup => self.hang_up(now)?,
            CommandId::Reboot => self.cmd_reboot(now)?,
            CommandId::ListenPort => self.cmd_listen_port(&up, now)?,
            CommandId::HttpGet => self.cmd_http_get(raw, now)?,
            CommandId::Gopher => self.cmd_gopher(raw, now)?,
        }
        Ok(())
    }

    /// Shared handler for the ATE/ATV/ATQ style one-bit parameters: `?`
    /// queries, `0`/`1` set, anything else (including a missing suffix) is
    /// a domain error that mutates nothing.
    fn binary_toggle(
        &mut self,
        up: &str,
        prefix_len: usize,
        field: fn(&mut SessionConfig) -> &mut bool,
        now: Instant,
    ) -> Result<(), ModemError> {
        match parse_binary(up, prefix_len) {
            BinaryAction::Query => {
                let value = *field(&mut self.config);
                self.send_string(if value { "1" } else { "0" })?;
                self.emit_result(ResultCode::Ok, now)?;
            }
            BinaryAction::Set(value) => {
                *field(&mut self.config) = value;
                self.emit_result(ResultCode::Ok, now)?;
            }
            BinaryAction::Invalid => self.emit_result(ResultCode::Error, now)?,
        }
        Ok(())
    }

    // ========================================================================
    // Dialing
    // ========================================================================

    fn cmd_dial(&mut self, up: &str, now: Instant) -> Result<(), ModemError> {
        if self.call.is_connected() {
            self.emit_result(ResultCode::Error, now)?;
            return Ok(());
        }

        let (host, port) = if up.starts_with("ATDS") {
            let slot = up
                .as_bytes()
                .get(4)
                .and_then(|b| (*b as char).to_digit(10))
                .unwrap_or(0) as usize;
            let target = self.config.speed_dials[slot].clone();
            match target.split_once(':') {
                Some((host, port)) => {
                    (host.trim().to_string(), port.trim().parse().unwrap_or(0))
                }
                // An unset or portless slot dials nowhere and fails below.
                None => (String::new(), DEFAULT_DIAL_PORT),
            }
        } else {
            split_target(&up[4..], DEFAULT_DIAL_PORT)
        };

        if PPP_TARGETS.contains(&host.as_str()) {
            if let Some(link) = self.ppp.as_mut() {
                let result = if link.is_active() {
                    Err(crate::ppp::PppError::AlreadyActive)
                } else {
                    link.open()
                };
                match result {
                    Ok(()) => {
                        self.emit_result(ResultCode::Connect, now)?;
                        self.transport = Some(CallTransport::Ppp);
                        self.call = CallState::Connected {
                            since: now,
                            peer: PeerKind::Ppp,
                        };
                        self.mode = Mode::Data;
                        self.update_carrier();
                    }
                    Err(err) => {
                        self.send_string(&err.to_string())?;
                        self.emit_result(ResultCode::Error, now)?;
                    }
                }
                return Ok(());
            }
            // No PPP engine on this build: fall through and try the
            // reserved name as an ordinary host.
        }

        self.send_line(&format!("Dialing {host}:{port}"))?;
        match self.dialer.connect(&host, port) {
            Ok(stream) => self.connect_call(stream, now)?,
            Err(err) => {
                log::debug!("dial {host}:{port} failed: {err}");
                self.emit_result(ResultCode::NoAnswer, now)?;
                self.call = CallState::Idle;
                self.update_carrier();
            }
        }
        Ok(())
    }

    fn cmd_ssh_dial(&mut self, up: &str, now: Instant) -> Result<(), ModemError> {
        let (host, port) = split_target(&up[5..], DEFAULT_SSH_PORT);
        self.send_line(&format!("Dialing {host}:{port}"))?;
        match self.ssh.dial(&host, port) {
            // The SSH plumbing reports asynchronously; the command stays
            // pending on purpose.
            Ok(()) => {}
            Err(err) => {
                self.send_string(&err.to_string())?;
                self.emit_result(ResultCode::Error, now)?;
            }
        }
        Ok(())
    }

    fn cmd_online(&mut self, now: Instant) -> Result<(), ModemError> {
        if self.call.is_connected() {
            self.emit_result(ResultCode::Connect, now)?;
            self.mode = Mode::Data;
        } else {
            self.emit_result(ResultCode::Error, now)?;
        }
        Ok(())
    }

    // ========================================================================
    // Telnet / auto-answer / polarity / flow control
    // ========================================================================

    fn cmd_telnet_mode(&mut self, up: &str, now: Instant) -> Result<(), ModemError> {
        match up {
            "ATNET0" => self.config.telnet = false,
            "ATNET1" => self.config.telnet = true,
            _ => {
                let value = self.config.telnet as u8;
                self.send_string(&value.to_string())?;
            }
        }
        self.emit_result(ResultCode::Ok, now)?;
        Ok(())
    }

    fn cmd_auto_answer(&mut self, up: &str, now: Instant) -> Result<(), ModemError> {
        match up {
            "ATS0=0" => self.config.auto_answer = false,
            "ATS0=1" => self.config.auto_answer = true,
            _ => {
                let value = self.config.auto_answer as u8;
                self.send_string(&value.to_string())?;
            }
        }
        self.emit_result(ResultCode::Ok, now)?;
        Ok(())
    }

    fn cmd_pin_polarity(&mut self, up: &str, now: Instant) -> Result<(), ModemError> {
        match up.as_bytes().get(4) {
            Some(b'?') => {
                let digit = self.config.pin_polarity.as_digit();
                self.send_string(&digit.to_string())?;
                self.emit_result(ResultCode::Ok, now)?;
            }
            Some(b'0') => {
                self.config.pin_polarity = PinPolarity::Inverted;
                self.emit_result(ResultCode::Ok, now)?;
                self.update_carrier();
            }
            Some(b'1') => {
                self.config.pin_polarity = PinPolarity::Normal;
                self.emit_result(ResultCode::Ok, now)?;
                self.update_carrier();
            }
            _ => self.emit_result(ResultCode::Error, now)?,
        }
        Ok(())
    }

    fn cmd_flow_control(&mut self, up: &str, now: Instant) -> Result<(), ModemError> {
        match up.as_bytes().get(4) {
            Some(b'?') => {
                let digit = self.config.flow_control.as_digit();
                self.send_string(&digit.to_string())?;
                self.emit_result(ResultCode::Ok, now)?;
            }
            Some(byte) => {
                let kind = (*byte as char)
                    .to_digit(10)
                    .and_then(|d| FlowControlKind::from_digit(d as u8));
                match kind {
                    Some(kind) => {
                        self.config.flow_control = kind;
                        self.emit_result(ResultCode::Ok, now)?;
                    }
                    None => self.emit_result(ResultCode::Error, now)?,
                }
            }
            None => self.emit_result(ResultCode::Error, now)?,
        }
        Ok(())
    }

    // ========================================================================
    // Profiles and settings
    // ========================================================================

    fn cmd_reload_profile(&mut self, now: Instant) -> Result<(), ModemError> {
        match self.settings.load() {
            Ok(config) => {
                self.config = config;
                self.update_carrier();
                self.emit_result(ResultCode::Ok, now)?;
            }
            Err(err) => {
                log::warn!("profile reload failed: {err}");
                self.emit_result(ResultCode::Error, now)?;
            }
        }
        Ok(())
    }

    fn cmd_profile_write(&mut self, now: Instant) -> Result<(), ModemError> {
        let config = self.config.clone();
        match self.settings.save(&config) {
            Ok(()) => self.emit_result(ResultCode::Ok, now)?,
            Err(err) => {
                log::warn!("profile save failed: {err}");
                self.emit_result(ResultCode::Error, now)?;
            }
        }
        Ok(())
    }

    fn cmd_factory_reset(&mut self, now: Instant) -> Result<(), ModemError> {
        match self.settings.reset_to_factory() {
            Ok(config) => {
                self.config = config;
                self.update_carrier();
                self.emit_result(ResultCode::Ok, now)?;
            }
            Err(err) => {
                log::warn!("factory reset failed: {err}");
                self.emit_result(ResultCode::Error, now)?;
            }
        }
        Ok(())
    }

    fn cmd_profile_view(&mut self, now: Instant) -> Result<(), ModemError> {
        let lines = profile_lines(&self.config, "Active Profile:");
        for line in lines {
            self.send_line(&line)?;
        }
        self.await_key(Continuation::StoredProfile, now)?;
        Ok(())
    }

    fn cmd_hard_reset(&mut self, now: Instant) -> Result<(), ModemError> {
        self.send_string("\x1b[37;41m WARNING: HARD RESET \x1b[0m")?;
        self.send_line("This will erase ALL settings and reboot the device.")?;
        self.send_line("Factory defaults will be restored.")?;
        match self.settings.reset_to_factory() {
            Ok(config) => {
                self.config = config;
                self.update_carrier();
                self.send_line("Settings restored to factory defaults")?;
                self.emit_result(ResultCode::Ok, now)?;
                self.send_line("Rebooting in 3 seconds...")?;
                self.deferred = Some(Deferred::Reboot {
                    at: now + HARD_RESET_PAUSE,
                });
            }
            Err(err) => {
                log::warn!("hard reset failed: {err}");
                self.emit_result(ResultCode::Error, now)?;
            }
        }
        Ok(())
    }

    fn cmd_reboot(&mut self, now: Instant) -> Result<(), ModemError> {
        self.emit_result(ResultCode::Ok, now)?;
        self.serial.flush()?;
        self.deferred = Some(Deferred::Reboot {
            at: now + REBOOT_PAUSE,
        });
        Ok(())
    }

    // ========================================================================
    // Value-bearing parameters
    // ========================================================================

    fn cmd_baud_rate(&mut self, up: &str, now: Instant) -> Result<(), ModemError> {
        if let Some(value) = up.strip_prefix("AT$SB=") {
            let rate: u32 = value.trim().parse().unwrap_or(0);
            self.set_baud_rate(rate, now)?;
        } else {
            let baud = self.config.baud();
            self.send_string(&baud.to_string())?;
            self.emit_result(ResultCode::Ok, now)?;
        }
        Ok(())
    }

    fn set_baud_rate(&mut self, rate: u32, now: Instant) -> Result<(), ModemError> {
        if rate == 0 {
            self.emit_result(ResultCode::Error, now)?;
            return Ok(());
        }
        let index = match BAUD_RATES.iter().position(|&r| r == rate) {
            Some(index) => index,
            None => {
                self.emit_result(ResultCode::Error, now)?;
                return Ok(());
            }
        };
        if index == self.config.serial_speed {
            self.emit_result(ResultCode::Ok, now)?;
            return Ok(());
        }
        self.send_line(&format!("Switching serial port to {rate} in 5 seconds..."))?;
        self.deferred = Some(Deferred::ApplyBaud {
            index,
            at: now + BAUD_SWITCH_PAUSE,
        });
        Ok(())
    }

    fn cmd_busy_message(&mut self, up: &str, raw: &str, now: Instant) -> Result<(), ModemError> {
        if up.starts_with("AT$BM=") {
            self.config.busy_message = raw[6..].to_string();
        } else {
            let message = self.config.busy_message.clone();
            self.send_string(&message)?;
        }
        self.emit_result(ResultCode::Ok, now)?;
        Ok(())
    }

    fn cmd_speed_dial(&mut self, up: &str, raw: &str, now: Instant) -> Result<(), ModemError> {
        let bytes = up.as_bytes();
        if bytes.len() < 6 {
            self.emit_result(ResultCode::Error, now)?;
            return Ok(());
        }
        let slot = (bytes[4] as char).to_digit(10).unwrap_or(0) as usize;
        match bytes[5] {
            b'=' => {
                self.config.speed_dials[slot] = raw[6..].to_string();
                self.emit_result(ResultCode::Ok, now)?;
            }
            b'?' => {
                let target = self.config.speed_dials[slot].clone();
                self.send_string(&target)?;
                self.emit_result(ResultCode::Ok, now)?;
            }
            _ => self.emit_result(ResultCode::Error, now)?,
        }
        Ok(())
    }

    fn cmd_ssid(&mut self, up: &str, raw: &str, now: Instant) -> Result<(), ModemError> {
        if up.starts_with("AT$SSID=") {
            self.config.ssid = raw[8..].to_string();
        } else {
            let ssid = self.config.ssid.clone();
            self.send_string(&ssid)?;
        }
        self.emit_result(ResultCode::Ok, now)?;
        Ok(())
    }

    fn cmd_password(&mut self, up: &str, raw: &str, now: Instant) -> Result<(), ModemError> {
        if up.starts_with("AT$PASS=") {
            self.config.password = raw[8..].to_string();
        } else {
            let password = self.config.password.clone();
            self.send_string(&password)?;
        }
        self.emit_result(ResultCode::Ok, now)?;
        Ok(())
    }

    fn cmd_listen_port(&mut self, up: &str, now: Instant) -> Result<(), ModemError> {
        if let Some(value) = up.strip_prefix("AT$SP=") {
            self.config.listen_port = value.trim().parse().unwrap_or(0);
            self.send_string("Takes effect after AT&W and a restart")?;
        } else {
            let port = self.config.listen_port;
            self.send_string(&port.to_string())?;
        }
        self.emit_result(ResultCode::Ok, now)?;
        Ok(())
    }

    // ========================================================================
    // Wi-Fi and network reports
    // ========================================================================

    fn cmd_wifi_connection(&mut self, up: &str, now: Instant) -> Result<(), ModemError> {
        if up == "ATC0" {
            self.wifi.disconnect();
        } else {
            let lines = self.wifi.connect(&self.config);
            for line in lines {
                self.send_line(&line)?;
            }
        }
        self.emit_result(ResultCode::Ok, now)?;
        Ok(())
    }

    fn cmd_network_info(&mut self, now: Instant) -> Result<(), ModemError> {
        let mut lines = self.wifi.status_lines();
        lines.push(format!("Server Port: {}", self.config.listen_port));
        match self.call {
            CallState::Connected {
                peer: PeerKind::Ppp,
                ..
            } => {
                lines.push("Call Status: Connected to PPP".to_string());
                lines.push(format!(
                    "Call length: {}",
                    format_duration(self.call.duration(now))
                ));
            }
            CallState::Connected {
                peer: PeerKind::Tcp,
                ..
            } => {
                let peer = match &self.transport {
                    Some(CallTransport::Stream(stream)) => stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    _ => "unknown".to_string(),
                };
                lines.push(format!("Call Status: Connected to {peer}"));
                lines.push(format!(
                    "Call length: {}",
                    format_duration(self.call.duration(now))
                ));
            }
            _ => lines.push("Call Status: Not connected".to_string()),
        }
        for line in lines {
            self.send_line(&line)?;
        }
        self.emit_result(ResultCode::Ok, now)?;
        Ok(())
    }

    fn cmd_ip_address(&mut self, now: Instant) -> Result<(), ModemError> {
        let ip = self
            .wifi
            .local_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        self.send_line(&ip)?;
        self.emit_result(ResultCode::Ok, now)?;
        Ok(())
    }

    fn cmd_wifi_scan(&mut self, now: Instant) -> Result<(), ModemError> {
        self.send_line("Scanning for WiFi networks...")?;
        let lines = self.wifi.scan();
        if lines.is_empty() {
            self.send_string("No networks found")?;
            self.emit_result(ResultCode::Ok, now)?;
            return Ok(());
        }
        let end = SCAN_PAGE_SIZE.min(lines.len());
        for line in &lines[..end] {
            self.send_line(line)?;
        }
        if end < lines.len() {
            self.await_key(Continuation::ScanPages { lines, next: end }, now)?;
        } else {
            self.emit_result(ResultCode::Ok, now)?;
        }
        Ok(())
    }

    // ========================================================================
    // Inline fetches and help
    // ========================================================================

    fn cmd_http_get(&mut self, raw: &str, now: Instant) -> Result<(), ModemError> {
        let url = raw[5..].trim().to_string();
        match self.fetcher.http_get(&url) {
            Ok(body) => {
                self.serial.write_all(b"\r\n")?;
                self.serial.write_all(&body)?;
                self.emit_result(ResultCode::Ok, now)?;
            }
            Err(err) => {
                self.send_string(&err.to_string())?;
                self.emit_result(ResultCode::Error, now)?;
            }
        }
        Ok(())
    }

    fn cmd_gopher(&mut self, raw: &str, now: Instant) -> Result<(), ModemError> {
        let url = raw[5..].trim().to_string();
        match self.fetcher.gopher(&url) {
            Ok(body) => {
                self.serial.write_all(b"\r\n")?;
                self.serial.write_all(&body)?;
                self.emit_result(ResultCode::Ok, now)?;
            }
            Err(err) => {
                self.send_string(&err.to_string())?;
                self.emit_result(ResultCode::Error, now)?;
            }
        }
        Ok(())
    }

    fn cmd_help(&mut self, now: Instant) -> Result<(), ModemError> {
        self.print_banner()?;
        for line in HELP_HEAD {
            self.send_line(line)?;
        }
        self.await_key(Continuation::HelpTail, now)?;
        Ok(())
    }
}
