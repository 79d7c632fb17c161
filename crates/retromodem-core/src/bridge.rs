//! The connected-mode bridge.
//!
//! Runs once per scheduler tick while in Data mode, in a fixed order:
//! serial-to-network first (so outbound keystrokes are never starved by a
//! busy inbound stream), then network-to-serial, then escape evaluation
//! (so it sees the state set earlier in the same tick).

use crate::error::ModemError;
use crate::modem::{CallTransport, Mode, Modem};
use crate::transport::NetStream;
use hayes_protocol::responses::ResultCode;
use retromodem_xfer::telnet;
use retromodem_xfer::xmodem::{self, XmodemMode, XmodemReceiver, XmodemStep};
use std::time::{Duration, Instant};

/// Serial TX chunk drained per tick. Halved when Telnet framing is on, to
/// leave room for IAC escaping.
pub(crate) const TX_CHUNK: usize = 256;

/// How long a 'C'/NAK probe keeps the XMODEM start window open.
const XMODEM_RESPONSE_WINDOW: Duration = Duration::from_secs(5);

/// Pull one pending byte off the network stream. Read errors are treated
/// as "nothing available"; real peer loss is reconciled after the tick.
fn read_one(stream: &mut dyn NetStream) -> Option<u8> {
    let mut byte = [0u8; 1];
    match stream.try_read(&mut byte) {
        Ok(1) => Some(byte[0]),
        Ok(_) => None,
        Err(err) => {
            log::debug!("network read failed: {err}");
            None
        }
    }
}

impl Modem {
    /// One Data-mode pass: both pumps plus the escape check.
    pub(crate) fn bridge_tick(&mut self, now: Instant) -> Result<(), ModemError> {
        self.serial_to_network(now)?;
        self.network_to_serial(now)?;
        if self.escape.poll(now) {
            self.mode = Mode::Command;
            self.emit_result(ResultCode::Ok, now)?;
        }
        Ok(())
    }

    fn serial_to_network(&mut self, now: Instant) -> Result<(), ModemError> {
        let max = if self.config.telnet {
            TX_CHUNK / 2
        } else {
            TX_CHUNK
        };
        let mut buf = [0u8; TX_CHUNK];
        let len = self.serial.try_read(&mut buf[..max])?;
        if len == 0 {
            return Ok(());
        }

        for &byte in &buf[..len] {
            // A 'C' or NAK from the DTE primes an XMODEM receive; the rest
            // of this chunk goes unscanned, as the hardware did.
            if byte == xmodem::CRC_PROBE || byte == xmodem::NAK {
                self.awaiting_xmodem = Some(now);
                break;
            }
            self.escape.note(byte, now);
        }

        let out: Vec<u8> = if self.config.telnet {
            telnet::escape_iac(&buf[..len])
        } else {
            buf[..len].to_vec()
        };
        match self.transport.as_mut() {
            Some(CallTransport::Ppp) => {
                if let Some(link) = self.ppp.as_mut() {
                    link.input(&out);
                }
            }
            Some(CallTransport::Stream(stream)) => {
                // Write failures surface as a disconnect next tick.
                if let Err(err) = stream.write_all(&out) {
                    log::debug!("network write failed: {err}");
                }
            }
            None => {}
        }
        Ok(())
    }

    fn network_to_serial(&mut self, now: Instant) -> Result<(), ModemError> {
        if matches!(self.transport, Some(CallTransport::Ppp)) {
            let out = self
                .ppp
                .as_mut()
                .map(|link| link.take_output())
                .unwrap_or_default();
            if !out.is_empty() {
                self.serial.write_all(&out)?;
                self.serial.flush()?;
            }
            return Ok(());
        }

        let this = &mut *self;
        let stream = match this.transport.as_mut() {
            Some(CallTransport::Stream(stream)) => stream.as_mut(),
            _ => return Ok(()),
        };
        let serial = this.serial.as_mut();
        let telnet_enabled = this.config.telnet;

        while !this.tx_paused {
            let byte = match read_one(stream) {
                Some(byte) => byte,
                None => break,
            };

            // Mid-transfer bytes belong to the XMODEM session.
            if let Some(receiver) = this.xmodem.as_mut() {
                let step = receiver.feed(byte);
                match step {
                    XmodemStep::Continue => {}
                    XmodemStep::Ack { total } => {
                        if let Err(err) = stream.write_all(&[xmodem::ACK]) {
                            log::debug!("xmodem ack not sent: {err}");
                        }
                        let progress = format!("\rReceived: {total} bytes");
                        serial.write_all(progress.as_bytes())?;
                    }
                    XmodemStep::Nak => {
                        if let Err(err) = stream.write_all(&[xmodem::NAK]) {
                            log::debug!("xmodem nak not sent: {err}");
                        }
                    }
                    XmodemStep::Done { total } => {
                        if let Err(err) = stream.write_all(&[xmodem::ACK]) {
                            log::debug!("xmodem final ack not sent: {err}");
                        }
                        log::debug!("xmodem transfer complete, {total} bytes");
                        serial.write_all(b"\n\rTransfer completed")?;
                        this.xmodem = None;
                        this.awaiting_xmodem = None;
                    }
                }
                continue;
            }

            // A primed probe window turns the next block-start marker into
            // a live session.
            if let Some(armed_at) = this.awaiting_xmodem {
                if now.saturating_duration_since(armed_at) > XMODEM_RESPONSE_WINDOW {
                    this.awaiting_xmodem = None;
                } else if byte == xmodem::SOH || byte == xmodem::STX {
                    serial.write_all(b"\n\r[+] XMODEM transfer detected, starting receive...")?;
                    let mode = if byte == xmodem::STX {
                        XmodemMode::OneK
                    } else {
                        XmodemMode::Crc
                    };
                    let mut receiver = XmodemReceiver::new(mode);
                    let _ = receiver.feed(byte);
                    this.xmodem = Some(receiver);
                    this.awaiting_xmodem = None;
                    continue;
                }
                if byte != xmodem::SOH && byte != xmodem::STX {
                    this.awaiting_xmodem = None;
                }
            }

            if telnet_enabled && byte == telnet::IAC {
                let action = telnet::negotiate(|| read_one(&mut *stream));
                match action {
                    telnet::Negotiation::Literal => serial.write_all(&[telnet::IAC])?,
                    telnet::Negotiation::Respond(reply) => {
                        if let Err(err) = stream.write_all(&reply) {
                            log::debug!("telnet reply not sent: {err}");
                        }
                    }
                    telnet::Negotiation::Ignored | telnet::Negotiation::Incomplete => {}
                }
                continue;
            }

            serial.write_all(&[byte])?;
        }

        self.serial.flush()?;
        self.handle_flow_control();
        Ok(())
    }
}
