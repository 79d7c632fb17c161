//! Shared mock transports and collaborators for the integration tests.
//!
//! Everything is single-threaded Rc/RefCell plumbing: each mock hands back
//! an "end" handle the test uses to feed input and inspect output.

#![allow(dead_code)]

use retromodem_core::{
    CarrierSignal, CollabError, FirmwareUpdater, InlineFetcher, MemorySettings, Modem, ModemDeps,
    NetDialer, NetListener, NetStream, PppLink, SerialPort, SessionConfig, SshDialer, UpdateStep,
    WifiControl,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ============================================================================
// Serial mock
// ============================================================================

pub struct MockSerial {
    to_modem: Rc<RefCell<VecDeque<u8>>>,
    from_modem: Rc<RefCell<Vec<u8>>>,
}

#[derive(Clone)]
pub struct SerialEnd {
    to_modem: Rc<RefCell<VecDeque<u8>>>,
    from_modem: Rc<RefCell<Vec<u8>>>,
}

pub fn serial_pair() -> (MockSerial, SerialEnd) {
    let to_modem = Rc::new(RefCell::new(VecDeque::new()));
    let from_modem = Rc::new(RefCell::new(Vec::new()));
    (
        MockSerial {
            to_modem: to_modem.clone(),
            from_modem: from_modem.clone(),
        },
        SerialEnd {
            to_modem,
            from_modem,
        },
    )
}

impl SerialEnd {
    pub fn push_bytes(&self, data: &[u8]) {
        self.to_modem.borrow_mut().extend(data.iter().copied());
    }

    pub fn push_str(&self, text: &str) {
        self.push_bytes(text.as_bytes());
    }

    /// Drain and decode everything the modem wrote so far.
    pub fn take_output(&self) -> String {
        let bytes = std::mem::take(&mut *self.from_modem.borrow_mut());
        String::from_utf8_lossy(&bytes).to_string()
    }

    /// Drain the raw output bytes.
    pub fn take_output_bytes(&self) -> Vec<u8> {
        std::mem::take(&mut *self.from_modem.borrow_mut())
    }
}

impl SerialPort for MockSerial {
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut queue = self.to_modem.borrow_mut();
        let mut count = 0;
        while count < buf.len() {
            match queue.pop_front() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.from_modem.borrow_mut().extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn set_baud(&mut self, _baud: u32) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// Network stream mock
// ============================================================================

pub struct MockStream {
    to_modem: Rc<RefCell<VecDeque<u8>>>,
    from_modem: Rc<RefCell<Vec<u8>>>,
    connected: Rc<Cell<bool>>,
    addr: Option<SocketAddr>,
}

#[derive(Clone)]
pub struct PeerEnd {
    to_modem: Rc<RefCell<VecDeque<u8>>>,
    from_modem: Rc<RefCell<Vec<u8>>>,
    connected: Rc<Cell<bool>>,
}

pub fn stream_pair() -> (MockStream, PeerEnd) {
    let to_modem = Rc::new(RefCell::new(VecDeque::new()));
    let from_modem = Rc::new(RefCell::new(Vec::new()));
    let connected = Rc::new(Cell::new(true));
    (
        MockStream {
            to_modem: to_modem.clone(),
            from_modem: from_modem.clone(),
            connected: connected.clone(),
            addr: "127.0.0.1:5000".parse().ok(),
        },
        PeerEnd {
            to_modem,
            from_modem,
            connected,
        },
    )
}

impl PeerEnd {
    pub fn push_bytes(&self, data: &[u8]) {
        self.to_modem.borrow_mut().extend(data.iter().copied());
    }

    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut *self.from_modem.borrow_mut())
    }

    pub fn take_output_string(&self) -> String {
        String::from_utf8_lossy(&self.take_output()).to_string()
    }

    pub fn disconnect(&self) {
        self.connected.set(false);
    }
}

impl NetStream for MockStream {
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut queue = self.to_modem.borrow_mut();
        let mut count = 0;
        while count < buf.len() {
            match queue.pop_front() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        if !self.connected.get() {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"));
        }
        self.from_modem.borrow_mut().extend_from_slice(data);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.get() || !self.to_modem.borrow().is_empty()
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.addr
    }
}

// ============================================================================
// Listener and dialer mocks
// ============================================================================

pub struct MockListener {
    pending: Rc<RefCell<VecDeque<MockStream>>>,
}

#[derive(Clone)]
pub struct ListenerEnd {
    pending: Rc<RefCell<VecDeque<MockStream>>>,
}

pub fn listener_pair() -> (MockListener, ListenerEnd) {
    let pending = Rc::new(RefCell::new(VecDeque::new()));
    (
        MockListener {
            pending: pending.clone(),
        },
        ListenerEnd { pending },
    )
}

impl ListenerEnd {
    /// Simulate an inbound caller; returns the caller's end of the stream.
    pub fn dial_in(&self) -> PeerEnd {
        let (stream, peer) = stream_pair();
        self.pending.borrow_mut().push_back(stream);
        peer
    }
}

impl NetListener for MockListener {
    fn has_pending(&mut self) -> bool {
        !self.pending.borrow().is_empty()
    }

    fn accept(&mut self) -> io::Result<Box<dyn NetStream>> {
        match self.pending.borrow_mut().pop_front() {
            Some(stream) => Ok(Box::new(stream)),
            None => Err(io::Error::new(io::ErrorKind::WouldBlock, "nothing pending")),
        }
    }
}

pub struct MockDialer {
    dialed: Rc<RefCell<Vec<(String, u16)>>>,
    next: Rc<RefCell<VecDeque<MockStream>>>,
}

#[derive(Clone)]
pub struct DialerEnd {
    dialed: Rc<RefCell<Vec<(String, u16)>>>,
    next: Rc<RefCell<VecDeque<MockStream>>>,
}

pub fn dialer_pair() -> (MockDialer, DialerEnd) {
    let dialed = Rc::new(RefCell::new(Vec::new()));
    let next = Rc::new(RefCell::new(VecDeque::new()));
    (
        MockDialer {
            dialed: dialed.clone(),
            next: next.clone(),
        },
        DialerEnd { dialed, next },
    )
}

impl DialerEnd {
    /// Make the next dial succeed; returns the remote end.
    pub fn expect_connection(&self) -> PeerEnd {
        let (stream, peer) = stream_pair();
        self.next.borrow_mut().push_back(stream);
        peer
    }

    pub fn dialed(&self) -> Vec<(String, u16)> {
        self.dialed.borrow().clone()
    }
}

impl NetDialer for MockDialer {
    fn connect(&mut self, host: &str, port: u16) -> io::Result<Box<dyn NetStream>> {
        self.dialed.borrow_mut().push((host.to_string(), port));
        match self.next.borrow_mut().pop_front() {
            Some(stream) => Ok(Box::new(stream)),
            None => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "no one home",
            )),
        }
    }
}

// ============================================================================
// Carrier and collaborators
// ============================================================================

pub struct MockCarrier {
    level: Rc<Cell<bool>>,
}

impl CarrierSignal for MockCarrier {
    fn set_level(&mut self, level: bool) {
        self.level.set(level);
    }
}

pub struct NullWifi;

impl WifiControl for NullWifi {
    fn connect(&mut self, _config: &SessionConfig) -> Vec<String> {
        Vec::new()
    }

    fn disconnect(&mut self) {}

    fn status_lines(&self) -> Vec<String> {
        vec!["Wi-Fi Status: CONNECTED".to_string()]
    }

    fn scan(&mut self) -> Vec<String> {
        Vec::new()
    }

    fn local_ip(&self) -> Option<std::net::IpAddr> {
        None
    }
}

pub struct NullSsh;

impl SshDialer for NullSsh {
    fn dial(&mut self, _host: &str, _port: u16) -> Result<(), CollabError> {
        Err(CollabError::Unsupported)
    }
}

pub struct NullFetcher;

impl InlineFetcher for NullFetcher {
    fn http_get(&mut self, _url: &str) -> Result<Vec<u8>, CollabError> {
        Err(CollabError::Unsupported)
    }

    fn gopher(&mut self, _url: &str) -> Result<Vec<u8>, CollabError> {
        Err(CollabError::Unsupported)
    }
}

pub struct NullUpdater;

impl FirmwareUpdater for NullUpdater {
    fn step(&mut self) -> UpdateStep {
        UpdateStep::Failed("firmware update not supported".to_string())
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub modem: Modem,
    pub serial: SerialEnd,
    pub listener: ListenerEnd,
    pub dialer: DialerEnd,
    pub carrier: Rc<Cell<bool>>,
    pub start: Instant,
}

impl Harness {
    pub fn new() -> Self {
        Harness::with_parts(MemorySettings::new(), None)
    }

    pub fn with_settings(settings: MemorySettings) -> Self {
        Harness::with_parts(settings, None)
    }

    pub fn with_ppp(ppp: PppLink) -> Self {
        Harness::with_parts(MemorySettings::new(), Some(ppp))
    }

    fn with_parts(settings: MemorySettings, ppp: Option<PppLink>) -> Self {
        let (serial, serial_end) = serial_pair();
        let (listener, listener_end) = listener_pair();
        let (dialer, dialer_end) = dialer_pair();
        let level = Rc::new(Cell::new(false));
        let deps = ModemDeps {
            serial: Box::new(serial),
            listener: Some(Box::new(listener)),
            dialer: Box::new(dialer),
            carrier: Box::new(MockCarrier {
                level: level.clone(),
            }),
            settings: Box::new(settings),
            wifi: Box::new(NullWifi),
            ssh: Box::new(NullSsh),
            fetcher: Box::new(NullFetcher),
            updater: Box::new(NullUpdater),
            ppp,
        };
        let modem = Modem::new(deps).expect("modem construction");
        Harness {
            modem,
            serial: serial_end,
            listener: listener_end,
            dialer: dialer_end,
            carrier: level,
            start: Instant::now(),
        }
    }

    /// Tick the scheduler at `start + offset_ms`.
    pub fn tick_at(&mut self, offset_ms: u64) {
        let now = self.start + Duration::from_millis(offset_ms);
        self.modem.tick(now).expect("tick");
    }

    /// Type a command line (one byte per tick, plus a CR and a settling
    /// tick), all at the same timestamp.
    pub fn type_line(&mut self, line: &str, offset_ms: u64) {
        self.serial.push_str(line);
        self.serial.push_bytes(b"\r");
        for _ in 0..line.len() + 2 {
            self.tick_at(offset_ms);
        }
    }

    /// Type a line and return the output it produced.
    pub fn command(&mut self, line: &str, offset_ms: u64) -> String {
        self.serial.take_output();
        self.type_line(line, offset_ms);
        self.serial.take_output()
    }
}
