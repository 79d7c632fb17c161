//! DTE TCP server.
//!
//! Exposes the modem's serial side as a TCP port: the "vintage computer"
//! connects here and talks to the AT interface. One client at a time, as a
//! modem has one serial cable. The listener runs on a tokio runtime; the
//! scheduler thread sees a synchronous, non-blocking [`SyncDtePort`] backed
//! by a channel pair.

use retromodem_core::SerialPort;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, RwLock};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Shared flag tracking whether a DTE client is attached.
type ClientConnected = Arc<RwLock<bool>>;

/// Channel depth for each direction.
const CHANNEL_DEPTH: usize = 256;

/// The DTE-side TCP server.
pub struct DteServer {
    runtime: tokio::runtime::Handle,
    port: u16,
    bound_port: u16,
    connected: ClientConnected,
}

impl DteServer {
    /// Create a server for the given port (0 picks a free one).
    pub fn new(port: u16, runtime: tokio::runtime::Handle) -> Self {
        DteServer {
            runtime,
            port,
            bound_port: 0,
            connected: Arc::new(RwLock::new(false)),
        }
    }

    /// Bind the listener, spawn the accept loop, and return the serial
    /// port facade for the scheduler thread.
    pub fn start(&mut self) -> io::Result<SyncDtePort> {
        let (tx_sender, tx_receiver) = mpsc::channel::<Vec<u8>>(CHANNEL_DEPTH);
        let (rx_sender, rx_receiver) = mpsc::channel::<Vec<u8>>(CHANNEL_DEPTH);

        let listener = self
            .runtime
            .block_on(TcpListener::bind(("0.0.0.0", self.port)))?;
        self.bound_port = listener.local_addr()?.port();

        let connected = self.connected.clone();
        self.runtime.spawn(async move {
            if let Err(err) = run_dte_listener(listener, tx_receiver, rx_sender, connected).await {
                tracing::error!("DTE listener failed: {err}");
            }
        });

        Ok(SyncDtePort {
            tx_sender,
            rx_receiver,
            connected: self.connected.clone(),
            pending: VecDeque::new(),
            baud: 0,
        })
    }

    /// The actually bound port (useful when constructed with port 0).
    pub fn bound_port(&self) -> u16 {
        self.bound_port
    }

    /// Whether a DTE client is currently attached.
    pub fn is_client_connected(&self) -> bool {
        self.connected.read().map(|c| *c).unwrap_or(false)
    }
}

/// Synchronous serial-port facade over the DTE channels.
pub struct SyncDtePort {
    tx_sender: mpsc::Sender<Vec<u8>>,
    rx_receiver: mpsc::Receiver<Vec<u8>>,
    connected: ClientConnected,
    /// Bytes received but not yet consumed by the scheduler.
    pending: VecDeque<u8>,
    /// Advisory line rate last set via AT$SB.
    baud: u32,
}

impl SyncDtePort {
    fn client_attached(&self) -> bool {
        self.connected.read().map(|c| *c).unwrap_or(false)
    }
}

impl SerialPort for SyncDtePort {
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pending.len() < buf.len() {
            match self.rx_receiver.try_recv() {
                Ok(chunk) => self.pending.extend(chunk),
                Err(_) => break,
            }
        }
        let mut count = 0;
        while count < buf.len() {
            match self.pending.pop_front() {
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
        // Without a client the bytes have nowhere to go; drop them the way
        // an unplugged serial cable would.
        if !self.client_attached() {
            return Ok(());
        }
        if let Err(err) = self.tx_sender.try_send(data.to_vec()) {
            match err {
                mpsc::error::TrySendError::Full(_) => {
                    tracing::warn!("DTE TX buffer full, dropping {} bytes", data.len());
                }
                mpsc::error::TrySendError::Closed(_) => {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "DTE server gone"));
                }
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn set_baud(&mut self, baud: u32) -> io::Result<()> {
        // The line rate is advisory on a TCP-backed DTE.
        tracing::info!("serial rate set to {baud}");
        self.baud = baud;
        Ok(())
    }
}

/// Accept DTE clients one at a time and shuttle bytes between the socket
/// and the channel pair.
async fn run_dte_listener(
    listener: TcpListener,
    mut tx_receiver: mpsc::Receiver<Vec<u8>>,
    rx_sender: mpsc::Sender<Vec<u8>>,
    connected: ClientConnected,
) -> io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        tracing::info!("DTE client attached from {peer}");
        if let Ok(mut flag) = connected.write() {
            *flag = true;
        }

        let result = handle_dte_connection(stream, &mut tx_receiver, &rx_sender).await;

        if let Ok(mut flag) = connected.write() {
            *flag = false;
        }
        match result {
            Ok(()) => tracing::info!("DTE client detached"),
            Err(err) => tracing::warn!("DTE connection error: {err}"),
        }
    }
}

async fn handle_dte_connection(
    mut stream: TcpStream,
    tx_receiver: &mut mpsc::Receiver<Vec<u8>>,
    rx_sender: &mpsc::Sender<Vec<u8>>,
) -> io::Result<()> {
    let (mut reader, mut writer) = stream.split();
    let mut read_buf = [0u8; 1024];

    loop {
        tokio::select! {
            // DTE client -> scheduler
            result = reader.read(&mut read_buf) => {
                match result {
                    Ok(0) => return Ok(()),
                    Ok(n) => {
                        if rx_sender.send(read_buf[..n].to_vec()).await.is_err() {
                            return Ok(());
                        }
                    }
                    Err(err) => return Err(err),
                }
            }

            // Scheduler -> DTE client
            Some(data) = tx_receiver.recv() => {
                writer.write_all(&data).await?;
                writer.flush().await?;
            }
        }
    }
}
