//! # retromodem-runner
//!
//! Host-side plumbing for the modem core: a TCP server exposing the DTE
//! (serial) side, non-blocking std-net transports for calls, a JSON
//! settings file, and stub collaborators for the features a host build
//! does not carry (SSH, OTA, inline fetches).

pub mod collaborators;
pub mod dte_server;
pub mod net;
pub mod settings_file;

use retromodem_core::{Modem, ModemDeps, ModemError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors from bringing the emulator up or running it.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("modem error: {0}")]
    Modem(#[from] ModemError),

    #[error("settings error: {0}")]
    Settings(#[from] retromodem_core::SettingsError),
}

/// Runtime options, filled in from the CLI.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// TCP port exposing the DTE side (the "serial cable").
    pub dte_port: u16,
    /// Path of the JSON settings file.
    pub settings_path: PathBuf,
    /// Override for the inbound listen port (otherwise the profile's).
    pub listen_port: Option<u16>,
}

/// Pace of the cooperative scheduler loop.
const TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Bring the emulator up and run the scheduler until a reboot is requested
/// or `stop` is raised (ctrl-c).
pub fn run(options: RunOptions, stop: Arc<AtomicBool>) -> Result<(), RunnerError> {
    let runtime = tokio::runtime::Runtime::new()?;

    let mut settings = settings_file::JsonSettingsStore::new(options.settings_path.clone());
    let profile = {
        use retromodem_core::SettingsStore;
        settings.load()?
    };
    let listen_port = options.listen_port.unwrap_or(profile.listen_port);

    let mut dte = dte_server::DteServer::new(options.dte_port, runtime.handle().clone());
    let serial = dte.start()?;
    tracing::info!("DTE side listening on port {}", dte.bound_port());

    let listener: Option<Box<dyn retromodem_core::NetListener>> = if listen_port > 0 {
        let listener = net::TcpNetListener::bind(listen_port)?;
        tracing::info!("accepting inbound calls on port {}", listener.port());
        Some(Box::new(listener))
    } else {
        None
    };

    let deps = ModemDeps {
        serial: Box::new(serial),
        listener,
        dialer: Box::new(net::TcpDialer::new()),
        carrier: Box::new(collaborators::LogCarrier),
        settings: Box::new(settings),
        wifi: Box::new(collaborators::HostNetwork),
        ssh: Box::new(collaborators::NoSsh),
        fetcher: Box::new(collaborators::NoFetcher),
        updater: Box::new(collaborators::NoUpdater),
        ppp: None,
    };
    let mut modem = Modem::new(deps)?;
    modem.start(Instant::now())?;

    while !stop.load(Ordering::SeqCst) {
        modem.tick(Instant::now())?;
        if modem.reboot_requested() {
            tracing::info!("reboot requested, shutting down");
            break;
        }
        std::thread::sleep(TICK_INTERVAL);
    }
    Ok(())
}
