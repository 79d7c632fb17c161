//! `retromodem` binary: CLI parsing, logging, shutdown wiring.

use clap::Parser;
use retromodem_runner::{run, RunOptions};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Hayes-compatible modem emulator bridging a serial-over-TCP DTE to the
/// network.
#[derive(Debug, Parser)]
#[command(name = "retromodem", version)]
struct Args {
    /// TCP port exposing the DTE (serial) side.
    #[arg(long, default_value_t = 5550)]
    dte_port: u16,

    /// Path of the JSON settings file.
    #[arg(long, default_value = "retromodem.json")]
    settings: PathBuf,

    /// Override the inbound listen port from the stored profile.
    #[arg(long)]
    listen_port: Option<u16>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let options = RunOptions {
        dte_port: args.dte_port,
        settings_path: args.settings,
        listen_port: args.listen_port,
    };

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handle = stop.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        stop_handle.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!("ctrl-c handler not installed: {err}");
    }

    if let Err(err) = run(options, stop) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
