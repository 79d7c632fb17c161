//! Host-side collaborator implementations.
//!
//! A host build bridges calls over whatever network the machine already
//! has, so Wi-Fi association is reported rather than performed, and the
//! device-only features (SSH plumbing, OTA updates, inline fetches) answer
//! "not supported on this build" the way the original answered on hardware
//! variants without them.

use retromodem_core::{
    CarrierSignal, CollabError, FirmwareUpdater, InlineFetcher, SessionConfig, SshDialer,
    UpdateStep, WifiControl,
};
use std::net::{IpAddr, UdpSocket};

/// Discover the address the host would use for outbound traffic.
fn host_ip() -> Option<IpAddr> {
    // Connecting a UDP socket performs route selection without sending
    // anything on the wire.
    let socket = UdpSocket::bind(("0.0.0.0", 0)).ok()?;
    socket.connect(("198.51.100.1", 53)).ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

/// Reports the host's network in Wi-Fi terms.
pub struct HostNetwork;

impl WifiControl for HostNetwork {
    fn connect(&mut self, config: &SessionConfig) -> Vec<String> {
        let mut lines = vec!["Using host network connectivity.".to_string()];
        if !config.ssid.is_empty() {
            lines.push(format!(
                "Stored SSID {} is kept for the profile; the host manages association.",
                config.ssid
            ));
        }
        if let Some(ip) = host_ip() {
            lines.push(format!("IP address: {ip}"));
        }
        lines
    }

    fn disconnect(&mut self) {
        tracing::info!("host network stays up; disconnect is a no-op");
    }

    fn status_lines(&self) -> Vec<String> {
        let mut lines = vec!["Wi-Fi Status: CONNECTED (host network)".to_string()];
        match host_ip() {
            Some(ip) => lines.push(format!("IP Address: {ip}")),
            None => lines.push("IP Address: unknown".to_string()),
        }
        lines
    }

    fn scan(&mut self) -> Vec<String> {
        // Scanning needs radio access the host build does not have.
        Vec::new()
    }

    fn local_ip(&self) -> Option<IpAddr> {
        host_ip()
    }
}

/// Logs carrier-detect transitions instead of driving a pin.
pub struct LogCarrier;

impl CarrierSignal for LogCarrier {
    fn set_level(&mut self, level: bool) {
        tracing::debug!("DCD pin level: {}", if level { "high" } else { "low" });
    }
}

pub struct NoSsh;

impl SshDialer for NoSsh {
    fn dial(&mut self, _host: &str, _port: u16) -> Result<(), CollabError> {
        Err(CollabError::Unsupported)
    }
}

pub struct NoFetcher;

impl InlineFetcher for NoFetcher {
    fn http_get(&mut self, _url: &str) -> Result<Vec<u8>, CollabError> {
        Err(CollabError::Unsupported)
    }

    fn gopher(&mut self, _url: &str) -> Result<Vec<u8>, CollabError> {
        Err(CollabError::Unsupported)
    }
}

pub struct NoUpdater;

impl FirmwareUpdater for NoUpdater {
    fn step(&mut self) -> UpdateStep {
        UpdateStep::Failed("firmware update not supported on this build".to_string())
    }
}
