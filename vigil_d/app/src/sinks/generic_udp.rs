use std::net::UdpSocket;

use anyhow::{Context, Result};
use common::{AlertAdapter, AlertEvent};
use log::info;

/// Sends alert events as JSON datagrams, one event per packet.
/// `vigil_udp_rcv` is the matching listener.
pub struct UdpAlertSink {
    socket: Option<UdpSocket>,
    target_address: String,
}

impl UdpAlertSink {
    pub fn new(target_address: String) -> Self {
        Self {
            socket: None,
            target_address,
        }
    }
}

impl AlertAdapter for UdpAlertSink {
    fn initialize(&mut self) -> Result<()> {
        info!("Initializing UDP alert sink...");
        // Bind to 0.0.0.0:0 to let OS pick a port
        let socket = UdpSocket::bind("0.0.0.0:0").context("Failed to bind UDP socket")?;
        socket
            .connect(&self.target_address)
            .with_context(|| format!("Failed to connect to {}", self.target_address))?;
        socket
            .set_nonblocking(true)
            .context("Failed to set non-blocking mode")?;

        self.socket = Some(socket);
        info!("UDP alert sink initialized. Target: {}", self.target_address);
        Ok(())
    }

    fn emit(&self, event: &AlertEvent) -> Result<()> {
        if let Some(socket) = &self.socket {
            let json_data = serde_json::to_vec(event)?;
            socket.send(&json_data)?;
        }
        Ok(())
    }
}
