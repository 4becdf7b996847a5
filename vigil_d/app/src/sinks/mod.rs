pub mod generic_udp;
pub mod terminal;

use anyhow::Result;
use common::{AlertAdapter, AlertConfig, AlertEvent, AlertOutput};
use generic_udp::UdpAlertSink;
use terminal::TerminalAlertSink;

pub enum AlertBackend {
    Terminal(TerminalAlertSink),
    Udp(UdpAlertSink),
}

impl AlertAdapter for AlertBackend {
    fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Terminal(s) => s.initialize(),
            Self::Udp(s) => s.initialize(),
        }
    }

    fn emit(&self, event: &AlertEvent) -> Result<()> {
        match self {
            Self::Terminal(s) => s.emit(event),
            Self::Udp(s) => s.emit(event),
        }
    }
}

pub fn create_backend(config: &AlertConfig) -> AlertBackend {
    match config.output_mode {
        AlertOutput::Terminal => AlertBackend::Terminal(TerminalAlertSink::new()),
        AlertOutput::Udp => AlertBackend::Udp(UdpAlertSink::new(format!(
            "{}:{}",
            config.send_address, config.send_port
        ))),
    }
}
