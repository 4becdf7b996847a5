use std::io::Write;

use anyhow::Result;
use common::{AlertAdapter, AlertEvent};
use log::{info, warn};

/// Rings the terminal bell and logs the alert. The tone parameters are
/// advisory here; a terminal has one bell.
#[derive(Default)]
pub struct TerminalAlertSink;

impl TerminalAlertSink {
    pub fn new() -> Self {
        Self
    }
}

impl AlertAdapter for TerminalAlertSink {
    fn initialize(&mut self) -> Result<()> {
        info!("Initializing terminal alert sink");
        Ok(())
    }

    fn emit(&self, event: &AlertEvent) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        warn!(
            "ALERT {:?}: {:?} ({} Hz / {} ms)",
            event.level, event.status, event.frequency_hz, event.duration_ms
        );
        Ok(())
    }
}
