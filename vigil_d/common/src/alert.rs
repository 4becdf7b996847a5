use serde::{Deserialize, Serialize};

use crate::analyzer::FaceStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Standard,
    Warning,
    Critical,
}

impl AlertLevel {
    /// (frequency_hz, duration_ms) of the audible tone for this level.
    pub fn tone(self) -> (u32, u32) {
        match self {
            Self::Standard => (800, 200),
            Self::Warning => (1200, 400),
            Self::Critical => (1500, 600),
        }
    }
}

/// One emitted alert. Also the wire format consumed by `vigil_udp_rcv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub level: AlertLevel,
    pub status: FaceStatus,
    pub frequency_hz: u32,
    pub duration_ms: u32,
}

impl AlertEvent {
    pub fn new(level: AlertLevel, status: FaceStatus) -> Self {
        let (frequency_hz, duration_ms) = level.tone();
        Self {
            level,
            status,
            frequency_hz,
            duration_ms,
        }
    }
}

pub trait AlertAdapter: Send + Sync {
    fn initialize(&mut self) -> anyhow::Result<()>;
    fn emit(&self, event: &AlertEvent) -> anyhow::Result<()>;
}
