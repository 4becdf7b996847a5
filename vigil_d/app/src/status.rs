use common::Assessment;
use serde::{Deserialize, Serialize};

/// Monitoring lifecycle, as reported on /status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemState {
    Offline,
    Active,
    /// Start or camera switch failed; monitoring stayed off.
    CameraError,
}

/// Shared view of the daemon, written by the frame loops and read by the
/// HTTP surface.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub system: SystemState,
    pub camera_index: u32,
    pub fps: f32,
    pub frames: u64,
    pub assessment: Assessment,
}

impl StatusSnapshot {
    pub fn offline(camera_index: u32) -> Self {
        Self {
            system: SystemState::Offline,
            camera_index,
            fps: 0.0,
            frames: 0,
            assessment: Assessment::idle(),
        }
    }
}

/// Requests posted by the HTTP surface, drained by the producer loop
/// (which owns the modules).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    Start,
    Stop,
    CycleCamera,
    SelectCamera(u32),
}
