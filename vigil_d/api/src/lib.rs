use anyhow::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Landmark indices into the refined MediaPipe face mesh.
pub mod mesh {
    /// Landmark count with `refine_landmarks` enabled (468 mesh + 10 iris).
    pub const REFINED_LANDMARK_COUNT: usize = 478;

    pub const NOSE_TIP: usize = 1;

    pub const LEFT_EYE_OUTER_CORNER: usize = 33;
    pub const LEFT_EYE_INNER_CORNER: usize = 133;
    pub const LEFT_EYE_UPPER_LID: usize = 159;
    pub const LEFT_EYE_LOWER_LID: usize = 145;

    pub const RIGHT_EYE_INNER_CORNER: usize = 362;
    pub const RIGHT_EYE_OUTER_CORNER: usize = 263;
    pub const RIGHT_EYE_UPPER_LID: usize = 386;
    pub const RIGHT_EYE_LOWER_LID: usize = 374;

    pub const LEFT_IRIS_CENTER: usize = 468;
    pub const RIGHT_IRIS_CENTER: usize = 473;
}

/// One detector frame. An empty landmark vector means no face was found.
///
/// Coordinates are normalized to the source image: x and y in [0, 1],
/// z is detector-relative depth. Frames are ephemeral: produced, analyzed
/// and discarded within a single loop iteration. This is also the wire
/// format of `mesh_udp_module`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceFrame {
    pub landmarks: Vec<Vec3>,
    pub width: u32,
    pub height: u32,
}

impl FaceFrame {
    /// True when the frame carries a full refined mesh, so the iris and
    /// lid indices in [`mesh`] are all usable.
    pub fn has_face(&self) -> bool {
        self.landmarks.len() >= mesh::REFINED_LANDMARK_COUNT
    }

    pub fn clear(&mut self) {
        self.landmarks.clear();
    }

    pub fn landmark(&self, index: usize) -> Option<Vec3> {
        self.landmarks.get(index).copied()
    }
}

/// log level for module logging
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

/// logger callback for modules
pub type LogCallback = extern "C" fn(level: LogLevel, target: *const i8, message: *const i8);

/// Logger interface for modules
pub struct ModuleLogger {
    callback: LogCallback,
    module_name: String,
}

impl ModuleLogger {
    pub fn new(callback: LogCallback, module_name: String) -> Self {
        Self {
            callback,
            module_name,
        }
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        let target = std::ffi::CString::new(self.module_name.as_str()).unwrap();
        let msg = std::ffi::CString::new(message).unwrap();
        (self.callback)(level, target.as_ptr(), msg.as_ptr());
    }
}

/// A loadable landmark source. Implementations live in cdylib plugins
/// exporting a `create_module` symbol returning `Box<dyn LandmarkModule>`.
pub trait LandmarkModule {
    fn initialize(&mut self, logger: ModuleLogger) -> Result<()>;

    /// Select the capture input (camera index or equivalent). Sources that
    /// do not own a physical device forward the request to whatever does.
    fn open_input(&mut self, index: u32) -> Result<()>;

    /// Poll for a new frame. Returns true when `frame` was overwritten
    /// with fresh data. Must not block.
    fn poll(&mut self, frame: &mut FaceFrame) -> Result<bool>;

    fn unload(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_has_no_face() {
        let frame = FaceFrame::default();
        assert!(!frame.has_face());
        assert_eq!(frame.landmark(mesh::NOSE_TIP), None);
    }

    #[test]
    fn partial_mesh_is_not_a_face() {
        let frame = FaceFrame {
            landmarks: vec![Vec3::ZERO; 468],
            width: 640,
            height: 480,
        };
        // Without the iris landmarks the frame is unusable downstream.
        assert!(!frame.has_face());
    }
}
