pub use api::{mesh, FaceFrame, LandmarkModule};

mod alert;
mod analyzer;
mod config;
mod eyes;
mod gaze;
mod motion;
mod one_euro;

pub use alert::{AlertAdapter, AlertEvent, AlertLevel};
pub use analyzer::{Assessment, AttentionLevel, FaceStatus, FrameAnalyzer};
pub use config::{
    AlertConfig, AlertOutput, AnalysisConfig, CameraConfig, GazeThresholds, HttpConfig,
    ModuleConfig, MonitorConfig,
};
pub use eyes::{eye_openness, eyes_open, Eye};
pub use gaze::{classify_gaze, classify_ratio, gaze_ratio, GazeDirection, GazeReading};
pub use motion::HeadMotionTracker;
pub use one_euro::OneEuroFilter;
