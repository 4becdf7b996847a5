use std::collections::HashMap;

use api::FaceFrame;
use serde::{Deserialize, Serialize};

use crate::alert::AlertLevel;
use crate::config::AnalysisConfig;
use crate::eyes::{eye_openness, Eye};
use crate::gaze::{classify_ratio, gaze_ratio, GazeReading};
use crate::motion::HeadMotionTracker;
use crate::one_euro::OneEuroFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceStatus {
    NoFace,
    EyesClosed,
    HeadMotion,
    GazeOffTarget,
    Attentive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttentionLevel {
    Nominal,
    Caution,
    Warning,
    Alert,
}

/// Everything derived from a single frame. Recomputed every iteration and
/// discarded; the only cross-frame state lives in the analyzer itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub face_detected: bool,
    pub status: FaceStatus,
    pub level: AttentionLevel,
    pub gaze_left: Option<GazeReading>,
    pub gaze_right: Option<GazeReading>,
    pub eyes_open: bool,
    pub head_movement: f32,
    pub alert: Option<AlertLevel>,
}

impl Assessment {
    /// The resting assessment: no face, nothing derived, no alert.
    pub fn idle() -> Self {
        Self {
            face_detected: false,
            status: FaceStatus::NoFace,
            level: AttentionLevel::Nominal,
            gaze_left: None,
            gaze_right: None,
            eyes_open: false,
            head_movement: 0.0,
            alert: None,
        }
    }
}

/// Per-frame assessment pipeline: smoothing, eye state, gaze
/// classification, head motion, and the status ladder.
pub struct FrameAnalyzer {
    pub config: AnalysisConfig,
    motion: HeadMotionTracker,
    gaze_left: OneEuroFilter,
    gaze_right: OneEuroFilter,
    openness_left: OneEuroFilter,
    openness_right: OneEuroFilter,
    eyes_closed_for: f32,
}

impl FrameAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let filter = OneEuroFilter::from_smoothness(config.smoothness);
        Self {
            config,
            motion: HeadMotionTracker::new(),
            gaze_left: filter,
            gaze_right: filter,
            openness_left: filter,
            openness_right: filter,
            eyes_closed_for: 0.0,
        }
    }

    /// Clears cross-frame state. Called when monitoring stops or the
    /// camera changes.
    pub fn reset(&mut self) {
        self.motion.reset();
        self.gaze_left.reset();
        self.gaze_right.reset();
        self.openness_left.reset();
        self.openness_right.reset();
        self.eyes_closed_for = 0.0;
    }

    /// Live threshold overrides from the HTTP tuning endpoint. Unknown
    /// keys are ignored and reported back to the caller.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, f32>) -> Vec<String> {
        let mut unknown = Vec::new();
        for (key, &value) in overrides {
            match key.as_str() {
                "movement_threshold" => self.config.movement_threshold = value,
                "eye_open_threshold" => self.config.eye_open_threshold = value,
                "escalate_after_secs" => self.config.escalate_after_secs = value,
                "gaze_extreme_left" => self.config.gaze.extreme_left = value,
                "gaze_left" => self.config.gaze.left = value,
                "gaze_right" => self.config.gaze.right = value,
                "gaze_extreme_right" => self.config.gaze.extreme_right = value,
                // Overrides are re-applied every frame, so only rebuild
                // the filters when the value actually changed.
                "smoothness" if value != self.config.smoothness => {
                    self.config.smoothness = value;
                    let filter = OneEuroFilter::from_smoothness(value);
                    self.gaze_left = filter;
                    self.gaze_right = filter;
                    self.openness_left = filter;
                    self.openness_right = filter;
                }
                "smoothness" => {}
                _ => unknown.push(key.clone()),
            }
        }
        unknown
    }

    pub fn assess(&mut self, frame: Option<&FaceFrame>, dt: f32) -> Assessment {
        let Some(frame) = frame.filter(|f| f.has_face()) else {
            self.eyes_closed_for = 0.0;
            return Assessment::idle();
        };

        let open_l = eye_openness(frame, Eye::Left)
            .map(|v| self.openness_left.filter(v, dt))
            .unwrap_or(0.0);
        let open_r = eye_openness(frame, Eye::Right)
            .map(|v| self.openness_right.filter(v, dt))
            .unwrap_or(0.0);
        let eyes_open =
            open_l > self.config.eye_open_threshold && open_r > self.config.eye_open_threshold;

        let gaze_left = gaze_ratio(frame, Eye::Left)
            .map(|r| classify_ratio(self.gaze_left.filter(r, dt), &self.config.gaze));
        let gaze_right = gaze_ratio(frame, Eye::Right)
            .map(|r| classify_ratio(self.gaze_right.filter(r, dt), &self.config.gaze));

        let (head_moved, head_movement) =
            self.motion.observe(frame, self.config.movement_threshold);

        let gaze_off = gaze_left.is_some_and(|g| g.direction.off_target())
            || gaze_right.is_some_and(|g| g.direction.off_target());

        // Priority ladder: eyes closed beats head motion beats gaze.
        let (status, level, alert) = if !eyes_open {
            self.eyes_closed_for += dt;
            let alert = if self.eyes_closed_for >= self.config.escalate_after_secs {
                AlertLevel::Critical
            } else {
                AlertLevel::Warning
            };
            (FaceStatus::EyesClosed, AttentionLevel::Alert, Some(alert))
        } else {
            self.eyes_closed_for = 0.0;
            if head_moved {
                (
                    FaceStatus::HeadMotion,
                    AttentionLevel::Warning,
                    Some(AlertLevel::Standard),
                )
            } else if gaze_off {
                (
                    FaceStatus::GazeOffTarget,
                    AttentionLevel::Caution,
                    Some(AlertLevel::Standard),
                )
            } else {
                (FaceStatus::Attentive, AttentionLevel::Nominal, None)
            }
        };

        Assessment {
            face_detected: true,
            status,
            level,
            gaze_left,
            gaze_right,
            eyes_open,
            head_movement,
            alert,
        }
    }
}
