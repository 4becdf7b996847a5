use api::{mesh, FaceFrame};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::GazeThresholds;
use crate::eyes::Eye;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GazeDirection {
    ExtremeLeft,
    Left,
    Center,
    Right,
    ExtremeRight,
}

impl GazeDirection {
    /// Only the extreme variants count as looking away from the target.
    pub fn off_target(self) -> bool {
        matches!(self, Self::ExtremeLeft | Self::ExtremeRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeReading {
    pub direction: GazeDirection,
    /// Iris offset from the outer-left corner over eye width, in [0, 1]
    /// for a well-formed eye.
    pub ratio: f32,
}

fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    // Depth from the detector is too noisy for ratio geometry.
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Horizontal gaze ratio for one eye: iris distance from the left-hand
/// corner over total eye width. `None` when the landmarks are missing or
/// the eye is geometrically degenerate (tracking lost).
pub fn gaze_ratio(frame: &FaceFrame, eye: Eye) -> Option<f32> {
    let (corner_a, corner_b, iris) = match eye {
        Eye::Left => (
            mesh::LEFT_EYE_OUTER_CORNER,
            mesh::LEFT_EYE_INNER_CORNER,
            mesh::LEFT_IRIS_CENTER,
        ),
        Eye::Right => (
            mesh::RIGHT_EYE_INNER_CORNER,
            mesh::RIGHT_EYE_OUTER_CORNER,
            mesh::RIGHT_IRIS_CENTER,
        ),
    };

    let corner_a = frame.landmark(corner_a)?;
    let corner_b = frame.landmark(corner_b)?;
    let iris = frame.landmark(iris)?;

    let eye_width = planar_distance(corner_a, corner_b);
    if eye_width <= f32::EPSILON {
        return None;
    }

    Some(planar_distance(corner_a, iris) / eye_width)
}

/// Classify an already-computed (possibly smoothed) gaze ratio.
pub fn classify_ratio(ratio: f32, thresholds: &GazeThresholds) -> GazeReading {
    let direction = if ratio < thresholds.extreme_left {
        GazeDirection::ExtremeLeft
    } else if ratio < thresholds.left {
        GazeDirection::Left
    } else if ratio > thresholds.extreme_right {
        GazeDirection::ExtremeRight
    } else if ratio > thresholds.right {
        GazeDirection::Right
    } else {
        GazeDirection::Center
    };

    GazeReading { direction, ratio }
}

pub fn classify_gaze(frame: &FaceFrame, eye: Eye, thresholds: &GazeThresholds) -> Option<GazeReading> {
    gaze_ratio(frame, eye).map(|ratio| classify_ratio(ratio, thresholds))
}
