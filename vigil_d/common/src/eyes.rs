use api::{mesh, FaceFrame};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eye {
    Left,
    Right,
}

fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Eye-aspect-ratio style openness: vertical lid gap over horizontal eye
/// width. Scale-invariant, so the threshold holds regardless of distance
/// to the camera. `None` when landmarks are missing or the eye is
/// degenerate.
pub fn eye_openness(frame: &FaceFrame, eye: Eye) -> Option<f32> {
    let (upper, lower, corner_a, corner_b) = match eye {
        Eye::Left => (
            mesh::LEFT_EYE_UPPER_LID,
            mesh::LEFT_EYE_LOWER_LID,
            mesh::LEFT_EYE_OUTER_CORNER,
            mesh::LEFT_EYE_INNER_CORNER,
        ),
        Eye::Right => (
            mesh::RIGHT_EYE_UPPER_LID,
            mesh::RIGHT_EYE_LOWER_LID,
            mesh::RIGHT_EYE_INNER_CORNER,
            mesh::RIGHT_EYE_OUTER_CORNER,
        ),
    };

    let upper = frame.landmark(upper)?;
    let lower = frame.landmark(lower)?;
    let corner_a = frame.landmark(corner_a)?;
    let corner_b = frame.landmark(corner_b)?;

    let width = planar_distance(corner_a, corner_b);
    if width <= f32::EPSILON {
        return None;
    }

    Some(planar_distance(upper, lower) / width)
}

/// Both eyes must clear the threshold to count as open. Missing landmarks
/// count as closed, matching the conservative fallback of the original
/// detector integration.
pub fn eyes_open(frame: &FaceFrame, threshold: f32) -> bool {
    let left = eye_openness(frame, Eye::Left);
    let right = eye_openness(frame, Eye::Right);
    matches!((left, right), (Some(l), Some(r)) if l > threshold && r > threshold)
}
