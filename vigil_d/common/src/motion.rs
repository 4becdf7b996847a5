use api::{mesh, FaceFrame};
use glam::Vec3;

/// Tracks the nose tip across frames and flags deltas above a threshold.
///
/// Holds only the previous frame's position; reset whenever monitoring
/// stops or the camera changes so a stale reference cannot fire a
/// spurious movement alert on restart.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadMotionTracker {
    previous_nose: Option<Vec3>,
}

impl HeadMotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns (excessive, intensity). The first observed frame never
    /// trips, it only seeds the reference.
    pub fn observe(&mut self, frame: &FaceFrame, threshold: f32) -> (bool, f32) {
        let Some(nose) = frame.landmark(mesh::NOSE_TIP) else {
            return (false, 0.0);
        };

        let result = match self.previous_nose {
            Some(prev) => {
                let delta = ((nose.x - prev.x).powi(2) + (nose.y - prev.y).powi(2)).sqrt();
                (delta > threshold, delta)
            }
            None => (false, 0.0),
        };

        self.previous_nose = Some(nose);
        result
    }

    pub fn reset(&mut self) {
        self.previous_nose = None;
    }
}
