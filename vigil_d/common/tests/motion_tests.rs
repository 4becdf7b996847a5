use api::{mesh, FaceFrame};
use common::HeadMotionTracker;
use glam::Vec3;

fn face_with_nose(x: f32, y: f32) -> FaceFrame {
    let mut landmarks = vec![Vec3::new(0.5, 0.5, 0.0); mesh::REFINED_LANDMARK_COUNT];
    landmarks[mesh::NOSE_TIP] = Vec3::new(x, y, 0.0);
    FaceFrame {
        landmarks,
        width: 640,
        height: 480,
    }
}

const THRESHOLD: f32 = 0.008;

#[test]
fn first_frame_only_seeds_the_reference() {
    let mut tracker = HeadMotionTracker::new();
    let (moved, intensity) = tracker.observe(&face_with_nose(0.5, 0.55), THRESHOLD);
    assert!(!moved);
    assert_eq!(intensity, 0.0);
}

#[test]
fn small_jitter_stays_quiet() {
    let mut tracker = HeadMotionTracker::new();
    tracker.observe(&face_with_nose(0.5, 0.55), THRESHOLD);
    let (moved, intensity) = tracker.observe(&face_with_nose(0.503, 0.55), THRESHOLD);
    assert!(!moved);
    assert!(intensity > 0.0 && intensity < THRESHOLD);
}

#[test]
fn large_delta_trips_with_intensity() {
    let mut tracker = HeadMotionTracker::new();
    tracker.observe(&face_with_nose(0.5, 0.55), THRESHOLD);
    let (moved, intensity) = tracker.observe(&face_with_nose(0.53, 0.55), THRESHOLD);
    assert!(moved);
    assert!((intensity - 0.03).abs() < 1e-4);
}

#[test]
fn reference_advances_each_frame() {
    let mut tracker = HeadMotionTracker::new();
    tracker.observe(&face_with_nose(0.50, 0.55), THRESHOLD);
    tracker.observe(&face_with_nose(0.53, 0.55), THRESHOLD);
    // The delta is measured against the previous frame, not the start.
    let (moved, _) = tracker.observe(&face_with_nose(0.531, 0.55), THRESHOLD);
    assert!(!moved);
}

#[test]
fn reset_prevents_spurious_trip_on_restart() {
    let mut tracker = HeadMotionTracker::new();
    tracker.observe(&face_with_nose(0.2, 0.2), THRESHOLD);
    tracker.reset();
    // Far from the pre-reset position, but the first post-reset frame
    // must not trip.
    let (moved, _) = tracker.observe(&face_with_nose(0.8, 0.8), THRESHOLD);
    assert!(!moved);
}

#[test]
fn missing_nose_is_ignored() {
    let mut tracker = HeadMotionTracker::new();
    tracker.observe(&face_with_nose(0.5, 0.55), THRESHOLD);
    let empty = FaceFrame::default();
    let (moved, intensity) = tracker.observe(&empty, THRESHOLD);
    assert!(!moved);
    assert_eq!(intensity, 0.0);
}
