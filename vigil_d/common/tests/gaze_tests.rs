use api::{mesh, FaceFrame};
use common::{classify_gaze, classify_ratio, gaze_ratio, Eye, GazeDirection, GazeThresholds};
use glam::Vec3;

/// A neutral refined mesh: both eyes open, irises centered, nose centered.
fn neutral_face() -> FaceFrame {
    let mut landmarks = vec![Vec3::new(0.5, 0.5, 0.0); mesh::REFINED_LANDMARK_COUNT];

    landmarks[mesh::NOSE_TIP] = Vec3::new(0.5, 0.55, 0.0);

    landmarks[mesh::LEFT_EYE_OUTER_CORNER] = Vec3::new(0.35, 0.40, 0.0);
    landmarks[mesh::LEFT_EYE_INNER_CORNER] = Vec3::new(0.45, 0.40, 0.0);
    landmarks[mesh::LEFT_EYE_UPPER_LID] = Vec3::new(0.40, 0.385, 0.0);
    landmarks[mesh::LEFT_EYE_LOWER_LID] = Vec3::new(0.40, 0.415, 0.0);
    landmarks[mesh::LEFT_IRIS_CENTER] = Vec3::new(0.40, 0.40, 0.0);

    landmarks[mesh::RIGHT_EYE_INNER_CORNER] = Vec3::new(0.55, 0.40, 0.0);
    landmarks[mesh::RIGHT_EYE_OUTER_CORNER] = Vec3::new(0.65, 0.40, 0.0);
    landmarks[mesh::RIGHT_EYE_UPPER_LID] = Vec3::new(0.60, 0.385, 0.0);
    landmarks[mesh::RIGHT_EYE_LOWER_LID] = Vec3::new(0.60, 0.415, 0.0);
    landmarks[mesh::RIGHT_IRIS_CENTER] = Vec3::new(0.60, 0.40, 0.0);

    FaceFrame {
        landmarks,
        width: 640,
        height: 480,
    }
}

#[test]
fn centered_iris_reads_center() {
    let frame = neutral_face();
    let thresholds = GazeThresholds::default();

    for eye in [Eye::Left, Eye::Right] {
        let reading = classify_gaze(&frame, eye, &thresholds).unwrap();
        assert_eq!(reading.direction, GazeDirection::Center);
        assert!((reading.ratio - 0.5).abs() < 1e-4);
    }
}

#[test]
fn iris_near_outer_corner_reads_extreme_left() {
    let mut frame = neutral_face();
    // ratio = 0.02 / 0.10 = 0.2, below the 0.25 extreme threshold
    frame.landmarks[mesh::LEFT_IRIS_CENTER] = Vec3::new(0.37, 0.40, 0.0);

    let reading = classify_gaze(&frame, Eye::Left, &GazeThresholds::default()).unwrap();
    assert_eq!(reading.direction, GazeDirection::ExtremeLeft);
    assert!(reading.direction.off_target());
}

#[test]
fn mild_offsets_read_left_and_right_without_off_target() {
    let mut frame = neutral_face();
    frame.landmarks[mesh::LEFT_IRIS_CENTER] = Vec3::new(0.38, 0.40, 0.0); // ratio 0.3
    frame.landmarks[mesh::RIGHT_IRIS_CENTER] = Vec3::new(0.62, 0.40, 0.0); // ratio 0.7

    let thresholds = GazeThresholds::default();
    let left = classify_gaze(&frame, Eye::Left, &thresholds).unwrap();
    let right = classify_gaze(&frame, Eye::Right, &thresholds).unwrap();

    assert_eq!(left.direction, GazeDirection::Left);
    assert_eq!(right.direction, GazeDirection::Right);
    assert!(!left.direction.off_target());
    assert!(!right.direction.off_target());
}

#[test]
fn iris_near_inner_corner_reads_extreme_right() {
    let mut frame = neutral_face();
    // ratio 0.08 / 0.10 = 0.8, above the 0.75 extreme threshold
    frame.landmarks[mesh::LEFT_IRIS_CENTER] = Vec3::new(0.43, 0.40, 0.0);

    let reading = classify_gaze(&frame, Eye::Left, &GazeThresholds::default()).unwrap();
    assert_eq!(reading.direction, GazeDirection::ExtremeRight);
}

#[test]
fn degenerate_eye_width_is_tracking_lost() {
    let mut frame = neutral_face();
    frame.landmarks[mesh::LEFT_EYE_INNER_CORNER] = frame.landmarks[mesh::LEFT_EYE_OUTER_CORNER];

    assert_eq!(gaze_ratio(&frame, Eye::Left), None);
    // The other eye is unaffected.
    assert!(gaze_ratio(&frame, Eye::Right).is_some());
}

#[test]
fn short_landmark_vector_is_tracking_lost() {
    let frame = FaceFrame {
        landmarks: vec![Vec3::ZERO; 100],
        width: 640,
        height: 480,
    };
    assert_eq!(gaze_ratio(&frame, Eye::Left), None);
    assert_eq!(gaze_ratio(&frame, Eye::Right), None);
}

#[test]
fn band_boundaries_fall_toward_center() {
    let thresholds = GazeThresholds::default();
    // Thresholds are strict inequalities, so the exact boundary values
    // stay in the milder band.
    assert_eq!(
        classify_ratio(0.25, &thresholds).direction,
        GazeDirection::Left
    );
    assert_eq!(
        classify_ratio(0.35, &thresholds).direction,
        GazeDirection::Center
    );
    assert_eq!(
        classify_ratio(0.65, &thresholds).direction,
        GazeDirection::Center
    );
    assert_eq!(
        classify_ratio(0.75, &thresholds).direction,
        GazeDirection::Right
    );
}
