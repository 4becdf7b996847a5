use common::OneEuroFilter;

const DT: f32 = 1.0 / 30.0;

#[test]
fn first_sample_passes_through() {
    let mut filter = OneEuroFilter::default();
    assert_eq!(filter.filter(100.0, DT), 100.0);
}

#[test]
fn step_response_is_smoothed_but_moves() {
    let mut filter = OneEuroFilter::default();
    filter.filter(0.0, DT);
    let out = filter.filter(1.0, DT);
    // Between the old and new value: smoothed, not frozen.
    assert!(out > 0.0);
    assert!(out < 1.0);
}

#[test]
fn converges_to_a_held_value() {
    let mut filter = OneEuroFilter::default();
    filter.filter(0.0, DT);
    let mut out = 0.0;
    for _ in 0..120 {
        out = filter.filter(1.0, DT);
    }
    assert!((out - 1.0).abs() < 1e-3);
}

#[test]
fn nan_input_yields_zero() {
    let mut filter = OneEuroFilter::default();
    assert_eq!(filter.filter(f32::NAN, DT), 0.0);
}

#[test]
fn zero_dt_reprimes_instead_of_dividing() {
    let mut filter = OneEuroFilter::default();
    filter.filter(0.5, DT);
    let out = filter.filter(0.9, 0.0);
    assert_eq!(out, 0.9);
    assert!(out.is_finite());
}

#[test]
fn reset_makes_next_sample_pass_through() {
    let mut filter = OneEuroFilter::default();
    filter.filter(0.0, DT);
    filter.filter(0.2, DT);
    filter.reset();
    assert_eq!(filter.filter(0.8, DT), 0.8);
}

#[test]
fn zero_smoothness_tracks_the_input_closely() {
    let mut filter = OneEuroFilter::from_smoothness(0.0);
    filter.filter(0.0, DT);
    let mut out = 0.0;
    for _ in 0..5 {
        out = filter.filter(1.0, DT);
    }
    assert!((out - 1.0).abs() < 0.05);
}
