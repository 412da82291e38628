// Host-side tests for constants and their relationships.
// The web constants are wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod core_constants {
    include!("../src/core/constants.rs");
}

use constants::*;
use core_constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn phase_thresholds_are_strictly_increasing() {
    let thresholds = [
        FORMING_TIME,
        BLINK_TIME,
        SCATTER_TIME,
        LOCK_TIME,
        HANDOFF_TIME,
        COMPLETE_TIME,
    ];
    assert!(thresholds[0] > 0.0);
    assert!(thresholds.windows(2).all(|w| w[0] < w[1]));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn wink_window_straddles_blink_and_ends_before_lock() {
    assert!(WINK_LEAD > 0.0 && WINK_TAIL > 0.0);
    assert!(BLINK_TIME - WINK_LEAD > FORMING_TIME);
    assert!(BLINK_TIME + WINK_TAIL < LOCK_TIME);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn pointer_radii_are_ordered() {
    assert!(REPEL_RADIUS_INNER < REPEL_RADIUS_OUTER);
    assert!(ATTRACT_RADIUS < REPEL_RADIUS_OUTER);
    assert!(IMPACT_RADIUS > 0.0);
    assert!(IMPACT_DECAY_PER_SEC > 0.0);
    // The neutral cursor sits outside the shell so it exerts no force.
    let neutral = NEUTRAL_CURSOR[2];
    assert!(neutral - (FIELD_RADIUS_MIN + FIELD_RADIUS_SPAN) > REPEL_RADIUS_OUTER);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn orbit_speeds_and_layout_spans_are_positive() {
    assert!(ORBIT_SPEED_MIN > 0.0 && ORBIT_SPEED_MIN < ORBIT_SPEED_MAX);
    assert!(FIELD_RADIUS_SPAN > 0.0 && FIELD_SCALE_SPAN > 0.0);
    assert!(INTRO_RADIUS_SPAN > 0.0 && INTRO_SCALE_SPAN > 0.0);
    assert!(MAX_FRAME_DELTA > 0.0 && MAX_FRAME_DELTA < 0.1);
    assert!(ESCAPE_SEED_THRESHOLD > 0.0 && ESCAPE_SEED_THRESHOLD < 1.0);
    assert_eq!(ALIGNMENT_SETTLE_FRAMES, 2);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn cameras_see_their_clouds() {
    // Field shell fits between the near and far planes.
    assert!(FIELD_CAMERA_Z - 1.0 > FIELD_ZNEAR);
    assert!(FIELD_CAMERA_Z + 1.0 < FIELD_ZFAR);
    // Intro explosion reaches ~25 units out; the far plane must cover it.
    assert!(INTRO_CAMERA_Z + 25.0 < INTRO_ZFAR);
    assert!(FIELD_FOV_DEG > 0.0 && INTRO_FOV_DEG < 180.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn colors_and_pixel_ratio_are_sane() {
    for c in FIELD_COLOR.iter().chain(INTRO_COLOR.iter()) {
        assert!((0.0..=1.0).contains(c));
    }
    assert!(MAX_PIXEL_RATIO >= 1.0);
    assert!(FIELD_POINT_SIZE > 0.0 && INTRO_POINT_SIZE > 0.0);
    assert!(FIELD_DEPTH_FADE_BASE - (FIELD_CAMERA_Z - 1.0) * FIELD_DEPTH_FADE_SLOPE > 0.0);
}

#[test]
fn marker_classes_are_distinct() {
    let classes = [CLASS_SHOW_DOODLE, CLASS_BLINK, CLASS_SCATTER, CLASS_LOCK];
    for (i, a) in classes.iter().enumerate() {
        for b in &classes[i + 1..] {
            assert_ne!(a, b);
        }
    }
    for var in [VAR_INTRO_X, VAR_INTRO_Y, VAR_INTRO_SCALE] {
        assert!(var.starts_with("--"));
    }
}
