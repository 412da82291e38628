// Host-side tests for the ambient field simulator.

use glam::{Vec2, Vec3};
use orbit_field::core::*;

const DT: f32 = 1.0 / 60.0;

fn idle_pointer() -> PointerState {
    PointerState {
        target_point: Vec3::from_array(constants::NEUTRAL_CURSOR),
        current_point: Vec3::from_array(constants::NEUTRAL_CURSOR),
        is_interacting: false,
        is_dragging: false,
        active_pointer_id: None,
        presence: 0.0,
    }
}

fn shell(profile: MotionProfile) -> FieldSimulator {
    FieldSimulator::with_field_layout(constants::FIELD_COUNT, 7, profile).expect("non-empty")
}

fn max_offset(sim: &FieldSimulator) -> f32 {
    sim.buffer()
        .offsets()
        .iter()
        .map(|o| o.length())
        .fold(0.0, f32::max)
}

/// Viewport-center press lands on the hollow core; this one lands on the
/// shell band in the `z = 0` plane.
const RIM: Vec2 = Vec2::new(400.0 + 170.0, 300.0);

fn field_pointer(profile: &MotionProfile) -> PointerController {
    let mut camera = Camera::looking_at_origin(3.4, 46.0, 0.1, 40.0);
    camera.set_viewport(800.0, 600.0);
    let mut pointer =
        PointerController::new(camera, HitRegion::FullViewport, MissPolicy::default(), profile);
    pointer.set_viewport(800.0, 600.0);
    pointer
}

fn assert_bounded(sim: &FieldSimulator, profile: &MotionProfile) {
    let b = sim.buffer();
    for i in 0..b.len() {
        let a = b.read(i);
        assert!(
            a.position.is_finite() && a.velocity.is_finite() && a.offset.is_finite(),
            "particle {} not finite",
            i
        );
        assert!(a.velocity.length() <= profile.max_velocity + 1e-4);
        assert!(a.offset.length() <= profile.max_offset + 1e-4);
    }
}

/// A few particles clustered around the origin, a few far away.
fn cluster_layout(index: usize, _rng: &mut rand::rngs::StdRng) -> PointLayout {
    let base = match index {
        0 => Vec3::new(0.1, 0.0, 0.0),
        1 => Vec3::new(0.0, -0.2, 0.0),
        2 => Vec3::new(0.0, 0.0, 0.3),
        3 => Vec3::new(0.9, 0.0, 0.0),
        _ => Vec3::new(0.0, 1.5, 0.5),
    };
    PointLayout {
        base,
        seed: 0.5,
        scale: 1.0,
        intro: None,
    }
}

#[test]
fn idle_field_settles_to_rest() {
    let mut sim = shell(MotionProfile::standard());
    assert_eq!(sim.buffer().len(), 4800);
    let pointer = idle_pointer();
    for frame in 0..300 {
        sim.step(DT, frame as f32 * DT, &pointer).unwrap();
    }
    assert!(max_offset(&sim) < 1e-3, "offset {}", max_offset(&sim));
}

#[test]
fn impact_kicks_only_particles_inside_radius() {
    let buffer = PointBuffer::initialize(5, 1, cluster_layout);
    let mut sim = FieldSimulator::new(buffer, MotionProfile::standard(), 3).unwrap();
    sim.apply_impact(ImpactEvent::new(Vec3::ZERO));

    let b = sim.buffer();
    for i in 0..3 {
        let a = b.read(i);
        assert!(a.velocity.length() > 0.0, "particle {} not kicked", i);
        assert!(
            a.velocity.dot(a.position) > 0.0,
            "particle {} kicked inward",
            i
        );
    }
    for i in 3..5 {
        assert_eq!(b.read(i).velocity, Vec3::ZERO);
    }
    let impact = sim.impact().unwrap();
    assert_eq!(impact.strength, 1.0);
}

#[test]
fn impact_on_shell_particle_is_outward_and_bounded() {
    let mut sim = shell(MotionProfile::standard());
    let target = sim.buffer().positions()[0];
    sim.apply_impact(ImpactEvent::new(target + Vec3::new(0.05, 0.0, 0.0)));
    let max_v = sim.profile().max_velocity;
    let kicked = sim
        .buffer()
        .velocities()
        .iter()
        .filter(|v| v.length() > 0.0)
        .count();
    assert!(kicked >= 1);
    assert!(sim
        .buffer()
        .velocities()
        .iter()
        .all(|v| v.length() <= max_v + 1e-4));
}

#[test]
fn repeated_impacts_stay_bounded() {
    let profile = MotionProfile::standard();
    let mut sim = shell(profile);
    let pointer = idle_pointer();
    let origin = sim.buffer().positions()[10];
    for frame in 0..240 {
        if frame % 3 == 0 {
            sim.apply_impact(ImpactEvent::new(origin));
        }
        sim.step(DT, frame as f32 * DT, &pointer).unwrap();
        assert_bounded(&sim, &profile);
    }
}

#[test]
fn dragging_with_stacked_impacts_stays_bounded() {
    for profile in [MotionProfile::standard(), MotionProfile::reduced()] {
        let mut sim = shell(profile);
        let mut pointer = field_pointer(&profile);
        assert!(pointer.on_pointer_down(1, RIM).is_some());

        let mut elapsed = 0.0;
        for frame in 0..600 {
            // Wander along the rim while the drag is held.
            let wobble = (frame as f32 * 0.1).sin() * 20.0;
            pointer.on_pointer_move(1, RIM + Vec2::new(wobble, wobble * 0.5));
            if frame % 2 == 0 {
                let hit = pointer.state().target_point;
                sim.apply_impact(ImpactEvent::new(hit));
            }
            // Every so often a backgrounded tab resumes.
            let delta = if frame % 97 == 0 { 5.0 } else { DT };
            elapsed += delta;
            sim.frame(delta, elapsed, &mut pointer).unwrap();
            assert!(pointer.state().is_dragging);
            assert_bounded(&sim, &profile);
        }
    }
}

#[test]
fn press_on_shell_rim_kicks_particles() {
    let profile = MotionProfile::standard();
    let mut sim = shell(profile);
    let mut pointer = field_pointer(&profile);
    let impact = pointer.on_pointer_down(1, RIM).expect("rim press hits the plane");
    let r = impact.position.length();
    let outer = constants::FIELD_RADIUS_MIN + constants::FIELD_RADIUS_SPAN;
    assert!(
        r > constants::FIELD_RADIUS_MIN && r < outer,
        "rim hit at radius {}",
        r
    );

    sim.frame(DT, 0.0, &mut pointer).unwrap();
    let kicked = sim
        .buffer()
        .velocities()
        .iter()
        .filter(|v| v.length() > 0.0)
        .count();
    assert!(kicked > 0, "no shell particle near the rim hit");
    assert!(max_offset(&sim) > 0.0);
}

#[test]
fn offsets_decay_after_impact() {
    let mut sim = shell(MotionProfile::standard());
    let pointer = idle_pointer();
    let origin = sim.buffer().positions()[42];
    sim.apply_impact(ImpactEvent::new(origin));
    sim.step(DT, 0.0, &pointer).unwrap();
    assert!(max_offset(&sim) > 0.0);
    for frame in 1..600 {
        sim.step(DT, frame as f32 * DT, &pointer).unwrap();
    }
    assert!(max_offset(&sim) < 1e-3);
    assert!(sim.impact().is_none(), "impact glow should have decayed");
}

#[test]
fn rest_state_is_idempotent() {
    let mut sim = shell(MotionProfile::standard());
    let pointer = idle_pointer();
    sim.step(DT, 2.0, &pointer).unwrap();
    let first = sim.buffer().positions().to_vec();
    sim.step(DT, 2.0, &pointer).unwrap();
    assert_eq!(first, sim.buffer().positions());
}

#[test]
fn oversized_delta_is_clamped() {
    assert_eq!(clamp_delta(1.0), constants::MAX_FRAME_DELTA);
    assert_eq!(clamp_delta(-0.1), 0.0);
    assert_eq!(clamp_delta(f32::NAN), 0.0);
    assert_eq!(clamp_delta(0.016), 0.016);

    // A backgrounded tab resuming with a huge delta must not blow up.
    let mut sim = shell(MotionProfile::standard());
    let pointer = idle_pointer();
    let origin = sim.buffer().positions()[5];
    sim.apply_impact(ImpactEvent::new(origin));
    sim.step(30.0, 30.0, &pointer).unwrap();
    assert!(sim.buffer().positions().iter().all(|p| p.is_finite()));
}

#[test]
fn non_finite_elapsed_is_reported() {
    let mut sim = shell(MotionProfile::standard());
    let pointer = idle_pointer();
    let err = sim.step(DT, f32::NAN, &pointer).unwrap_err();
    assert!(matches!(err, FieldError::NonFinite { index: 0, .. }));
}

#[test]
fn empty_buffer_is_rejected() {
    let buffer = PointBuffer::initialize(0, 1, cluster_layout);
    assert_eq!(
        FieldSimulator::new(buffer, MotionProfile::standard(), 1).err(),
        Some(FieldError::EmptyBuffer)
    );
}

#[test]
fn cursor_repels_nearby_points() {
    let profile = MotionProfile::standard();
    let pos = Vec3::new(0.5, 0.0, 0.0);
    let cursor = Vec3::new(0.3, 0.0, 0.0);
    let d = interaction_displacement(pos, cursor, 1.0, false, &profile);
    assert!(d.x > 0.0, "expected push away from cursor, got {:?}", d);

    let far = interaction_displacement(pos, Vec3::new(3.0, 0.0, 0.0), 1.0, false, &profile);
    assert_eq!(far, Vec3::ZERO);

    let absent = interaction_displacement(pos, cursor, 0.0, false, &profile);
    assert_eq!(absent, Vec3::ZERO);
}

#[test]
fn dragging_pulls_close_points_toward_cursor() {
    let profile = MotionProfile::standard();
    let pos = Vec3::new(0.35, 0.0, 0.0);
    let cursor = Vec3::new(0.3, 0.0, 0.0);
    let idle = interaction_displacement(pos, cursor, 1.0, false, &profile);
    let drag = interaction_displacement(pos, cursor, 1.0, true, &profile);
    assert!(drag.x < idle.x);
}

#[test]
fn frame_drains_queued_impact() {
    let profile = MotionProfile::standard();
    let mut sim = shell(profile);
    let mut pointer = field_pointer(&profile);
    assert!(pointer.on_pointer_down(1, Vec2::new(400.0, 300.0)).is_some());
    sim.frame(DT, 0.0, &mut pointer).unwrap();
    assert!(sim.impact().is_some());
    assert!(pointer.take_impact().is_none());
}
