//! Ambient orbit field simulator.
//!
//! Each frame the effective rest position of every particle is rebuilt from
//! its immutable base (orbit, breathing, noise, pointer displacement) and a
//! damped spring carries the impact-driven offset back to zero.

use crate::core::buffer::{field_layout, PointBuffer};
use crate::core::constants::*;
use crate::core::error::FieldError;
use crate::core::math::{mix, smoothstep};
use crate::core::noise::ValueNoise;
use crate::core::pointer::{ImpactEvent, PointerController, PointerState};
use crate::core::profile::MotionProfile;
use glam::Vec3;

pub struct FieldSimulator {
    buffer: PointBuffer,
    profile: MotionProfile,
    noise: ValueNoise,
    /// Latest noise sample per particle, used by the renderer for tinting.
    noise_samples: Vec<f32>,
    impact: Option<ImpactEvent>,
}

impl FieldSimulator {
    pub fn new(
        buffer: PointBuffer,
        profile: MotionProfile,
        noise_seed: u32,
    ) -> Result<Self, FieldError> {
        if buffer.is_empty() {
            return Err(FieldError::EmptyBuffer);
        }
        let n = buffer.len();
        log::info!("[field] {} particles, reduced_motion={}", n, profile.reduced);
        Ok(Self {
            buffer,
            profile,
            noise: ValueNoise::new(noise_seed),
            noise_samples: vec![0.5; n],
            impact: None,
        })
    }

    /// Standard orbit shell of `count` particles.
    pub fn with_field_layout(
        count: usize,
        rng_seed: u64,
        profile: MotionProfile,
    ) -> Result<Self, FieldError> {
        let buffer = PointBuffer::initialize(count, rng_seed, field_layout);
        Self::new(buffer, profile, rng_seed as u32)
    }

    pub fn buffer(&self) -> &PointBuffer {
        &self.buffer
    }

    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    pub fn noise_samples(&self) -> &[f32] {
        &self.noise_samples
    }

    pub fn impact(&self) -> Option<&ImpactEvent> {
        self.impact.as_ref()
    }

    /// Kick particles within the impact radius outward, once, and keep the
    /// event around for its decaying glow. Replaces any earlier impact.
    pub fn apply_impact(&mut self, impact: ImpactEvent) {
        let kick = self.profile.impact_kick;
        let max_velocity = self.profile.max_velocity;
        let springs = self.buffer.springs_mut();
        let mut kicked = 0usize;
        for (position, velocity) in springs.position.iter().zip(springs.velocity.iter_mut()) {
            let delta = *position - impact.position;
            let dist = delta.length();
            if dist > impact.radius {
                continue;
            }
            let falloff = 1.0 - dist / impact.radius;
            let dir = if dist < 1e-3 {
                position.try_normalize().unwrap_or(Vec3::Z)
            } else {
                delta / dist
            };
            *velocity = (*velocity + dir * kick * falloff).clamp_length_max(max_velocity);
            kicked += 1;
        }
        log::debug!("[field] impact kicked {} particles", kicked);
        self.impact = Some(impact);
    }

    /// Full frame against a live pointer: ease the cursor, apply any queued
    /// impact, then integrate.
    pub fn frame(
        &mut self,
        delta: f32,
        elapsed: f32,
        pointer: &mut PointerController,
    ) -> Result<(), FieldError> {
        let delta = clamp_delta(delta);
        pointer.update(delta);
        if let Some(impact) = pointer.take_impact() {
            self.apply_impact(impact);
        }
        self.step(delta, elapsed, pointer.state())
    }

    /// Advance one frame. `delta` is clamped to `MAX_FRAME_DELTA`.
    ///
    /// Returns an error if any particle state became non-finite; the caller
    /// should tear the instance down.
    pub fn step(
        &mut self,
        delta: f32,
        elapsed: f32,
        pointer: &PointerState,
    ) -> Result<(), FieldError> {
        let delta = clamp_delta(delta);

        if let Some(impact) = self.impact.as_mut() {
            impact.strength = (impact.strength - delta * IMPACT_DECAY_PER_SEC).max(0.0);
        }
        if self.impact.is_some_and(|i| i.strength <= 0.0) {
            self.impact = None;
        }

        let p = self.profile;
        let noise = self.noise;
        let cursor = pointer.current_point;
        let presence = pointer.presence;
        let dragging = pointer.is_dragging;
        let springs = self.buffer.springs_mut();

        for i in 0..springs.base.len() {
            let seed = springs.seed[i];

            // Orbit about Y, slower for low seeds.
            let angle = elapsed * mix(ORBIT_SPEED_MIN, ORBIT_SPEED_MAX, seed) * p.orbit_scale;
            let (s, c) = angle.sin_cos();
            let b = springs.base[i];
            let mut pos = Vec3::new(c * b.x - s * b.z, b.y, s * b.x + c * b.z);

            // Breathing.
            let breath = (elapsed * BREATH_RATE + seed * std::f32::consts::TAU).sin();
            pos *= 1.0 + breath * BREATH_AMPLITUDE;

            // Radial noise jitter.
            let drift = Vec3::splat(elapsed * NOISE_RATE + seed * NOISE_SEED_SCALE);
            let n = noise.sample(pos * NOISE_FREQUENCY + drift);
            self.noise_samples[i] = n;
            let radial = pos.try_normalize().unwrap_or(Vec3::Z);
            pos += radial * (n - 0.5) * p.noise_strength;

            pos += interaction_displacement(pos, cursor, presence, dragging, &p);

            // Spring-damper toward the effective base.
            let mut offset = springs.offset[i];
            let mut velocity = springs.velocity[i];
            velocity += -offset * p.spring * delta;
            velocity *= p.damping;
            velocity = velocity.clamp_length_max(p.max_velocity);
            offset = (offset + velocity * delta).clamp_length_max(p.max_offset);

            let position = pos + offset;
            if !position.is_finite() || !offset.is_finite() || !velocity.is_finite() {
                return Err(FieldError::NonFinite {
                    index: i,
                    what: "particle state",
                });
            }
            springs.offset[i] = offset;
            springs.velocity[i] = velocity;
            springs.position[i] = position;
        }
        Ok(())
    }
}

/// Clamp a frame delta into `[0, MAX_FRAME_DELTA]`. Non-finite deltas count as zero.
pub fn clamp_delta(delta: f32) -> f32 {
    if !delta.is_finite() || delta < 0.0 {
        return 0.0;
    }
    if delta > MAX_FRAME_DELTA {
        log::debug!("[field] clamped frame delta {:.3}s", delta);
        return MAX_FRAME_DELTA;
    }
    delta
}

/// Pointer-driven displacement of one point: radial repulsion with a tangential
/// swirl inside the repel radius, plus attraction toward the cursor while dragging.
pub fn interaction_displacement(
    pos: Vec3,
    cursor: Vec3,
    presence: f32,
    dragging: bool,
    profile: &MotionProfile,
) -> Vec3 {
    if presence <= 0.0 {
        return Vec3::ZERO;
    }
    let away = pos - cursor;
    let dist = away.length();
    let influence = smoothstep(REPEL_RADIUS_OUTER, REPEL_RADIUS_INNER, dist) * presence;
    if influence <= 0.0 {
        return Vec3::ZERO;
    }
    let dir = away.try_normalize().unwrap_or(Vec3::Z);
    let tangent = dir.cross(Vec3::Z).try_normalize().unwrap_or(Vec3::X);
    let mut d = dir * influence * profile.repel_force + tangent * influence * profile.swirl_force;
    if dragging {
        let pull = smoothstep(ATTRACT_RADIUS, 0.0, dist) * presence;
        d += -away * pull * profile.attract_force;
    }
    d
}
