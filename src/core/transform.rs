//! Per-point intro transform.
//!
//! `transform_point` is the CPU mirror of `shaders/intro.wgsl`: a pure function
//! of one particle's immutable attributes and the frame's uniforms. It never
//! reads another particle, so the whole pass is an order-independent map.

use crate::core::buffer::PointBuffer;
use crate::core::constants::{ESCAPE_SEED_THRESHOLD, SCATTER_TIME};
use crate::core::math::{ease_in_out_cubic, ease_out_cubic, mix, rotate_y, rotate_z, smoothstep};
use glam::{Mat4, Vec3};

/// Immutable per-particle intro attributes, laid out for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IntroPoint {
    pub glyph: Vec3,
    pub base: Vec3,
    pub direction: Vec3,
    pub seed: f32,
    pub scale: f32,
    pub delay: f32,
}

/// Frame-global values shared by every particle. Built once per frame and
/// passed by value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineUniforms {
    pub time: f32,
    pub tilt: f32,
    pub yaw: f32,
    pub scatter: f32,
    pub point_size: f32,
    pub color: Vec3,
    pub model_view: Mat4,
    /// Seeds at or above this escape instead of regrouping.
    pub escape_threshold: f32,
}

impl Default for TimelineUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            tilt: 0.0,
            yaw: 0.0,
            scatter: SCATTER_TIME,
            point_size: 19.0,
            color: Vec3::ONE,
            model_view: Mat4::IDENTITY,
            escape_threshold: ESCAPE_SEED_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointOutput {
    /// Object-space position.
    pub position: Vec3,
    /// Distance in front of the camera along the view axis.
    pub depth: f32,
    /// Point size in pixels.
    pub size: f32,
    pub alpha: f32,
    /// Ignition glow in `[0, 1]`.
    pub glow: f32,
    pub color: Vec3,
}

/// Eased sub-window progress values for one particle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseProgress {
    pub ignite: f32,
    pub burst: f32,
    pub spread: f32,
    pub regroup: f32,
    pub settle: f32,
}

impl PhaseProgress {
    /// Windows overlap on purpose so one motion hands over to the next smoothly.
    pub fn at(t: f32) -> Self {
        Self {
            ignite: smoothstep(0.0, 0.7, t),
            burst: ease_out_cubic(smoothstep(0.0, 0.45, t)),
            spread: ease_out_cubic(smoothstep(0.18, 0.75, t)),
            regroup: ease_in_out_cubic(smoothstep(0.55, 1.25, t)),
            settle: ease_in_out_cubic(smoothstep(1.0, 1.6, t)),
        }
    }
}

const WINK_KICK_DIR: Vec3 = Vec3::new(0.8, 0.2, 0.1);
const MIN_DEPTH: f32 = 1e-3;

/// Local clock of a particle: zero until the wavefront reaches it.
#[inline]
pub fn local_time(u: &TimelineUniforms, delay: f32) -> f32 {
    (u.time - u.scatter - delay).max(0.0)
}

pub fn transform_point(p: &IntroPoint, u: &TimelineUniforms) -> PointOutput {
    let t = local_time(u, p.delay);
    let pr = PhaseProgress::at(t);
    let variance = mix(0.85, 1.15, p.seed);

    let unwind = 1.0 - pr.regroup;
    let glyph = rotate_y(rotate_z(p.glyph, u.tilt * unwind), u.yaw * unwind);

    let outward = (glyph + Vec3::splat(0.001)).normalize_or_zero();
    let dir = p.direction.lerp(outward, 0.35).try_normalize().unwrap_or(p.direction);

    let explode_radius = mix(0.02, 6.4, pr.burst);
    let spread_radius = mix(6.4, 10.2, pr.spread);
    let travel = mix(explode_radius, spread_radius, pr.spread);
    let explosion = dir * travel * variance;

    let mut pos = glyph.lerp(explosion, pr.burst);
    pos = pos.lerp(explosion, pr.spread);

    let escape = if p.seed >= u.escape_threshold { 1.0 } else { 0.0 };
    let returning = 1.0 - escape;
    let escape_drift = smoothstep(0.8, 2.2, t);
    let escape_pos = explosion + dir * (spread_radius * 0.9 + escape_drift * 4.0);

    let regroup_target = escape_pos.lerp(p.base, returning);
    pos = pos.lerp(regroup_target, pr.regroup);
    pos = pos.lerp(p.base, pr.settle * returning);

    let orbit_scale = mix(1.85, 1.0, pr.settle);
    pos *= mix(1.0, orbit_scale, returning);

    let swirl_axis = dir.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
    let swirl = unwind * (t * 1.2 + p.seed * 8.0).sin() * 0.35;
    pos += swirl_axis * swirl;

    let jitter = (t * 1.1 + p.seed * 10.0).sin() * 0.025;
    pos += (pos + Vec3::splat(0.001)).normalize_or_zero() * jitter * unwind;

    let wink_kick = (1.0 - p.delay) * smoothstep(0.0, 0.5, t) * unwind;
    pos += WINK_KICK_DIR.normalize() * wink_kick * 0.3;

    let depth = (-u.model_view.transform_point3(pos).z).max(MIN_DEPTH);
    let depth_fade = (2.4 - depth * 0.2).clamp(0.0, 1.0);
    let appear = smoothstep(-0.1, 0.35, t);
    let burst_mask = smoothstep(0.0, 0.3, t);
    let alpha = (depth_fade * appear * 1.6).min(1.0) * burst_mask;
    let size_boost = mix(1.5, 1.0, pr.settle);

    PointOutput {
        position: pos,
        depth,
        size: u.point_size * p.scale * size_boost / depth,
        alpha,
        glow: pr.ignite,
        color: u.color * (1.5 + 0.7 * pr.ignite),
    }
}

/// Run the transform over every particle.
#[cfg(not(feature = "parallel"))]
pub fn transform_all(points: &[IntroPoint], u: &TimelineUniforms) -> Vec<PointOutput> {
    points.iter().map(|p| transform_point(p, u)).collect()
}

/// Run the transform over every particle.
#[cfg(feature = "parallel")]
pub fn transform_all(points: &[IntroPoint], u: &TimelineUniforms) -> Vec<PointOutput> {
    use rayon::prelude::*;
    points.par_iter().map(|p| transform_point(p, u)).collect()
}

/// Gather intro attributes out of a buffer built by `glyph::intro_buffer`.
/// Returns `None` if the buffer carries no intro attributes.
pub fn intro_points(buffer: &PointBuffer) -> Option<Vec<IntroPoint>> {
    let intro = buffer.intro()?;
    Some(
        intro
            .iter()
            .zip(buffer.bases())
            .zip(buffer.seeds().iter().zip(buffer.scales()))
            .map(|((layout, base), (seed, scale))| IntroPoint {
                glyph: layout.glyph,
                base: *base,
                direction: layout.direction,
                seed: *seed,
                scale: *scale,
                delay: layout.delay,
            })
            .collect(),
    )
}
