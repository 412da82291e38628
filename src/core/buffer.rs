//! Per-particle attribute storage.
//!
//! Attributes are kept as parallel arrays so they can be uploaded to the GPU
//! without repacking. Write-once attributes are private and only readable;
//! spring state is exposed to the simulator through `springs_mut`.

use crate::core::constants::*;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

/// Intro-only attributes assigned at layout time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntroLayout {
    /// Position inside the source glyph (the formed doodle).
    pub glyph: Vec3,
    /// Explosion travel direction, unit length.
    pub direction: Vec3,
    /// Ignition delay in seconds, larger further from the glyph origin.
    pub delay: f32,
}

/// Attributes produced by a layout function for one particle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointLayout {
    pub base: Vec3,
    pub seed: f32,
    pub scale: f32,
    pub intro: Option<IntroLayout>,
}

/// Read-only snapshot of one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleAttributes {
    pub base: Vec3,
    pub position: Vec3,
    pub offset: Vec3,
    pub velocity: Vec3,
    pub seed: f32,
    pub scale: f32,
    pub intro: Option<IntroLayout>,
}

/// Mutable spring state handed to the simulator each frame.
pub struct SpringsMut<'a> {
    pub base: &'a [Vec3],
    pub seed: &'a [f32],
    pub position: &'a mut [Vec3],
    pub offset: &'a mut [Vec3],
    pub velocity: &'a mut [Vec3],
}

#[derive(Clone, Debug, Default)]
pub struct PointBuffer {
    base: Vec<Vec3>,
    position: Vec<Vec3>,
    offset: Vec<Vec3>,
    velocity: Vec<Vec3>,
    seed: Vec<f32>,
    scale: Vec<f32>,
    intro: Option<Vec<IntroLayout>>,
}

impl PointBuffer {
    /// Build a buffer of `count` particles. `layout` is called once per index,
    /// in order, with a generator seeded from `rng_seed`.
    ///
    /// If any particle carries intro attributes, all of them must.
    pub fn initialize<F>(count: usize, rng_seed: u64, mut layout: F) -> Self
    where
        F: FnMut(usize, &mut StdRng) -> PointLayout,
    {
        let mut rng = StdRng::seed_from_u64(rng_seed);
        let mut buf = Self {
            base: Vec::with_capacity(count),
            position: Vec::with_capacity(count),
            offset: vec![Vec3::ZERO; count],
            velocity: vec![Vec3::ZERO; count],
            seed: Vec::with_capacity(count),
            scale: Vec::with_capacity(count),
            intro: None,
        };
        let mut intro = Vec::new();
        for i in 0..count {
            let p = layout(i, &mut rng);
            buf.base.push(p.base);
            buf.position.push(p.base);
            buf.seed.push(p.seed);
            buf.scale.push(p.scale);
            if let Some(extra) = p.intro {
                intro.push(extra);
            }
        }
        if !intro.is_empty() {
            assert_eq!(
                intro.len(),
                count,
                "intro attributes must be assigned to every particle"
            );
            buf.intro = Some(intro);
        }
        buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// # Panics
    /// Panics if `index >= len()`.
    pub fn read(&self, index: usize) -> ParticleAttributes {
        ParticleAttributes {
            base: self.base[index],
            position: self.position[index],
            offset: self.offset[index],
            velocity: self.velocity[index],
            seed: self.seed[index],
            scale: self.scale[index],
            intro: self.intro.as_ref().map(|v| v[index]),
        }
    }

    /// # Panics
    /// Panics if `index >= len()`.
    pub fn write_position(&mut self, index: usize, position: Vec3) {
        self.position[index] = position;
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.position
    }

    pub fn offsets(&self) -> &[Vec3] {
        &self.offset
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocity
    }

    pub fn bases(&self) -> &[Vec3] {
        &self.base
    }

    pub fn seeds(&self) -> &[f32] {
        &self.seed
    }

    pub fn scales(&self) -> &[f32] {
        &self.scale
    }

    pub fn intro(&self) -> Option<&[IntroLayout]> {
        self.intro.as_deref()
    }

    pub fn springs_mut(&mut self) -> SpringsMut<'_> {
        SpringsMut {
            base: &self.base,
            seed: &self.seed,
            position: &mut self.position,
            offset: &mut self.offset,
            velocity: &mut self.velocity,
        }
    }
}

/// Uniformly distributed unit vector.
pub fn random_unit_vector(rng: &mut StdRng) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Ambient orbit shell: a rippled spherical band between the field radii.
pub fn field_layout(_index: usize, rng: &mut StdRng) -> PointLayout {
    let radius = FIELD_RADIUS_MIN + rng.gen::<f32>() * FIELD_RADIUS_SPAN;
    let u = rng.gen::<f32>();
    let v = rng.gen::<f32>();
    let theta = u * TAU;
    let phi = (2.0 * v - 1.0).acos();
    let r = radius + (u * 12.0).sin() * FIELD_RADIUS_RIPPLE;
    let base = Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    );
    PointLayout {
        base,
        scale: FIELD_SCALE_MIN + rng.gen::<f32>() * FIELD_SCALE_SPAN,
        seed: rng.gen::<f32>(),
        intro: None,
    }
}

/// Intro rest pose on a thick sphere, paired with the glyph placement for the
/// same index.
pub fn intro_layout(glyph: IntroPlacement, rng: &mut StdRng) -> PointLayout {
    let radius = INTRO_RADIUS_MIN + rng.gen::<f32>() * INTRO_RADIUS_SPAN;
    let base = random_unit_vector(rng) * radius;
    let direction = random_unit_vector(rng);
    PointLayout {
        base,
        scale: INTRO_SCALE_MIN + rng.gen::<f32>() * INTRO_SCALE_SPAN,
        seed: rng.gen::<f32>(),
        intro: Some(IntroLayout {
            glyph: glyph.position,
            direction,
            delay: glyph.delay,
        }),
    }
}

/// Glyph-space position and ignition delay for one intro particle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntroPlacement {
    pub position: Vec3,
    pub delay: f32,
}

/// Flat ring used when no glyph samples are available.
pub fn annulus_placement(rng: &mut StdRng) -> IntroPlacement {
    let angle = rng.gen::<f32>() * PI * 2.0;
    let radius = 0.35 + rng.gen::<f32>() * 0.45;
    IntroPlacement {
        position: Vec3::new(
            angle.cos() * radius,
            angle.sin() * radius,
            (rng.gen::<f32>() - 0.5) * GLYPH_Z_JITTER,
        ),
        delay: rng.gen::<f32>() * 0.3,
    }
}
