//! Glyph rasterization for intro particle placement.
//!
//! The doodle is described as a handful of stroked/filled primitives in unit
//! square coordinates (y down, like a 2D canvas) and rasterized by distance
//! coverage. Each covered pixel is a candidate spawn sample.

use crate::core::buffer::{annulus_placement, intro_layout, IntroPlacement, PointBuffer};
use crate::core::constants::*;
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::Rng;

// Anti-aliased edges count as covered up to half a pixel out.
const EDGE_SLACK_PX: f32 = 0.5;
const CURVE_SEGMENTS: usize = 24;

#[derive(Clone, Debug, PartialEq)]
pub enum GlyphShape {
    Ring {
        center: Vec2,
        radius: f32,
        width_px: f32,
    },
    Dot {
        center: Vec2,
        radius: f32,
    },
    Quadratic {
        from: Vec2,
        ctrl: Vec2,
        to: Vec2,
        width_px: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub shapes: Vec<GlyphShape>,
    /// Ignition origin in unit coordinates; particles near it ignite first.
    pub origin: Vec2,
}

impl Glyph {
    /// Smiley doodle: head ring, two eyes and a mouth curve.
    pub fn doodle() -> Self {
        Self {
            shapes: vec![
                GlyphShape::Ring {
                    center: Vec2::new(0.5, 0.5),
                    radius: 0.34,
                    width_px: 10.0,
                },
                GlyphShape::Dot {
                    center: Vec2::new(0.42, 0.5),
                    radius: 0.03,
                },
                GlyphShape::Dot {
                    center: Vec2::new(0.58, 0.5),
                    radius: 0.03,
                },
                GlyphShape::Quadratic {
                    from: Vec2::new(0.4, 0.67),
                    ctrl: Vec2::new(0.5, 0.72),
                    to: Vec2::new(0.6, 0.67),
                    width_px: 10.0,
                },
            ],
            origin: Vec2::new(0.6, 0.5),
        }
    }

    pub fn rasterize(&self, size: usize) -> GlyphRaster {
        let s = size as f32;
        let polylines: Vec<Option<Vec<Vec2>>> = self
            .shapes
            .iter()
            .map(|shape| match shape {
                GlyphShape::Quadratic { from, ctrl, to, .. } => Some(
                    (0..=CURVE_SEGMENTS)
                        .map(|k| {
                            let t = k as f32 / CURVE_SEGMENTS as f32;
                            let a = from.lerp(*ctrl, t);
                            let b = ctrl.lerp(*to, t);
                            a.lerp(b, t) * s
                        })
                        .collect(),
                ),
                _ => None,
            })
            .collect();

        let mut samples = Vec::new();
        for y in 0..size {
            for x in 0..size {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let covered = self
                    .shapes
                    .iter()
                    .zip(&polylines)
                    .any(|(shape, line)| covers(shape, line.as_deref(), p, s));
                if covered {
                    samples.push([x as u16, y as u16]);
                }
            }
        }
        GlyphRaster {
            size,
            origin: self.origin * s,
            samples,
        }
    }
}

fn covers(shape: &GlyphShape, polyline: Option<&[Vec2]>, p: Vec2, size: f32) -> bool {
    match shape {
        GlyphShape::Ring {
            center,
            radius,
            width_px,
        } => {
            let d = (p.distance(*center * size) - radius * size).abs();
            d <= width_px * 0.5 + EDGE_SLACK_PX
        }
        GlyphShape::Dot { center, radius } => {
            p.distance(*center * size) <= radius * size + EDGE_SLACK_PX
        }
        GlyphShape::Quadratic { width_px, .. } => polyline.is_some_and(|pts| {
            pts.windows(2)
                .any(|seg| segment_distance(p, seg[0], seg[1]) <= width_px * 0.5 + EDGE_SLACK_PX)
        }),
    }
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Covered pixels of a rasterized glyph.
#[derive(Clone, Debug, Default)]
pub struct GlyphRaster {
    pub size: usize,
    pub origin: Vec2,
    pub samples: Vec<[u16; 2]>,
}

impl GlyphRaster {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Pick a random covered pixel and map it into glyph space (y up, centered,
    /// scaled by `GLYPH_WORLD_SCALE`). Returns `None` when nothing is covered.
    pub fn place(&self, rng: &mut StdRng) -> Option<IntroPlacement> {
        if self.samples.is_empty() || self.size == 0 {
            return None;
        }
        let [px, py] = self.samples[rng.gen_range(0..self.samples.len())];
        let s = self.size as f32;
        let (px, py) = (px as f32, py as f32);
        let nx = (px / s - 0.5) * 2.0;
        let ny = (0.5 - py / s) * 2.0;
        let z = (rng.gen::<f32>() - 0.5) * GLYPH_Z_JITTER;
        let max_dist = Vec2::splat(s * 0.5).length();
        let dist = Vec2::new(px, py).distance(self.origin);
        let delay = (dist / max_dist) * GLYPH_DELAY_SPAN + rng.gen::<f32>() * GLYPH_DELAY_JITTER;
        Some(IntroPlacement {
            position: Vec3::new(nx * GLYPH_WORLD_SCALE, ny * GLYPH_WORLD_SCALE, z),
            delay,
        })
    }
}

/// Build the intro particle buffer from a glyph raster, falling back to a flat
/// annulus when the raster is missing or empty.
pub fn intro_buffer(count: usize, rng_seed: u64, raster: Option<&GlyphRaster>) -> PointBuffer {
    let raster = raster.filter(|r| !r.is_empty());
    if raster.is_none() {
        log::warn!("[intro] glyph raster unavailable; using annulus placement");
    }
    PointBuffer::initialize(count, rng_seed, |_, rng| {
        let placement = raster
            .and_then(|r| r.place(rng))
            .unwrap_or_else(|| annulus_placement(rng));
        intro_layout(placement, rng)
    })
}
