//! Deterministic 3D value noise.
//!
//! Lattice values come from a sine hash, trilinearly blended with a smoothstep
//! fade. Output lies in `[0, 1)`. Two instances with the same seed always agree.

use glam::Vec3;

const HASH_DOT: Vec3 = Vec3::new(127.1, 311.7, 74.7);
const HASH_SCALE: f32 = 43758.5453;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ValueNoise {
    lattice_offset: Vec3,
}

impl ValueNoise {
    pub fn new(seed: u32) -> Self {
        // Spread the seed across lattice space; integer offsets keep the cells aligned.
        let s = seed as f32;
        Self {
            lattice_offset: Vec3::new(
                (s * 17.0) % 1024.0,
                (s * 31.0) % 1024.0,
                (s * 59.0) % 1024.0,
            )
            .floor(),
        }
    }

    #[inline]
    fn hash(&self, cell: Vec3) -> f32 {
        let h = ((cell + self.lattice_offset).dot(HASH_DOT)).sin() * HASH_SCALE;
        h - h.floor()
    }

    pub fn sample(&self, p: Vec3) -> f32 {
        let i = p.floor();
        let f = p - i;
        let f = f * f * (Vec3::splat(3.0) - 2.0 * f);

        let c000 = self.hash(i);
        let c100 = self.hash(i + Vec3::X);
        let c010 = self.hash(i + Vec3::Y);
        let c110 = self.hash(i + Vec3::new(1.0, 1.0, 0.0));
        let c001 = self.hash(i + Vec3::Z);
        let c101 = self.hash(i + Vec3::new(1.0, 0.0, 1.0));
        let c011 = self.hash(i + Vec3::new(0.0, 1.0, 1.0));
        let c111 = self.hash(i + Vec3::ONE);

        let x00 = lerp(c000, c100, f.x);
        let x10 = lerp(c010, c110, f.x);
        let x01 = lerp(c001, c101, f.x);
        let x11 = lerp(c011, c111, f.x);
        let y0 = lerp(x00, x10, f.y);
        let y1 = lerp(x01, x11, f.y);
        lerp(y0, y1, f.z).clamp(0.0, 1.0 - f32::EPSILON)
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
