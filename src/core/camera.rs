//! Perspective camera and screen-space ray casting.
//!
//! These types avoid platform-specific APIs; the web frontend feeds them the
//! canvas size and uses them both for rendering matrices and pointer picking.

use glam::{Mat4, Vec3, Vec4};

/// Right-handed camera with perspective projection (depth range 0..1).
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera at `(0, 0, eye_z)` looking at the origin.
    pub fn looking_at_origin(eye_z: f32, fovy_degrees: f32, znear: f32, zfar: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, eye_z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: fovy_degrees.to_radians(),
            znear,
            zfar,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// World-space ray through pixel `(sx, sy)` of a `width` x `height` surface.
    ///
    /// Returns `None` for a degenerate surface.
    pub fn screen_ray(&self, sx: f32, sy: f32, width: f32, height: f32) -> Option<Ray> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let ndc_x = (2.0 * sx / width) - 1.0;
        let ndc_y = 1.0 - (2.0 * sy / height);
        let inv = (self.projection_matrix() * self.view_matrix()).inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if p_far.w.abs() < f32::EPSILON {
            return None;
        }
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let dir = (p1 - self.eye).try_normalize()?;
        Some(Ray {
            origin: self.eye,
            dir,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Intersect with the plane `dot(normal, p) == offset`. Hits behind the
    /// origin and rays parallel to the plane return `None`.
    pub fn intersect_plane(&self, normal: Vec3, offset: f32) -> Option<Vec3> {
        let denom = normal.dot(self.dir);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (offset - normal.dot(self.origin)) / denom;
        (t >= 0.0).then(|| self.origin + self.dir * t)
    }
}
