//! Pointer interaction: screen coordinates to a scene-space cursor.
//!
//! Events write into `PointerController`; the frame step reads it. Event order
//! inside one frame does not matter beyond last-write-wins on the target.

use crate::core::camera::Camera;
use crate::core::constants::{IMPACT_RADIUS, NEUTRAL_CURSOR};
use crate::core::math::frame_ease;
use crate::core::profile::MotionProfile;
use glam::{Mat4, Vec2, Vec3};

/// Screen area in which pointer input counts as inside the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitRegion {
    /// The whole rendering surface.
    FullViewport,
    /// A centered circle whose radius is `radius_frac * min(width, height) / 2`.
    Circle { radius_frac: f32 },
}

/// What happens to the target when the pointer leaves the region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MissPolicy {
    Hold,
    ResetTo(Vec3),
}

impl Default for MissPolicy {
    fn default() -> Self {
        Self::ResetTo(Vec3::from_array(NEUTRAL_CURSOR))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactEvent {
    pub position: Vec3,
    /// Visual glow strength in `[0, 1]`, decays after the kick.
    pub strength: f32,
    pub radius: f32,
}

impl ImpactEvent {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            strength: 1.0,
            radius: IMPACT_RADIUS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointerState {
    pub target_point: Vec3,
    pub current_point: Vec3,
    pub is_interacting: bool,
    pub is_dragging: bool,
    pub active_pointer_id: Option<i32>,
    /// Eased 0..1 presence so interaction forces fade rather than snap.
    pub presence: f32,
}

pub struct PointerController {
    state: PointerState,
    camera: Camera,
    viewport: Vec2,
    object_from_world: Mat4,
    region: HitRegion,
    miss_policy: MissPolicy,
    ease: f32,
    pending_impact: Option<ImpactEvent>,
}

impl PointerController {
    pub fn new(
        camera: Camera,
        region: HitRegion,
        miss_policy: MissPolicy,
        profile: &MotionProfile,
    ) -> Self {
        let neutral = Vec3::from_array(NEUTRAL_CURSOR);
        Self {
            state: PointerState {
                target_point: neutral,
                current_point: neutral,
                is_interacting: false,
                is_dragging: false,
                active_pointer_id: None,
                presence: 0.0,
            },
            camera,
            viewport: Vec2::ZERO,
            object_from_world: Mat4::IDENTITY,
            region,
            miss_policy,
            ease: profile.cursor_ease,
            pending_impact: None,
        }
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(0.0), height.max(0.0));
        self.camera.set_viewport(width, height);
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.camera.set_viewport(self.viewport.x, self.viewport.y);
    }

    /// World transform of the object whose local frame the cursor lives in.
    pub fn set_object_transform(&mut self, world_from_object: Mat4) {
        self.object_from_world = world_from_object.inverse();
    }

    pub fn in_region(&self, screen: Vec2) -> bool {
        let (w, h) = (self.viewport.x, self.viewport.y);
        if w <= 0.0 || h <= 0.0 {
            return false;
        }
        match self.region {
            HitRegion::FullViewport => {
                screen.x >= 0.0 && screen.y >= 0.0 && screen.x <= w && screen.y <= h
            }
            HitRegion::Circle { radius_frac } => {
                let radius = radius_frac * w.min(h) * 0.5;
                screen.distance(self.viewport * 0.5) <= radius
            }
        }
    }

    /// Cast through `screen` onto the `z = 0` world plane and return the hit in
    /// the object's local frame.
    pub fn project(&self, screen: Vec2) -> Option<Vec3> {
        let ray = self
            .camera
            .screen_ray(screen.x, screen.y, self.viewport.x, self.viewport.y)?;
        let hit = ray.intersect_plane(Vec3::Z, 0.0)?;
        Some(self.object_from_world.transform_point3(hit))
    }

    pub fn on_pointer_move(&mut self, pointer_id: i32, screen: Vec2) {
        if let Some(active) = self.state.active_pointer_id {
            if active != pointer_id {
                return;
            }
        }
        let inside = self.in_region(screen);
        if inside || self.state.is_dragging {
            self.state.is_interacting = inside;
            if let Some(hit) = self.project(screen) {
                self.state.target_point = hit;
            }
        } else {
            self.state.is_interacting = false;
            self.apply_miss_policy();
        }
    }

    /// Start a drag and raise an impact. Returns the impact when the press hit
    /// the field; misses and secondary pointers do nothing.
    pub fn on_pointer_down(&mut self, pointer_id: i32, screen: Vec2) -> Option<ImpactEvent> {
        if self.state.active_pointer_id.is_some() {
            return None;
        }
        if !self.in_region(screen) {
            return None;
        }
        let hit = self.project(screen)?;
        self.state.target_point = hit;
        self.state.is_interacting = true;
        self.state.is_dragging = true;
        self.state.active_pointer_id = Some(pointer_id);
        let impact = ImpactEvent::new(hit);
        self.pending_impact = Some(impact);
        log::debug!("[pointer] impact at ({:.2},{:.2},{:.2})", hit.x, hit.y, hit.z);
        Some(impact)
    }

    /// End the drag if `pointer_id` owns it. Returns true if a drag ended.
    pub fn on_pointer_up(&mut self, pointer_id: i32) -> bool {
        if self.state.active_pointer_id != Some(pointer_id) {
            return false;
        }
        self.state.active_pointer_id = None;
        self.state.is_dragging = false;
        true
    }

    /// Pointer left the surface or the window lost focus.
    pub fn on_pointer_leave(&mut self) {
        self.state.is_interacting = false;
        if !self.state.is_dragging {
            self.apply_miss_policy();
        }
    }

    /// Drop any drag capture. Returns the released pointer id.
    pub fn release(&mut self) -> Option<i32> {
        self.state.is_dragging = false;
        self.state.is_interacting = false;
        self.state.active_pointer_id.take()
    }

    pub fn take_impact(&mut self) -> Option<ImpactEvent> {
        self.pending_impact.take()
    }

    /// Ease the current point and presence toward their targets.
    pub fn update(&mut self, delta_sec: f32) {
        let a = frame_ease(self.ease, delta_sec);
        self.state.current_point = self.state.current_point.lerp(self.state.target_point, a);
        let presence_target = if self.state.is_interacting || self.state.is_dragging {
            1.0
        } else {
            0.0
        };
        self.state.presence += (presence_target - self.state.presence) * a;
    }

    fn apply_miss_policy(&mut self) {
        if let MissPolicy::ResetTo(p) = self.miss_policy {
            self.state.target_point = p;
        }
    }
}
