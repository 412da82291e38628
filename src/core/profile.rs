/// Motion tuning selected once at init from the reduced-motion preference.
///
/// Both profiles run the same algorithm; reduced motion only swaps in softer
/// numbers. Every force, spring and speed in `reduced()` is at most its
/// `standard()` counterpart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionProfile {
    pub reduced: bool,
    /// Spring constant pulling offsets back to the base position.
    pub spring: f32,
    /// Per-step velocity multiplier.
    pub damping: f32,
    pub max_velocity: f32,
    pub max_offset: f32,
    /// Multiplier on per-particle orbit speed.
    pub orbit_scale: f32,
    pub noise_strength: f32,
    pub repel_force: f32,
    pub swirl_force: f32,
    pub attract_force: f32,
    pub impact_kick: f32,
    /// Per-frame (60 Hz) cursor easing factor.
    pub cursor_ease: f32,
    /// Whole-group rotation rate about Y (radians per second).
    pub group_rotation: f32,
}

impl MotionProfile {
    pub const fn standard() -> Self {
        Self {
            reduced: false,
            spring: 7.4,
            damping: 0.84,
            max_velocity: 3.0,
            max_offset: 0.6,
            orbit_scale: 1.0,
            noise_strength: 0.12,
            repel_force: 0.35,
            swirl_force: 0.12,
            attract_force: 0.25,
            impact_kick: 1.4,
            cursor_ease: 0.1,
            group_rotation: 0.12,
        }
    }

    pub const fn reduced() -> Self {
        Self {
            reduced: true,
            spring: 5.2,
            damping: 0.88,
            max_velocity: 2.0,
            max_offset: 0.4,
            orbit_scale: 0.35,
            noise_strength: 0.06,
            repel_force: 0.22,
            swirl_force: 0.06,
            attract_force: 0.15,
            impact_kick: 1.0,
            cursor_ease: 0.05,
            group_rotation: 0.04,
        }
    }

    pub const fn for_preference(reduced_motion: bool) -> Self {
        if reduced_motion {
            Self::reduced()
        } else {
            Self::standard()
        }
    }
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::standard()
    }
}
