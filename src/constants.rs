// Rendering and host-integration constants for the web frontend.
// Simulation tuning lives in `core::constants`.

// Device pixel ratio cap for the backing store
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Ambient field camera
pub const FIELD_CAMERA_Z: f32 = 3.4;
pub const FIELD_FOV_DEG: f32 = 46.0;
pub const FIELD_ZNEAR: f32 = 0.1;
pub const FIELD_ZFAR: f32 = 40.0;

// Ambient field group wobble around X
pub const FIELD_TILT_BASE: f32 = -0.2;
pub const FIELD_TILT_RATE: f32 = 0.2;
pub const FIELD_TILT_AMPLITUDE: f32 = 0.08;

// Ambient field appearance
pub const FIELD_COLOR: [f32; 3] = [1.0, 0.231, 0.302]; // #ff3b4d
pub const FIELD_NOISE_TINT: [f32; 3] = [0.18, 0.05, 0.04];
pub const FIELD_POINT_SIZE: f32 = 12.5;
pub const FIELD_DEPTH_FADE_BASE: f32 = 1.7;
pub const FIELD_DEPTH_FADE_SLOPE: f32 = 0.22;

// Intro camera
pub const INTRO_CAMERA_Z: f32 = 6.4;
pub const INTRO_FOV_DEG: f32 = 58.0;
pub const INTRO_ZNEAR: f32 = 0.1;
pub const INTRO_ZFAR: f32 = 80.0;

// Intro appearance
pub const INTRO_COLOR: [f32; 3] = [1.0, 0.176, 0.239]; // #ff2d3d
pub const INTRO_POINT_SIZE: f32 = 19.0;

// Primary mouse button / pen contact / touch
pub const PRIMARY_BUTTON: i16 = 0;

// Overlay marker classes, one per timeline phase that has a visual marker
pub const CLASS_SHOW_DOODLE: &str = "intro-show-doodle";
pub const CLASS_BLINK: &str = "intro-blink";
pub const CLASS_SCATTER: &str = "intro-scatter";
pub const CLASS_LOCK: &str = "intro-lock";

// Handoff alignment custom properties on the overlay
pub const VAR_INTRO_X: &str = "--intro-x";
pub const VAR_INTRO_Y: &str = "--intro-y";
pub const VAR_INTRO_SCALE: &str = "--intro-scale";

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
