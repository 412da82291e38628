// Shared simulation/timeline tuning constants used by the web frontend and the
// host-side tests.

// Particle counts
pub const FIELD_COUNT: usize = 4800;
pub const INTRO_COUNT: usize = 9200;

// Ambient field layout
pub const FIELD_RADIUS_MIN: f32 = 0.65;
pub const FIELD_RADIUS_SPAN: f32 = 0.32;
pub const FIELD_RADIUS_RIPPLE: f32 = 0.02; // sin(12u) ripple on the shell radius
pub const FIELD_SCALE_MIN: f32 = 0.55;
pub const FIELD_SCALE_SPAN: f32 = 1.1;

// Frame delta clamp (seconds); protects integration after a backgrounded tab
pub const MAX_FRAME_DELTA: f32 = 0.05;

// Orbit speeds per particle, mixed by seed (radians per second)
pub const ORBIT_SPEED_MIN: f32 = 0.05;
pub const ORBIT_SPEED_MAX: f32 = 0.18;

// Breathing
pub const BREATH_RATE: f32 = 0.6;
pub const BREATH_AMPLITUDE: f32 = 0.015;

// Noise jitter
pub const NOISE_FREQUENCY: f32 = 1.7;
pub const NOISE_RATE: f32 = 0.35;
pub const NOISE_SEED_SCALE: f32 = 8.0;

// Pointer interaction
pub const REPEL_RADIUS_OUTER: f32 = 1.0; // zero influence beyond this
pub const REPEL_RADIUS_INNER: f32 = 0.2; // full influence inside this
pub const ATTRACT_RADIUS: f32 = 0.45;
pub const NEUTRAL_CURSOR: [f32; 3] = [0.0, 0.0, 2.8];

// Impact
pub const IMPACT_RADIUS: f32 = 0.35;
pub const IMPACT_DECAY_PER_SEC: f32 = 1.2;

// Intro timeline thresholds (seconds from intro start)
pub const FORMING_TIME: f32 = 0.55;
pub const BLINK_TIME: f32 = 1.35;
pub const SCATTER_TIME: f32 = 1.7;
pub const LOCK_TIME: f32 = 3.3;
pub const HANDOFF_TIME: f32 = 4.4;
pub const COMPLETE_TIME: f32 = 6.2;

// Wink oscillation around the blink threshold
pub const WINK_LEAD: f32 = 0.1;
pub const WINK_TAIL: f32 = 0.4;
pub const WINK_TILT: f32 = 0.08;
pub const WINK_YAW: f32 = 0.05;

// Post-scatter object rotation
pub const INTRO_ORBIT_RATE: f32 = 0.08;
pub const INTRO_WOBBLE_RATE: f32 = 0.2;
pub const INTRO_WOBBLE_AMPLITUDE: f32 = 0.1;

// Frames to wait after handoff before measuring layout
pub const ALIGNMENT_SETTLE_FRAMES: u8 = 2;

// Intro layout
pub const INTRO_RADIUS_MIN: f32 = 0.95;
pub const INTRO_RADIUS_SPAN: f32 = 0.55;
pub const INTRO_SCALE_MIN: f32 = 0.85;
pub const INTRO_SCALE_SPAN: f32 = 1.7;
pub const GLYPH_RASTER_SIZE: usize = 220;
pub const GLYPH_WORLD_SCALE: f32 = 1.1;
pub const GLYPH_Z_JITTER: f32 = 0.08;
pub const GLYPH_DELAY_SPAN: f32 = 0.32;
pub const GLYPH_DELAY_JITTER: f32 = 0.04;

// Seeds above this escape outward instead of regrouping (~30%)
pub const ESCAPE_SEED_THRESHOLD: f32 = 0.7;
