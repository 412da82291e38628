pub mod buffer;
pub mod camera;
pub mod constants;
pub mod error;
pub mod field;
pub mod glyph;
pub mod math;
pub mod noise;
pub mod pointer;
pub mod profile;
pub mod timeline;
pub mod transform;

pub use buffer::*;
pub use camera::*;
pub use error::FieldError;
pub use field::*;
pub use glyph::*;
pub use noise::ValueNoise;
pub use pointer::*;
pub use profile::MotionProfile;
pub use timeline::*;
pub use transform::*;

// Shaders bundled as string constants
pub static FIELD_WGSL: &str = include_str!("../../shaders/field.wgsl");
pub static INTRO_WGSL: &str = include_str!("../../shaders/intro.wgsl");
