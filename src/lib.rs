//! Orbit-field particle effects for the web.
//!
//! Two independent instances share one math core: an ambient point cloud that
//! orbits, breathes and reacts to the pointer, and a one-shot intro that
//! bursts a doodle into that cloud on a fixed timeline before handing off to
//! the page. `core` is plain Rust and builds on every target; everything that
//! touches the DOM or WebGPU is wasm-only.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod constants;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod field;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod intro;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod render;

#[cfg(target_arch = "wasm32")]
pub use field::{mount_orbit_field, OrbitFieldHandle};
#[cfg(target_arch = "wasm32")]
pub use intro::{play_intro, IntroHandle};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("orbit-field ready");
}
