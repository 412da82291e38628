use crate::constants::*;
use crate::core::constants::FIELD_COUNT;
use crate::core::{Camera, FieldSimulator, HitRegion, MissPolicy, MotionProfile, PointerController};
use crate::dom;
use crate::events::{wire_field_pointer, wire_resize, Listeners, PointerWiring};
use crate::frame::{start_loop, AnimationLoop, FieldFrame};
use crate::render::{GpuState, Scene};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

struct FieldMount {
    canvas: web::HtmlCanvasElement,
    pointer: Rc<RefCell<PointerController>>,
    listeners: Listeners,
    animation: Option<AnimationLoop>,
    torn_down: bool,
}

impl FieldMount {
    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(animation) = self.animation.take() {
            animation.cancel();
        }
        self.listeners.clear();
        if let Some(id) = self.pointer.borrow_mut().release() {
            _ = self.canvas.release_pointer_capture(id);
        }
        dom::remove_element(&self.canvas);
        log::info!("[field] torn down");
    }
}

/// Live ambient field. Dropping the handle on the JS side does not stop the
/// animation; call `teardown`.
#[wasm_bindgen]
pub struct OrbitFieldHandle {
    inner: Rc<RefCell<FieldMount>>,
}

#[wasm_bindgen]
impl OrbitFieldHandle {
    /// Stop animating, detach listeners and remove the canvas. Safe to call
    /// more than once.
    pub fn teardown(&self) {
        self.inner.borrow_mut().teardown();
    }
}

/// Mount the ambient orbit field inside the element with id `mount_id`.
#[wasm_bindgen]
pub fn mount_orbit_field(mount_id: &str) -> Result<OrbitFieldHandle, JsValue> {
    mount(mount_id).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

fn mount(mount_id: &str) -> anyhow::Result<OrbitFieldHandle> {
    let container = dom::element_by_id(mount_id)?;
    let canvas = dom::create_canvas(&container)?;
    let (css_w, css_h) = dom::sync_canvas_backing_size(&canvas);

    let profile = MotionProfile::for_preference(dom::prefers_reduced_motion());
    let camera = Camera::looking_at_origin(FIELD_CAMERA_Z, FIELD_FOV_DEG, FIELD_ZNEAR, FIELD_ZFAR);
    let mut controller =
        PointerController::new(camera, HitRegion::FullViewport, MissPolicy::default(), &profile);
    controller.set_viewport(css_w, css_h);
    let pointer = Rc::new(RefCell::new(controller));

    let inner = Rc::new(RefCell::new(FieldMount {
        canvas: canvas.clone(),
        pointer: pointer.clone(),
        listeners: Listeners::default(),
        animation: None,
        torn_down: false,
    }));
    log::info!(
        "[field] mounted #{} {}x{} reduced={}",
        mount_id,
        css_w,
        css_h,
        profile.reduced
    );

    let inner_init = inner.clone();
    spawn_local(async move {
        let gpu = match GpuState::new(&canvas, Scene::Field).await {
            Ok(gpu) => gpu,
            Err(e) => {
                // The page stays usable without the effect.
                log::error!("[field] renderer unavailable: {:?}", e);
                inner_init.borrow_mut().teardown();
                return;
            }
        };
        let mut mount = inner_init.borrow_mut();
        if mount.torn_down {
            return;
        }
        let sim = match FieldSimulator::with_field_layout(FIELD_COUNT, rand::random(), profile) {
            Ok(sim) => sim,
            Err(e) => {
                log::error!("[field] {}", e);
                mount.teardown();
                return;
            }
        };
        let weak = Rc::downgrade(&inner_init);
        let now = Instant::now();
        let frame_ctx = Rc::new(RefCell::new(FieldFrame {
            sim,
            pointer: pointer.clone(),
            gpu,
            canvas: canvas.clone(),
            started: now,
            last_instant: now,
            on_halt: Some(Box::new(move || {
                if let Some(mount) = weak.upgrade() {
                    mount.borrow_mut().teardown();
                }
            }) as Box<dyn FnOnce()>),
        }));

        let wiring = PointerWiring {
            canvas: canvas.clone(),
            pointer: pointer.clone(),
        };
        wire_field_pointer(&wiring, &mut mount.listeners);
        let pointer_resize = pointer.clone();
        wire_resize(&canvas, &mut mount.listeners, move |w, h| {
            pointer_resize.borrow_mut().set_viewport(w, h);
        });
        mount.animation = Some(start_loop(frame_ctx));
    });

    Ok(OrbitFieldHandle { inner })
}
