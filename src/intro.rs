use crate::constants::*;
use crate::core::constants::{GLYPH_RASTER_SIZE, INTRO_COUNT};
use crate::core::{intro_buffer, intro_points, Camera, Glyph, IntroCallbacks, IntroSequence};
use crate::dom;
use crate::events::{wire_resize, Listeners};
use crate::frame::{start_loop, AnimationLoop, IntroFrame};
use crate::overlay::IntroOverlay;
use crate::render::{GpuState, Scene};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Wrap a host callback so it runs on a later task, never inside a frame.
fn deferred(callback: Option<js_sys::Function>, name: &'static str) -> Option<Box<dyn FnOnce()>> {
    let callback = callback?;
    Some(Box::new(move || {
        spawn_local(async move {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                log::warn!("[intro] {} threw: {:?}", name, e);
            }
        });
    }) as Box<dyn FnOnce()>)
}

#[derive(Default)]
struct IntroMount {
    canvas: Option<web::HtmlCanvasElement>,
    frame: Option<Rc<RefCell<IntroFrame>>>,
    listeners: Listeners,
    animation: Option<AnimationLoop>,
    torn_down: bool,
}

impl IntroMount {
    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(animation) = self.animation.take() {
            animation.cancel();
        }
        self.listeners.clear();
        if let Some(frame) = self.frame.take() {
            // Pending callbacks must not reach a host that has moved on.
            if let Ok(mut frame) = frame.try_borrow_mut() {
                frame.sequence.cancel();
                frame.gpu = None;
            }
        }
        if let Some(canvas) = self.canvas.take() {
            dom::remove_element(&canvas);
        }
        log::info!("[intro] torn down");
    }
}

#[wasm_bindgen]
pub struct IntroHandle {
    inner: Rc<RefCell<IntroMount>>,
}

#[wasm_bindgen]
impl IntroHandle {
    /// Stop the intro without firing any further callbacks. Safe to call more
    /// than once, including from inside `on_complete`.
    pub fn teardown(&self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.teardown();
        }
    }
}

/// Play the intro into `mount_id`, driving marker classes on `overlay_id`.
///
/// `on_handoff` fires when the cloud locks onto its orbit and the overlay
/// should cross-fade to `target_id`; `on_complete` fires when the intro is
/// done. Both fire immediately, in that order, whenever the animation cannot
/// play (reduced motion, no overlay, no renderer).
#[wasm_bindgen]
pub fn play_intro(
    mount_id: &str,
    overlay_id: &str,
    target_id: Option<String>,
    on_handoff: Option<js_sys::Function>,
    on_complete: Option<js_sys::Function>,
) -> IntroHandle {
    let overlay = match dom::element_by_id(overlay_id) {
        Ok(overlay) => Some(overlay),
        Err(e) => {
            log::warn!("[intro] overlay unavailable: {:#}", e);
            None
        }
    };
    let target = target_id.and_then(|id| {
        let found = dom::window_document().and_then(|d| d.get_element_by_id(&id));
        if found.is_none() {
            log::warn!("[intro] handoff target #{} not found", id);
        }
        found
    });
    let host = IntroOverlay::new(overlay, target);
    let sequence = IntroSequence::new(IntroCallbacks {
        on_handoff: deferred(on_handoff, "on_handoff"),
        on_complete: deferred(on_complete, "on_complete"),
    });
    let inner = Rc::new(RefCell::new(IntroMount::default()));

    match prepare(mount_id, sequence, host) {
        Prepared::Ready { canvas, frame } => {
            {
                let mut mount = inner.borrow_mut();
                mount.canvas = Some(canvas.clone());
                mount.frame = Some(frame.clone());
            }
            spawn_local(start_rendering(inner.clone(), canvas, frame));
        }
        Prepared::Skipped => {}
    }
    IntroHandle { inner }
}

enum Prepared {
    Ready {
        canvas: web::HtmlCanvasElement,
        frame: Rc<RefCell<IntroFrame>>,
    },
    Skipped,
}

fn prepare(mount_id: &str, mut sequence: IntroSequence, mut host: IntroOverlay) -> Prepared {
    if !host.has_overlay() {
        sequence.finish(&mut host);
        return Prepared::Skipped;
    }
    if dom::prefers_reduced_motion() {
        log::info!("[intro] reduced motion; skipping to handoff");
        sequence.finish(&mut host);
        return Prepared::Skipped;
    }
    let canvas = match dom::element_by_id(mount_id).and_then(|m| dom::create_canvas(&m)) {
        Ok(canvas) => canvas,
        Err(e) => {
            log::error!("[intro] cannot mount: {:#}", e);
            sequence.finish(&mut host);
            return Prepared::Skipped;
        }
    };
    let (css_w, css_h) = dom::sync_canvas_backing_size(&canvas);
    if css_w <= 0.0 || css_h <= 0.0 {
        log::warn!("[intro] zero-sized mount; skipping");
        dom::remove_element(&canvas);
        sequence.finish(&mut host);
        return Prepared::Skipped;
    }
    let mut camera =
        Camera::looking_at_origin(INTRO_CAMERA_Z, INTRO_FOV_DEG, INTRO_ZNEAR, INTRO_ZFAR);
    camera.set_viewport(css_w, css_h);

    let frame = Rc::new(RefCell::new(IntroFrame::new(
        sequence,
        host,
        camera,
        canvas.clone(),
    )));
    Prepared::Ready { canvas, frame }
}

async fn start_rendering(
    inner: Rc<RefCell<IntroMount>>,
    canvas: web::HtmlCanvasElement,
    frame: Rc<RefCell<IntroFrame>>,
) {
    let raster = Glyph::doodle().rasterize(GLYPH_RASTER_SIZE);
    let buffer = intro_buffer(INTRO_COUNT, rand::random(), Some(&raster));
    let points = intro_points(&buffer).unwrap_or_default();
    log::info!(
        "[intro] {} particles from {} glyph samples",
        points.len(),
        raster.samples.len()
    );

    let gpu = GpuState::new(&canvas, Scene::Intro).await;
    let mut mount = inner.borrow_mut();
    if mount.torn_down {
        return;
    }
    let mut gpu = match gpu {
        Ok(gpu) => gpu,
        Err(e) => {
            log::error!("[intro] renderer unavailable: {:?}", e);
            frame.borrow_mut().finish();
            if let Some(canvas) = mount.canvas.take() {
                dom::remove_element(&canvas);
            }
            return;
        }
    };
    gpu.set_intro_points(&points);
    frame.borrow_mut().begin(gpu);

    let frame_resize = frame.clone();
    wire_resize(&canvas, &mut mount.listeners, move |w, h| {
        if let Ok(mut f) = frame_resize.try_borrow_mut() {
            f.camera.set_viewport(w, h);
        }
    });
    mount.animation = Some(start_loop(frame));
}
