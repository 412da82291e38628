use crate::constants::*;
use crate::core::{
    intro_uniforms, Camera, FieldSimulator, IntroSequence, MotionProfile, PointerController,
};
use crate::overlay::IntroOverlay;
use crate::render::GpuState;
use glam::{Mat4, Vec3};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

pub trait FrameTick {
    fn frame(&mut self) -> LoopControl;
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A running requestAnimationFrame loop. `cancel` is idempotent.
pub struct AnimationLoop {
    cancelled: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<i32>>>,
    tick: TickSlot,
}

impl AnimationLoop {
    pub fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        // The closure may be on the stack right now; drop it on a later turn.
        if let Some(closure) = self.tick.borrow_mut().take() {
            wasm_bindgen_futures::spawn_local(async move {
                drop(closure);
            });
        }
    }
}

fn request_frame(tick: &TickSlot, pending: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    let slot = tick.borrow();
    let Some(closure) = slot.as_ref() else {
        return;
    };
    match w.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => pending.set(Some(id)),
        Err(e) => log::warn!("[frame] requestAnimationFrame failed: {:?}", e),
    }
}

pub fn start_loop<F: FrameTick + 'static>(frame_ctx: Rc<RefCell<F>>) -> AnimationLoop {
    let tick: TickSlot = Rc::new(RefCell::new(None));
    let cancelled = Rc::new(Cell::new(false));
    let pending = Rc::new(Cell::new(None));
    let handle = AnimationLoop {
        cancelled: cancelled.clone(),
        pending: pending.clone(),
        tick: tick.clone(),
    };

    let tick_clone = tick.clone();
    let stopper = AnimationLoop {
        cancelled: cancelled.clone(),
        pending: pending.clone(),
        tick: tick.clone(),
    };
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending.set(None);
        if cancelled.get() {
            return;
        }
        let control = frame_ctx.borrow_mut().frame();
        if control == LoopControl::Stop {
            stopper.cancel();
            return;
        }
        if !cancelled.get() {
            request_frame(&tick_clone, &pending);
        }
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &handle.pending);
    handle
}

fn surface_error(gpu: &mut GpuState, err: wgpu::SurfaceError, tag: &str) -> LoopControl {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            gpu.reconfigure();
            LoopControl::Continue
        }
        wgpu::SurfaceError::OutOfMemory => {
            log::error!("[{}] surface out of memory; stopping", tag);
            LoopControl::Stop
        }
        other => {
            log::warn!("[{}] skipped frame: {:?}", tag, other);
            LoopControl::Continue
        }
    }
}

/// World transform of the ambient cloud: slow spin about Y under a gentle
/// tilt wobble about X.
pub fn field_model(elapsed: f32, profile: &MotionProfile) -> Mat4 {
    let tilt = FIELD_TILT_BASE + (elapsed * FIELD_TILT_RATE).sin() * FIELD_TILT_AMPLITUDE;
    Mat4::from_rotation_x(tilt) * Mat4::from_rotation_y(elapsed * profile.group_rotation)
}

pub struct FieldFrame {
    pub sim: FieldSimulator,
    pub pointer: Rc<RefCell<PointerController>>,
    pub gpu: GpuState,
    pub canvas: web::HtmlCanvasElement,
    pub started: Instant,
    pub last_instant: Instant,
    /// Tears the instance down after a fatal simulation error. Runs on a
    /// later task since the pointer is borrowed for the rest of this frame.
    pub on_halt: Option<Box<dyn FnOnce()>>,
}

impl FrameTick for FieldFrame {
    fn frame(&mut self) -> LoopControl {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        let elapsed = (now - self.started).as_secs_f32();

        let model = field_model(elapsed, self.sim.profile());
        let mut pointer = self.pointer.borrow_mut();
        pointer.set_object_transform(model);
        if let Err(e) = self.sim.frame(dt_sec, elapsed, &mut pointer) {
            log::error!("[field] simulation halted: {}", e);
            if let Some(halt) = self.on_halt.take() {
                wasm_bindgen_futures::spawn_local(async move { halt() });
            }
            return LoopControl::Stop;
        }

        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        match self.gpu.render_field(&self.sim, pointer.camera(), model) {
            Ok(()) => LoopControl::Continue,
            Err(e) => surface_error(&mut self.gpu, e, "field"),
        }
    }
}

pub struct IntroFrame {
    pub sequence: IntroSequence,
    pub host: IntroOverlay,
    pub camera: Camera,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<GpuState>,
    pub started: Instant,
}

impl IntroFrame {
    pub fn new(
        sequence: IntroSequence,
        host: IntroOverlay,
        camera: Camera,
        canvas: web::HtmlCanvasElement,
    ) -> Self {
        Self {
            sequence,
            host,
            camera,
            canvas,
            gpu: None,
            started: Instant::now(),
        }
    }

    /// Reset the clock; the timeline measures from the first rendered frame.
    pub fn begin(&mut self, gpu: GpuState) {
        self.gpu = Some(gpu);
        self.started = Instant::now();
    }

    /// Skip straight to the end so the host still sees both callbacks.
    pub fn finish(&mut self) {
        self.sequence.finish(&mut self.host);
    }
}

impl FrameTick for IntroFrame {
    fn frame(&mut self) -> LoopControl {
        let elapsed = self.started.elapsed().as_secs_f32();
        let events = self.sequence.frame(elapsed, &mut self.host);
        if !events.is_empty() {
            log::debug!("[timeline] t={:.2} {:?}", elapsed, events);
        }

        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
            let u = intro_uniforms(
                elapsed,
                &self.camera,
                Vec3::from_array(INTRO_COLOR),
                INTRO_POINT_SIZE,
            );
            if let Err(e) = gpu.render_intro(&u, &self.camera) {
                if surface_error(gpu, e, "intro") == LoopControl::Stop {
                    self.finish();
                    return LoopControl::Stop;
                }
            }
        }

        if self.sequence.is_settled() {
            LoopControl::Stop
        } else {
            LoopControl::Continue
        }
    }
}
