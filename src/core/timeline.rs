//! Intro timeline: a one-way phase sequencer keyed to elapsed time.
//!
//! The current phase only ever advances. Each phase is entered on the first
//! frame whose elapsed time exceeds its threshold; a frame that jumps past
//! several thresholds enters all of them, in order.

use crate::core::camera::Camera;
use crate::core::constants::*;
use crate::core::transform::TimelineUniforms;
use glam::{Mat4, Vec3};
use smallvec::SmallVec;
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntroPhase {
    /// Before the glyph forms.
    Pending,
    Forming,
    Blinking,
    Scattering,
    Locking,
    HandingOff,
    Complete,
}

impl IntroPhase {
    pub const SEQUENCE: [IntroPhase; 6] = [
        IntroPhase::Forming,
        IntroPhase::Blinking,
        IntroPhase::Scattering,
        IntroPhase::Locking,
        IntroPhase::HandingOff,
        IntroPhase::Complete,
    ];

    /// Elapsed seconds after which this phase is entered.
    pub fn threshold(self) -> Option<f32> {
        match self {
            IntroPhase::Pending => None,
            IntroPhase::Forming => Some(FORMING_TIME),
            IntroPhase::Blinking => Some(BLINK_TIME),
            IntroPhase::Scattering => Some(SCATTER_TIME),
            IntroPhase::Locking => Some(LOCK_TIME),
            IntroPhase::HandingOff => Some(HANDOFF_TIME),
            IntroPhase::Complete => Some(COMPLETE_TIME),
        }
    }

    pub fn next(self) -> Option<IntroPhase> {
        match self {
            IntroPhase::Pending => Some(IntroPhase::Forming),
            IntroPhase::Forming => Some(IntroPhase::Blinking),
            IntroPhase::Blinking => Some(IntroPhase::Scattering),
            IntroPhase::Scattering => Some(IntroPhase::Locking),
            IntroPhase::Locking => Some(IntroPhase::HandingOff),
            IntroPhase::HandingOff => Some(IntroPhase::Complete),
            IntroPhase::Complete => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IntroEvent {
    Entered(IntroPhase),
    /// Measure overlay and target boxes and re-apply the handoff alignment.
    MeasureAlignment,
}

pub type IntroEvents = SmallVec<[IntroEvent; 4]>;

#[derive(Clone, Debug)]
pub struct IntroTimeline {
    phase: IntroPhase,
    elapsed: f32,
    alignment_frames: u8,
}

impl Default for IntroTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl IntroTimeline {
    pub fn new() -> Self {
        Self {
            phase: IntroPhase::Pending,
            elapsed: 0.0,
            alignment_frames: 0,
        }
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_complete(&self) -> bool {
        self.phase == IntroPhase::Complete
    }

    pub fn has_entered(&self, phase: IntroPhase) -> bool {
        self.phase >= phase
    }

    /// Alignment measurements still owed from the handoff. A jump straight
    /// past `Complete` leaves these outstanding for the following frames.
    pub fn has_pending_alignment(&self) -> bool {
        self.alignment_frames > 0
    }

    /// Advance the clock to `elapsed` (never backwards) and report what happened.
    ///
    /// Alignment measurements scheduled by an earlier handoff are reported
    /// before any phase entered this frame.
    pub fn advance(&mut self, elapsed: f32) -> IntroEvents {
        let mut events = IntroEvents::new();
        if elapsed.is_finite() {
            self.elapsed = self.elapsed.max(elapsed);
        }

        if self.alignment_frames > 0 {
            self.alignment_frames -= 1;
            events.push(IntroEvent::MeasureAlignment);
        }

        while let Some(next) = self.phase.next() {
            let Some(threshold) = next.threshold() else {
                break;
            };
            if self.elapsed <= threshold {
                break;
            }
            self.phase = next;
            log::info!("[timeline] {:?} at {:.3}s", next, self.elapsed);
            events.push(IntroEvent::Entered(next));
            if next == IntroPhase::HandingOff {
                self.alignment_frames = ALIGNMENT_SETTLE_FRAMES;
            }
        }
        events
    }

    /// Jump straight to `Complete`, reporting every phase not yet entered.
    /// No alignment is scheduled.
    pub fn finish(&mut self) -> IntroEvents {
        let mut events = IntroEvents::new();
        while let Some(next) = self.phase.next() {
            self.phase = next;
            events.push(IntroEvent::Entered(next));
        }
        self.alignment_frames = 0;
        events
    }
}

/// Rise-and-fall wink curve in `[0, 1]` around the blink threshold.
pub fn wink(elapsed: f32) -> f32 {
    let start = BLINK_TIME - WINK_LEAD;
    let end = BLINK_TIME + WINK_TAIL;
    let progress = ((elapsed - start) / (end - start)).clamp(0.0, 1.0);
    (progress * PI).sin()
}

/// Object rotation of the intro cloud: idle until scatter, then a slow orbit.
pub fn intro_model(elapsed: f32) -> Mat4 {
    let orbit_time = (elapsed - SCATTER_TIME).max(0.0);
    let rot_y = orbit_time * INTRO_ORBIT_RATE;
    let rot_x = (orbit_time * INTRO_WOBBLE_RATE).sin() * INTRO_WOBBLE_AMPLITUDE;
    Mat4::from_rotation_x(rot_x) * Mat4::from_rotation_y(rot_y)
}

/// Uniforms for the intro transform at `elapsed`.
pub fn intro_uniforms(
    elapsed: f32,
    camera: &Camera,
    color: Vec3,
    point_size: f32,
) -> TimelineUniforms {
    let w = wink(elapsed);
    TimelineUniforms {
        time: elapsed,
        tilt: w * WINK_TILT,
        yaw: w * WINK_YAW,
        scatter: SCATTER_TIME,
        point_size,
        color,
        model_view: camera.view_matrix() * intro_model(elapsed),
        escape_threshold: ESCAPE_SEED_THRESHOLD,
    }
}

/// Axis-aligned box in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Translation plus uniform scale that lays one box over another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alignment {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Alignment {
    /// Map `overlay` onto `target`: centers coincide and the overlay is scaled
    /// to fit inside the target. Degenerate boxes yield `None`.
    pub fn between(overlay: &Rect, target: &Rect) -> Option<Self> {
        if overlay.width <= 0.0 || overlay.height <= 0.0 {
            return None;
        }
        let (ox, oy) = overlay.center();
        let (tx, ty) = target.center();
        let scale = (target.width / overlay.width).min(target.height / overlay.height);
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        Some(Self {
            translate_x: tx - ox,
            translate_y: ty - oy,
            scale,
        })
    }
}

/// Host-side collaborators the sequence drives: overlay markers and layout.
pub trait IntroHost {
    fn mark_phase(&mut self, phase: IntroPhase);
    fn overlay_rect(&self) -> Option<Rect>;
    /// `None` when the target element is absent; alignment is then skipped.
    fn target_rect(&self) -> Option<Rect>;
    fn apply_alignment(&mut self, alignment: Alignment);
}

/// One-shot host callbacks. Either may be absent.
#[derive(Default)]
pub struct IntroCallbacks {
    pub on_handoff: Option<Box<dyn FnOnce()>>,
    pub on_complete: Option<Box<dyn FnOnce()>>,
}

/// Timeline plus its side effects.
pub struct IntroSequence {
    timeline: IntroTimeline,
    callbacks: IntroCallbacks,
}

impl IntroSequence {
    pub fn new(callbacks: IntroCallbacks) -> Self {
        Self {
            timeline: IntroTimeline::new(),
            callbacks,
        }
    }

    pub fn timeline(&self) -> &IntroTimeline {
        &self.timeline
    }

    pub fn is_complete(&self) -> bool {
        self.timeline.is_complete()
    }

    /// Complete and no handoff alignment left to apply; frames may stop.
    pub fn is_settled(&self) -> bool {
        self.timeline.is_complete() && !self.timeline.has_pending_alignment()
    }

    /// Advance to `elapsed` and apply every resulting side effect.
    pub fn frame(&mut self, elapsed: f32, host: &mut dyn IntroHost) -> IntroEvents {
        let events = self.timeline.advance(elapsed);
        self.dispatch(&events, host);
        events
    }

    /// Skip the animation: enter every remaining phase now so the host sees
    /// `onHandoff` then `onComplete`.
    pub fn finish(&mut self, host: &mut dyn IntroHost) -> IntroEvents {
        let events = self.timeline.finish();
        self.dispatch(&events, host);
        events
    }

    /// Drop the callbacks without firing them.
    pub fn cancel(&mut self) {
        self.callbacks = IntroCallbacks::default();
    }

    fn dispatch(&mut self, events: &IntroEvents, host: &mut dyn IntroHost) {
        for ev in events {
            match *ev {
                IntroEvent::Entered(phase) => {
                    host.mark_phase(phase);
                    match phase {
                        IntroPhase::HandingOff => {
                            if let Some(cb) = self.callbacks.on_handoff.take() {
                                cb();
                            }
                        }
                        IntroPhase::Complete => {
                            if let Some(cb) = self.callbacks.on_complete.take() {
                                cb();
                            }
                        }
                        _ => {}
                    }
                }
                IntroEvent::MeasureAlignment => {
                    let (Some(overlay), Some(target)) = (host.overlay_rect(), host.target_rect())
                    else {
                        log::debug!("[intro] handoff target missing; alignment skipped");
                        continue;
                    };
                    if let Some(alignment) = Alignment::between(&overlay, &target) {
                        host.apply_alignment(alignment);
                    }
                }
            }
        }
    }
}
