use crate::constants::*;
use crate::core::{Alignment, IntroHost, IntroPhase, Rect};
use crate::dom;
use web_sys as web;

#[inline]
pub fn marker_class(phase: IntroPhase) -> Option<&'static str> {
    match phase {
        IntroPhase::Forming => Some(CLASS_SHOW_DOODLE),
        IntroPhase::Blinking => Some(CLASS_BLINK),
        IntroPhase::Scattering => Some(CLASS_SCATTER),
        IntroPhase::Locking => Some(CLASS_LOCK),
        _ => None,
    }
}

/// The intro overlay element plus the (optional) element it hands off to.
/// Without an overlay there is nothing to mark or align.
pub struct IntroOverlay {
    overlay: Option<web::HtmlElement>,
    target: Option<web::Element>,
}

impl IntroOverlay {
    pub fn new(overlay: Option<web::HtmlElement>, target: Option<web::Element>) -> Self {
        Self { overlay, target }
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}

impl IntroHost for IntroOverlay {
    fn mark_phase(&mut self, phase: IntroPhase) {
        if let (Some(overlay), Some(class)) = (self.overlay.as_ref(), marker_class(phase)) {
            _ = overlay.class_list().add_1(class);
        }
    }

    fn overlay_rect(&self) -> Option<Rect> {
        self.overlay.as_ref().map(|o| dom::bounding_rect(o))
    }

    fn target_rect(&self) -> Option<Rect> {
        // Target may have been detached by the host since mount.
        self.target
            .as_ref()
            .filter(|t| t.is_connected())
            .map(dom::bounding_rect)
    }

    fn apply_alignment(&mut self, alignment: Alignment) {
        let Some(overlay) = self.overlay.as_ref() else {
            return;
        };
        let style = overlay.style();
        _ = style.set_property(VAR_INTRO_X, &format!("{}px", alignment.translate_x));
        _ = style.set_property(VAR_INTRO_Y, &format!("{}px", alignment.translate_y));
        _ = style.set_property(VAR_INTRO_SCALE, &format!("{}", alignment.scale));
        log::info!(
            "[intro] handoff alignment dx={:.1} dy={:.1} scale={:.3}",
            alignment.translate_x,
            alignment.translate_y,
            alignment.scale
        );
    }
}
