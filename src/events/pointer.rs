use super::Listeners;
use crate::constants::PRIMARY_BUTTON;
use crate::core::PointerController;
use crate::dom;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct PointerWiring {
    pub canvas: web::HtmlCanvasElement,
    pub pointer: Rc<RefCell<PointerController>>,
}

/// Pointer position relative to the canvas, in CSS pixels.
#[inline]
pub fn pointer_canvas_css(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}

pub fn wire_field_pointer(w: &PointerWiring, listeners: &mut Listeners) {
    let Some(window) = web::window() else {
        return;
    };
    let window: web::EventTarget = window.into();

    {
        let w = w.clone();
        listeners.add(&window, "pointermove", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            let pos = pointer_canvas_css(ev, &w.canvas);
            w.pointer.borrow_mut().on_pointer_move(ev.pointer_id(), pos);
        });
    }

    {
        let w = w.clone();
        listeners.add(&window, "pointerdown", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            if ev.button() != PRIMARY_BUTTON {
                return;
            }
            let pos = pointer_canvas_css(ev, &w.canvas);
            let hit = w.pointer.borrow_mut().on_pointer_down(ev.pointer_id(), pos);
            if hit.is_some() {
                _ = w.canvas.set_pointer_capture(ev.pointer_id());
            }
        });
    }

    for kind in ["pointerup", "pointercancel"] {
        let w = w.clone();
        listeners.add(&window, kind, move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            let id = ev.pointer_id();
            let ended = w.pointer.borrow_mut().on_pointer_up(id);
            if ended {
                _ = w.canvas.release_pointer_capture(id);
            }
            if ev.type_() == "pointercancel" {
                w.pointer.borrow_mut().on_pointer_leave();
            }
        });
    }

    {
        let w = w.clone();
        listeners.add(&window, "blur", move |_| {
            w.pointer.borrow_mut().on_pointer_leave();
        });
    }

    if let Some(document) = dom::window_document() {
        let w = w.clone();
        let document: web::EventTarget = document.into();
        listeners.add(&document, "pointerleave", move |_| {
            w.pointer.borrow_mut().on_pointer_leave();
        });
    }
}

/// Keep the canvas backing store and the pointer viewport in sync with layout.
/// `on_resize` receives the new CSS size.
pub fn wire_resize(
    canvas: &web::HtmlCanvasElement,
    listeners: &mut Listeners,
    mut on_resize: impl FnMut(f32, f32) + 'static,
) {
    let Some(window) = web::window() else {
        return;
    };
    let window: web::EventTarget = window.into();
    let canvas = canvas.clone();
    listeners.add(&window, "resize", move |_| {
        let (w, h) = dom::sync_canvas_backing_size(&canvas);
        on_resize(w, h);
    });
}
