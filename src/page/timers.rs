//! Fire-and-forget scheduling on the browser event loop.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

/// `performance.now()`, or 0 outside a browser.
pub fn now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Run `f` once after `delay_ms`. There is no cancellation; callers guard
/// with idempotent state checks instead.
pub fn after(delay_ms: u32, f: impl FnOnce() + 'static) {
    let Some(win) = window() else { return };
    let cb = Closure::once_into_js(f);
    if win
        .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms as i32)
        .is_err()
    {
        log::warn!("setTimeout({delay_ms}) rejected");
    }
}

/// Run `f` every `period_ms` for the lifetime of the page.
pub fn every(period_ms: u32, f: impl FnMut() + 'static) {
    let Some(win) = window() else { return };
    let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
    let _ = win.set_interval_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        period_ms as i32,
    );
    cb.forget();
}

/// Run `f` once on the next animation frame.
pub fn next_frame(f: impl FnOnce() + 'static) {
    let Some(win) = window() else { return };
    let cb = Closure::once_into_js(f);
    let _ = win.request_animation_frame(cb.unchecked_ref());
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Call `tick(timestamp)` on every animation frame, forever.
pub fn frame_loop(mut tick: impl FnMut(f64) + 'static) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        tick(ts);
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
