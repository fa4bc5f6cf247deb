//! Fireworks canvas: sizing, per-frame trail fade and drawing.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use super::{timers, viewport, with_session};
use crate::error::{PageError, PageResult};
use crate::fireworks::FireworkShow;

pub const CANVAS_ID: &str = "fireworksCanvas";
/// Added once the finale pins the canvas to the viewport.
pub const FIXED_CLASS: &str = "fireworks-fixed";

const ROCKET_RADIUS: f64 = 3.0;
const SPARK_RADIUS: f64 = 2.0;

pub(crate) struct FireworksCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl FireworksCanvas {
    /// The canvas is a hard requirement; the page has no fallback without it.
    pub fn attach(doc: &Document, width: f64, height: f64) -> PageResult<Self> {
        let canvas: HtmlCanvasElement = doc
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| PageError::MissingElement(format!("#{CANVAS_ID}")))?
            .dyn_into()
            .map_err(|_| PageError::MissingElement(format!("canvas#{CANVAS_ID}")))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(PageError::NoCanvasContext)?
            .dyn_into()
            .map_err(|_| PageError::NoCanvasContext)?;
        let fc = Self { canvas, ctx };
        fc.resize(width, height);
        Ok(fc)
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    pub fn pin_to_viewport(&self) {
        let _ = self.canvas.class_list().add_1(FIXED_CLASS);
    }

    /// Fade previous frames by erasing a little of everything drawn so far.
    fn fade(&self, width: f64, height: f64, alpha: f64) {
        let ctx = &self.ctx;
        let _ = ctx.set_global_composite_operation("destination-out");
        ctx.set_fill_style(&JsValue::from_str(&format!("rgba(0, 0, 0, {alpha})")));
        ctx.fill_rect(0.0, 0.0, width, height);
        let _ = ctx.set_global_composite_operation("source-over");
    }

    fn dot(&self, x: f64, y: f64, radius: f64, color: &str) {
        let ctx = &self.ctx;
        ctx.set_fill_style(&JsValue::from_str(color));
        ctx.begin_path();
        let _ = ctx.arc(x, y, radius, 0.0, TAU);
        ctx.fill();
    }

    pub fn render(&self, show: &FireworkShow) {
        let (w, h) = show.size();
        self.fade(w, h, show.trail_fade());
        let palette = show.palette();
        let color = |i: usize| palette.get(i).map(String::as_str).unwrap_or("#ffffff");
        for fw in show.fireworks() {
            self.dot(fw.x, fw.y, ROCKET_RADIUS, color(fw.color));
        }
        for p in show.particles() {
            self.ctx.save();
            self.ctx.set_global_alpha(p.opacity.max(0.0));
            self.dot(p.x, p.y, SPARK_RADIUS, color(p.color));
            self.ctx.restore();
        }
    }
}

pub(crate) fn listen(win: &Window) -> PageResult<()> {
    let closure = Closure::wrap(Box::new(move || {
        let Some(win) = web_sys::window() else { return };
        let (w, h, _) = viewport(&win);
        with_session(|s| {
            s.fireworks.resize(w, h);
            s.show.resize(w, h);
        });
    }) as Box<dyn FnMut()>);
    win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Start the unconditional animation loop.
pub(crate) fn run() {
    timers::frame_loop(move |ts| {
        let Some(win) = web_sys::window() else { return };
        let (_, vh, scroll_y) = viewport(&win);
        with_session(|s| {
            let report = s.show.tick(ts, scroll_y, vh);
            if report.detonated > 0 {
                log::debug!("{} rockets burst", report.detonated);
            }
            s.fireworks.render(&s.show);
        });
    });
}
