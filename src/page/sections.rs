//! Section snapping and reveal/blend wiring.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use super::{PageSession, select_all, timers, viewport, with_session};
use crate::config::PageConfig;
use crate::error::PageResult;
use crate::scroll::{HERO_CLASS, RevealTracker, SECTION_SELECTOR, SectionRect};

/// Elements opted into the reveal animation.
const REVEAL_SELECTOR: &str = ".scroll-reveal";
/// Class added on first reveal; the stylesheet keys the entrance off it.
const VISIBLE_CLASS: &str = "visible";

pub(crate) fn collect(doc: &Document) -> PageResult<Vec<HtmlElement>> {
    select_all(doc, SECTION_SELECTOR)
}

pub(crate) fn tracker(cfg: &PageConfig, sections: &[HtmlElement]) -> RevealTracker {
    let hero = sections.iter().map(|s| s.class_list().contains(HERO_CLASS)).collect();
    RevealTracker::new(cfg.blend.clone(), hero)
}

fn rects(sections: &[HtmlElement]) -> Vec<SectionRect> {
    sections
        .iter()
        .map(|s| {
            let r = s.get_bounding_client_rect();
            SectionRect::new(r.top(), r.height())
        })
        .collect()
}

pub(crate) fn center_in_view(el: &HtmlElement) {
    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(ScrollBehavior::Smooth);
    opts.set_block(ScrollLogicalPosition::Center);
    el.scroll_into_view_with_scroll_into_view_options(&opts);
}

fn passive() -> AddEventListenerOptions {
    let opts = AddEventListenerOptions::new();
    opts.set_passive(true);
    opts
}

pub(crate) fn listen(win: &Window, doc: &Document) -> PageResult<()> {
    observe_reveals(doc)?;

    // debounced snap
    {
        let closure = Closure::wrap(Box::new(move || {
            let Some((generation, debounce)) = with_session(|s| (s.snap.note_scroll(), s.snap.debounce_ms())) else {
                return;
            };
            timers::after(debounce as u32, move || try_snap(generation));
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            closure.as_ref().unchecked_ref(),
            &passive(),
        )?;
        closure.forget();
    }

    // blend, at most once per frame
    {
        let closure = Closure::wrap(Box::new(move || {
            if with_session(|s| s.blend_frame.request()).unwrap_or(false) {
                timers::next_frame(update_blend);
            }
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            closure.as_ref().unchecked_ref(),
            &passive(),
        )?;
        closure.forget();
    }

    update_blend();
    Ok(())
}

fn try_snap(generation: u64) {
    let Some(win) = web_sys::window() else { return };
    let (_, vh, scroll_y) = viewport(&win);
    let now = timers::now();
    with_session(|s| {
        let rects = rects(&s.sections);
        if let Some(snap) = s.snap.scroll_settled(generation, now, scroll_y, vh, &rects) {
            log::info!("snap to section {} ({:?})", snap.index, snap.direction);
            if let Some(el) = s.sections.get(snap.index) {
                center_in_view(el);
            }
        }
    });
}

fn update_blend() {
    let Some(win) = web_sys::window() else { return };
    let (_, vh, _) = viewport(&win);
    with_session(|s: &mut PageSession| {
        s.blend_frame.complete();
        let rects = rects(&s.sections);
        for (i, style) in s.reveal.blends(&rects, vh) {
            let css = s.sections[i].style();
            let _ = css.set_property("--scroll-blend", &style.blend.to_string());
            let _ = css.set_property("--scroll-scale", &style.scale.to_string());
        }
    });
}

/// Mark `.scroll-reveal` elements visible the first time they intersect.
fn observe_reveals(doc: &Document) -> PageResult<()> {
    let targets = select_all(doc, REVEAL_SELECTOR)?;
    let thresholds = with_session(|s| s.reveal.thresholds().to_vec()).unwrap_or_default();

    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _obs: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
            if !entry.is_intersecting() {
                continue;
            }
            let target = entry.target();
            let _ = target.class_list().add_1(VISIBLE_CLASS);
            let ratio = entry.intersection_ratio().max(f64::MIN_POSITIVE);
            with_session(|s| {
                if let Some(i) = s.sections.iter().position(|el| AsRef::<web_sys::Element>::as_ref(el) == &target) {
                    if s.reveal.observe(i, ratio) {
                        log::debug!("section {i} revealed");
                    }
                }
            });
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    let list: js_sys::Array = thresholds.iter().map(|t| JsValue::from_f64(*t)).collect();
    init.set_threshold(&list);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    for el in &targets {
        observer.observe(el);
    }
    Ok(())
}
