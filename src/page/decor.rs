//! Page decoration: media loading overlays, drifting emoji and optional
//! twemoji normalisation.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Element};

use super::{by_id, doc, timers, with_session};
use crate::error::PageResult;
use crate::floaters::{FLOATER_CLASS, Floater};

const YOUTUBE_LOADING_ID: &str = "youtube-loading";
const LOVE_VIDEO_LOADING_ID: &str = "love-video-loading";
const LOVE_VIDEO_SELECTOR: &str = ".love-note-section video";
const YOUTUBE_IFRAME_SELECTOR: &str = ".video-wrapper iframe";
/// The embed's `load` event is unreliable; hide the overlay regardless after this.
const YOUTUBE_LOADING_TIMEOUT_MS: u32 = 5000;

fn hide_loading(id: &str) {
    let Ok(doc) = doc() else { return };
    if let Some(el) = by_id(&doc, id) {
        let _ = el.class_list().add_1("loaded");
        let _ = el.set_attribute("aria-hidden", "true");
    }
}

fn once_listener(target: &Element, event: &str, f: impl FnOnce() + 'static) -> PageResult<()> {
    let opts = AddEventListenerOptions::new();
    opts.set_once(true);
    let cb = Closure::once_into_js(f);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        cb.unchecked_ref(),
        &opts,
    )?;
    Ok(())
}

pub(crate) fn media_loading(doc: &Document) -> PageResult<()> {
    match doc.query_selector(LOVE_VIDEO_SELECTOR)? {
        Some(video) => {
            once_listener(&video, "canplay", || hide_loading(LOVE_VIDEO_LOADING_ID))?;
            once_listener(&video, "loadeddata", || hide_loading(LOVE_VIDEO_LOADING_ID))?;
        }
        None => log::debug!("no {LOVE_VIDEO_SELECTOR}"),
    }
    match doc.query_selector(YOUTUBE_IFRAME_SELECTOR)? {
        Some(iframe) => {
            once_listener(&iframe, "load", || hide_loading(YOUTUBE_LOADING_ID))?;
            timers::after(YOUTUBE_LOADING_TIMEOUT_MS, || hide_loading(YOUTUBE_LOADING_ID));
        }
        None => log::debug!("no {YOUTUBE_IFRAME_SELECTOR}"),
    }
    Ok(())
}

fn spawn_floater() {
    let Some((floater, lifetime)) =
        with_session(|s| (Floater::random(&mut s.rng), s.cfg.floaters.lifetime_ms))
    else {
        return;
    };
    let Ok(doc) = doc() else { return };
    let (Ok(el), Some(body)) = (doc.create_element("div"), doc.body()) else { return };
    el.set_text_content(Some(floater.glyph));
    el.set_class_name(FLOATER_CLASS);
    let _ = el.set_attribute("style", &floater.style());
    if body.append_child(&el).is_err() {
        return;
    }
    timers::after(lifetime, move || el.remove());
}

pub(crate) fn start_floaters() {
    let Some(cfg) = with_session(|s| s.cfg.floaters.clone()) else { return };
    for i in 0..cfg.initial {
        timers::after(i as u32 * cfg.initial_stagger_ms, spawn_floater);
    }
    timers::every(cfg.interval_ms, spawn_floater);
}

/// Run `twemoji.parse(target, {folder: "svg", ext: ".svg"})` when the library
/// is loaded; silently skipped otherwise.
pub(crate) fn parse_emoji(target: &JsValue) {
    let global = js_sys::global();
    let Ok(twemoji) = js_sys::Reflect::get(&global, &JsValue::from_str("twemoji")) else { return };
    if twemoji.is_undefined() || twemoji.is_null() {
        return;
    }
    let Ok(parse) = js_sys::Reflect::get(&twemoji, &JsValue::from_str("parse")) else { return };
    let Ok(parse) = parse.dyn_into::<js_sys::Function>() else { return };
    let opts = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&opts, &"folder".into(), &"svg".into());
    let _ = js_sys::Reflect::set(&opts, &"ext".into(), &".svg".into());
    if let Err(e) = parse.call2(&twemoji, target, &opts) {
        log::warn!("twemoji.parse failed: {e:?}");
    }
}
