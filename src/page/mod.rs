//! Browser glue: finds the page's elements, owns the page-lifetime session and
//! translates controller decisions into DOM mutations.
//!
//! Everything runs on the UI thread. The session lives in a `thread_local!`
//! and is only borrowed for the duration of one event handler, frame or timer
//! callback; no callback holds the borrow across a scheduling point.

use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window, window};

use crate::config::PageConfig;
use crate::error::{PageError, PageResult};
use crate::fireworks::FireworkShow;
use crate::game::GameSession;
use crate::scroll::{FrameThrottle, RevealTracker, SnapController};

mod canvas;
mod cards;
mod decor;
mod sections;
pub mod timers;

pub(crate) struct PageSession {
    cfg: PageConfig,
    rng: SmallRng,
    show: FireworkShow,
    fireworks: canvas::FireworksCanvas,
    snap: SnapController,
    reveal: RevealTracker,
    blend_frame: FrameThrottle,
    sections: Vec<HtmlElement>,
    game: GameSession,
    cards: Vec<HtmlElement>,
}

thread_local! {
    static PAGE: RefCell<Option<PageSession>> = const { RefCell::new(None) };
}

/// Borrow the session for one callback. `None` before `start` ran.
pub(crate) fn with_session<T>(f: impl FnOnce(&mut PageSession) -> T) -> Option<T> {
    PAGE.with(|cell| cell.borrow_mut().as_mut().map(f))
}

pub(crate) fn win() -> PageResult<Window> {
    window().ok_or(PageError::NoWindow)
}

pub(crate) fn doc() -> PageResult<Document> {
    win()?.document().ok_or(PageError::NoDocument)
}

/// `innerWidth`, `innerHeight` and `scrollY` of the window.
pub(crate) fn viewport(win: &Window) -> (f64, f64, f64) {
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let y = win.scroll_y().unwrap_or(0.0);
    (w, h, y)
}

/// All elements matching `selector`, in document order, as `HtmlElement`s.
pub(crate) fn select_all(doc: &Document, selector: &str) -> PageResult<Vec<HtmlElement>> {
    let list = doc.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
        .collect())
}

pub(crate) fn select(doc: &Document, selector: &str) -> Option<HtmlElement> {
    doc.query_selector(selector).ok().flatten().and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

pub(crate) fn by_id(doc: &Document, id: &str) -> Option<Element> {
    doc.get_element_by_id(id)
}

pub(crate) fn set_styles(el: &HtmlElement, props: &[(&str, &str)]) {
    let style = el.style();
    for (k, v) in props {
        let _ = style.set_property(k, v);
    }
}

/// Attach every behaviour to the already-parsed document.
pub fn start(cfg: PageConfig) -> PageResult<()> {
    let win = win()?;
    let doc = doc()?;
    let (vw, vh, scroll_y) = viewport(&win);

    let fireworks = canvas::FireworksCanvas::attach(&doc, vw, vh)?;
    let show = FireworkShow::new(cfg.fireworks.clone(), SmallRng::from_entropy(), vw, vh);

    let sections = sections::collect(&doc)?;
    let reveal = sections::tracker(&cfg, &sections);
    let (game, cards) = cards::collect(&doc, &cfg)?;
    log::info!("page start: {} sections, {} cards", sections.len(), cards.len());

    let session = PageSession {
        snap: SnapController::new(cfg.snap.clone(), scroll_y),
        reveal,
        blend_frame: FrameThrottle::default(),
        rng: SmallRng::from_entropy(),
        show,
        fireworks,
        sections,
        game,
        cards,
        cfg,
    };
    PAGE.with(|cell| cell.replace(Some(session)));

    sections::listen(&win, &doc)?;
    cards::listen()?;
    canvas::listen(&win)?;
    decor::media_loading(&doc)?;
    decor::start_floaters();
    canvas::run();
    if let Some(body) = doc.body() {
        decor::parse_emoji(&body);
    }
    Ok(())
}

// --- JS surface --------------------------------------------------------------

/// Queue a celebration burst of rockets.
#[wasm_bindgen]
pub fn celebrate() {
    let now = timers::now();
    if with_session(|s| s.show.celebrate(now)).is_some() {
        log::info!("celebration burst queued");
    }
}

/// Inline `onclick="handleCardClick(this)"` entry point.
#[wasm_bindgen(js_name = handleCardClick)]
pub fn handle_card_click(element: HtmlElement) {
    cards::click_element(&element);
}

#[wasm_bindgen(js_name = launchConfetti)]
pub fn launch_confetti() {
    cards::launch_confetti();
}
