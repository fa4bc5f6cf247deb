//! Card game wiring: click handling, timed effect application and the
//! confetti burst of the finale.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlImageElement};

use super::{PageSession, decor, doc, select, select_all, sections, set_styles, timers, with_session};
use crate::config::PageConfig;
use crate::confetti::{ConfettiPiece, confetti_src, plan_burst};
use crate::error::PageResult;
use crate::game::{Card, CardKind, Effect, GameSession, Scheduled, Tone};

const CARD_SELECTOR: &str = ".card";
const INSTRUCTION_SELECTOR: &str = ".game-instruction";
const CONTAINER_SELECTOR: &str = ".game-container";
const TICKET_ID: &str = "ticket-reveal";
const DISABLED_CLASS: &str = "disabled";
const SHAKE_CLASS: &str = "shake";

pub(crate) fn collect(doc: &Document, cfg: &PageConfig) -> PageResult<(GameSession, Vec<HtmlElement>)> {
    let elements = select_all(doc, CARD_SELECTOR)?;
    let cards = elements
        .iter()
        .map(|el| {
            let label = el
                .query_selector("h3")
                .ok()
                .flatten()
                .and_then(|h| h.dyn_into::<HtmlElement>().ok())
                .map(|h| h.inner_text())
                .unwrap_or_default();
            let kind = el.get_attribute("data-type").and_then(|t| CardKind::from_data_type(&t));
            let kind = kind.unwrap_or_else(|| {
                log::debug!("card '{label}' has no usable data-type");
                CardKind::Unmarked
            });
            Card::new(label, kind)
        })
        .collect();
    Ok((GameSession::new(cfg.game.clone(), cards), elements))
}

/// Wire every card unless the markup already routes clicks through the
/// exported `handleCardClick`.
pub(crate) fn listen() -> PageResult<()> {
    let cards = with_session(|s| s.cards.clone()).unwrap_or_default();
    for el in cards {
        if el.has_attribute("onclick") {
            continue;
        }
        let target = el.clone();
        let closure = Closure::wrap(Box::new(move || click_element(&target)) as Box<dyn FnMut()>);
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

pub(crate) fn click_element(element: &HtmlElement) {
    let scheduled = with_session(|s| {
        let index = s.cards.iter().position(|c| c == element)?;
        Some(s.game.click(index))
    })
    .flatten()
    .unwrap_or_default();
    dispatch(scheduled);
}

fn dispatch(scheduled: Vec<Scheduled>) {
    for Scheduled { delay_ms, effect } in scheduled {
        if delay_ms == 0 {
            run_effect(effect);
        } else {
            timers::after(delay_ms, move || run_effect(effect));
        }
    }
}

fn run_effect(effect: Effect) {
    let follow_up = with_session(|s| {
        s.game.apply(&effect);
        apply(s, &effect)
    });
    match follow_up {
        Some(FollowUp::Confetti) => launch_confetti(),
        Some(FollowUp::ParseEmoji(el)) => decor::parse_emoji(&el),
        _ => {}
    }
}

/// Work that must run after the session borrow is released.
enum FollowUp {
    Nothing,
    Confetti,
    ParseEmoji(HtmlElement),
}

fn apply(s: &mut PageSession, effect: &Effect) -> FollowUp {
    let Ok(doc) = doc() else { return FollowUp::Nothing };
    let cards = s.cards.clone();
    let card = |i: usize| cards.get(i).cloned();
    match *effect {
        Effect::Instruction { text, tone } => {
            let Some(el) = select(&doc, INSTRUCTION_SELECTOR) else {
                log::debug!("no {INSTRUCTION_SELECTOR}");
                return FollowUp::Nothing;
            };
            el.set_inner_text(text);
            match tone {
                Tone::Plain => set_styles(&el, &[("color", "")]),
                Tone::Success => {
                    set_styles(&el, &[("color", "var(--accent-red)"), ("font-weight", "bold")]);
                    return FollowUp::ParseEmoji(el);
                }
            }
        }
        Effect::Shake(i) => {
            if let Some(el) = card(i) {
                let _ = el.class_list().add_1(SHAKE_CLASS);
                set_styles(&el, &[("background", "#ffe6e6")]);
            }
        }
        Effect::Disable(i) => {
            if let Some(el) = card(i) {
                let _ = el.class_list().remove_1(SHAKE_CLASS);
                let _ = el.class_list().add_1(DISABLED_CLASS);
                set_styles(&el, &[("opacity", "0.5"), ("cursor", "default")]);
            }
        }
        Effect::Highlight(i) => {
            if let Some(el) = card(i) {
                set_styles(
                    &el,
                    &[
                        ("transition", "all 0.5s ease"),
                        ("box-shadow", "0 0 30px var(--accent-gold)"),
                        ("transform", "scale(1.1)"),
                    ],
                );
            }
        }
        Effect::Dismiss(i) => {
            if let Some(el) = card(i) {
                set_styles(&el, &[("opacity", "0"), ("transform", "scale(0)"), ("pointer-events", "none")]);
            }
        }
        Effect::Spin(i) => {
            if let Some(el) = card(i) {
                set_styles(&el, &[("transition", "transform 0.5s ease"), ("transform", "scale(1.5) rotate(360deg)")]);
            }
        }
        Effect::Conceal(i) => {
            if let Some(el) = card(i) {
                set_styles(&el, &[("opacity", "0"), ("display", "none")]);
            }
        }
        Effect::CollapseGame => {
            if let Some(el) = select(&doc, CONTAINER_SELECTOR) {
                set_styles(&el, &[("display", "none")]);
            }
            if let Some(el) = select(&doc, INSTRUCTION_SELECTOR) {
                set_styles(&el, &[("margin-bottom", "20px")]);
            }
        }
        Effect::RevealTicket => {
            match doc.get_element_by_id(TICKET_ID).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
                Some(ticket) => {
                    let _ = ticket.class_list().remove_1("hidden");
                    let _ = ticket.class_list().add_1("visible");
                    sections::center_in_view(&ticket);
                }
                None => log::debug!("no #{TICKET_ID}"),
            }
        }
        Effect::PinFireworks => s.fireworks.pin_to_viewport(),
        Effect::Celebrate => {
            s.show.celebrate(timers::now());
            log::info!("celebration burst queued");
        }
        Effect::LaunchConfetti => return FollowUp::Confetti,
    }
    FollowUp::Nothing
}

/// Fifty confetti images rising from the bottom edge, staggered.
pub(crate) fn launch_confetti() {
    let Some(plan) = with_session(|s| {
        let vw = web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        (plan_burst(&s.cfg.confetti, vw, &mut s.rng), s.cfg.confetti.clone())
    }) else {
        return;
    };
    let (pieces, cfg) = plan;
    let src = confetti_src();
    for piece in pieces {
        let src = src.clone();
        let cfg = cfg.clone();
        timers::after(piece.delay_ms, move || {
            if let Err(e) = spawn_piece(&piece, &src, cfg.launch_delay_ms, cfg.flight_ms, cfg.lifetime_ms) {
                log::warn!("confetti piece failed: {e}");
            }
        });
    }
}

fn spawn_piece(piece: &ConfettiPiece, src: &str, launch_ms: u32, flight_ms: u32, lifetime_ms: u32) -> PageResult<()> {
    let doc = doc()?;
    let img: HtmlImageElement = doc
        .create_element("img")?
        .dyn_into()
        .map_err(|_| crate::error::PageError::Js("img is not HTMLImageElement".into()))?;
    img.set_src(src);
    img.set_alt("");
    let left = format!("{}px", piece.left_px);
    let size = format!("{}px", piece.size_px);
    let transition = format!("all {}s ease-out", flight_ms as f64 / 1000.0);
    set_styles(
        &img,
        &[
            ("position", "fixed"),
            ("left", left.as_str()),
            ("bottom", "0px"),
            ("width", size.as_str()),
            ("height", size.as_str()),
            ("object-fit", "contain"),
            ("transition", transition.as_str()),
            ("z-index", "9999"),
            ("pointer-events", "none"),
        ],
    );
    if let Some(body) = doc.body() {
        body.append_child(&img)?;
    }

    let flying = img.clone();
    let transform = piece.flight_transform();
    timers::after(launch_ms, move || {
        set_styles(&flying, &[("transform", transform.as_str()), ("opacity", "0")]);
    });
    timers::after(lifetime_ms, move || img.remove());
    Ok(())
}
