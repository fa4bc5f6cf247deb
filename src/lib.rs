//! Bon Voyage celebration page.
//!
//! The browser bundle drives a single scrolling page: a fireworks canvas,
//! section snapping with distance-based emphasis, and a small card guessing
//! game whose finale fires a celebration. The controllers (`fireworks`,
//! `scroll`, `game`, `confetti`, `floaters`) are plain Rust and testable on the
//! host; `page` binds them to the DOM. `assets` holds the offline image/video
//! optimizers behind the native binaries.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod confetti;
pub mod error;
pub mod fireworks;
pub mod floaters;
pub mod game;
pub mod page;
pub mod scroll;

#[cfg(not(target_arch = "wasm32"))]
pub mod assets;

pub use config::PageConfig;
pub use error::PageError;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

// -----------------------------------------------------------------------------
// Unified entrypoints
// -----------------------------------------------------------------------------

/// Attach the page behaviour with the built-in timings.
#[wasm_bindgen]
pub fn start_page() -> Result<(), JsValue> {
    page::start(PageConfig::default()).map_err(Into::into)
}

/// Like `start_page`, with a partial JSON override of `PageConfig`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_page_with_config(json: &str) -> Result<(), JsValue> {
    let cfg = PageConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    page::start(cfg).map_err(Into::into)
}
