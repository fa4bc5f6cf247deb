//! Ambient emoji that drift up the page behind the content.

use rand::Rng;
use rand::seq::SliceRandom;

pub const FLOATER_CLASS: &str = "floating-emoji";

pub const GLYPHS: &[&str] = &["❤️", "✨", "💙", "💛", "🥂", "🌸", "✈️", "🌴"];

#[derive(Clone, Debug, PartialEq)]
pub struct Floater {
    pub glyph: &'static str,
    pub left_vw: f64,
    pub size_px: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl Floater {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            glyph: GLYPHS.choose(rng).copied().unwrap_or("✨"),
            left_vw: rng.gen_range(0.0..100.0),
            size_px: rng.gen_range(20.0..40.0),
            duration_s: rng.gen_range(10.0..20.0),
            delay_s: rng.gen_range(0.0..5.0),
        }
    }

    /// Inline style for the floater element.
    pub fn style(&self) -> String {
        format!(
            "left:{}vw;font-size:{}px;line-height:1;animation-duration:{}s;animation-delay:{}s",
            self.left_vw, self.size_px, self.duration_s, self.delay_s
        )
    }
}
