//! Confetti burst planning. Each piece is an `<img>` that flies up from the
//! bottom edge; this module only decides where, how big and how far.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;

use crate::config::ConfettiConfig;

/// Rounded red square with a gold dot.
pub const CONFETTI_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 36 36"><rect width="36" height="36" rx="6" fill="#ff6b6b"/><circle cx="18" cy="18" r="8" fill="#f5d04c"/></svg>"##;

/// Bytes `encodeURIComponent` escapes: everything but `A-Za-z0-9-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `data:` URI for `CONFETTI_SVG`, percent-encoded like `encodeURIComponent`.
pub fn confetti_src() -> String {
    format!("data:image/svg+xml,{}", utf8_percent_encode(CONFETTI_SVG, URI_COMPONENT))
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiPiece {
    /// Offset from the start of the burst.
    pub delay_ms: u32,
    pub left_px: f64,
    pub size_px: f64,
    /// Upward travel in viewport-height units.
    pub rise_vh: f64,
    pub rotate_deg: f64,
}

impl ConfettiPiece {
    /// Final CSS transform once the flight starts.
    pub fn flight_transform(&self) -> String {
        format!("translateY(-{}vh) rotate({}deg)", self.rise_vh, self.rotate_deg)
    }
}

pub fn plan_burst<R: Rng>(cfg: &ConfettiConfig, viewport_w: f64, rng: &mut R) -> Vec<ConfettiPiece> {
    (0..cfg.pieces)
        .map(|i| ConfettiPiece {
            delay_ms: i as u32 * cfg.stagger_ms,
            left_px: rng.gen_range(0.0..viewport_w.max(1.0)),
            size_px: rng.gen_range(24.0..44.0),
            rise_vh: rng.gen_range(20.0..100.0),
            rotate_deg: rng.gen_range(0.0..720.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn burst_is_staggered_and_bounded() {
        let cfg = ConfettiConfig::default();
        let plan = plan_burst(&cfg, 390.0, &mut StdRng::seed_from_u64(5));
        assert_eq!(plan.len(), 50);
        assert_eq!(plan[0].delay_ms, 0);
        assert_eq!(plan[49].delay_ms, 2450);
        for p in &plan {
            assert!((0.0..390.0).contains(&p.left_px));
            assert!((24.0..44.0).contains(&p.size_px));
            assert!((20.0..100.0).contains(&p.rise_vh));
            assert!((0.0..720.0).contains(&p.rotate_deg));
        }
    }

    #[test]
    fn src_is_uri_encoded() {
        let src = confetti_src();
        assert!(src.starts_with("data:image/svg+xml,%3Csvg%20xmlns%3D%22http%3A%2F%2F"));
        assert!(!src[19..].contains(['<', '"', ' ', '#']));
        assert!(src.ends_with("%3C%2Fsvg%3E"));
    }

    #[test]
    fn unreserved_marks_pass_through() {
        let encoded = utf8_percent_encode("a-b_c.d!e~f*g'h(i)j k/é", URI_COMPONENT).to_string();
        assert_eq!(encoded, "a-b_c.d!e~f*g'h(i)j%20k%2F%C3%A9");
    }

    #[test]
    fn transform_format() {
        let p = ConfettiPiece { delay_ms: 0, left_px: 0.0, size_px: 30.0, rise_vh: 42.5, rotate_deg: 90.0 };
        assert_eq!(p.flight_transform(), "translateY(-42.5vh) rotate(90deg)");
    }
}
