// Snap and blend behaviour against a simulated tall page.

use bon_voyage::config::{BlendConfig, SnapConfig};
use bon_voyage::scroll::{RevealTracker, SectionRect, SnapController, SnapState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VH: f64 = 800.0;
const HEIGHTS: [f64; 6] = [800.0, 600.0, 900.0, 500.0, 1200.0, 700.0];

/// Viewport-relative rects for a document scrolled to `scroll_y`.
fn layout(scroll_y: f64) -> Vec<SectionRect> {
    let mut top = 0.0;
    HEIGHTS
        .iter()
        .map(|h| {
            let r = SectionRect::new(top - scroll_y, *h);
            top += h;
            r
        })
        .collect()
}

#[test]
fn never_snaps_while_settling_and_idles_after_900ms() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut snap = SnapController::new(SnapConfig::default(), 0.0);
    let mut now = 0.0;
    let mut last_snap: Option<f64> = None;
    let mut snaps = 0;
    for _ in 0..2000 {
        now += rng.gen_range(5.0..400.0);
        let scroll_y = rng.gen_range(0.0..4000.0);
        let generation = snap.note_scroll();
        let state = snap.state(now);
        match last_snap {
            Some(t) if now - t < 900.0 => assert_eq!(state, SnapState::Snapping { since: t }),
            _ => assert_eq!(state, SnapState::Idle),
        }
        if let Some(hit) = snap.scroll_settled(generation, now, scroll_y, VH, &layout(scroll_y)) {
            assert!(last_snap.is_none_or(|t| now - t >= 900.0), "re-entrant snap at {now}");
            assert!(hit.index < HEIGHTS.len());
            last_snap = Some(now);
            snaps += 1;
        }
    }
    assert!(snaps > 10);
}

#[test]
fn snapped_section_is_off_centre_by_more_than_tolerance() {
    let mut snap = SnapController::new(SnapConfig::default(), 0.0);
    let mut now = 0.0;
    for step in 1..200 {
        now += 1000.0;
        let scroll_y = step as f64 * 37.0;
        let rects = layout(scroll_y);
        if let Some(hit) = snap.evaluate(now, scroll_y, VH, &rects) {
            assert!((rects[hit.index].center() - VH / 2.0).abs() > VH * 0.08);
        }
    }
}

#[test]
fn revealed_sections_stay_revealed_and_blend_in_range() {
    let mut tracker = RevealTracker::new(BlendConfig::default(), vec![true, false, false, false, false, false]);
    let mut rng = StdRng::seed_from_u64(5);
    let mut ever = vec![false; HEIGHTS.len()];
    for _ in 0..500 {
        let scroll_y = rng.gen_range(0.0..4000.0);
        let rects = layout(scroll_y);
        for (i, r) in rects.iter().enumerate() {
            let visible = (r.bottom().min(VH) - r.top.max(0.0)).max(0.0) / r.height;
            tracker.observe(i, visible);
            ever[i] |= visible > 0.0;
            assert_eq!(tracker.is_revealed(i), ever[i]);
        }
        for (_, style) in tracker.blends(&rects, VH) {
            assert!((0.75..=1.0).contains(&style.blend));
            assert!((0.98..=1.0).contains(&style.scale));
        }
    }
}
