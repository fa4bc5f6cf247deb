//! Scroll-driven controllers: section snapping and the reveal/blend emphasis.
//!
//! Both work on plain viewport-relative rectangles so they can be driven from
//! `getBoundingClientRect()` in the browser and from hand-built layouts in
//! tests. Time is passed in explicitly (ms, `performance.now()` clock).

use crate::config::{BlendConfig, SnapConfig};

/// Section classes the page snaps between and blends, in markup order.
pub const SECTION_SELECTOR: &str =
    ".hero, .video-section, .intro-section, .timeline-item, .love-note-section, .present-section";

/// Class that marks the always-eligible hero section.
pub const HERO_CLASS: &str = "hero";

/// Viewport-relative vertical extent of a section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionRect {
    pub top: f64,
    pub height: f64,
}

impl SectionRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

// --- Snap --------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapState {
    Idle,
    /// A snap was issued at `since`; ends `settle_ms` later.
    Snapping { since: f64 },
}

/// A committed snap decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snap {
    pub index: usize,
    pub direction: Direction,
}

/// Debounced, re-entrancy-guarded section snapping.
///
/// Call `note_scroll` on every scroll event and hand the returned generation
/// to `scroll_settled` from a timer scheduled `debounce_ms` later; only the
/// timer carrying the latest generation evaluates.
#[derive(Clone, Debug)]
pub struct SnapController {
    cfg: SnapConfig,
    state: SnapState,
    last_scroll_y: f64,
    generation: u64,
    pending: bool,
}

impl SnapController {
    pub fn new(cfg: SnapConfig, initial_scroll_y: f64) -> Self {
        Self { cfg, state: SnapState::Idle, last_scroll_y: initial_scroll_y, generation: 0, pending: false }
    }

    pub fn debounce_ms(&self) -> f64 {
        self.cfg.debounce_ms
    }

    /// Current state at `now`; a snap older than the settle window reads as Idle.
    pub fn state(&mut self, now: f64) -> SnapState {
        if let SnapState::Snapping { since } = self.state {
            if now - since >= self.cfg.settle_ms {
                self.state = SnapState::Idle;
            }
        }
        self.state
    }

    /// Supersedes every earlier debounce timer.
    pub fn note_scroll(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = true;
        self.generation
    }

    /// Debounce timer for `generation` fired. Evaluates only when no scroll
    /// event arrived after the one that scheduled it.
    pub fn scroll_settled(
        &mut self,
        generation: u64,
        now: f64,
        scroll_y: f64,
        viewport_h: f64,
        sections: &[SectionRect],
    ) -> Option<Snap> {
        if !self.pending || generation != self.generation {
            return None;
        }
        self.pending = false;
        self.evaluate(now, scroll_y, viewport_h, sections)
    }

    /// Decide whether to snap, and enter Snapping if so. Ignored while a
    /// previous snap is still settling.
    pub fn evaluate(
        &mut self,
        now: f64,
        scroll_y: f64,
        viewport_h: f64,
        sections: &[SectionRect],
    ) -> Option<Snap> {
        if self.state(now) != SnapState::Idle {
            return None;
        }
        let direction = if scroll_y > self.last_scroll_y { Direction::Down } else { Direction::Up };
        self.last_scroll_y = scroll_y;

        let index = snap_candidate(direction, viewport_h, self.cfg.threshold, sections)?;
        let off_center = (sections[index].center() - viewport_h / 2.0).abs();
        if off_center <= viewport_h * self.cfg.center_tolerance {
            return None;
        }
        self.state = SnapState::Snapping { since: now };
        Some(Snap { index, direction })
    }
}

/// Section to snap to for a scroll in `direction`.
///
/// Down: the last section whose top is above the commit line. Up: the first
/// section whose bottom is still below the mirrored commit line.
pub fn snap_candidate(
    direction: Direction,
    viewport_h: f64,
    threshold: f64,
    sections: &[SectionRect],
) -> Option<usize> {
    let line = viewport_h * threshold;
    match direction {
        Direction::Down => sections.iter().rposition(|r| r.top < line),
        Direction::Up => sections.iter().position(|r| r.bottom() > viewport_h - line),
    }
}

// --- Reveal / blend ----------------------------------------------------------

/// Presentation parameters written to `--scroll-blend` / `--scroll-scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendStyle {
    pub blend: f64,
    pub scale: f64,
}

/// Emphasis for a section whose centre is `distance` px from the viewport centre.
pub fn blend_for_distance(cfg: &BlendConfig, distance: f64, viewport_h: f64) -> BlendStyle {
    let max_distance = (viewport_h * cfg.reach).max(f64::EPSILON);
    // max/min rather than clamp: an overridden floor above 1 or NaN must not panic
    let blend = (1.0 - (distance.abs() / max_distance) * (1.0 - cfg.floor)).max(cfg.floor).min(1.0);
    let scale = cfg.scale_base + blend * (1.0 - cfg.scale_base);
    BlendStyle { blend, scale }
}

/// One-way reveal marking plus blend recomputation for the tracked sections.
#[derive(Clone, Debug)]
pub struct RevealTracker {
    cfg: BlendConfig,
    revealed: Vec<bool>,
    always: Vec<bool>,
}

impl RevealTracker {
    /// `always_eligible[i]` marks sections blended even before reveal (the hero).
    pub fn new(cfg: BlendConfig, always_eligible: Vec<bool>) -> Self {
        Self { cfg, revealed: vec![false; always_eligible.len()], always: always_eligible }
    }

    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.cfg.reveal_thresholds
    }

    /// Record an intersection observation. Returns true on the first reveal.
    pub fn observe(&mut self, index: usize, ratio: f64) -> bool {
        match self.revealed.get_mut(index) {
            Some(flag) if !*flag && ratio > 0.0 => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn is_eligible(&self, index: usize) -> bool {
        self.is_revealed(index) || self.always.get(index).copied().unwrap_or(false)
    }

    /// Blend for every eligible section; `rects` is indexed like the tracker.
    pub fn blends(&self, rects: &[SectionRect], viewport_h: f64) -> Vec<(usize, BlendStyle)> {
        let center = viewport_h / 2.0;
        rects
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_eligible(*i))
            .map(|(i, r)| (i, blend_for_distance(&self.cfg, r.center() - center, viewport_h)))
            .collect()
    }
}

/// At-most-once-per-frame guard for scroll work.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    /// True when the caller should request a frame.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    pub fn complete(&mut self) {
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f64 = 1000.0;

    /// Five stacked full-height sections, document scrolled by `scroll`.
    fn stacked(scroll: f64) -> Vec<SectionRect> {
        (0..5).map(|i| SectionRect::new(i as f64 * VH - scroll, VH)).collect()
    }

    #[test]
    fn down_picks_last_section_past_midpoint() {
        // section 1 top at 400 (< 500), section 2 top at 1400
        let idx = snap_candidate(Direction::Down, VH, 0.5, &stacked(600.0));
        assert_eq!(idx, Some(1));
        let idx = snap_candidate(Direction::Down, VH, 0.5, &stacked(400.0));
        assert_eq!(idx, Some(0));
    }

    #[test]
    fn up_picks_first_section_below_midpoint() {
        // section 0 bottom at 400 (not > 500), section 1 bottom at 1400
        assert_eq!(snap_candidate(Direction::Up, VH, 0.5, &stacked(600.0)), Some(1));
        assert_eq!(snap_candidate(Direction::Up, VH, 0.5, &stacked(400.0)), Some(0));
    }

    #[test]
    fn centred_section_is_not_resnapped() {
        let mut snap = SnapController::new(SnapConfig::default(), 0.0);
        // section 1 centred within 8%: centre at 500 + 50
        assert_eq!(snap.evaluate(0.0, 950.0, VH, &stacked(950.0)), None);
        assert_eq!(snap.state(0.0), SnapState::Idle);
    }

    #[test]
    fn snap_commits_and_blocks_reentry_until_settled() {
        let mut snap = SnapController::new(SnapConfig::default(), 0.0);
        let hit = snap.evaluate(100.0, 600.0, VH, &stacked(600.0));
        assert_eq!(hit, Some(Snap { index: 1, direction: Direction::Down }));
        assert_eq!(snap.state(100.0), SnapState::Snapping { since: 100.0 });
        assert_eq!(snap.evaluate(500.0, 1700.0, VH, &stacked(1700.0)), None);
        assert_eq!(snap.state(999.9), SnapState::Snapping { since: 100.0 });
        assert_eq!(snap.state(1000.0), SnapState::Idle);
        assert!(snap.evaluate(1000.0, 1700.0, VH, &stacked(1700.0)).is_some());
    }

    #[test]
    fn debounce_only_fires_for_latest_event() {
        let mut snap = SnapController::new(SnapConfig::default(), 0.0);
        let first = snap.note_scroll();
        let latest = snap.note_scroll();
        assert_eq!(snap.scroll_settled(first, 200.0, 600.0, VH, &stacked(600.0)), None);
        assert!(snap.scroll_settled(latest, 350.0, 600.0, VH, &stacked(600.0)).is_some());
        // consumed: a repeat of the same timer does nothing
        assert_eq!(snap.scroll_settled(latest, 2000.0, 1700.0, VH, &stacked(1700.0)), None);
    }

    #[test]
    fn latest_timer_snaps_even_when_clock_reads_early() {
        // events at 0 and 10.1 ms; coarse performance.now() reads 210.0 when
        // the second event's 200 ms timer fires
        let mut snap = SnapController::new(SnapConfig::default(), 0.0);
        snap.note_scroll();
        let latest = snap.note_scroll();
        let hit = snap.scroll_settled(latest, 210.0, 600.0, VH, &stacked(600.0));
        assert_eq!(hit, Some(Snap { index: 1, direction: Direction::Down }));
    }

    #[test]
    fn direction_follows_previous_evaluation() {
        let mut snap = SnapController::new(SnapConfig::default(), 2000.0);
        let hit = snap.evaluate(0.0, 1400.0, VH, &stacked(1400.0)).unwrap();
        assert_eq!(hit.direction, Direction::Up);
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn blend_bounds() {
        let cfg = BlendConfig::default();
        let centred = blend_for_distance(&cfg, 0.0, VH);
        assert_eq!(centred, BlendStyle { blend: 1.0, scale: 1.0 });
        for d in [-5000.0, -900.0, -450.0, 10.0, 450.0, 900.0, 1e9] {
            let s = blend_for_distance(&cfg, d, VH);
            assert!((0.75..=1.0).contains(&s.blend), "{d}: {s:?}");
            assert!((0.98..=1.0).contains(&s.scale), "{d}: {s:?}");
        }
        let half = blend_for_distance(&cfg, 450.0, VH);
        assert!((half.blend - 0.875).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_floor_stays_bounded() {
        for floor in [1.5, f64::NAN, -2.0] {
            let cfg = BlendConfig { floor, ..BlendConfig::default() };
            for d in [0.0, 300.0, 5000.0] {
                let s = blend_for_distance(&cfg, d, VH);
                assert!(s.blend <= 1.0, "floor {floor}, d {d}: {s:?}");
            }
        }
    }

    #[test]
    fn reveal_is_monotonic_and_hero_always_blends() {
        let mut t = RevealTracker::new(BlendConfig::default(), vec![true, false, false]);
        assert!(!t.observe(1, 0.0));
        assert!(t.observe(1, 0.1));
        assert!(!t.observe(1, 0.7));
        assert!(!t.observe(1, 0.0));
        assert!(t.is_revealed(1));
        assert!(!t.observe(9, 1.0));
        let rects = [SectionRect::new(0.0, VH), SectionRect::new(VH, VH), SectionRect::new(2.0 * VH, VH)];
        let ids: Vec<usize> = t.blends(&rects, VH).into_iter().map(|(i, _)| i).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn throttle_coalesces_until_frame_runs() {
        let mut th = FrameThrottle::default();
        assert!(th.request());
        assert!(!th.request());
        th.complete();
        assert!(th.request());
    }
}
