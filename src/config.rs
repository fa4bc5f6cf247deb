//! Behaviour-defining constants for the page, grouped per controller.
//!
//! Every timing and threshold the page uses lives here so the controllers can
//! be exercised with the exact production values in tests. With the `serde`
//! feature the whole tree deserializes from partial JSON (missing fields fall
//! back to `Default`).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Top-level configuration handed to the page session at start.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PageConfig {
    pub snap: SnapConfig,
    pub blend: BlendConfig,
    pub fireworks: FireworksConfig,
    pub game: GameConfig,
    pub confetti: ConfettiConfig,
    pub floaters: FloaterConfig,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SnapConfig {
    /// Quiet period after the last scroll event before a snap is evaluated.
    pub debounce_ms: f64,
    /// Snapping -> Idle delay, independent of the smooth-scroll animation.
    pub settle_ms: f64,
    /// Fraction of the viewport height used as the commit line (0.5 = midpoint).
    pub threshold: f64,
    /// No snap when the candidate centre is already within this fraction of
    /// the viewport height from the viewport centre.
    pub center_tolerance: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self { debounce_ms: 200.0, settle_ms: 900.0, threshold: 0.5, center_tolerance: 0.08 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BlendConfig {
    pub floor: f64,
    /// Distance (as a fraction of viewport height) at which blend bottoms out.
    pub reach: f64,
    pub scale_base: f64,
    /// Intersection thresholds observed for the reveal marking.
    pub reveal_thresholds: Vec<f64>,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            floor: 0.75,
            reach: 0.9,
            scale_base: 0.98,
            reveal_thresholds: vec![0.0, 0.1, 0.2, 0.3, 0.5, 0.7, 1.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FireworksConfig {
    /// Per-frame launch probability while the page is near the top.
    pub spawn_chance: f64,
    pub rocket_gravity: f64,
    pub spark_gravity: f64,
    pub sparks_per_burst: usize,
    pub celebration_rockets: usize,
    pub celebration_stagger_ms: f64,
    /// Alpha of the `destination-out` fill that fades trails each frame.
    pub trail_fade: f64,
    pub palette: Vec<String>,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.05,
            rocket_gravity: 0.15,
            spark_gravity: 0.05,
            sparks_per_burst: 50,
            celebration_rockets: 10,
            celebration_stagger_ms: 200.0,
            trail_fade: 0.1,
            palette: vec!["#f5d04c".into(), "#ff6b6b".into(), "#7a6ff0".into()],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GameConfig {
    /// Wrong attempts before the correct card is highlighted. Deliberately not
    /// derived from the number of wrong cards in the markup.
    pub hint_threshold: u32,
    pub message_delay_ms: u32,
    pub disable_delay_ms: u32,
    pub reveal_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { hint_threshold: 3, message_delay_ms: 400, disable_delay_ms: 500, reveal_delay_ms: 600 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ConfettiConfig {
    pub pieces: usize,
    pub stagger_ms: u32,
    /// Delay between insertion and the transform that starts the flight.
    pub launch_delay_ms: u32,
    pub flight_ms: u32,
    pub lifetime_ms: u32,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self { pieces: 50, stagger_ms: 50, launch_delay_ms: 50, flight_ms: 2000, lifetime_ms: 2500 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FloaterConfig {
    pub initial: usize,
    pub initial_stagger_ms: u32,
    pub interval_ms: u32,
    pub lifetime_ms: u32,
}

impl Default for FloaterConfig {
    fn default() -> Self {
        Self { initial: 15, initial_stagger_ms: 500, interval_ms: 1500, lifetime_ms: 20_000 }
    }
}

#[cfg(feature = "serde_json")]
impl PageConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
