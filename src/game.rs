//! The "guess the travel companion" card game.
//!
//! `GameSession` owns the card states and the wrong-attempt counter. A click
//! yields a list of timed `Effect`s; the page applies each one when its delay
//! elapses and reports it back through `GameSession::apply`, which is where
//! the delayed card transitions (shaking -> disabled, exploding -> hidden)
//! happen.

use crate::config::GameConfig;

pub const TRY_AGAIN: &str = "Try again! 💭";
pub const FALLBACK_MESSAGE: &str = "Not quite! Try another one.";
pub const HINT_MESSAGE: &str = "Hint: The answer is simple and timeless... ❤️";
pub const SUCCESS_MESSAGE: &str =
    "You guessed it. Love is always the best travel companion. ❤️✈️";

/// Wrong-card label -> feedback shown after the brief "try again".
const WRONG_MESSAGES: &[(&str, &str)] = &[
    ("Guidebook", "Nice guess, but not this one! 🗺️"),
    ("Jacket", "Not quite. Think heart, not weather! ☀️"),
    ("Luggage", "Close, but this journey needs something deeper. ✨"),
    ("Camera", "Good idea, but there's a better answer. 📸"),
];

pub fn message_for(label: &str) -> &'static str {
    WRONG_MESSAGES
        .iter()
        .find(|(l, _)| *l == label.trim())
        .map(|(_, m)| *m)
        .unwrap_or(FALLBACK_MESSAGE)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardKind {
    Correct,
    Wrong,
    /// `data-type` missing or unrecognised; clicks are ignored.
    Unmarked,
}

impl CardKind {
    /// Parse the markup's `data-type` attribute.
    pub fn from_data_type(value: &str) -> Option<Self> {
        match value {
            "correct" => Some(Self::Correct),
            "wrong" => Some(Self::Wrong),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardState {
    Enabled,
    Shaking,
    Disabled,
    Exploding,
    Hidden,
}

#[derive(Clone, Debug)]
pub struct Card {
    pub label: String,
    pub kind: CardKind,
    pub state: CardState,
}

impl Card {
    pub fn new(label: impl Into<String>, kind: CardKind) -> Self {
        Self { label: label.into(), kind, state: CardState::Enabled }
    }
}

/// How the instruction line is styled alongside its text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Success,
}

/// A DOM-level consequence of a click, identified by card index.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Instruction { text: &'static str, tone: Tone },
    Shake(usize),
    Disable(usize),
    Highlight(usize),
    /// Fade/collapse a non-chosen card after success.
    Dismiss(usize),
    /// Scale-and-spin the chosen card.
    Spin(usize),
    /// Remove the chosen card once the spin finished.
    Conceal(usize),
    CollapseGame,
    RevealTicket,
    PinFireworks,
    Celebrate,
    LaunchConfetti,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scheduled {
    pub delay_ms: u32,
    pub effect: Effect,
}

impl Scheduled {
    fn now(effect: Effect) -> Self {
        Self { delay_ms: 0, effect }
    }

    fn after(delay_ms: u32, effect: Effect) -> Self {
        Self { delay_ms, effect }
    }
}

/// Page-lifetime game state.
#[derive(Clone, Debug)]
pub struct GameSession {
    cfg: GameConfig,
    cards: Vec<Card>,
    wrong_attempts: u32,
    hint_shown: bool,
    solved: bool,
}

impl GameSession {
    pub fn new(cfg: GameConfig, cards: Vec<Card>) -> Self {
        Self { cfg, cards, wrong_attempts: 0, hint_shown: false, solved: false }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn wrong_attempts(&self) -> u32 {
        self.wrong_attempts
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn hint_shown(&self) -> bool {
        self.hint_shown
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.cards.iter().position(|c| c.kind == CardKind::Correct)
    }

    /// Handle a click on card `index`. Clicks on unknown cards, cards that
    /// already left `Enabled`, or any card after the game was solved are no-ops.
    pub fn click(&mut self, index: usize) -> Vec<Scheduled> {
        if self.solved {
            return Vec::new();
        }
        let Some(card) = self.cards.get_mut(index) else {
            return Vec::new();
        };
        if card.state != CardState::Enabled {
            return Vec::new();
        }
        match card.kind {
            CardKind::Unmarked => {
                log::debug!("ignoring click on unmarked card '{}'", card.label);
                Vec::new()
            }
            CardKind::Wrong => {
                card.state = CardState::Shaking;
                let message = message_for(&card.label);
                self.wrong_attempts += 1;
                log::info!("wrong guess '{}' ({} so far)", card.label, self.wrong_attempts);
                self.wrong_guess(index, message)
            }
            CardKind::Correct => {
                card.state = CardState::Exploding;
                self.solved = true;
                log::info!("correct guess '{}'", card.label);
                self.success(index)
            }
        }
    }

    fn wrong_guess(&mut self, index: usize, message: &'static str) -> Vec<Scheduled> {
        let mut out = vec![
            Scheduled::now(Effect::Shake(index)),
            Scheduled::now(Effect::Instruction { text: TRY_AGAIN, tone: Tone::Plain }),
        ];
        if self.wrong_attempts >= self.cfg.hint_threshold {
            if let Some(correct) = self.correct_index() {
                out.push(Scheduled::now(Effect::Highlight(correct)));
            }
            out.push(Scheduled::now(Effect::Instruction { text: HINT_MESSAGE, tone: Tone::Plain }));
            if !self.hint_shown {
                log::info!("hint revealed after {} wrong guesses", self.wrong_attempts);
            }
            self.hint_shown = true;
        }
        out.push(Scheduled::after(
            self.cfg.message_delay_ms,
            Effect::Instruction { text: message, tone: Tone::Plain },
        ));
        out.push(Scheduled::after(self.cfg.disable_delay_ms, Effect::Disable(index)));
        out
    }

    fn success(&mut self, index: usize) -> Vec<Scheduled> {
        let mut out = vec![Scheduled::now(Effect::Instruction { text: SUCCESS_MESSAGE, tone: Tone::Success })];
        for (i, card) in self.cards.iter_mut().enumerate() {
            if i != index {
                card.state = CardState::Hidden;
                out.push(Scheduled::now(Effect::Dismiss(i)));
            }
        }
        out.push(Scheduled::now(Effect::Spin(index)));
        let at = self.cfg.reveal_delay_ms;
        out.extend(
            [
                Effect::Conceal(index),
                Effect::CollapseGame,
                Effect::RevealTicket,
                Effect::PinFireworks,
                Effect::Celebrate,
                Effect::LaunchConfetti,
            ]
            .into_iter()
            .map(|e| Scheduled::after(at, e)),
        );
        out
    }

    /// Record that `effect` was applied to the page.
    pub fn apply(&mut self, effect: &Effect) {
        match *effect {
            Effect::Disable(i) => self.set_state(i, CardState::Shaking, CardState::Disabled),
            Effect::Conceal(i) => self.set_state(i, CardState::Exploding, CardState::Hidden),
            _ => {}
        }
    }

    fn set_state(&mut self, index: usize, from: CardState, to: CardState) {
        if let Some(card) = self.cards.get_mut(index) {
            if card.state == from {
                card.state = to;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> GameSession {
        GameSession::new(
            GameConfig::default(),
            vec![
                Card::new("Guidebook", CardKind::Wrong),
                Card::new("Jacket", CardKind::Wrong),
                Card::new("Love", CardKind::Correct),
                Card::new("Luggage", CardKind::Wrong),
                Card::new("Camera", CardKind::Wrong),
            ],
        )
    }

    #[test]
    fn messages_lookup_with_fallback() {
        assert_eq!(message_for("Jacket"), "Not quite. Think heart, not weather! ☀️");
        assert_eq!(message_for(" Camera\n"), "Good idea, but there's a better answer. 📸");
        assert_eq!(message_for("Sunscreen"), FALLBACK_MESSAGE);
    }

    #[test]
    fn data_type_parsing() {
        assert_eq!(CardKind::from_data_type("correct"), Some(CardKind::Correct));
        assert_eq!(CardKind::from_data_type("wrong"), Some(CardKind::Wrong));
        assert_eq!(CardKind::from_data_type(""), None);
    }

    #[test]
    fn wrong_click_goes_shaking_then_disabled() {
        let mut g = deck();
        let fx = g.click(1);
        assert_eq!(g.cards()[1].state, CardState::Shaking);
        let disable = fx.iter().find(|s| s.effect == Effect::Disable(1)).unwrap();
        assert_eq!(disable.delay_ms, 500);
        g.apply(&disable.effect);
        assert_eq!(g.cards()[1].state, CardState::Disabled);
        assert!(g.click(1).is_empty());
        assert_eq!(g.wrong_attempts(), 1);
    }

    #[test]
    fn unmarked_card_is_inert() {
        let mut cards = deck().cards().to_vec();
        cards.push(Card::new("Sunscreen", CardKind::Unmarked));
        let mut g = GameSession::new(GameConfig::default(), cards);
        assert!(g.click(4).is_empty());
        assert!(g.click(4).is_empty());
        assert_eq!(g.wrong_attempts(), 0);
        assert_eq!(g.cards()[4].state, CardState::Enabled);
        assert!(!g.is_solved());
    }

    #[test]
    fn clicks_while_shaking_are_ignored() {
        let mut g = deck();
        g.click(0);
        assert!(g.click(0).is_empty());
        assert_eq!(g.wrong_attempts(), 1);
    }

    #[test]
    fn hint_threshold_is_configurable() {
        let cfg = GameConfig { hint_threshold: 1, ..GameConfig::default() };
        let mut g = GameSession::new(cfg, deck().cards().to_vec());
        let fx = g.click(4);
        assert!(fx.contains(&Scheduled::now(Effect::Highlight(2))));
        assert!(g.hint_shown());
    }

    #[test]
    fn success_dismisses_others_and_finishes() {
        let mut g = deck();
        let fx = g.click(2);
        assert!(g.is_solved());
        let dismissed: Vec<usize> = fx
            .iter()
            .filter_map(|s| match s.effect {
                Effect::Dismiss(i) => Some(i),
                _ => None,
            })
            .collect();
        assert_eq!(dismissed, vec![0, 1, 3, 4]);
        let conceal = Effect::Conceal(2);
        g.apply(&conceal);
        assert!(g.cards().iter().all(|c| c.state == CardState::Hidden));
        assert!(g.click(0).is_empty());
        assert!(g.click(2).is_empty());
    }
}
