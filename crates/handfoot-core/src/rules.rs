//! Rule set: classification, deal sizes, round thresholds and card points.
//!
//! A [`RuleSet`] is passed explicitly to everything that classifies or scores
//! cards, so different variants can be played side by side.

use crate::card::{Card, Color, Rank};
use crate::error::{GameError, Result};
use crate::meld::{Cards, Classifier, MeldMethod};
use serde::{Deserialize, Serialize};

/// Point value of each kind of card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTable {
    pub red_three: i32,
    pub joker: i32,
    pub ace: i32,
    pub two: i32,
    /// Jack, Queen, King and Ten
    pub high: i32,
    /// Everything else
    pub low: i32,
}

impl Default for PointTable {
    fn default() -> Self {
        Self {
            red_three: -300,
            joker: 50,
            ace: 20,
            two: 20,
            high: 10,
            low: 5,
        }
    }
}

impl PointTable {
    pub fn points(&self, card: &Card) -> i32 {
        match card.rank {
            Rank::Three if card.color() == Color::Red => self.red_three,
            Rank::Joker => self.joker,
            Rank::Ace => self.ace,
            Rank::Two => self.two,
            Rank::Ten => self.high,
            rank if rank.is_face_card() => self.high,
            _ => self.low,
        }
    }

    /// Sum of the point values of any card sequence
    pub fn points_of<C: Cards + ?Sized>(&self, cards: &C) -> i32 {
        cards.cards().iter().map(|c| self.points(c)).sum()
    }
}

/// Everything that varies between Hand and Foot variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub classifier: Classifier,
    /// Cards in each hand and each foot
    pub hand_size: usize,
    /// Cards drawn at the start of a turn
    pub draw_count: usize,
    /// Cards of one meld type needed for a complete pile
    pub complete_size: usize,
    /// Smallest meld that can be laid down on its own
    pub min_meld_size: usize,
    /// Points needed to go down in each round; its length is the round limit
    pub round_thresholds: Vec<i32>,
    pub pure_bonus: i32,
    pub dirty_bonus: i32,
    pub points: PointTable,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            classifier: Classifier::default(),
            hand_size: 11,
            draw_count: 2,
            complete_size: 7,
            min_meld_size: 3,
            round_thresholds: vec![50, 75, 100, 150],
            pure_bonus: 300,
            dirty_bonus: 100,
            points: PointTable::default(),
        }
    }
}

impl RuleSet {
    pub fn with_method(method: MeldMethod) -> Self {
        Self {
            classifier: Classifier::with_method(method),
            ..Self::default()
        }
    }

    pub fn max_rounds(&self) -> u8 {
        self.round_thresholds.len().min(u8::MAX as usize) as u8
    }

    /// Points needed to go down in `round` (1-based)
    pub fn round_threshold(&self, round: u8) -> Result<i32> {
        let max = self.max_rounds();
        if round == 0 || round > max {
            return Err(GameError::TooManyRounds { round, max });
        }
        Ok(self.round_thresholds[round as usize - 1])
    }

    pub fn points(&self, card: &Card) -> i32 {
        self.points.points(card)
    }

    pub fn points_of<C: Cards + ?Sized>(&self, cards: &C) -> i32 {
        self.points.points_of(cards)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(GameError::InvalidArguments(msg.to_string()));
        if self.hand_size == 0 {
            return invalid("hand_size must be at least 1");
        }
        if self.draw_count == 0 {
            return invalid("draw_count must be at least 1");
        }
        if self.min_meld_size < 2 {
            return invalid("min_meld_size must be at least 2");
        }
        if self.complete_size < self.min_meld_size {
            return invalid("complete_size must not be smaller than min_meld_size");
        }
        if self.round_thresholds.is_empty() {
            return invalid("at least one round threshold is required");
        }
        if self.round_thresholds.len() > u8::MAX as usize {
            return invalid("too many rounds");
        }
        Ok(())
    }
}
