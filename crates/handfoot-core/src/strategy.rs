//! Player strategy: how aggressively to meld and which card to discard.
//!
//! Discard choice sits behind the [`DiscardRanker`] trait: given the hand, the
//! candidate cards and the player's table state, order the candidates from
//! best to worst discard. [`DiscardPolicy`] provides the two built-in rankers.

use crate::card::Card;
use crate::meld::MeldType;
use crate::player::Player;
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a player starts looking for cards to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawFrom {
    /// The pile in front of the player, then the next ones in turn order
    Closest,
    /// A random pile, then the next ones in turn order
    Random,
}

/// Built-in discard rankers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardPolicy {
    /// A card from the smallest meld in hand
    #[default]
    SmallestMeld,
    /// The least desirable card, see [`desirability`]
    Desirability,
}

/// Orders candidate discards, best discard first
pub trait DiscardRanker {
    fn rank_discards(&self, hand: &[Card], candidates: &[Card], player: &Player, rules: &RuleSet) -> Vec<Card>;
}

impl DiscardRanker for DiscardPolicy {
    fn rank_discards(&self, hand: &[Card], candidates: &[Card], player: &Player, rules: &RuleSet) -> Vec<Card> {
        match self {
            DiscardPolicy::SmallestMeld => smallest_meld_first(hand, candidates, rules),
            DiscardPolicy::Desirability => {
                let mut ranked = candidates.to_vec();
                ranked.sort_by_cached_key(|c| desirability(c, hand, player, rules));
                ranked
            }
        }
    }
}

/// Per-player strategy knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strategy {
    /// Complete a pair with a wildcard once down
    pub laydown_dirty: bool,
    /// Spend wildcards on pairs and singles while playing safe
    pub dirty_for_safety: bool,
    /// Play safe while the player has no complete pile
    pub safe_when_missing_pile: bool,
    /// Play safe while in the foot with more than this many cards in hand
    pub safe_when_hand_gt: usize,
    /// Break desirability ties toward keeping high cards
    pub prefer_high: bool,
    pub draw_from: DrawFrom,
    pub discard: DiscardPolicy,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            laydown_dirty: true,
            dirty_for_safety: true,
            safe_when_missing_pile: true,
            safe_when_hand_gt: 5,
            prefer_high: true,
            draw_from: DrawFrom::Closest,
            discard: DiscardPolicy::default(),
        }
    }
}

impl Strategy {
    /// Whether the player should get cards out of their hand quickly.
    ///
    /// Only applies in the foot, where cards left over at the end of the
    /// round count against the player.
    pub fn plays_safe(&self, in_foot: bool, hand_size: usize, has_complete_pile: bool) -> bool {
        in_foot
            && (hand_size > self.safe_when_hand_gt
                || (self.safe_when_missing_pile && !has_complete_pile))
    }

    /// Whether wildcards may be spent on melds lacking natural cards
    pub fn allows_dirty(&self, plays_safe: bool) -> bool {
        self.laydown_dirty || (self.dirty_for_safety && plays_safe)
    }
}

fn smallest_meld_first(hand: &[Card], candidates: &[Card], rules: &RuleSet) -> Vec<Card> {
    let classifier = &rules.classifier;
    let rank: HashMap<MeldType, (usize, usize)> = classifier
        .partition(hand, false)
        .into_iter()
        .enumerate()
        .map(|(order, meld)| (meld.meld_type.clone(), (meld.len(), order)))
        .collect();

    let mut ranked = candidates.to_vec();
    ranked.sort_by_cached_key(|c| {
        rank.get(&classifier.meld_type(c))
            .copied()
            .unwrap_or((0, 0))
    });
    ranked
}

/// How much the player wants to keep `card`; higher is better.
///
/// Tiers, best first: extends a meld already down, makes a ready meld with the
/// hand, wildcard, matches a complete pile, makes a pair, single. Within a
/// tier the card's point value breaks ties, toward high cards when the player
/// prefers them.
pub fn desirability(card: &Card, hand: &[Card], player: &Player, rules: &RuleSet) -> i32 {
    const TIER: i32 = 1000;
    let classifier = &rules.classifier;
    let meld_type = classifier.meld_type(card);

    let mut matching = hand
        .iter()
        .filter(|c| classifier.meld_type(c) == meld_type)
        .count();
    if hand.contains(card) {
        matching -= 1;
    }

    let tier = if classifier.is_wild(card) {
        4
    } else if player.down.includes_meld_type(&meld_type, classifier) {
        6
    } else if matching + 1 >= rules.min_meld_size {
        5
    } else if player.complete.includes_meld_type(&meld_type, classifier) {
        3
    } else if matching == 1 {
        2
    } else {
        1
    };

    let points = rules.points(card);
    let tie_break = if player.strategy.prefer_high { points } else { -points };
    tier * TIER + tie_break
}

/// Cards ordered from most to least desirable
pub fn sort_by_desirability(cards: &[Card], hand: &[Card], player: &Player, rules: &RuleSet) -> Vec<Card> {
    let mut sorted = cards.to_vec();
    sorted.sort_by_cached_key(|c| std::cmp::Reverse(desirability(c, hand, player, rules)));
    sorted
}
