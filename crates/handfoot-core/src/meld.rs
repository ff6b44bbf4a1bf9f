//! Meld classification.
//!
//! A card's meld type is the key that decides which cards may be melded
//! together. The key depends on the classification method in force, except
//! for wildcards which always classify as [`MeldType::wild`].

use crate::card::{Card, Rank};
use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Anything that can present an ordered sequence of cards.
///
/// Implemented by every card container and by [`Meld`], so scoring and
/// classification accept any of them.
pub trait Cards {
    fn cards(&self) -> &[Card];
}

impl Cards for [Card] {
    fn cards(&self) -> &[Card] {
        self
    }
}

impl Cards for Vec<Card> {
    fn cards(&self) -> &[Card] {
        self
    }
}

/// How cards are grouped into melds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeldMethod {
    /// Same rank, e.g. any three kings
    Rank,
    /// Same rank and same color, e.g. three red kings
    RankColor,
}

impl MeldMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeldMethod::Rank => "rank",
            MeldMethod::RankColor => "rank_color",
        }
    }
}

impl FromStr for MeldMethod {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rank" => Ok(MeldMethod::Rank),
            "rank_color" | "rankcolor" | "rank-color" => Ok(MeldMethod::RankColor),
            _ => Err(GameError::InvalidMethod(s.to_string())),
        }
    }
}

/// Classification key of a card, e.g. `"A"`, `"KRED"` or `"WILD"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeldType(String);

impl MeldType {
    const WILD: &'static str = "WILD";

    pub fn wild() -> Self {
        MeldType(Self::WILD.to_string())
    }

    pub fn is_wild(&self) -> bool {
        self.0 == Self::WILD
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MeldType {
    fn from(s: &str) -> Self {
        MeldType(s.to_string())
    }
}

/// Classification method plus the set of wild ranks.
///
/// Passed explicitly into every operation that classifies cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    pub method: MeldMethod,
    pub wild_ranks: Vec<Rank>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            method: MeldMethod::RankColor,
            wild_ranks: vec![Rank::Two, Rank::Joker],
        }
    }
}

impl Classifier {
    pub fn new(method: MeldMethod, wild_ranks: Vec<Rank>) -> Self {
        Self { method, wild_ranks }
    }

    pub fn with_method(method: MeldMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn is_wild(&self, card: &Card) -> bool {
        self.wild_ranks.contains(&card.rank)
    }

    pub fn meld_type(&self, card: &Card) -> MeldType {
        if self.is_wild(card) {
            return MeldType::wild();
        }
        match self.method {
            MeldMethod::Rank => MeldType(card.rank.shorthand().to_string()),
            MeldMethod::RankColor => MeldType(format!("{}{}", card.rank.shorthand(), card.color())),
        }
    }

    pub fn includes_meld_type(&self, cards: &[Card], meld_type: &MeldType) -> bool {
        cards.iter().any(|c| &self.meld_type(c) == meld_type)
    }

    /// Partition cards into melds, one per distinct meld type.
    ///
    /// Melds come out in first-seen order of their type and keep the cards'
    /// relative order. With `exclude_wilds`, wildcards are left out entirely.
    pub fn partition(&self, cards: &[Card], exclude_wilds: bool) -> Vec<Meld> {
        let mut melds: Vec<Meld> = Vec::new();
        let mut index: HashMap<MeldType, usize> = HashMap::new();

        for card in cards {
            let meld_type = self.meld_type(card);
            if exclude_wilds && meld_type.is_wild() {
                continue;
            }
            let slot = *index.entry(meld_type.clone()).or_insert_with(|| {
                melds.push(Meld::new(meld_type));
                melds.len() - 1
            });
            melds[slot].cards.push(card.clone());
        }

        melds
    }
}

/// Cards sharing one meld type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub meld_type: MeldType,
    pub cards: Vec<Card>,
}

impl Meld {
    pub fn new(meld_type: MeldType) -> Self {
        Self {
            meld_type,
            cards: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Cards for Meld {
    fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.meld_type, crate::card::cards_to_str(&self.cards))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;
    use pretty_assertions::assert_eq;

    fn cards(shorthands: &[&str]) -> Vec<Card> {
        shorthands.iter().map(|s| Card::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_meld_rank() {
        let classifier = Classifier::with_method(MeldMethod::Rank);
        let hand = cards(&["AS", "AC", "AH", "AH", "3H"]);
        assert_eq!(classifier.meld_type(&hand[0]).as_str(), "A");

        let melds = classifier.partition(&hand, false);
        assert_eq!(melds.len(), 2);
        assert_eq!(melds[0].meld_type.as_str(), "A");
        assert_eq!(melds[0].len(), 4);
        assert_eq!(melds[1].meld_type.as_str(), "3");
    }

    #[test]
    fn test_meld_rank_color_first_seen_order() {
        let classifier = Classifier::with_method(MeldMethod::RankColor);
        let hand = cards(&["AS", "AC", "AH", "2H"]);

        let melds = classifier.partition(&hand, false);
        let summary: Vec<(String, Vec<String>)> = melds
            .iter()
            .map(|m| {
                (
                    m.meld_type.to_string(),
                    m.cards.iter().map(Card::shorthand).collect(),
                )
            })
            .collect();

        // Two is wild by default
        assert_eq!(
            summary,
            vec![
                ("ABLACK".to_string(), vec!["AS".to_string(), "AC".to_string()]),
                ("ARED".to_string(), vec!["AH".to_string()]),
                ("WILD".to_string(), vec!["2H".to_string()]),
            ]
        );
    }

    #[test]
    fn test_meld_rank_color_without_wilds() {
        let classifier = Classifier::new(MeldMethod::RankColor, vec![]);
        let melds = classifier.partition(&cards(&["AS", "AC", "AH", "2H"]), false);
        let types: Vec<&str> = melds.iter().map(|m| m.meld_type.as_str()).collect();
        assert_eq!(types, vec!["ABLACK", "ARED", "2RED"]);
    }

    #[test]
    fn test_wild_classification() {
        let classifier = Classifier::default();
        assert!(classifier.is_wild(&Card::new(Rank::Joker, Suit::Red)));
        assert!(classifier.is_wild(&Card::new(Rank::Two, Suit::Spades)));
        assert!(classifier.is_wild(&Card::new(Rank::Two, Suit::Hearts)));
        assert!(!classifier.is_wild(&Card::new(Rank::Three, Suit::Diamonds)));
        assert!(!classifier.is_wild(&Card::new(Rank::King, Suit::Clubs)));
        assert!(!classifier.is_wild(&Card::new(Rank::Ace, Suit::Hearts)));

        for method in [MeldMethod::Rank, MeldMethod::RankColor] {
            let c = Classifier::with_method(method);
            assert!(c.meld_type(&Card::parse("*B").unwrap()).is_wild());
        }
    }

    #[test]
    fn test_partition_excluding_wilds() {
        let classifier = Classifier::default();
        let hand = cards(&["2S", "KH", "*R", "KD", "9C"]);
        let melds = classifier.partition(&hand, true);

        let total: usize = melds.iter().map(Meld::len).sum();
        assert_eq!(total, 3);
        assert!(melds.iter().all(|m| !m.meld_type.is_wild()));
        for meld in &melds {
            assert!(meld.cards.iter().all(|c| classifier.meld_type(c) == meld.meld_type));
        }
    }

    #[test]
    fn test_includes_meld_type() {
        let classifier = Classifier::with_method(MeldMethod::RankColor);
        let hand = cards(&["4H", "9S", "JD", "9C"]);

        for similar in cards(&["4D", "JH", "9S"]) {
            assert!(classifier.includes_meld_type(&hand, &classifier.meld_type(&similar)));
        }
        for dissimilar in cards(&["2H", "9H", "JC"]) {
            assert!(!classifier.includes_meld_type(&hand, &classifier.meld_type(&dissimilar)));
        }
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("rank".parse::<MeldMethod>().unwrap(), MeldMethod::Rank);
        assert_eq!("RANK_COLOR".parse::<MeldMethod>().unwrap(), MeldMethod::RankColor);
        assert!(matches!(
            "suit".parse::<MeldMethod>(),
            Err(GameError::InvalidMethod(_))
        ));
    }
}
