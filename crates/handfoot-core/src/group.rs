//! Card containers.
//!
//! Three shapes share the [`CardGroup`] operations:
//! - [`Pile`]: an ordered stack (top card is the last element), face up or down
//! - [`Hand`]: a player's private cards
//! - [`Fan`]: cards spread face up for everyone to see (laid-down melds)
//!
//! Moving cards between groups always takes them out of the source, so a card
//! is in exactly one container at a time.

use crate::card::{cards_to_str, Card};
use crate::error::{GameError, Result};
use crate::meld::{Cards, Classifier, Meld, MeldType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Number of cards from the top of a group inspected by [`CardGroup::calc_entropy`]
pub const ENTROPY_WINDOW: usize = 28;

/// Operations shared by every card container
pub trait CardGroup: Cards {
    fn cards_mut(&mut self) -> &mut Vec<Card>;

    fn count(&self) -> usize {
        self.cards().len()
    }

    fn is_empty(&self) -> bool {
        self.cards().is_empty()
    }

    fn push(&mut self, card: Card) {
        self.cards_mut().push(card);
    }

    fn pop(&mut self) -> Option<Card> {
        self.cards_mut().pop()
    }

    /// Append plain cards
    fn add_cards(&mut self, cards: Vec<Card>) {
        self.cards_mut().extend(cards);
    }

    /// Take every card out of `other` and append them here
    fn add_group<G: CardGroup + ?Sized>(&mut self, other: &mut G)
    where
        Self: Sized,
    {
        let cards = other.remove_all_cards();
        self.add_cards(cards);
    }

    fn remove_all_cards(&mut self) -> Vec<Card> {
        std::mem::take(self.cards_mut())
    }

    /// Stable sort by meld type
    fn sort(&mut self, classifier: &Classifier) {
        self.cards_mut()
            .sort_by_cached_key(|card| classifier.meld_type(card));
    }

    fn get_melds(&self, classifier: &Classifier, exclude_wilds: bool) -> Vec<Meld> {
        classifier.partition(self.cards(), exclude_wilds)
    }

    fn count_melds(&self, classifier: &Classifier, exclude_wilds: bool) -> usize {
        self.get_melds(classifier, exclude_wilds).len()
    }

    fn get_wilds(&self, classifier: &Classifier) -> Vec<Card> {
        self.cards()
            .iter()
            .filter(|c| classifier.is_wild(c))
            .cloned()
            .collect()
    }

    fn count_wilds(&self, classifier: &Classifier) -> usize {
        self.cards().iter().filter(|c| classifier.is_wild(c)).count()
    }

    fn includes_meld_type(&self, meld_type: &MeldType, classifier: &Classifier) -> bool {
        classifier.includes_meld_type(self.cards(), meld_type)
    }

    /// Meld type of the first card, which names the group in a meld area
    fn meld_type(&self, classifier: &Classifier) -> Option<MeldType> {
        self.cards().first().map(|c| classifier.meld_type(c))
    }

    /// Shuffledness heuristic in `0.0..=1.0`.
    ///
    /// Counts the distinct meld types among the top [`ENTROPY_WINDOW`] cards:
    /// `(distinct - 1) / (window - 1)`. Groups of one card or less score `1.0`.
    fn calc_entropy(&self, classifier: &Classifier) -> f64 {
        let cards = self.cards();
        let window = cards.len().min(ENTROPY_WINDOW);
        if window <= 1 {
            return 1.0;
        }
        let distinct: HashSet<MeldType> = cards[cards.len() - window..]
            .iter()
            .map(|c| classifier.meld_type(c))
            .collect();
        ((distinct.len() - 1) as f64 / (window - 1) as f64).min(1.0)
    }
}

/// A stack of cards, e.g. a deck. The top card is the last element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: Vec<Card>,
    pub face_up: bool,
}

impl Pile {
    pub fn new(cards: Vec<Card>, face_up: bool) -> Self {
        Self { cards, face_up }
    }

    pub fn face_down(cards: Vec<Card>) -> Self {
        Self::new(cards, false)
    }

    pub fn peek(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// Pop `n` cards off the top, top card first
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>> {
        if n > self.cards.len() {
            return Err(GameError::Underflow {
                requested: n,
                available: self.cards.len(),
            });
        }
        let mut drawn = self.cards.split_off(self.cards.len() - n);
        drawn.reverse();
        Ok(drawn)
    }

    /// Turn the pile over: toggles face-up and reverses the order
    pub fn flip(&mut self) {
        self.face_up = !self.face_up;
        self.cards.reverse();
    }

    /// Deal `num_cards` rounds of one card to each of `num_piles` new piles
    pub fn deal(&mut self, num_piles: usize, num_cards: usize, face_up: bool) -> Result<Vec<Pile>> {
        let requested = num_piles * num_cards;
        if requested > self.cards.len() {
            return Err(GameError::Underflow {
                requested,
                available: self.cards.len(),
            });
        }

        let mut piles: Vec<Pile> = (0..num_piles).map(|_| Pile::new(Vec::new(), face_up)).collect();
        for _ in 0..num_cards {
            for pile in piles.iter_mut() {
                let card = self.cards.pop().ok_or_else(|| {
                    GameError::Internal("pile emptied while dealing".to_string())
                })?;
                pile.cards.push(card);
            }
        }
        Ok(piles)
    }

    /// Cut the pile into `num_piles` consecutive chunks whose sizes differ by
    /// at most one, larger chunks first.
    ///
    /// With `include_current` this pile keeps the first chunk and the other
    /// chunks are returned; otherwise this pile is emptied and every chunk is
    /// returned.
    pub fn split(&mut self, num_piles: usize, face_up: bool, include_current: bool) -> Result<Vec<Pile>> {
        if num_piles == 0 {
            return Err(GameError::InvalidArguments(
                "cannot split a pile into zero piles".to_string(),
            ));
        }

        let mut cards = std::mem::take(&mut self.cards).into_iter();
        let total = cards.len();
        let (base, extra) = (total / num_piles, total % num_piles);

        let mut piles: Vec<Pile> = (0..num_piles)
            .map(|i| {
                let size = base + usize::from(i < extra);
                Pile::new(cards.by_ref().take(size).collect(), face_up)
            })
            .collect();

        if include_current {
            self.cards = piles.remove(0).cards;
        }
        Ok(piles)
    }
}

impl Cards for Pile {
    fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl CardGroup for Pile {
    fn cards_mut(&mut self) -> &mut Vec<Card> {
        &mut self.cards
    }
}

impl fmt::Display for Pile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            None => write!(f, "[Empty]"),
            Some(top) if self.face_up => write!(f, "[{}] ({})", top.shorthand(), self.count()),
            Some(top) => write!(f, "[{}] ({})", top.back, self.count()),
        }
    }
}

fn remove_card(cards: &mut Vec<Card>, card: &Card) -> Option<Card> {
    let pos = cards.iter().position(|c| c == card)?;
    Some(cards.remove(pos))
}

/// A player's private cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Remove one card equal to `card`
    pub fn remove(&mut self, card: &Card) -> Option<Card> {
        remove_card(&mut self.cards, card)
    }

    /// Remove one occurrence of each listed card, returning those found
    pub fn remove_cards(&mut self, cards: &[Card]) -> Vec<Card> {
        cards.iter().filter_map(|c| self.remove(c)).collect()
    }
}

impl Cards for Hand {
    fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl CardGroup for Hand {
    fn cards_mut(&mut self) -> &mut Vec<Card> {
        &mut self.cards
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cards_to_str(&self.cards))
    }
}

/// Cards laid out face up, typically a meld on the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fan {
    cards: Vec<Card>,
    pub face_up: bool,
}

impl Default for Fan {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Fan {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            face_up: true,
        }
    }

    pub fn remove(&mut self, card: &Card) -> Option<Card> {
        remove_card(&mut self.cards, card)
    }
}

impl Cards for Fan {
    fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl CardGroup for Fan {
    fn cards_mut(&mut self) -> &mut Vec<Card> {
        &mut self.cards
    }
}

impl fmt::Display for Fan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cards_to_str(&self.cards))
    }
}

/// Shape of a [`Group`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Pile,
    Hand,
    Fan,
}

/// Any container that can sit in a playing area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Group {
    Pile(Pile),
    Hand(Hand),
    Fan(Fan),
}

impl Group {
    /// An empty group of the given shape. Piles made this way are face up.
    pub fn empty(kind: GroupKind) -> Self {
        match kind {
            GroupKind::Pile => Group::Pile(Pile::new(Vec::new(), true)),
            GroupKind::Hand => Group::Hand(Hand::default()),
            GroupKind::Fan => Group::Fan(Fan::default()),
        }
    }

    pub fn kind(&self) -> GroupKind {
        match self {
            Group::Pile(_) => GroupKind::Pile,
            Group::Hand(_) => GroupKind::Hand,
            Group::Fan(_) => GroupKind::Fan,
        }
    }

    pub fn as_pile(&self) -> Result<&Pile> {
        match self {
            Group::Pile(p) => Ok(p),
            other => Err(GameError::TypeMismatch {
                expected: GroupKind::Pile,
                found: other.kind(),
            }),
        }
    }

    pub fn as_pile_mut(&mut self) -> Result<&mut Pile> {
        match self {
            Group::Pile(p) => Ok(p),
            other => Err(GameError::TypeMismatch {
                expected: GroupKind::Pile,
                found: other.kind(),
            }),
        }
    }

    pub fn as_hand(&self) -> Result<&Hand> {
        match self {
            Group::Hand(h) => Ok(h),
            other => Err(GameError::TypeMismatch {
                expected: GroupKind::Hand,
                found: other.kind(),
            }),
        }
    }

    pub fn as_hand_mut(&mut self) -> Result<&mut Hand> {
        match self {
            Group::Hand(h) => Ok(h),
            other => Err(GameError::TypeMismatch {
                expected: GroupKind::Hand,
                found: other.kind(),
            }),
        }
    }
}

impl Cards for Group {
    fn cards(&self) -> &[Card] {
        match self {
            Group::Pile(p) => p.cards(),
            Group::Hand(h) => h.cards(),
            Group::Fan(f) => f.cards(),
        }
    }
}

impl CardGroup for Group {
    fn cards_mut(&mut self) -> &mut Vec<Card> {
        match self {
            Group::Pile(p) => p.cards_mut(),
            Group::Hand(h) => h.cards_mut(),
            Group::Fan(f) => f.cards_mut(),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Pile(p) => fmt::Display::fmt(p, f),
            Group::Hand(h) => fmt::Display::fmt(h, f),
            Group::Fan(fan) => fmt::Display::fmt(fan, f),
        }
    }
}

impl From<Pile> for Group {
    fn from(p: Pile) -> Self {
        Group::Pile(p)
    }
}

impl From<Hand> for Group {
    fn from(h: Hand) -> Self {
        Group::Hand(h)
    }
}

impl From<Fan> for Group {
    fn from(f: Fan) -> Self {
        Group::Fan(f)
    }
}
