//! Card identity: rank, suit, color and the cosmetic back tag.
//!
//! Cards are plain values. Which container a card sits in is tracked by the
//! containers in [`crate::group`]; a card is moved between them, never copied
//! during play.

use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card color, derived from the suit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn name(&self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Black => "BLACK",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Card suit.
///
/// Jokers have no real suit, only a color, so they use the `Black` and `Red`
/// pseudo-suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Spades,
    Clubs,
    /// Black joker
    Black,
    /// Red joker
    Red,
}

impl Suit {
    /// The four suits a regular card can have
    pub const STANDARD: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Spades, Suit::Clubs];

    pub const ALL: [Suit; 6] = [
        Suit::Hearts,
        Suit::Diamonds,
        Suit::Spades,
        Suit::Clubs,
        Suit::Black,
        Suit::Red,
    ];

    pub fn shorthand(&self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Spades => 'S',
            Suit::Clubs => 'C',
            Suit::Black => 'B',
            Suit::Red => 'R',
        }
    }

    pub fn from_char(c: char) -> Option<Suit> {
        Suit::ALL.into_iter().find(|s| s.shorthand() == c)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Suit::Hearts => "HEARTS",
            Suit::Diamonds => "DIAMONDS",
            Suit::Spades => "SPADES",
            Suit::Clubs => "CLUBS",
            Suit::Black => "BLACK",
            Suit::Red => "RED",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds | Suit::Red => Color::Red,
            Suit::Spades | Suit::Clubs | Suit::Black => Color::Black,
        }
    }

    /// True for the joker-only pseudo-suits
    pub fn is_joker_suit(&self) -> bool {
        matches!(self, Suit::Black | Suit::Red)
    }

    fn file_name(&self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Spades => "spades",
            Suit::Clubs => "clubs",
            Suit::Black => "black",
            Suit::Red => "red",
        }
    }
}

/// Card rank. Ordered by declared value, Joker highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Joker,
}

impl Rank {
    pub const ALL: [Rank; 14] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Joker,
    ];

    /// The thirteen ranks found in every standard suit
    pub fn standard() -> impl Iterator<Item = Rank> {
        Rank::ALL.into_iter().filter(|r| *r != Rank::Joker)
    }

    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn shorthand(&self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Joker => '*',
        }
    }

    pub fn from_char(c: char) -> Option<Rank> {
        Rank::ALL.into_iter().find(|r| r.shorthand() == c)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rank::Ace => "ACE",
            Rank::Two => "TWO",
            Rank::Three => "THREE",
            Rank::Four => "FOUR",
            Rank::Five => "FIVE",
            Rank::Six => "SIX",
            Rank::Seven => "SEVEN",
            Rank::Eight => "EIGHT",
            Rank::Nine => "NINE",
            Rank::Ten => "TEN",
            Rank::Jack => "JACK",
            Rank::Queen => "QUEEN",
            Rank::King => "KING",
            Rank::Joker => "JOKER",
        }
    }

    /// Jack, Queen and King. Jokers are not face cards.
    pub fn is_face_card(&self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    pub fn is_number_card(&self) -> bool {
        (Rank::Two..=Rank::Ten).contains(self)
    }

    fn file_name(&self) -> &'static str {
        match self {
            Rank::Ace => "ace",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "jack",
            Rank::Queen => "queen",
            Rank::King => "king",
            Rank::Joker => "joker",
        }
    }
}

/// Back design of a physical pack.
///
/// Purely cosmetic: it tells which pack a card came from and has no effect on
/// play. Packs alternate between blue and red backs: `B1, R1, B2, R2, ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Back {
    pub letter: char,
    pub number: u16,
}

impl Back {
    const LETTERS: [char; 2] = ['B', 'R'];

    /// The back tag of the `index`-th pack brought to the table
    pub fn nth(index: usize) -> Self {
        Self {
            letter: Self::LETTERS[index % Self::LETTERS.len()],
            number: (index / Self::LETTERS.len() + 1) as u16,
        }
    }
}

impl Default for Back {
    fn default() -> Self {
        Back::nth(0)
    }
}

impl fmt::Display for Back {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.number)
    }
}

/// A single playing card
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub back: Back,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self::with_back(rank, suit, Back::default())
    }

    pub fn with_back(rank: Rank, suit: Suit, back: Back) -> Self {
        Self { rank, suit, back }
    }

    /// Parse a shorthand such as `"AS"`, `"TH"`, `"10H"` or `"*R"`
    pub fn parse(shorthand: &str) -> Result<Card> {
        Self::parse_with_back(shorthand, Back::default())
    }

    pub fn parse_with_back(shorthand: &str, back: Back) -> Result<Card> {
        let parse_error = |reason: &str| GameError::Parse {
            input: shorthand.to_string(),
            reason: reason.to_string(),
        };

        let (rank_part, suit_part) = match shorthand.char_indices().last() {
            Some((idx, _)) if idx > 0 => shorthand.split_at(idx),
            _ => return Err(parse_error("expected a rank and a suit")),
        };

        let rank = match rank_part {
            "10" => Rank::Ten,
            r if r.chars().count() == 1 => r
                .chars()
                .next()
                .and_then(Rank::from_char)
                .ok_or_else(|| parse_error("unknown rank"))?,
            _ => return Err(parse_error("unknown rank")),
        };

        let suit = suit_part
            .chars()
            .next()
            .and_then(Suit::from_char)
            .ok_or_else(|| parse_error("unknown suit"))?;

        if (rank == Rank::Joker) != suit.is_joker_suit() {
            return Err(parse_error("jokers and only jokers use the B/R suits"));
        }

        Ok(Card::with_back(rank, suit, back))
    }

    pub fn shorthand(&self) -> String {
        format!("{}{}", self.rank.shorthand(), self.suit.shorthand())
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    pub fn is_face_card(&self) -> bool {
        self.rank.is_face_card()
    }

    /// Eyes drawn on the card face: jokers and face cards have two, except the
    /// one-eyed jack of spades, jack of hearts and king of diamonds.
    pub fn count_eyes(&self) -> u8 {
        match (self.rank, self.suit) {
            (Rank::Joker, _) => 2,
            (Rank::Jack, Suit::Spades) | (Rank::Jack, Suit::Hearts) | (Rank::King, Suit::Diamonds) => 1,
            (r, _) if r.is_face_card() => 2,
            _ => 0,
        }
    }

    /// Image file stem for renderers, e.g. `ace_of_spades` or `red_joker`
    pub fn file_stem(&self) -> String {
        if self.suit.is_joker_suit() {
            format!("{}_{}", self.suit.file_name(), self.rank.file_name())
        } else {
            format!("{}_of_{}", self.rank.file_name(), self.suit.file_name())
        }
    }

    /// The Unicode playing-card glyph for this card
    pub fn unicode(&self) -> char {
        let code = match self.suit {
            Suit::Red => 0x1F0BF,
            Suit::Black => 0x1F0DF,
            suit => {
                let base = match suit {
                    Suit::Spades => 0x1F0A0,
                    Suit::Hearts => 0x1F0B0,
                    Suit::Diamonds => 0x1F0C0,
                    _ => 0x1F0D0,
                };
                // The Unicode block has a Knight between Jack and Queen
                let value = self.rank.value() as u32;
                if self.rank <= Rank::Jack {
                    base + value
                } else {
                    base + value + 1
                }
            }
        };
        char::from_u32(code).unwrap_or('\u{1F0A0}')
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank.name(), self.suit.name())
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Card::parse(s)
    }
}

/// Render a list of cards as `[AS][KH]`, or `[Empty]`
pub fn cards_to_str(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "[Empty]".to_string();
    }
    cards.iter().map(|c| format!("[{}]", c.shorthand())).collect()
}

/// A fresh, unshuffled 54-card pack: 13 ranks in each of 4 suits plus two jokers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    pub back: Back,
    pub cards: Vec<Card>,
}

impl Pack {
    pub const SIZE: usize = 54;

    pub fn new(back: Back) -> Self {
        let mut cards = Vec::with_capacity(Self::SIZE);
        for rank in Rank::standard() {
            for suit in Suit::STANDARD {
                cards.push(Card::with_back(rank, suit, back));
            }
        }
        cards.push(Card::with_back(Rank::Joker, Suit::Black, back));
        cards.push(Card::with_back(Rank::Joker, Suit::Red, back));

        Self { back, cards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_card_names() {
        let card = Card::new(Rank::Ace, Suit::Spades);
        assert_eq!(card.to_string(), "ACE of SPADES");
        assert_eq!(card.shorthand(), "AS");
        assert_eq!(Card::parse("5H").unwrap().to_string(), "FIVE of HEARTS");
    }

    #[test]
    fn test_shorthand_round_trip() {
        for rank in Rank::standard() {
            for suit in Suit::STANDARD {
                let card = Card::new(rank, suit);
                assert_eq!(Card::parse(&card.shorthand()).unwrap(), card);
            }
        }
        for suit in [Suit::Black, Suit::Red] {
            let joker = Card::new(Rank::Joker, suit);
            assert_eq!(Card::parse(&joker.shorthand()).unwrap(), joker);
        }
    }

    #[test]
    fn test_parse_ten_long_form() {
        assert_eq!(Card::parse("10H").unwrap(), Card::parse("TH").unwrap());
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "A", "XS", "AX", "AS!", "*H", "AB"] {
            assert!(
                matches!(Card::parse(bad), Err(GameError::Parse { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_colors() {
        assert_eq!(Card::parse("AH").unwrap().color(), Color::Red);
        assert_eq!(Card::parse("AC").unwrap().color(), Color::Black);
        assert_eq!(Card::parse("*R").unwrap().color(), Color::Red);
        assert_eq!(Card::parse("*B").unwrap().color(), Color::Black);
    }

    #[test]
    fn test_rank_order_joker_highest() {
        assert!(Rank::Ace < Rank::King);
        assert!(Rank::King < Rank::Joker);
        assert!(Rank::Ten.is_number_card());
        assert!(!Rank::Ace.is_number_card());
        assert!(Rank::Queen.is_face_card());
        assert!(!Rank::Joker.is_face_card());
    }

    #[test]
    fn test_count_eyes() {
        assert_eq!(Card::parse("JS").unwrap().count_eyes(), 1);
        assert_eq!(Card::parse("JC").unwrap().count_eyes(), 2);
        assert_eq!(Card::parse("KD").unwrap().count_eyes(), 1);
        assert_eq!(Card::parse("*R").unwrap().count_eyes(), 2);
        assert_eq!(Card::parse("7S").unwrap().count_eyes(), 0);
    }

    #[test]
    fn test_rendering_helpers() {
        assert_eq!(Card::parse("AS").unwrap().file_stem(), "ace_of_spades");
        assert_eq!(Card::parse("*R").unwrap().file_stem(), "red_joker");
        assert_eq!(Card::parse("AS").unwrap().unicode(), '\u{1F0A1}');
        assert_eq!(Card::parse("QH").unwrap().unicode(), '\u{1F0BD}');
        assert_eq!(Card::parse("*B").unwrap().unicode(), '\u{1F0DF}');
    }

    #[test]
    fn test_pack_contents() {
        let pack = Pack::new(Back::nth(3));
        assert_eq!(pack.cards.len(), Pack::SIZE);
        assert_eq!(pack.cards.iter().filter(|c| c.rank == Rank::Joker).count(), 2);
        assert!(pack.cards.iter().all(|c| c.back.to_string() == "R2"));
    }

    #[test]
    fn test_back_sequence() {
        let backs: Vec<String> = (0..4).map(|i| Back::nth(i).to_string()).collect();
        assert_eq!(backs, vec!["B1", "R1", "B2", "R2"]);
    }
}
