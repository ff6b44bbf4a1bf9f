//! Player state.
//!
//! Each player owns four playing areas:
//! - `complete`: face-up piles of 7+ cards of one meld type
//! - `down`: one fan per meld type laid down but not yet complete
//! - `hand`: exactly one [`Hand`]
//! - `foot`: exactly one face-down [`Pile`], picked up once the hand runs out

use crate::area::PlayingArea;
use crate::error::{GameError, Result};
use crate::group::{CardGroup, Hand, Pile};
use crate::shuffle::Shuffler;
use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seat index of a player at the table
pub type PlayerId = u8;

pub const COMPLETE: &str = "complete";
pub const DOWN: &str = "down";
pub const HAND: &str = "hand";
pub const FOOT: &str = "foot";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Shuffling skill: upper bound on riffle run length and cut error
    pub precision: usize,
    /// Shuffling speed, 1.0 is average
    pub speed: f64,
    pub strategy: Strategy,
    pub complete: PlayingArea,
    pub down: PlayingArea,
    pub hand: PlayingArea,
    pub foot: PlayingArea,
    /// Has gone down this round
    pub is_down: bool,
    /// Has picked up the foot this round
    pub in_foot: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, precision: usize, speed: f64, strategy: Strategy) -> Self {
        Self {
            id,
            name: name.into(),
            precision,
            speed,
            strategy,
            complete: PlayingArea::new(COMPLETE),
            down: PlayingArea::new(DOWN),
            hand: PlayingArea::new(HAND),
            foot: PlayingArea::new(FOOT),
            is_down: false,
            in_foot: false,
        }
    }

    pub fn areas(&self) -> [&PlayingArea; 4] {
        [&self.complete, &self.down, &self.hand, &self.foot]
    }

    pub fn areas_mut(&mut self) -> [&mut PlayingArea; 4] {
        [&mut self.complete, &mut self.down, &mut self.hand, &mut self.foot]
    }

    pub fn area(&self, name: &str) -> Result<&PlayingArea> {
        self.areas()
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| GameError::InvalidArguments(format!("player area not found: {name}")))
    }

    pub fn area_mut(&mut self, name: &str) -> Result<&mut PlayingArea> {
        self.areas_mut()
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| GameError::InvalidArguments(format!("player area not found: {name}")))
    }

    fn single_group_error(area: &PlayingArea) -> GameError {
        GameError::InvalidArguments(format!(
            "expected one group in {}, found {}",
            area.name,
            area.groups.len()
        ))
    }

    pub fn hand(&self) -> Result<&Hand> {
        match self.hand.groups.as_slice() {
            [group] => group.as_hand(),
            _ => Err(Self::single_group_error(&self.hand)),
        }
    }

    pub fn hand_mut(&mut self) -> Result<&mut Hand> {
        if self.hand.groups.len() != 1 {
            return Err(Self::single_group_error(&self.hand));
        }
        self.hand.groups[0].as_hand_mut()
    }

    pub fn foot(&self) -> Result<&Pile> {
        match self.foot.groups.as_slice() {
            [group] => group.as_pile(),
            _ => Err(Self::single_group_error(&self.foot)),
        }
    }

    pub fn foot_mut(&mut self) -> Result<&mut Pile> {
        if self.foot.groups.len() != 1 {
            return Err(Self::single_group_error(&self.foot));
        }
        self.foot.groups[0].as_pile_mut()
    }

    pub fn has_complete_pile(&self) -> bool {
        self.complete.groups.iter().any(|g| !g.is_empty())
    }

    /// This player as a participant in a multi-quick shuffle
    pub fn shuffler(&self) -> Shuffler {
        Shuffler {
            precision: self.precision,
            speed: self.speed,
        }
    }

    pub fn card_count(&self) -> usize {
        self.areas().iter().map(|a| a.card_count()).sum()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        for area in self.areas() {
            writeln!(f, "  {area}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use crate::group::{Fan, GroupKind};
    use pretty_assertions::assert_eq;

    fn cards(shorthands: &[&str]) -> Vec<Card> {
        shorthands.iter().map(|s| Card::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_player_creation() {
        let player = Player::new(1, "S", 10, 1.0, Strategy::default());
        assert_eq!(player.name, "S");
        assert_eq!(player.card_count(), 0);
        assert!(!player.is_down);
        assert_eq!(
            player.areas().map(|a| a.name.as_str()),
            [COMPLETE, DOWN, HAND, FOOT]
        );
        assert_eq!(player.shuffler(), Shuffler { precision: 10, speed: 1.0 });
    }

    #[test]
    fn test_hand_and_foot_accessors() {
        let mut player = Player::new(0, "J", 5, 1.2, Strategy::default());
        assert!(matches!(player.hand(), Err(GameError::InvalidArguments(_))));

        player.hand.append(Hand::new(cards(&["AS", "KH"])));
        player.foot.append(Pile::face_down(cards(&["3C"])));
        assert_eq!(player.hand().unwrap().count(), 2);
        assert_eq!(player.foot().unwrap().count(), 1);

        player.hand_mut().unwrap().push(Card::parse("QD").unwrap());
        assert_eq!(player.card_count(), 4);

        player.hand.append(Hand::default());
        assert!(player.hand_mut().is_err());
    }

    #[test]
    fn test_foot_shape_mismatch() {
        let mut player = Player::new(0, "J", 5, 1.2, Strategy::default());
        player.foot.append(Fan::default());
        assert_eq!(
            player.foot().unwrap_err(),
            GameError::TypeMismatch {
                expected: GroupKind::Pile,
                found: GroupKind::Fan
            }
        );
    }

    #[test]
    fn test_area_lookup() {
        let mut player = Player::new(0, "J", 5, 1.2, Strategy::default());
        player
            .area_mut(DOWN)
            .unwrap()
            .append(Fan::new(cards(&["9S", "9C", "9S"])));
        assert_eq!(player.area(DOWN).unwrap().card_count(), 3);
        assert!(player.area("stock").is_err());
        assert!(!player.has_complete_pile());
    }

    #[test]
    fn test_player_display() {
        let mut player = Player::new(0, "J", 5, 1.2, Strategy::default());
        player.hand.append(Hand::new(cards(&["AS", "KH"])));
        assert_eq!(
            player.to_string(),
            "J:\n  complete:\n  down:\n  hand: [AS][KH]\n  foot:\n"
        );
    }
}
