//! Playing areas and the table.
//!
//! A [`PlayingArea`] is a named, ordered list of card groups: a player's hand
//! area holds one [`Hand`](crate::group::Hand), the down area holds one
//! [`Fan`](crate::group::Fan) per meld type, the draw area holds one pile per
//! player. The [`Table`] owns the shared areas and the players.

use crate::card::Card;
use crate::error::{GameError, Result};
use crate::group::{CardGroup, Group, GroupKind, Pile};
use crate::meld::{Classifier, MeldType};
use crate::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the shared discard area
pub const DISCARD: &str = "discard";
/// Name of the shared draw area
pub const DRAW: &str = "draw";

/// A named list of card groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayingArea {
    pub name: String,
    pub groups: Vec<Group>,
}

impl PlayingArea {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    pub fn with_groups(name: impl Into<String>, groups: Vec<Group>) -> Self {
        Self {
            name: name.into(),
            groups,
        }
    }

    pub fn append(&mut self, group: impl Into<Group>) {
        self.groups.push(group.into());
    }

    /// Remove and return every group, leaving the area empty
    pub fn take_groups(&mut self) -> Vec<Group> {
        std::mem::take(&mut self.groups)
    }

    /// Move every group of each source area into this one, unflattened
    pub fn transfer_cards<'a, I>(&mut self, sources: I)
    where
        I: IntoIterator<Item = &'a mut PlayingArea>,
    {
        for source in sources {
            let groups = source.take_groups();
            self.groups.extend(groups);
        }
    }

    /// Flatten every group into one pile, leaving the area empty
    pub fn clear_groups(&mut self) -> Pile {
        let mut pile = Pile::default();
        for mut group in self.take_groups() {
            pile.add_group(&mut group);
        }
        pile
    }

    /// Flatten every group into one pile that stays in the area
    pub fn combine_groups(&mut self) {
        let pile = self.clear_groups();
        self.groups.push(Group::Pile(pile));
    }

    pub fn remove_empty_groups(&mut self) {
        self.groups.retain(|g| !g.is_empty());
    }

    pub fn includes_meld_type(&self, meld_type: &MeldType, classifier: &Classifier) -> bool {
        self.groups
            .iter()
            .any(|g| g.includes_meld_type(meld_type, classifier))
    }

    fn position_by_meld_type(&self, meld_type: &MeldType, classifier: &Classifier) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.meld_type(classifier).as_ref() == Some(meld_type))
    }

    /// The group whose first card has the given meld type
    pub fn get_group_by_meld_type(&self, meld_type: &MeldType, classifier: &Classifier) -> Option<&Group> {
        let i = self.position_by_meld_type(meld_type, classifier)?;
        Some(&self.groups[i])
    }

    pub fn get_group_by_meld_type_mut(
        &mut self,
        meld_type: &MeldType,
        classifier: &Classifier,
    ) -> Option<&mut Group> {
        let i = self.position_by_meld_type(meld_type, classifier)?;
        Some(&mut self.groups[i])
    }

    /// Push each card onto the group of its meld type, creating a group of
    /// shape `kind` where none exists yet.
    ///
    /// With `meld_type` set, every card goes to that type's group regardless of
    /// its own type; this is how wildcards join a meld. Nothing is moved if an
    /// existing group of a needed type has another shape.
    pub fn add_to_group_by_meld_type(
        &mut self,
        cards: Vec<Card>,
        kind: GroupKind,
        classifier: &Classifier,
        meld_type: Option<&MeldType>,
    ) -> Result<()> {
        let targets: Vec<MeldType> = cards
            .iter()
            .map(|c| meld_type.cloned().unwrap_or_else(|| classifier.meld_type(c)))
            .collect();

        for target in &targets {
            if let Some(group) = self.get_group_by_meld_type(target, classifier) {
                if group.kind() != kind {
                    return Err(GameError::TypeMismatch {
                        expected: kind,
                        found: group.kind(),
                    });
                }
            }
        }

        for (card, target) in cards.into_iter().zip(targets) {
            match self.position_by_meld_type(&target, classifier) {
                Some(i) => self.groups[i].push(card),
                None => {
                    let mut group = Group::empty(kind);
                    group.push(card);
                    self.groups.push(group);
                }
            }
        }
        Ok(())
    }

    pub fn card_count(&self) -> usize {
        self.groups.iter().map(CardGroup::count).sum()
    }
}

impl fmt::Display for PlayingArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for (i, group) in self.groups.iter().enumerate() {
            let sep = if i == 0 { " " } else { "  " };
            write!(f, "{sep}{group}")?;
        }
        Ok(())
    }
}

/// Shared areas plus the seated players
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub areas: Vec<PlayingArea>,
    pub players: Vec<Player>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_area(&mut self, area: PlayingArea) -> Result<()> {
        if self.areas.iter().any(|a| a.name == area.name) {
            return Err(GameError::InvalidArguments(format!(
                "area {:?} is already on the table",
                area.name
            )));
        }
        self.areas.push(area);
        Ok(())
    }

    pub fn area(&self, name: &str) -> Result<&PlayingArea> {
        self.areas
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| GameError::InvalidArguments(format!("area not found: {name}")))
    }

    pub fn area_mut(&mut self, name: &str) -> Result<&mut PlayingArea> {
        self.areas
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| GameError::InvalidArguments(format!("area not found: {name}")))
    }

    pub fn add_player(&mut self, player: Player) -> Result<()> {
        if self.players.iter().any(|p| p.id == player.id) {
            return Err(GameError::InvalidArguments(format!(
                "player {} is already at the table",
                player.id
            )));
        }
        self.players.push(player);
        Ok(())
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .get(id as usize)
            .ok_or(GameError::UnknownPlayer(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .get_mut(id as usize)
            .ok_or(GameError::UnknownPlayer(id))
    }

    /// Cards in every area and every player's areas
    pub fn card_count(&self) -> usize {
        let shared: usize = self.areas.iter().map(PlayingArea::card_count).sum();
        let seated: usize = self.players.iter().map(Player::card_count).sum();
        shared + seated
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for area in &self.areas {
            writeln!(f, "{area}")?;
        }
        for player in &self.players {
            write!(f, "{player}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{Fan, Hand};
    use crate::meld::MeldMethod;
    use crate::strategy::Strategy;
    use pretty_assertions::assert_eq;

    fn cards(shorthands: &[&str]) -> Vec<Card> {
        shorthands.iter().map(|s| Card::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_transfer_keeps_groups() {
        let mut a = PlayingArea::new("a");
        a.append(Pile::face_down(cards(&["AS"])));
        a.append(Hand::new(cards(&["KH", "QC"])));
        let mut b = PlayingArea::new("b");
        b.append(Fan::new(cards(&["3D"])));

        let mut target = PlayingArea::new("target");
        target.transfer_cards([&mut a, &mut b]);

        assert_eq!(target.groups.len(), 3);
        assert_eq!(target.card_count(), 4);
        assert!(a.groups.is_empty());
        assert!(b.groups.is_empty());
    }

    #[test]
    fn test_clear_and_combine_groups() {
        let mut area = PlayingArea::new("discard");
        area.append(Pile::face_down(cards(&["AS", "2C"])));
        area.append(Pile::face_down(cards(&["KH"])));

        let pile = area.clear_groups();
        assert_eq!(pile.count(), 3);
        assert!(area.groups.is_empty());

        area.append(pile);
        area.append(Fan::new(cards(&["3D"])));
        area.combine_groups();
        assert_eq!(area.groups.len(), 1);
        assert_eq!(area.groups[0].kind(), GroupKind::Pile);
        assert_eq!(area.card_count(), 4);
    }

    #[test]
    fn test_add_to_group_by_meld_type() {
        let classifier = Classifier::with_method(MeldMethod::RankColor);
        let mut down = PlayingArea::new("down");
        down.add_to_group_by_meld_type(cards(&["KH", "KD", "5S", "KH"]), GroupKind::Fan, &classifier, None)
            .unwrap();

        assert_eq!(down.groups.len(), 2);
        let kings = down
            .get_group_by_meld_type(&MeldType::from("KRED"), &classifier)
            .unwrap();
        assert_eq!(kings.count(), 3);
        assert!(down.includes_meld_type(&MeldType::from("5BLACK"), &classifier));
        assert!(!down.includes_meld_type(&MeldType::from("5RED"), &classifier));

        // wildcards join an existing meld when its type is given
        let kred = MeldType::from("KRED");
        down.add_to_group_by_meld_type(cards(&["2C"]), GroupKind::Fan, &classifier, Some(&kred))
            .unwrap();
        assert_eq!(down.get_group_by_meld_type(&kred, &classifier).unwrap().count(), 4);
    }

    #[test]
    fn test_add_to_group_type_mismatch_moves_nothing() {
        let classifier = Classifier::with_method(MeldMethod::Rank);
        let mut complete = PlayingArea::new("complete");
        complete.append(Pile::new(cards(&["7H", "7S"]), true));

        let err = complete
            .add_to_group_by_meld_type(cards(&["8H", "7D"]), GroupKind::Fan, &classifier, None)
            .unwrap_err();
        assert_eq!(
            err,
            GameError::TypeMismatch {
                expected: GroupKind::Fan,
                found: GroupKind::Pile
            }
        );
        assert_eq!(complete.groups.len(), 1);
        assert_eq!(complete.card_count(), 2);
    }

    #[test]
    fn test_remove_empty_groups() {
        let mut area = PlayingArea::new("draw");
        area.append(Pile::default());
        area.append(Pile::face_down(cards(&["AS"])));
        area.remove_empty_groups();
        assert_eq!(area.groups.len(), 1);
    }

    #[test]
    fn test_area_display() {
        let mut area = PlayingArea::new("down");
        area.append(Fan::new(cards(&["AS", "AC"])));
        area.append(Fan::new(cards(&["KH"])));
        assert_eq!(area.to_string(), "down: [AS][AC]  [KH]");
        assert_eq!(PlayingArea::new("foot").to_string(), "foot:");
    }

    #[test]
    fn test_table_areas_and_players() {
        let mut table = Table::new();
        table.add_area(PlayingArea::new(DISCARD)).unwrap();
        table.add_area(PlayingArea::new(DRAW)).unwrap();
        assert!(matches!(
            table.add_area(PlayingArea::new(DRAW)),
            Err(GameError::InvalidArguments(_))
        ));
        assert!(table.area("nowhere").is_err());

        table
            .add_player(Player::new(0, "J", 5, 1.2, Strategy::default()))
            .unwrap();
        assert!(table
            .add_player(Player::new(0, "J", 5, 1.2, Strategy::default()))
            .is_err());
        assert_eq!(table.player(3).unwrap_err(), GameError::UnknownPlayer(3));

        table
            .area_mut(DISCARD)
            .unwrap()
            .append(Pile::face_down(cards(&["AS", "KH"])));
        table.player_mut(0).unwrap().hand.append(Hand::new(cards(&["QC"])));
        assert_eq!(table.card_count(), 3);
    }
}
