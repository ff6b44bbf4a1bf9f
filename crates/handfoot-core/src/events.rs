//! Events emitted by the game engine.

use crate::card::Card;
use crate::meld::MeldType;
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Events that occur as a result of engine operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Packs were brought to the table
    GameStarted { players: u8, packs: usize },

    /// Cards were shuffled and dealt for a new round
    RoundStarted { round: u8, threshold: i32 },

    /// A player drew from the draw piles
    CardsDrawn { player: PlayerId, count: usize },

    /// A player made their first lay-down of the round
    WentDown { player: PlayerId, points: i32 },

    /// Cards were added to a meld on the table
    MeldLaidDown {
        player: PlayerId,
        meld_type: MeldType,
        count: usize,
        wilds: usize,
    },

    /// A meld reached the complete size and became a pile
    PileCompleted {
        player: PlayerId,
        meld_type: MeldType,
        pure: bool,
    },

    /// A player discarded a card
    CardDiscarded { player: PlayerId, card: Card },

    /// A player emptied their hand and picked up their foot
    FootPickedUp { player: PlayerId },

    /// Turn ended
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    /// A round ended, with each player's score for it
    RoundEnded {
        round: u8,
        went_out: Option<PlayerId>,
        scores: Vec<i32>,
    },

    /// The last round ended
    GameWon {
        player: PlayerId,
        totals: Vec<i32>,
    },
}
