//! Error type shared by every layer of the engine.

use crate::group::GroupKind;
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while handling cards or running the game
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Cannot parse card shorthand {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("Unknown meld classification method {0:?}")]
    InvalidMethod(String),

    #[error("Not enough cards: requested {requested}, only {available} available")]
    Underflow { requested: usize, available: usize },

    #[error("Too many cards to riffle shuffle: {count} (max {max})")]
    TooManyCards { count: usize, max: usize },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Group shape mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch { expected: GroupKind, found: GroupKind },

    #[error("Invalid meld: {0}")]
    InvalidMeld(String),

    #[error("Player {player} cannot discard from an empty hand")]
    EmptyHand { player: PlayerId },

    #[error("Round {round} exceeds the limit of {max} rounds")]
    TooManyRounds { round: u8, max: u8 },

    #[error("No cards available for player {player} to draw")]
    NoCardsAvailable { player: PlayerId },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("Game is over")]
    GameOver,
}

pub type Result<T> = std::result::Result<T, GameError>;
