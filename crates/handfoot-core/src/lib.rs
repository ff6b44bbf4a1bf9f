//! Handfoot - a Hand and Foot card game engine
//!
//! This crate provides the core game logic for Handfoot, including:
//! - Cards, packs and meld classification
//! - Card containers (piles, hands, fans) and the playing areas that hold them
//! - Riffle and multi-participant shuffles
//! - The turn-based rules engine with scoring
//!
//! # Architecture
//!
//! The engine is single-threaded and deterministic for a given seed. It can be
//! compiled to:
//! - Native Rust for simulations and analysis
//! - WebAssembly for a browser front end (feature `wasm`)
//!
//! Classification and scoring never read global state: a [`RuleSet`] is
//! passed to everything that needs one.
//!
//! # Modules
//!
//! - [`card`]: Ranks, suits, backs, cards and packs
//! - [`meld`]: Meld classification methods and melds
//! - [`group`]: Piles, hands and fans
//! - [`shuffle`]: Riffle and multi-quick shuffles
//! - [`area`]: Playing areas and the table
//! - [`player`]: Player state
//! - [`rules`]: Rule sets and card points
//! - [`strategy`]: Melding and discard strategy
//! - [`game`]: Game state machine

pub mod area;
pub mod card;
pub mod error;
pub mod events;
pub mod game;
pub mod group;
pub mod meld;
pub mod player;
pub mod rules;
pub mod shuffle;
pub mod strategy;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use area::{PlayingArea, Table, DISCARD, DRAW};
pub use card::{cards_to_str, Back, Card, Color, Pack, Rank, Suit};
pub use error::{GameError, Result};
pub use events::GameEvent;
pub use game::{GamePhase, GameState};
pub use group::{CardGroup, Fan, Group, GroupKind, Hand, Pile};
pub use meld::{Cards, Classifier, Meld, MeldMethod, MeldType};
pub use player::{Player, PlayerId};
pub use rules::{PointTable, RuleSet};
pub use shuffle::{MultiShuffle, ShuffleMethod, Shuffler};
pub use strategy::{DiscardPolicy, DiscardRanker, DrawFrom, Strategy};
