//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod ability;
pub mod cards;
pub mod catalog;
pub mod config;
pub mod deck;
pub mod engine;
pub mod events;
pub mod game;
pub mod grid;
pub mod hand;
pub mod rng;
pub mod state;
pub mod synergy;

pub use ability::{AbilityOutcome, ClearedTile};
pub use cards::*;
pub use catalog::*;
pub use config::*;
pub use deck::*;
pub use engine::{
    cancel_move, describe_synergies, end_game, inspect_tile, new_game, place, GameError,
    PlaceOutcome, Placement, Relocation, Rules, TileInfo,
};
pub use events::*;
pub use game::*;
pub use grid::*;
pub use hand::*;
pub use rng::*;
pub use state::*;
pub use synergy::{Highlight, SynergyKind, SynergyReport};
