use crate::{CardId, Catalog, Deck, GameConfig, GameError, Grid, Hand, Pos};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Relocation interaction, driven by a consumed swap-move card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveState {
    #[default]
    Idle,
    AwaitingSource,
    AwaitingDestination {
        source: Pos,
    },
}

impl MoveState {
    pub fn is_active(self) -> bool {
        !matches!(self, MoveState::Idle)
    }
}

/// Everything a persistence or sync layer needs to snapshot and replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub grid: Grid,
    pub deck: Deck,
    pub hand: Hand,
    pub score: i64,
    #[serde(default)]
    pub move_state: MoveState,
    #[serde(default)]
    pub ended: bool,
    pub next_card_id: CardId,
}

impl GameState {
    pub fn empty(config: &GameConfig) -> Self {
        Self {
            grid: Grid::new(config.grid_size),
            deck: Deck::default(),
            hand: Hand::with_capacity(config.hand_capacity),
            score: 0,
            move_state: MoveState::Idle,
            ended: false,
            next_card_id: 1,
        }
    }

    /// Draws into the hand unless the game is over. Returns the number drawn.
    pub fn replenish(&mut self) -> usize {
        if self.ended {
            return 0;
        }
        self.hand.refill_from(&mut self.deck)
    }

    /// No further placement is possible.
    pub fn is_stalled(&self) -> bool {
        self.grid.is_full() || (self.hand.is_empty() && self.deck.is_empty())
    }

    /// Every instance id across draw pile, hand, grid and discard pile, sorted.
    pub fn instance_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .deck
            .draw
            .iter()
            .chain(self.hand.cards.iter())
            .chain(self.deck.discard.iter())
            .map(|card| card.id)
            .chain(self.grid.occupied().map(|(_, cell)| cell.card.id))
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Structural checks for snapshots coming back from storage.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), GameError> {
        if !self.grid.is_square() {
            return Err(GameError::InvalidSnapshot(format!(
                "grid storage does not match size {}",
                self.grid.size()
            )));
        }
        let total = self.grid.total_points();
        if self.score != total {
            return Err(GameError::InvalidSnapshot(format!(
                "score {} does not match placed points {}",
                self.score, total
            )));
        }
        if self.hand.len() > self.hand.capacity {
            return Err(GameError::InvalidSnapshot(format!(
                "hand holds {} cards over capacity {}",
                self.hand.len(),
                self.hand.capacity
            )));
        }
        let keys = self
            .deck
            .draw
            .iter()
            .chain(self.hand.cards.iter())
            .chain(self.deck.discard.iter())
            .map(|card| card.key.as_str())
            .chain(self.grid.occupied().map(|(_, cell)| cell.card.key.as_str()));
        for key in keys {
            catalog.get(key)?;
        }
        let ids = self.instance_ids();
        let unique: HashSet<CardId> = ids.iter().copied().collect();
        if unique.len() != ids.len() {
            return Err(GameError::InvalidSnapshot(
                "card instance owned twice".to_string(),
            ));
        }
        if ids.last().is_some_and(|max| *max >= self.next_card_id) {
            return Err(GameError::InvalidSnapshot(
                "next card id already in use".to_string(),
            ));
        }
        if let MoveState::AwaitingDestination { source } = self.move_state {
            if self.grid.is_empty(source) {
                return Err(GameError::InvalidSnapshot(format!(
                    "move source {source} is empty"
                )));
            }
        }
        Ok(())
    }
}
