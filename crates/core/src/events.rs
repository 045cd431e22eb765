use crate::{CardId, Highlight, Pos};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RejectReason {
    Occupied,
    GameEnded,
    EmptySource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    GameStarted { deck: usize },
    HandDealt { count: usize },
    CardPlaced {
        card: CardId,
        key: String,
        pos: Pos,
        points: i64,
        ability_bonus: i64,
        score: i64,
    },
    /// Cells that fed the last placement's synergy, for a short visual pulse.
    SynergyHighlights {
        highlights: Vec<Highlight>,
        ttl_ms: u64,
    },
    TileCleared { pos: Pos, key: String, points: i64 },
    MoveModeEntered { card: CardId },
    MoveSourceSelected { pos: Pos },
    MoveCompleted {
        from: Pos,
        to: Pos,
        points: i64,
        score: i64,
    },
    MoveCancelled,
    PlacementRejected { pos: Pos, reason: RejectReason },
    GameEnded { score: i64 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
