use crate::engine::{self, PlaceOutcome, Rules, TileInfo};
use crate::{
    CardId, Catalog, Event, EventBus, GameConfig, GameError, GameState, Pos, RandomSource,
    RejectReason, RngState, SynergyReport,
};
use tracing::info;

/// Owns the catalog, rules and random source for one player's session and
/// commits engine results by swapping in the returned snapshot.
#[derive(Debug)]
pub struct Game<R: RandomSource = RngState> {
    catalog: Catalog,
    config: GameConfig,
    rng: R,
    state: GameState,
}

impl Game<RngState> {
    pub fn seeded(catalog: Catalog, config: GameConfig, seed: u64) -> Self {
        Self::new(catalog, config, RngState::from_seed(seed), &mut EventBus::default())
    }
}

impl<R: RandomSource> Game<R> {
    pub fn new(catalog: Catalog, config: GameConfig, mut rng: R, events: &mut EventBus) -> Self {
        let state = engine::new_game(Rules::new(&catalog, &config), &mut rng);
        let game = Self {
            catalog,
            config,
            rng,
            state,
        };
        game.announce_start(events);
        game
    }

    /// Resumes from a stored snapshot after validating it against the catalog.
    pub fn resume(
        catalog: Catalog,
        config: GameConfig,
        rng: R,
        state: GameState,
    ) -> Result<Self, GameError> {
        state.validate(&catalog)?;
        if state.grid.size() != config.grid_size {
            return Err(GameError::InvalidSnapshot(format!(
                "grid is {} wide, rules expect {}",
                state.grid.size(),
                config.grid_size
            )));
        }
        Ok(Self {
            catalog,
            config,
            rng,
            state,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> Rules<'_> {
        Rules::new(&self.catalog, &self.config)
    }

    pub fn score(&self) -> i64 {
        self.state.score
    }

    pub fn restart(&mut self, events: &mut EventBus) {
        self.state = engine::new_game(Rules::new(&self.catalog, &self.config), &mut self.rng);
        self.announce_start(events);
    }

    /// Places a hand card at `pos`, or enters move mode for a relocation card.
    pub fn place_card(
        &mut self,
        pos: Pos,
        card: CardId,
        events: &mut EventBus,
    ) -> Result<PlaceOutcome, GameError> {
        self.click(pos, Some(card), events)
    }

    /// A board click without a hand card; drives move mode.
    pub fn select_cell(
        &mut self,
        pos: Pos,
        events: &mut EventBus,
    ) -> Result<PlaceOutcome, GameError> {
        self.click(pos, None, events)
    }

    pub fn cancel_move(&mut self, events: &mut EventBus) {
        if !self.state.move_state.is_active() {
            return;
        }
        self.state = engine::cancel_move(&self.state);
        events.push(Event::MoveCancelled);
    }

    pub fn end_game(&mut self, events: &mut EventBus) {
        if self.state.ended {
            return;
        }
        self.state = engine::end_game(&self.state);
        info!(score = self.state.score, "game ended");
        events.push(Event::GameEnded {
            score: self.state.score,
        });
    }

    pub fn describe_synergies(&self, pos: Pos, key: &str) -> Result<SynergyReport, GameError> {
        let def = self.catalog.get(key)?;
        engine::describe_synergies(self.rules(), &self.state, pos, def)
    }

    pub fn inspect_tile(&self, pos: Pos) -> Result<Option<TileInfo>, GameError> {
        engine::inspect_tile(self.rules(), &self.state, pos)
    }

    fn click(
        &mut self,
        pos: Pos,
        card: Option<CardId>,
        events: &mut EventBus,
    ) -> Result<PlaceOutcome, GameError> {
        let rules = Rules::new(&self.catalog, &self.config);
        let (next, outcome) = engine::place(rules, &self.state, pos, card, &mut self.rng)?;
        self.state = next;
        self.publish(pos, &outcome, events);
        Ok(outcome)
    }

    fn publish(&self, pos: Pos, outcome: &PlaceOutcome, events: &mut EventBus) {
        let score = self.state.score;
        match outcome {
            PlaceOutcome::Placed(placement) => {
                events.push(Event::CardPlaced {
                    card: placement.card.id,
                    key: placement.card.key.clone(),
                    pos: placement.pos,
                    points: placement.points,
                    ability_bonus: placement.ability_bonus,
                    score,
                });
                if !placement.synergy.highlights.is_empty() {
                    events.push(Event::SynergyHighlights {
                        highlights: placement.synergy.highlights.clone(),
                        ttl_ms: self.config.highlight_ttl_ms,
                    });
                }
                if let Some(cleared) = &placement.cleared {
                    events.push(Event::TileCleared {
                        pos: cleared.pos,
                        key: cleared.cell.card.key.clone(),
                        points: cleared.cell.points,
                    });
                }
                if placement.drawn > 0 {
                    events.push(Event::HandDealt {
                        count: placement.drawn,
                    });
                }
            }
            PlaceOutcome::EnteredMoveMode { card, drawn } => {
                events.push(Event::MoveModeEntered { card: card.id });
                if *drawn > 0 {
                    events.push(Event::HandDealt { count: *drawn });
                }
            }
            PlaceOutcome::SourceSelected { source } => {
                events.push(Event::MoveSourceSelected { pos: *source });
            }
            PlaceOutcome::CompletedMove(relocation) => {
                events.push(Event::MoveCompleted {
                    from: relocation.from,
                    to: relocation.to,
                    points: relocation.points_after,
                    score,
                });
            }
            PlaceOutcome::RejectedOccupied => events.push(Event::PlacementRejected {
                pos,
                reason: RejectReason::Occupied,
            }),
            PlaceOutcome::RejectedGameEnded => events.push(Event::PlacementRejected {
                pos,
                reason: RejectReason::GameEnded,
            }),
            PlaceOutcome::RejectedEmptySource => events.push(Event::PlacementRejected {
                pos,
                reason: RejectReason::EmptySource,
            }),
        }
    }

    fn announce_start(&self, events: &mut EventBus) {
        info!(
            deck = self.state.deck.remaining(),
            grid = self.config.grid_size,
            "game started"
        );
        events.push(Event::GameStarted {
            deck: self.state.deck.remaining(),
        });
        if !self.state.hand.is_empty() {
            events.push(Event::HandDealt {
                count: self.state.hand.len(),
            });
        }
    }
}
