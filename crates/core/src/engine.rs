//! Pure placement engine: every operation takes a snapshot and returns a new
//! one, so a rejected or failed call leaves the caller's state untouched.

use crate::ability::{self, ClearedTile};
use crate::synergy::{self, SynergyReport};
use crate::{
    CardDef, CardId, CardInstance, Catalog, CatalogError, Cell, Deck, GameConfig, GameState,
    GridError, MoveState, Pos, RandomSource,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("card {0} is not in hand")]
    CardNotInHand(CardId),
    #[error("no card selected")]
    NoCardSelected,
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Read-only inputs shared by every engine call.
#[derive(Debug, Clone, Copy)]
pub struct Rules<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a GameConfig,
}

impl<'a> Rules<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a GameConfig) -> Self {
        Self { catalog, config }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub card: CardInstance,
    pub pos: Pos,
    pub base_points: i64,
    pub synergy: SynergyReport,
    /// Base plus synergy, before the card's ability fired.
    pub points_before_ability: i64,
    /// Points stored on the placed cell after its ability.
    pub points: i64,
    pub ability_bonus: i64,
    pub cleared: Option<ClearedTile>,
    pub boosted: Vec<Pos>,
    pub drawn: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub card: CardInstance,
    pub from: Pos,
    pub to: Pos,
    pub synergy: SynergyReport,
    pub points_before: i64,
    pub points_after: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOutcome {
    Placed(Placement),
    RejectedOccupied,
    RejectedGameEnded,
    RejectedEmptySource,
    EnteredMoveMode { card: CardInstance, drawn: usize },
    SourceSelected { source: Pos },
    CompletedMove(Relocation),
}

impl PlaceOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            PlaceOutcome::RejectedOccupied
                | PlaceOutcome::RejectedGameEnded
                | PlaceOutcome::RejectedEmptySource
        )
    }
}

/// What the tile detail view shows for an occupied cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileInfo {
    pub pos: Pos,
    pub card: CardInstance,
    pub name: String,
    pub base_points: i64,
    pub points: i64,
    pub synergy: SynergyReport,
}

pub fn new_game<R: RandomSource>(rules: Rules<'_>, rng: &mut R) -> GameState {
    let mut state = GameState::empty(rules.config);
    state.deck = Deck::build(
        rules.catalog,
        &rules.config.copies,
        rng,
        &mut state.next_card_id,
    );
    state.replenish();
    debug!(
        deck = state.deck.remaining(),
        hand = state.hand.len(),
        "new game dealt"
    );
    state
}

/// One click on the board at `pos`, with the hand card the caller has selected.
///
/// In move mode the click drives the relocation and `card` is ignored.
pub fn place<R: RandomSource>(
    rules: Rules<'_>,
    state: &GameState,
    pos: Pos,
    card: Option<CardId>,
    rng: &mut R,
) -> Result<(GameState, PlaceOutcome), GameError> {
    state.grid.check(pos)?;
    if state.ended {
        debug!(%pos, "placement rejected: game ended");
        return Ok((state.clone(), PlaceOutcome::RejectedGameEnded));
    }
    match state.move_state {
        MoveState::AwaitingSource => Ok(select_source(state, pos)),
        MoveState::AwaitingDestination { source } => complete_move(rules, state, source, pos),
        MoveState::Idle => {
            let id = card.ok_or(GameError::NoCardSelected)?;
            place_card(rules, state, pos, id, rng)
        }
    }
}

fn place_card<R: RandomSource>(
    rules: Rules<'_>,
    state: &GameState,
    pos: Pos,
    id: CardId,
    rng: &mut R,
) -> Result<(GameState, PlaceOutcome), GameError> {
    let instance = state
        .hand
        .get(id)
        .cloned()
        .ok_or(GameError::CardNotInHand(id))?;
    let def = rules.catalog.get(&instance.key)?;
    if !state.grid.is_empty(pos) {
        debug!(%pos, card = id, "placement rejected: occupied");
        return Ok((state.clone(), PlaceOutcome::RejectedOccupied));
    }

    let mut next = state.clone();
    next.hand.remove(id);
    if def.is_relocation() {
        next.deck.discard(instance.clone());
        let drawn = next.replenish();
        next.move_state = MoveState::AwaitingSource;
        debug!(card = id, key = %instance.key, "move mode entered");
        return Ok((next, PlaceOutcome::EnteredMoveMode { card: instance, drawn }));
    }

    let synergy = synergy::resolve(rules.catalog, &state.grid, pos, def)?;
    let points_before_ability = def.base_points + synergy.bonus;
    let placed = state.grid.set(
        pos,
        Some(Cell {
            card: instance.clone(),
            points: points_before_ability,
            synergy_bonus: synergy.bonus,
            synergies: synergy.descriptors.clone(),
        }),
    )?;
    let fired = ability::apply(
        rules.catalog,
        &placed,
        pos,
        def,
        rules.config.global_boost,
        rng,
    )?;
    let points = fired
        .grid
        .get(pos)
        .map(|cell| cell.points)
        .unwrap_or(points_before_ability);

    next.grid = fired.grid;
    next.score = next.grid.total_points();
    if let Some(cleared) = &fired.cleared {
        next.deck.discard(cleared.cell.card.clone());
    }
    let drawn = next.replenish();
    debug!(
        card = id,
        key = %instance.key,
        %pos,
        points,
        ability_bonus = fired.bonus,
        score = next.score,
        "card placed"
    );
    Ok((
        next,
        PlaceOutcome::Placed(Placement {
            card: instance,
            pos,
            base_points: def.base_points,
            synergy,
            points_before_ability,
            points,
            ability_bonus: fired.bonus,
            cleared: fired.cleared,
            boosted: fired.boosted,
            drawn,
        }),
    ))
}

fn select_source(state: &GameState, pos: Pos) -> (GameState, PlaceOutcome) {
    if state.grid.is_empty(pos) {
        debug!(%pos, "move source rejected: empty");
        return (state.clone(), PlaceOutcome::RejectedEmptySource);
    }
    let mut next = state.clone();
    next.move_state = MoveState::AwaitingDestination { source: pos };
    (next, PlaceOutcome::SourceSelected { source: pos })
}

fn complete_move(
    rules: Rules<'_>,
    state: &GameState,
    source: Pos,
    dest: Pos,
) -> Result<(GameState, PlaceOutcome), GameError> {
    if !state.grid.is_empty(dest) {
        debug!(%dest, "move rejected: destination occupied");
        return Ok((state.clone(), PlaceOutcome::RejectedOccupied));
    }
    let cell = state
        .grid
        .get(source)
        .cloned()
        .ok_or_else(|| GameError::InvalidSnapshot(format!("move source {source} is empty")))?;
    let def = rules.catalog.get(&cell.card.key)?;
    let vacated = state.grid.set(source, None)?;
    let synergy = synergy::resolve(rules.catalog, &vacated, dest, def)?;
    let points_after = cell.points - cell.synergy_bonus + synergy.bonus;
    let moved = Cell {
        card: cell.card.clone(),
        points: points_after,
        synergy_bonus: synergy.bonus,
        synergies: synergy.descriptors.clone(),
    };

    let mut next = state.clone();
    next.grid = vacated.set(dest, Some(moved))?;
    next.score = next.grid.total_points();
    next.move_state = MoveState::Idle;
    debug!(
        key = %cell.card.key,
        from = %source,
        to = %dest,
        points_before = cell.points,
        points_after,
        "card moved"
    );
    Ok((
        next,
        PlaceOutcome::CompletedMove(Relocation {
            card: cell.card,
            from: source,
            to: dest,
            synergy,
            points_before: cell.points,
            points_after,
        }),
    ))
}

pub fn cancel_move(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.move_state = MoveState::Idle;
    next
}

pub fn end_game(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.ended = true;
    next.move_state = MoveState::Idle;
    next
}

/// Synergy `def` would earn at `pos`, without touching the state.
pub fn describe_synergies(
    rules: Rules<'_>,
    state: &GameState,
    pos: Pos,
    def: &CardDef,
) -> Result<SynergyReport, GameError> {
    state.grid.check(pos)?;
    Ok(synergy::resolve(rules.catalog, &state.grid, pos, def)?)
}

pub fn inspect_tile(
    rules: Rules<'_>,
    state: &GameState,
    pos: Pos,
) -> Result<Option<TileInfo>, GameError> {
    state.grid.check(pos)?;
    let Some(cell) = state.grid.get(pos) else {
        return Ok(None);
    };
    let def = rules.catalog.get(&cell.card.key)?;
    let synergy = synergy::resolve(rules.catalog, &state.grid, pos, def)?;
    Ok(Some(TileInfo {
        pos,
        card: cell.card.clone(),
        name: def.name.clone(),
        base_points: def.base_points,
        points: cell.points,
        synergy,
    }))
}
