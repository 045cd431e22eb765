use crate::{Ability, CardDef, Catalog, CatalogError, Cell, Grid, Pos, RandomSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedTile {
    pub pos: Pos,
    pub cell: Cell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityOutcome {
    pub grid: Grid,
    /// Points the ability added on top of the placed card's base and synergy.
    pub bonus: i64,
    pub cleared: Option<ClearedTile>,
    /// Cells whose stored points the ability raised, row-major.
    pub boosted: Vec<Pos>,
}

impl AbilityOutcome {
    fn unchanged(grid: &Grid) -> Self {
        Self {
            grid: grid.clone(),
            bonus: 0,
            cleared: None,
            boosted: Vec::new(),
        }
    }
}

/// Fires `placed`'s ability for the cell just written at `pos`.
///
/// `grid` must already hold the placed card with its base plus synergy points.
/// Tile clears choose their victim from `grid` as given, before any other
/// change this call makes.
pub fn apply<R: RandomSource>(
    catalog: &Catalog,
    grid: &Grid,
    pos: Pos,
    placed: &CardDef,
    global_boost: i64,
    rng: &mut R,
) -> Result<AbilityOutcome, CatalogError> {
    let Some(ability) = placed.ability else {
        return Ok(AbilityOutcome::unchanged(grid));
    };
    let clear_target = if ability.clears_tile() {
        pick_clear_target(grid, pos, rng)
    } else {
        None
    };

    let mut outcome = match ability {
        Ability::ClearRandomTile | Ability::SwapMove => AbilityOutcome::unchanged(grid),
        Ability::DoubleAdjacentCrops => {
            let mut gains = Vec::new();
            for at in grid.neighbors(pos) {
                let Some(cell) = grid.get(at) else {
                    continue;
                };
                let neighbor = catalog.get(&cell.card.key)?;
                if neighbor.is_crop() {
                    gains.push((at, neighbor.base_points));
                }
            }
            boost(grid, &gains)
        }
        Ability::DoubleSelf | Ability::DoubleSelfClearRandom => {
            let current = grid.get(pos).map(|cell| cell.points).unwrap_or(0);
            boost(grid, &[(pos, current)])
        }
        Ability::GlobalCropBoost => {
            let mut gains = Vec::new();
            for (at, cell) in grid.occupied() {
                if catalog.get(&cell.card.key)?.is_crop() {
                    gains.push((at, global_boost));
                }
            }
            boost(grid, &gains)
        }
        Ability::GlobalBoostAll => {
            let gains: Vec<(Pos, i64)> = grid
                .occupied()
                .map(|(at, _)| (at, global_boost))
                .collect();
            boost(grid, &gains)
        }
    };

    if let Some(target) = clear_target {
        let removed = outcome.grid.get(target).cloned();
        if let (Some(cell), Ok(next)) = (removed, outcome.grid.set(target, None)) {
            debug!(card = %placed.key, pos = %target, removed = %cell.card.key, "tile cleared");
            outcome.grid = next;
            outcome.boosted.retain(|at| *at != target);
            outcome.cleared = Some(ClearedTile { pos: target, cell });
        }
    }
    Ok(outcome)
}

fn pick_clear_target<R: RandomSource>(grid: &Grid, pos: Pos, rng: &mut R) -> Option<Pos> {
    let candidates: Vec<Pos> = grid
        .occupied()
        .map(|(at, _)| at)
        .filter(|at| *at != pos)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.pick_index(candidates.len())])
}

/// One bulk pass adding each gain to its cell's stored points.
fn boost(grid: &Grid, gains: &[(Pos, i64)]) -> AbilityOutcome {
    let next = grid.map_occupied(|at, cell| {
        for (target, gain) in gains {
            if *target == at {
                cell.points += gain;
            }
        }
    });
    let mut boosted: Vec<Pos> = gains.iter().map(|(at, _)| *at).collect();
    boosted.sort_unstable();
    boosted.dedup();
    AbilityOutcome {
        grid: next,
        bonus: gains.iter().map(|(_, gain)| gain).sum(),
        cleared: None,
        boosted,
    }
}
