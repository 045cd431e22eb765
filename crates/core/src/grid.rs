use crate::CardInstance;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("position ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },
}

/// A placed card snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cell {
    pub card: CardInstance,
    pub points: i64,
    /// Portion of `points` that came from adjacency when the card was last placed or moved.
    #[serde(default)]
    pub synergy_bonus: i64,
    #[serde(default)]
    pub synergies: Vec<String>,
}

/// Square board of optional cells, laid out row-major.
///
/// Writes are copy-on-write: `set` and `map_occupied` return a new grid and
/// leave every other holder of the old one looking at the same snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Arc<Vec<Option<Cell>>>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: Arc::new(vec![None; size * size]),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        let size = self.size as isize;
        row >= 0 && row < size && col >= 0 && col < size
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn check(&self, pos: Pos) -> Result<(), GridError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                size: self.size,
            })
        }
    }

    /// In-bounds orthogonal neighbors in up, down, left, right order.
    pub fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        let (row, col) = (pos.row as isize, pos.col as isize);
        [(row - 1, col), (row + 1, col), (row, col - 1), (row, col + 1)]
            .into_iter()
            .filter(|&(r, c)| self.in_bounds(r, c))
            .map(|(r, c)| Pos::new(r as usize, c as usize))
            .collect()
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        if !self.contains(pos) {
            return None;
        }
        self.cells[self.index(pos)].as_ref()
    }

    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos).is_none()
    }

    pub fn set(&self, pos: Pos, cell: Option<Cell>) -> Result<Grid, GridError> {
        self.check(pos)?;
        let mut next = self.clone();
        let idx = next.index(pos);
        Arc::make_mut(&mut next.cells)[idx] = cell;
        Ok(next)
    }

    /// Applies `f` to every occupied cell of a copy of this grid.
    pub fn map_occupied<F>(&self, mut f: F) -> Grid
    where
        F: FnMut(Pos, &mut Cell),
    {
        let mut next = self.clone();
        let size = next.size;
        for (idx, slot) in Arc::make_mut(&mut next.cells).iter_mut().enumerate() {
            if let Some(cell) = slot.as_mut() {
                f(Pos::new(idx / size, idx % size), cell);
            }
        }
        next
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Pos, &Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(idx, slot)| {
                slot.as_ref().map(|cell| (Pos::new(idx / size, idx % size), cell))
            })
    }

    /// Cell storage matches the declared size. Only a hand-edited snapshot breaks this.
    pub fn is_square(&self) -> bool {
        self.cells.len() == self.size * self.size
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.filled_count() == self.cells.len()
    }

    pub fn total_points(&self) -> i64 {
        self.occupied().map(|(_, cell)| cell.points).sum()
    }

    fn index(&self, pos: Pos) -> usize {
        pos.row * self.size + pos.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(id: u32, points: i64) -> Cell {
        Cell {
            card: CardInstance::new(id, "WHEAT"),
            points,
            synergy_bonus: 0,
            synergies: Vec::new(),
        }
    }

    #[test]
    fn neighbors_respect_edges() {
        let grid = Grid::new(5);
        assert_eq!(
            grid.neighbors(Pos::new(0, 0)),
            vec![Pos::new(1, 0), Pos::new(0, 1)]
        );
        assert_eq!(grid.neighbors(Pos::new(2, 2)).len(), 4);
        assert_eq!(
            grid.neighbors(Pos::new(4, 4)),
            vec![Pos::new(3, 4), Pos::new(4, 3)]
        );
        assert_eq!(grid.neighbors(Pos::new(0, 3)).len(), 3);
    }

    #[test]
    fn in_bounds_rejects_negative_and_overflow() {
        let grid = Grid::new(5);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(4, 4));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, 5));
    }

    #[test]
    fn set_is_copy_on_write() {
        let empty = Grid::new(5);
        let one = empty.set(Pos::new(1, 1), Some(cell(1, 3))).expect("set");
        assert!(empty.is_empty(Pos::new(1, 1)));
        assert_eq!(one.get(Pos::new(1, 1)).map(|c| c.points), Some(3));
        let boosted = one.map_occupied(|_, cell| cell.points += 2);
        assert_eq!(one.total_points(), 3);
        assert_eq!(boosted.total_points(), 5);
    }

    #[test]
    fn set_out_of_bounds_fails() {
        let grid = Grid::new(5);
        let err = grid.set(Pos::new(5, 0), None).expect_err("must fail");
        assert_eq!(
            err,
            GridError::OutOfBounds {
                row: 5,
                col: 0,
                size: 5
            }
        );
        assert!(grid.get(Pos::new(9, 9)).is_none());
    }

    #[test]
    fn occupied_is_row_major() {
        let grid = Grid::new(3)
            .set(Pos::new(2, 0), Some(cell(1, 1)))
            .and_then(|g| g.set(Pos::new(0, 2), Some(cell(2, 1))))
            .expect("set");
        let order: Vec<Pos> = grid.occupied().map(|(pos, _)| pos).collect();
        assert_eq!(order, vec![Pos::new(0, 2), Pos::new(2, 0)]);
    }
}
