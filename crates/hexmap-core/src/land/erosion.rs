//! Thermal-style erosion: move single elevation units off steep cells.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::grid::HexGrid;

/// Erosion statistics for the generation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErosionOutcome {
    pub initial_erodible: usize,
    pub final_erodible: usize,
    pub moves: usize,
    /// The step guard stopped the pass before the target was reached.
    pub guard_hit: bool,
}

/// Index set with O(1) insert, remove, membership and random pick.
#[derive(Debug, Default)]
struct CellSet {
    items: Vec<usize>,
    position: Vec<Option<usize>>,
}

impl CellSet {
    fn with_capacity(cell_count: usize) -> Self {
        Self { items: Vec::new(), position: vec![None; cell_count] }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn contains(&self, cell: usize) -> bool {
        self.position[cell].is_some()
    }

    fn insert(&mut self, cell: usize) {
        if self.position[cell].is_none() {
            self.position[cell] = Some(self.items.len());
            self.items.push(cell);
        }
    }

    fn remove(&mut self, cell: usize) {
        let Some(at) = self.position[cell].take() else {
            return;
        };
        self.items.swap_remove(at);
        if let Some(&moved) = self.items.get(at) {
            self.position[moved] = Some(at);
        }
    }

    fn choose<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        self.items.choose(rng).copied()
    }
}

/// A cell with a neighbour at least two levels below it.
pub fn is_erodible(grid: &HexGrid, cell: usize) -> bool {
    let erodible_elevation = grid.cell(cell).elevation - 2;
    grid.neighbors(cell)
        .any(|(_, n)| grid.cell(n).elevation <= erodible_elevation)
}

fn pick_target<R: Rng>(grid: &HexGrid, cell: usize, rng: &mut R) -> Option<usize> {
    let erodible_elevation = grid.cell(cell).elevation - 2;
    let candidates: Vec<usize> = grid
        .neighbors(cell)
        .map(|(_, n)| n)
        .filter(|&n| grid.cell(n).elevation <= erodible_elevation)
        .collect();
    candidates.choose(rng).copied()
}

/// Erode until only `100 − percentage` % of the initially erodible cells
/// remain erodible.
pub fn erode<R: Rng>(grid: &mut HexGrid, percentage: u32, rng: &mut R) -> ErosionOutcome {
    let mut erodible = CellSet::with_capacity(grid.len());
    for cell in 0..grid.len() {
        if is_erodible(grid, cell) {
            erodible.insert(cell);
        }
    }
    let initial = erodible.len();
    let target = initial * (100 - percentage.min(100) as usize) / 100;
    let guard = grid.len().saturating_mul(64);
    let mut moves = 0;

    while erodible.len() > target && moves < guard {
        let Some(cell) = erodible.choose(rng) else {
            break;
        };
        let Some(target_cell) = pick_target(grid, cell, rng) else {
            erodible.remove(cell);
            continue;
        };
        moves += 1;

        grid.cell_mut(cell).elevation -= 1;
        grid.cell_mut(target_cell).elevation += 1;
        let elevation = grid.cell(cell).elevation;
        let target_elevation = grid.cell(target_cell).elevation;

        if !is_erodible(grid, cell) {
            erodible.remove(cell);
        }

        let neighbors: Vec<usize> = grid.neighbors(cell).map(|(_, n)| n).collect();
        for n in neighbors {
            if grid.cell(n).elevation == elevation + 2 && !erodible.contains(n) {
                erodible.insert(n);
            }
        }

        if is_erodible(grid, target_cell) && !erodible.contains(target_cell) {
            erodible.insert(target_cell);
        }

        let neighbors: Vec<usize> = grid.neighbors(target_cell).map(|(_, n)| n).collect();
        for n in neighbors {
            if n != cell
                && grid.cell(n).elevation == target_elevation + 1
                && !is_erodible(grid, n)
            {
                erodible.remove(n);
            }
        }
    }

    let guard_hit = erodible.len() > target;
    if guard_hit {
        log::warn!(
            "erosion stopped after {moves} moves with {} erodible cells (target {target})",
            erodible.len()
        );
    }

    ErosionOutcome { initial_erodible: initial, final_erodible: erodible.len(), moves, guard_hit }
}
