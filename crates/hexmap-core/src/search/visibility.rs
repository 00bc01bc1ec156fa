//! Bounded-radius visibility sweeps.

use super::phase::SearchWorkspace;
use crate::grid::HexGrid;

/// Uniform-cost sweep from `origin`. `blocked(distance, neighbor)` rejects a
/// neighbour reached at `distance`. Only cells reached along a shortest hex
/// line are accepted, so sight never bends around obstacles.
fn sweep<F>(ws: &mut SearchWorkspace, grid: &HexGrid, origin: usize, blocked: F) -> Vec<usize>
where
    F: Fn(u32, usize) -> bool,
{
    let mut reached = Vec::new();
    ws.begin(grid.len());
    ws.visit(origin, 0, 0, None);

    while let Some(current) = ws.settle_next() {
        reached.push(current);
        let Some(current_distance) = ws.distance(current) else {
            continue;
        };
        let distance = current_distance + 1;
        for (_, neighbor) in grid.neighbors(current) {
            if ws.is_settled(neighbor)
                || distance > grid.distance(origin, neighbor)
                || blocked(distance, neighbor)
            {
                continue;
            }
            if ws.is_unvisited(neighbor) {
                ws.visit(neighbor, distance, 0, Some(current));
            } else {
                ws.relax(neighbor, distance, current);
            }
        }
    }
    reached
}

pub(crate) fn cells_visible_from(
    ws: &mut SearchWorkspace,
    grid: &HexGrid,
    origin: usize,
    radius: u32,
) -> Vec<usize> {
    sweep(ws, grid, origin, |distance, _| distance > radius)
}

/// Terrain-aware sight: high ground sees further, high targets block sooner.
pub(crate) fn cells_in_sight(
    ws: &mut SearchWorkspace,
    grid: &HexGrid,
    origin: usize,
    range: u32,
) -> Vec<usize> {
    let reach = i64::from(range) + i64::from(grid.cell(origin).view_elevation());
    sweep(ws, grid, origin, |distance, neighbor| {
        i64::from(distance) + i64::from(grid.cell(neighbor).view_elevation()) > reach
    })
}

pub(crate) fn increase_visibility(
    ws: &mut SearchWorkspace,
    grid: &mut HexGrid,
    origin: usize,
    range: u32,
) {
    for cell in cells_in_sight(ws, grid, origin, range) {
        let c = grid.cell_mut(cell);
        let v = c.visibility();
        c.set_visibility(v + 1);
        c.explored = true;
    }
}

pub(crate) fn decrease_visibility(
    ws: &mut SearchWorkspace,
    grid: &mut HexGrid,
    origin: usize,
    range: u32,
) {
    for cell in cells_in_sight(ws, grid, origin, range) {
        let c = grid.cell_mut(cell);
        let v = c.visibility();
        c.set_visibility(v.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexagon_size(radius: u32) -> usize {
        (3 * radius * (radius + 1) + 1) as usize
    }

    #[test]
    fn radius_sweep_collects_full_hexagon() {
        let grid = HexGrid::new_unchecked(15, 15, false);
        let origin = 7 + 7 * 15;
        let mut ws = SearchWorkspace::new();
        for radius in 0..=4 {
            let seen = cells_visible_from(&mut ws, &grid, origin, radius);
            assert_eq!(seen.len(), hexagon_size(radius), "radius {radius}");
            assert!(seen.iter().all(|&c| grid.distance(origin, c) <= radius));
            assert_eq!(seen[0], origin);
        }
    }

    #[test]
    fn radius_sweep_is_clipped_by_grid_edge() {
        let grid = HexGrid::new_unchecked(10, 10, false);
        let mut ws = SearchWorkspace::new();
        let seen = cells_visible_from(&mut ws, &grid, 0, 2);
        let expected = (0..grid.len()).filter(|&c| grid.distance(0, c) <= 2).count();
        assert_eq!(seen.len(), expected);
    }

    /// A ridge in front of the viewer hides what lies behind it.
    #[test]
    fn high_ground_blocks_sight() {
        let mut grid = HexGrid::new_unchecked(10, 1, false);
        grid.cell_mut(2).elevation = 4;
        let mut ws = SearchWorkspace::new();
        let seen = cells_in_sight(&mut ws, &grid, 0, 3);
        assert!(seen.contains(&1));
        assert!(!seen.contains(&2));
        assert!(!seen.contains(&3), "cells behind the ridge must stay hidden");
    }

    #[test]
    fn visibility_counters_balance() {
        let mut grid = HexGrid::new_unchecked(10, 10, false);
        let mut ws = SearchWorkspace::new();
        increase_visibility(&mut ws, &mut grid, 55, 2);
        increase_visibility(&mut ws, &mut grid, 55, 2);
        assert_eq!(grid.cell(55).visibility(), 2);
        assert!(grid.cell(55).explored);

        decrease_visibility(&mut ws, &mut grid, 55, 2);
        decrease_visibility(&mut ws, &mut grid, 55, 2);
        assert!(grid.cells().iter().all(|c| !c.is_visible()));
        assert!(grid.cell(55).explored, "explored is sticky");
    }
}
