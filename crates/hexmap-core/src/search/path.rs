//! Movement pathfinding with turn-aligned costs.

use serde::{Deserialize, Serialize};

use super::phase::SearchWorkspace;
use crate::coords::{HexDirection, HexEdgeType};
use crate::grid::{HexCell, HexGrid};

/// Base movement costs per edge.
///
/// Every cost must be at least 1, otherwise the distance heuristic
/// overestimates and paths may be suboptimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelCosts {
    pub road: u32,
    pub flat: u32,
    pub slope: u32,
}

impl Default for TravelCosts {
    fn default() -> Self {
        Self { road: 1, flat: 5, slope: 10 }
    }
}

/// A found route, `cells[0]` is the start and the last entry the goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub cells: Vec<usize>,
    pub cost: u32,
}

impl Path {
    /// Number of turns needed to walk the path at `speed` points per turn.
    pub fn turns(&self, speed: u32) -> u32 {
        self.cost.div_ceil(speed.max(1))
    }
}

/// A unit may end a step here.
pub fn is_valid_destination(cell: &HexCell) -> bool {
    !cell.is_underwater() && !cell.occupied
}

/// Cost of stepping from `from` to its neighbour `to` across `direction`,
/// or `None` if the edge cannot be crossed.
pub fn move_cost(
    grid: &HexGrid,
    from: usize,
    to: usize,
    direction: HexDirection,
    costs: &TravelCosts,
) -> Option<u32> {
    let a = grid.cell(from);
    let b = grid.cell(to);
    let edge = HexEdgeType::between(a.elevation, b.elevation);
    if edge == HexEdgeType::Cliff {
        return None;
    }
    if a.has_road_through_edge(direction) {
        return Some(costs.road);
    }
    if a.walled != b.walled {
        return None;
    }
    let base = if edge == HexEdgeType::Flat { costs.flat } else { costs.slope };
    Some(base + u32::from(b.urban_level) + u32::from(b.farm_level) + u32::from(b.plant_level))
}

pub(crate) fn find_path(
    ws: &mut SearchWorkspace,
    grid: &HexGrid,
    from: usize,
    to: usize,
    speed: u32,
    costs: &TravelCosts,
) -> Option<Path> {
    let speed = speed.max(1);
    ws.begin(grid.len());
    ws.visit(from, 0, grid.distance(from, to), None);

    while let Some(current) = ws.settle_next() {
        if current == to {
            return Some(trace_back(ws, to));
        }
        let current_distance = ws.distance(current)?;
        let current_turn = current_distance.saturating_sub(1) / speed;

        for (direction, neighbor) in grid.neighbors(current) {
            if ws.is_settled(neighbor) || !is_valid_destination(grid.cell(neighbor)) {
                continue;
            }
            let Some(cost) = move_cost(grid, current, neighbor, direction, costs) else {
                continue;
            };

            // Movement points left over at the end of a turn are forfeited.
            let mut distance = current_distance + cost;
            let turn = distance.saturating_sub(1) / speed;
            if turn > current_turn {
                distance = turn * speed + cost;
            }

            if ws.is_unvisited(neighbor) {
                ws.visit(neighbor, distance, grid.distance(neighbor, to), Some(current));
            } else {
                ws.relax(neighbor, distance, current);
            }
        }
    }
    None
}

fn trace_back(ws: &SearchWorkspace, to: usize) -> Path {
    let cost = ws.distance(to).unwrap_or(0);
    let mut cells = vec![to];
    let mut cursor = to;
    while let Some(prev) = ws.predecessor(cursor) {
        cells.push(prev);
        cursor = prev;
    }
    cells.reverse();
    Path { cells, cost }
}
