//! Runtime graph queries over a [`HexGrid`]: movement paths and sight.
//!
//! Both queries are sessions of one [`SearchWorkspace`]. Starting a query
//! abandons any unfinished one; phase stamping makes the stale state
//! unreadable, so no cleanup pass is needed.
pub mod frontier;
pub mod path;
pub mod phase;
pub mod visibility;

use crate::grid::HexGrid;
pub use frontier::FrontierQueue;
pub use path::{Path, TravelCosts};
pub use phase::{SearchPhase, SearchWorkspace, Session};

/// Owner of the search state used by live queries.
#[derive(Debug, Default, Clone)]
pub struct Navigator {
    workspace: SearchWorkspace,
    pub costs: TravelCosts,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_costs(costs: TravelCosts) -> Self {
        Self { workspace: SearchWorkspace::new(), costs }
    }

    /// Cheapest route from `from` to `to` for a unit with `speed` movement
    /// points per turn, or `None` if the goal cannot be reached.
    pub fn find_path(&mut self, grid: &HexGrid, from: usize, to: usize, speed: u32) -> Option<Path> {
        path::find_path(&mut self.workspace, grid, from, to, speed, &self.costs)
    }

    /// Every cell within `radius` steps of `origin`, origin first.
    pub fn cells_visible_from(&mut self, grid: &HexGrid, origin: usize, radius: u32) -> Vec<usize> {
        visibility::cells_visible_from(&mut self.workspace, grid, origin, radius)
    }

    /// Cells seen from `origin` with elevation taken into account.
    pub fn cells_in_sight(&mut self, grid: &HexGrid, origin: usize, range: u32) -> Vec<usize> {
        visibility::cells_in_sight(&mut self.workspace, grid, origin, range)
    }

    /// Add one observer at `origin`; reached cells become visible and explored.
    pub fn increase_visibility(&mut self, grid: &mut HexGrid, origin: usize, range: u32) {
        visibility::increase_visibility(&mut self.workspace, grid, origin, range);
    }

    /// Remove the observer previously added with the same arguments.
    pub fn decrease_visibility(&mut self, grid: &mut HexGrid, origin: usize, range: u32) {
        visibility::decrease_visibility(&mut self.workspace, grid, origin, range);
    }

    /// Search state of the last query, e.g. for distance labels.
    pub fn workspace(&self) -> &SearchWorkspace {
        &self.workspace
    }
}
