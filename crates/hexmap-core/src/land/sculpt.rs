//! Raise and sink randomised chunks of terrain until the land budget is spent.

use rand::Rng;
use serde::Serialize;

use super::regions::MapRegion;
use crate::generator::GeneratorConfig;
use crate::grid::HexGrid;
use crate::search::SearchWorkspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkKind {
    Raise,
    Sink,
}

/// Land accounting of one sculpting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SculptOutcome {
    /// Cells the configuration asked to be land.
    pub target: usize,
    /// Land cells once sculpting stopped.
    pub achieved: usize,
    /// Budget left when the iteration guard ran out; 0 on success.
    pub shortfall: i64,
    pub iterations: u32,
}

/// Sculpt `grid` toward `land_percentage` land cells.
///
/// The budget is the difference between the target and the land already
/// present, so a grid that starts on target is left untouched.
pub fn sculpt_land<R: Rng>(
    grid: &mut HexGrid,
    ws: &mut SearchWorkspace,
    regions: &[MapRegion],
    config: &GeneratorConfig,
    rng: &mut R,
) -> SculptOutcome {
    let target = (grid.len() as f64 * f64::from(config.land_percentage) / 100.0).round() as usize;
    let mut budget = target as i64 - grid.land_cell_count() as i64;
    let mut iterations = 0;

    while budget != 0 && iterations < config.land_guard {
        iterations += 1;
        let kind = if budget < 0 || rng.gen_bool(f64::from(config.sink_probability)) {
            ChunkKind::Sink
        } else {
            ChunkKind::Raise
        };
        for region in regions {
            let chunk_size = rng.gen_range(config.chunk_size_min..config.chunk_size_max);
            budget = run_chunk(grid, ws, region, chunk_size, kind, budget, config, rng);
            if budget == 0 {
                break;
            }
        }
    }

    if budget != 0 {
        log::warn!(
            "land budget not met after {iterations} iterations: {budget} cells short of {target}"
        );
    }

    SculptOutcome { target, achieved: grid.land_cell_count(), shortfall: budget, iterations }
}

/// Flood one chunk out from a random cell of `region` and return the
/// updated budget. A chunk stops early when a water crossing brings the
/// budget to exactly zero.
#[allow(clippy::too_many_arguments)]
fn run_chunk<R: Rng>(
    grid: &mut HexGrid,
    ws: &mut SearchWorkspace,
    region: &MapRegion,
    chunk_size: u32,
    kind: ChunkKind,
    mut budget: i64,
    config: &GeneratorConfig,
    rng: &mut R,
) -> i64 {
    let (col, row) = region.random_cell(rng);
    let Some(center) = grid.offset_index(col as i32, row as i32) else {
        return budget;
    };

    ws.begin(grid.len());
    ws.visit(center, 0, 0, None);
    let step = if rng.gen_bool(f64::from(config.high_rise_probability)) { 2 } else { 1 };
    let water = config.water_level;
    let mut changed = 0;

    while changed < chunk_size {
        let Some(current) = ws.settle_next() else {
            break;
        };
        let original = grid.cell(current).elevation;
        let elevation = match kind {
            ChunkKind::Raise => original + step,
            ChunkKind::Sink => original - step,
        };
        if elevation > config.elevation_maximum || elevation < config.elevation_minimum {
            continue;
        }
        grid.cell_mut(current).elevation = elevation;

        let crossed = match kind {
            ChunkKind::Raise => original < water && elevation >= water,
            ChunkKind::Sink => original >= water && elevation < water,
        };
        if crossed {
            budget += if kind == ChunkKind::Raise { -1 } else { 1 };
            if budget == 0 {
                break;
            }
        }
        changed += 1;

        for (_, neighbor) in grid.neighbors(current) {
            if ws.is_unvisited(neighbor) {
                let jitter = u32::from(rng.gen_bool(f64::from(config.jitter_probability)));
                ws.visit(neighbor, grid.distance(center, neighbor), jitter, Some(current));
            }
        }
    }
    ws.clear_frontier();
    budget
}
