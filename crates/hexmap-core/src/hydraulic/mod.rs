//! River carving: weighted source selection → downhill walks → lakes.
pub mod flow;
pub mod origins;

use rand::Rng;
use serde::Serialize;

use crate::climate::ClimateField;
use crate::generator::GeneratorConfig;
use crate::grid::HexGrid;
use flow::{walk_river, WalkParams};
use origins::OriginPool;

/// Outcome of the river stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiverReport {
    /// River cells the configuration asked for.
    pub budget: usize,
    /// River cells actually carved.
    pub carved: usize,
    /// Every river, source first.
    pub rivers: Vec<Vec<usize>>,
}

/// A source is usable only if neither it nor any neighbour carries a river
/// or lies underwater.
fn is_valid_origin(grid: &HexGrid, origin: usize) -> bool {
    let cell = grid.cell(origin);
    if cell.has_river() || cell.is_underwater() {
        return false;
    }
    grid.neighbors(origin).all(|(_, n)| {
        let c = grid.cell(n);
        !c.has_river() && !c.is_underwater()
    })
}

/// Carve rivers until `river_percentage` % of the land cells carry one or
/// the source pool runs dry.
pub fn carve_rivers<R: Rng>(
    grid: &mut HexGrid,
    climate: &ClimateField,
    config: &GeneratorConfig,
    rng: &mut R,
) -> RiverReport {
    let land = grid.land_cell_count();
    let budget = (land as f64 * f64::from(config.river_percentage) / 100.0).round() as usize;
    let mut pool = OriginPool::build(grid, climate, config.water_level, config.elevation_maximum);
    log::debug!("river budget {budget} over {} source candidates", pool.len());

    let mut report = RiverReport { budget, ..RiverReport::default() };
    // A river needs at least two cells.
    while budget - report.carved >= 2 {
        let Some(origin) = pool.take(rng) else {
            break;
        };
        if !is_valid_origin(grid, origin) {
            continue;
        }
        let params = WalkParams {
            extra_lake_probability: config.extra_lake_probability,
            elevation_minimum: config.elevation_minimum,
            max_length: budget - report.carved,
        };
        let river = walk_river(grid, origin, &params, rng);
        if !river.is_empty() {
            report.carved += river.len();
            report.rivers.push(river);
        }
    }

    if budget - report.carved >= 2 {
        log::warn!(
            "river budget not met: carved {} of {budget} cells, source pool exhausted",
            report.carved
        );
    }
    report
}
