//! Water cycle simulation over the hex grid.
//!
//! Each cycle runs two passes:
//!   1. Local step: evaporation, precipitation and the cloud ceiling, then
//!      the cell's runoff and seepage shares are computed.
//!   2. Gather: every cell collects the clouds and water its neighbours
//!      push toward it.
//!
//! Both passes are independent per cell, so with the `threading` feature they
//! run on rayon without any shared mutable state.

pub mod biomes;
pub mod temperature;

#[cfg(feature = "threading")]
use rayon::prelude::*;
use serde::Serialize;

use crate::generator::GeneratorConfig;
use crate::grid::HexGrid;

/// Per-cell moisture and cloud cover, both in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateField {
    pub moisture: Vec<f32>,
    pub clouds: Vec<f32>,
}

impl ClimateField {
    pub fn new(cell_count: usize, moisture: f32) -> Self {
        Self { moisture: vec![moisture; cell_count], clouds: vec![0.0; cell_count] }
    }

    pub fn len(&self) -> usize {
        self.moisture.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moisture.is_empty()
    }
}

/// State of one cell after the local step of a cycle.
#[derive(Debug, Clone, Copy, Default)]
struct LocalState {
    /// Moisture kept after runoff and seepage leave.
    retained: f32,
    /// Cloud share sent to each neighbour (before the wind boost).
    dispersal: f32,
    /// Moisture sent to each strictly lower neighbour.
    runoff: f32,
    /// Moisture sent to each neighbour at the same height.
    seepage: f32,
}

#[derive(Debug, Clone, Copy)]
struct Factors {
    evaporation: f32,
    precipitation: f32,
    runoff: f32,
    seepage: f32,
    wind_strength: f32,
    elevation_maximum: f32,
}

impl Factors {
    fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            evaporation: config.evaporation_factor,
            precipitation: config.precipitation_factor,
            runoff: config.runoff_factor,
            seepage: config.seepage_factor,
            wind_strength: config.wind_strength,
            elevation_maximum: config.elevation_maximum as f32,
        }
    }
}

fn local_step(grid: &HexGrid, cell: usize, moisture: f32, clouds: f32, f: &Factors) -> LocalState {
    let c = grid.cell(cell);
    let (mut moisture, mut clouds) = (moisture, clouds);

    if c.is_underwater() {
        moisture = 1.0;
        clouds += f.evaporation;
    } else {
        let evaporation = moisture * f.evaporation;
        moisture -= evaporation;
        clouds += evaporation;
    }

    let precipitation = clouds * f.precipitation;
    clouds -= precipitation;
    moisture += precipitation;

    let ceiling = 1.0 - c.view_elevation() as f32 / (f.elevation_maximum + 1.0);
    if clouds > ceiling {
        moisture += clouds - ceiling;
        clouds = ceiling;
    }

    let runoff = moisture * f.runoff / 6.0;
    let seepage = moisture * f.seepage / 6.0;
    let view = c.view_elevation();
    let mut retained = moisture;
    for (_, n) in grid.neighbors(cell) {
        let delta = grid.cell(n).view_elevation() - view;
        if delta < 0 {
            retained -= runoff;
        } else if delta == 0 {
            retained -= seepage;
        }
    }

    LocalState {
        retained,
        dispersal: clouds.max(0.0) / (5.0 + f.wind_strength),
        runoff,
        seepage,
    }
}

/// Run `climate_cycles` cycles of the water cycle and return the final field.
pub fn simulate_climate(grid: &HexGrid, config: &GeneratorConfig) -> ClimateField {
    let factors = Factors::from_config(config);
    let wind = config.wind_direction;
    let n = grid.len();

    let mut current = ClimateField::new(n, config.starting_moisture);
    let mut next = ClimateField::new(n, 0.0);
    let mut local = vec![LocalState::default(); n];

    for _ in 0..config.climate_cycles {
        // ── 1. Local step ─────────────────────────────────────────────────────
        #[cfg(feature = "threading")]
        let cells = local.par_iter_mut().enumerate();
        #[cfg(not(feature = "threading"))]
        let cells = local.iter_mut().enumerate();
        cells.for_each(|(i, state)| {
            *state = local_step(grid, i, current.moisture[i], current.clouds[i], &factors);
        });

        // ── 2. Gather ─────────────────────────────────────────────────────────
        #[cfg(feature = "threading")]
        let cells = next.moisture.par_iter_mut().zip(next.clouds.par_iter_mut()).enumerate();
        #[cfg(not(feature = "threading"))]
        let cells = next.moisture.iter_mut().zip(next.clouds.iter_mut()).enumerate();
        cells.for_each(|(i, (moisture, clouds))| {
            let view = grid.cell(i).view_elevation();
            let mut m = local[i].retained;
            let mut c = 0.0;
            for (direction, neighbor) in grid.neighbors(i) {
                let from = &local[neighbor];
                // The upwind neighbour pushes its clouds here with the wind.
                c += if direction == wind {
                    from.dispersal * factors.wind_strength
                } else {
                    from.dispersal
                };
                let delta = view - grid.cell(neighbor).view_elevation();
                if delta < 0 {
                    m += from.runoff;
                } else if delta == 0 {
                    m += from.seepage;
                }
            }
            *moisture = m.clamp(0.0, 1.0);
            *clouds = c.clamp(0.0, 1.0);
        });

        std::mem::swap(&mut current, &mut next);
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::HexDirection;
    use approx::assert_relative_eq;

    fn island_grid() -> HexGrid {
        let mut grid = HexGrid::new_unchecked(20, 15, false);
        for i in 0..grid.len() {
            let c = grid.cell_mut(i);
            c.water_level = 1;
            let (col, row) = (i % 20, i / 20);
            if (5..15).contains(&col) && (4..11).contains(&row) {
                c.elevation = 1 + ((col + row) % 5) as i32;
            }
        }
        grid
    }

    #[test]
    fn values_stay_in_unit_range() {
        let grid = island_grid();
        for cycles in [0, 1, 5, 40, 120] {
            let config = GeneratorConfig { climate_cycles: cycles, ..GeneratorConfig::default() };
            let field = simulate_climate(&grid, &config);
            assert_eq!(field.len(), grid.len());
            for i in 0..field.len() {
                let (m, c) = (field.moisture[i], field.clouds[i]);
                assert!((0.0..=1.0).contains(&m), "cycles {cycles}: moisture {m} at {i}");
                assert!((0.0..=1.0).contains(&c), "cycles {cycles}: clouds {c} at {i}");
            }
        }
    }

    #[test]
    fn zero_cycles_returns_starting_state() {
        let grid = island_grid();
        let config = GeneratorConfig {
            climate_cycles: 0,
            starting_moisture: 0.3,
            ..GeneratorConfig::default()
        };
        let field = simulate_climate(&grid, &config);
        assert!(field.moisture.iter().all(|&m| m == 0.3));
        assert!(field.clouds.iter().all(|&c| c == 0.0));
    }

    /// A lone land cell with no water anywhere just loses moisture to clouds.
    #[test]
    fn single_cycle_on_isolated_cell() {
        let grid = HexGrid::new_unchecked(1, 1, false);
        let config = GeneratorConfig {
            climate_cycles: 1,
            starting_moisture: 0.4,
            evaporation_factor: 0.5,
            precipitation_factor: 0.25,
            ..GeneratorConfig::default()
        };
        let field = simulate_climate(&grid, &config);
        // Evaporate 0.2, rain back 0.05; no neighbours receive the clouds.
        assert_relative_eq!(field.moisture[0], 0.25, epsilon = 1e-6);
        assert_relative_eq!(field.clouds[0], 0.0);
    }

    /// Water surfaces feed moisture into downwind land.
    #[test]
    fn downwind_of_water_is_wetter() {
        let mut grid = HexGrid::new_unchecked(20, 1, false);
        for i in 0..10 {
            grid.cell_mut(i).water_level = 1;
        }
        let config = GeneratorConfig {
            wind_direction: HexDirection::W,
            climate_cycles: 30,
            ..GeneratorConfig::default()
        };
        let field = simulate_climate(&grid, &config);
        assert!(
            field.moisture[10] > field.moisture[19],
            "coast {} vs far inland {}",
            field.moisture[10],
            field.moisture[19]
        );
    }
}
