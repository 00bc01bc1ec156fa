//! Cell temperature from latitude, altitude and a little noise.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::generator::GeneratorConfig;
use crate::grid::HexGrid;

/// Which part of a globe the map represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Hemisphere {
    /// Equator across the middle, cold at both edges.
    #[default]
    Both,
    /// Equator at the bottom edge.
    North,
    /// Equator at the top edge.
    South,
}

/// Spatial frequency of the temperature jitter, in noise units per cell.
const JITTER_FREQUENCY: f64 = 0.1;

/// Temperature model for one generation run.
pub struct TemperatureModel {
    perlin: Perlin,
    hemisphere: Hemisphere,
    low: f32,
    high: f32,
    jitter: f32,
    water_level: i32,
    elevation_maximum: i32,
}

impl TemperatureModel {
    pub fn new(seed: u64, config: &GeneratorConfig) -> Self {
        Self {
            perlin: Perlin::new((seed & 0xFFFF_FFFF) as u32),
            hemisphere: config.hemisphere,
            low: config.low_temperature,
            high: config.high_temperature,
            jitter: config.temperature_jitter,
            water_level: config.water_level,
            elevation_maximum: config.elevation_maximum,
        }
    }

    /// Latitude factor in `[0, 1]`, 1 at the equator.
    pub fn latitude(&self, row: usize, height: usize) -> f32 {
        let mut latitude = row as f32 / height as f32;
        match self.hemisphere {
            Hemisphere::Both => {
                latitude *= 2.0;
                if latitude > 1.0 {
                    latitude = 2.0 - latitude;
                }
            }
            Hemisphere::North => latitude = 1.0 - latitude,
            Hemisphere::South => {}
        }
        latitude
    }

    pub fn temperature(&self, grid: &HexGrid, cell: usize) -> f32 {
        let c = grid.cell(cell);
        let latitude = self.latitude(cell / grid.width(), grid.height());
        let mut temperature = self.low + (self.high - self.low) * latitude;

        let altitude = (c.view_elevation() - self.water_level) as f32
            / (self.elevation_maximum - self.water_level + 1) as f32;
        temperature *= 1.0 - altitude;

        let (col, row) = c.coordinates.to_offset();
        let sample = self
            .perlin
            .get([f64::from(col) * JITTER_FREQUENCY, f64::from(row) * JITTER_FREQUENCY]);
        temperature + sample.clamp(-1.0, 1.0) as f32 * self.jitter
    }
}
