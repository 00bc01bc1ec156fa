//! Terrain and vegetation from temperature and moisture bands.

use serde::{Deserialize, Serialize};

use super::temperature::TemperatureModel;
use super::ClimateField;
use crate::generator::GeneratorConfig;
use crate::grid::HexGrid;

/// Surface terrain; the discriminant is the persisted terrain index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TerrainType {
    Sand = 0,
    Grass = 1,
    Mud = 2,
    Stone = 3,
    Snow = 4,
    Water = 5,
}

impl TerrainType {
    pub const ALL: [TerrainType; 6] = [
        TerrainType::Sand,
        TerrainType::Grass,
        TerrainType::Mud,
        TerrainType::Stone,
        TerrainType::Snow,
        TerrainType::Water,
    ];

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }
}

const TEMPERATURE_BANDS: [f32; 3] = [0.1, 0.3, 0.6];
const MOISTURE_BANDS: [f32; 3] = [0.12, 0.28, 0.85];

use TerrainType::{Grass, Mud, Sand, Snow};

/// Rows cold → hot, columns dry → wet.
const BIOMES: [[(TerrainType, u8); 4]; 4] = [
    [(Sand, 0), (Snow, 0), (Snow, 0), (Snow, 0)],
    [(Sand, 0), (Mud, 0), (Mud, 1), (Mud, 2)],
    [(Sand, 0), (Grass, 0), (Grass, 1), (Grass, 2)],
    [(Sand, 0), (Grass, 1), (Grass, 2), (Grass, 3)],
];

/// Number of band thresholds at or below `value`.
fn band(value: f32, thresholds: &[f32; 3]) -> usize {
    thresholds.iter().take_while(|&&t| value >= t).count()
}

/// Biome lookup for a land cell, before elevation and river overrides.
pub fn biome(temperature: f32, moisture: f32) -> (TerrainType, u8) {
    BIOMES[band(temperature, &TEMPERATURE_BANDS)][band(moisture, &MOISTURE_BANDS)]
}

/// Assign terrain and plant levels to every cell.
pub fn classify_biomes(
    grid: &mut HexGrid,
    climate: &ClimateField,
    temperature: &TemperatureModel,
    config: &GeneratorConfig,
) {
    let max = config.elevation_maximum;
    let rock_desert_elevation = max - (max - config.water_level) / 2;

    for i in 0..grid.len() {
        if grid.cell(i).is_underwater() {
            let c = grid.cell_mut(i);
            c.terrain_type_index = TerrainType::Water.index();
            c.plant_level = 0;
            continue;
        }

        let t = temperature.temperature(grid, i);
        let (mut terrain, mut plant) = biome(t, climate.moisture[i]);
        let c = grid.cell_mut(i);

        if terrain == Sand {
            if c.elevation >= rock_desert_elevation {
                terrain = TerrainType::Stone;
            }
        } else if c.elevation == max {
            terrain = Snow;
        }

        if terrain == Snow {
            plant = 0;
        } else if plant < 3 && c.has_river() {
            plant += 1;
        }

        c.terrain_type_index = terrain.index();
        c.plant_level = plant;
    }
}
