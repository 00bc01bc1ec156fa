//! Pipeline orchestrator: runs all generation stages in order.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::climate::biomes::classify_biomes;
use crate::climate::temperature::{Hemisphere, TemperatureModel};
use crate::climate::{simulate_climate, ClimateField};
use crate::coords::HexDirection;
use crate::error::{ConfigError, GenerateError};
use crate::grid::HexGrid;
use crate::hydraulic::{carve_rivers, RiverReport};
use crate::land::{erode, plan_regions, sculpt_land, ErosionOutcome, MapRegion, RegionLayout, SculptOutcome};
use crate::search::SearchWorkspace;
use crate::util::Timed;

// ── Stage salts ───────────────────────────────────────────────────────────────

const REGION_SALT: u64 = 0x5245_4749_4F4E;
const LAND_SALT: u64 = 0x4C41_4E44;
const EROSION_SALT: u64 = 0x4552_4F44_45;
const RIVER_SALT: u64 = 0x5249_5645_52;
const TEMPERATURE_SALT: u64 = 0x5445_4D50;

/// Lowest and highest elevation the binary map record can encode.
pub const ELEVATION_LIMITS: (i32, i32) = (-127, 128);

// ── Configuration ─────────────────────────────────────────────────────────────

/// Every knob of the generator. Deserialises from partial JSON: missing keys
/// keep their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Use `seed` as given; otherwise a fresh seed is drawn and reported.
    pub use_fixed_seed: bool,

    // Land sculpting.
    /// Chance that a flooded neighbour's priority is bumped by one.
    pub jitter_probability: f32,
    pub chunk_size_min: u32,
    /// Exclusive upper bound.
    pub chunk_size_max: u32,
    /// Chance a raise or sink chunk moves two levels instead of one.
    pub high_rise_probability: f32,
    pub sink_probability: f32,
    pub land_percentage: u32,
    pub water_level: i32,
    pub elevation_minimum: i32,
    pub elevation_maximum: i32,
    pub map_border_x: usize,
    pub map_border_z: usize,
    pub region_border: usize,
    pub region_count: u32,
    pub erosion_percentage: u32,
    /// Outer sculpting iterations before giving up on the land budget.
    pub land_guard: u32,

    // Climate.
    pub evaporation_factor: f32,
    pub precipitation_factor: f32,
    pub runoff_factor: f32,
    pub seepage_factor: f32,
    /// Direction the wind blows from.
    pub wind_direction: HexDirection,
    pub wind_strength: f32,
    pub starting_moisture: f32,
    pub climate_cycles: u32,

    // Rivers.
    pub river_percentage: u32,
    pub extra_lake_probability: f32,

    // Temperature.
    pub low_temperature: f32,
    pub high_temperature: f32,
    pub hemisphere: Hemisphere,
    pub temperature_jitter: f32,

    pub wrapping: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            use_fixed_seed: false,
            jitter_probability: 0.25,
            chunk_size_min: 30,
            chunk_size_max: 100,
            high_rise_probability: 0.25,
            sink_probability: 0.2,
            land_percentage: 50,
            water_level: 3,
            elevation_minimum: -2,
            elevation_maximum: 8,
            map_border_x: 5,
            map_border_z: 5,
            region_border: 5,
            region_count: 1,
            erosion_percentage: 50,
            land_guard: 10_000,
            evaporation_factor: 0.5,
            precipitation_factor: 0.25,
            runoff_factor: 0.25,
            seepage_factor: 0.125,
            wind_direction: HexDirection::NW,
            wind_strength: 4.0,
            starting_moisture: 0.1,
            climate_cycles: 40,
            river_percentage: 10,
            extra_lake_probability: 0.25,
            low_temperature: 0.0,
            high_temperature: 1.0,
            hemisphere: Hemisphere::Both,
            temperature_jitter: 0.1,
            wrapping: false,
        }
    }
}

fn check_percentage(name: &'static str, value: u32) -> Result<(), ConfigError> {
    if value > 100 {
        return Err(ConfigError::Percentage { name, value });
    }
    Ok(())
}

fn check_probability(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Probability { name, value });
    }
    Ok(())
}

fn check_factor(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Factor { name, value });
    }
    Ok(())
}

impl GeneratorConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=4).contains(&self.region_count) {
            return Err(ConfigError::RegionCount(self.region_count));
        }
        if self.chunk_size_min >= self.chunk_size_max {
            return Err(ConfigError::ChunkSizeRange {
                min: self.chunk_size_min,
                max: self.chunk_size_max,
            });
        }
        let (lowest, highest) = ELEVATION_LIMITS;
        if self.elevation_minimum < lowest
            || self.elevation_maximum > highest
            || self.elevation_minimum >= self.elevation_maximum
        {
            return Err(ConfigError::ElevationRange {
                min: self.elevation_minimum,
                max: self.elevation_maximum,
            });
        }
        if self.water_level < 0_i32.max(self.elevation_minimum) || self.water_level > self.elevation_maximum {
            return Err(ConfigError::WaterLevel {
                level: self.water_level,
                max: self.elevation_maximum,
            });
        }

        check_percentage("land_percentage", self.land_percentage)?;
        check_percentage("erosion_percentage", self.erosion_percentage)?;
        check_percentage("river_percentage", self.river_percentage)?;

        check_probability("jitter_probability", self.jitter_probability)?;
        check_probability("high_rise_probability", self.high_rise_probability)?;
        check_probability("sink_probability", self.sink_probability)?;
        check_probability("extra_lake_probability", self.extra_lake_probability)?;
        check_probability("starting_moisture", self.starting_moisture)?;

        check_factor("evaporation_factor", self.evaporation_factor)?;
        check_factor("precipitation_factor", self.precipitation_factor)?;
        check_factor("runoff_factor", self.runoff_factor)?;
        check_factor("seepage_factor", self.seepage_factor)?;
        check_factor("wind_strength", self.wind_strength)?;
        check_factor("temperature_jitter", self.temperature_jitter)?;

        let temperatures = 0.0..=1.0;
        if !temperatures.contains(&self.low_temperature)
            || !temperatures.contains(&self.high_temperature)
        {
            return Err(ConfigError::TemperatureRange {
                low: self.low_temperature,
                high: self.high_temperature,
            });
        }
        Ok(())
    }

    fn region_layout(&self) -> RegionLayout {
        RegionLayout {
            count: self.region_count,
            map_border_x: self.map_border_x,
            map_border_z: self.map_border_z,
            region_border: self.region_border,
            wrapping: self.wrapping,
        }
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// What each stage achieved, including any non-fatal shortfalls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Seed actually used; replaying it with `use_fixed_seed` reproduces the map.
    pub seed: u64,
    pub regions: Vec<MapRegion>,
    pub land: SculptOutcome,
    pub erosion: ErosionOutcome,
    pub rivers: RiverReport,
}

/// Full output of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub grid: HexGrid,
    pub climate: ClimateField,
    pub report: GenerationReport,
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// The main pipeline orchestrator. Owns the search workspace used by the
/// sculpting flood fills so repeated runs reuse its buffers.
#[derive(Debug, Default)]
pub struct MapGenerator {
    workspace: SearchWorkspace,
}

impl MapGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the full generation pipeline.
    ///
    /// Pipeline order:
    ///   1. Flat grid at the configured water level
    ///   2. Region layout
    ///   3. Land sculpting
    ///   4. Erosion
    ///   5. Climate
    ///   6. Rivers
    ///   7. Biomes
    pub fn generate(
        &mut self,
        width: usize,
        height: usize,
        config: &GeneratorConfig,
    ) -> Result<GeneratedMap, GenerateError> {
        HexGrid::validate_dimensions(width, height)?;
        config.validate()?;
        let _total = Timed::info("map generation");

        let seed = if config.use_fixed_seed { config.seed } else { rand::random::<u64>() };
        log::debug!("generating {width}x{height} map with seed {seed}");

        // ── 1. Flat grid ────────────────────────────────────────────────────
        let mut grid = HexGrid::new(width, height, config.wrapping)?;
        for i in 0..grid.len() {
            grid.cell_mut(i).water_level = config.water_level;
        }

        // ── 2. Region layout ────────────────────────────────────────────────
        let regions = {
            let mut rng = StdRng::seed_from_u64(seed ^ REGION_SALT);
            plan_regions(width, height, &config.region_layout(), &mut rng)
        };

        // ── 3. Land sculpting ───────────────────────────────────────────────
        let land = {
            let _t = Timed::debug("land sculpting");
            let mut rng = StdRng::seed_from_u64(seed ^ LAND_SALT);
            sculpt_land(&mut grid, &mut self.workspace, &regions, config, &mut rng)
        };

        // ── 4. Erosion ──────────────────────────────────────────────────────
        let erosion = {
            let _t = Timed::debug("erosion");
            let mut rng = StdRng::seed_from_u64(seed ^ EROSION_SALT);
            erode(&mut grid, config.erosion_percentage, &mut rng)
        };

        // ── 5. Climate ──────────────────────────────────────────────────────
        let climate = {
            let _t = Timed::debug("climate");
            simulate_climate(&grid, config)
        };

        // ── 6. Rivers ───────────────────────────────────────────────────────
        let rivers = {
            let _t = Timed::debug("rivers");
            let mut rng = StdRng::seed_from_u64(seed ^ RIVER_SALT);
            carve_rivers(&mut grid, &climate, config, &mut rng)
        };

        // ── 7. Biomes ───────────────────────────────────────────────────────
        {
            let _t = Timed::debug("biomes");
            let temperature = temperature_model(seed, config);
            classify_biomes(&mut grid, &climate, &temperature, config);
        }

        log::info!(
            "generated {width}x{height} map (seed {seed}): {} land cells of target {}, {} erosion moves, {} rivers over {} cells",
            land.achieved,
            land.target,
            erosion.moves,
            rivers.rivers.len(),
            rivers.carved
        );

        Ok(GeneratedMap {
            grid,
            climate,
            report: GenerationReport { seed, regions, land, erosion, rivers },
        })
    }
}

/// The temperature field biomes were classified with for a map generated
/// from `seed` (the seed in its [`GenerationReport`]).
pub fn temperature_model(seed: u64, config: &GeneratorConfig) -> TemperatureModel {
    TemperatureModel::new(seed ^ TEMPERATURE_SALT, config)
}

/// One-shot generation with a throwaway workspace.
pub fn generate(width: usize, height: usize, config: &GeneratorConfig) -> Result<GeneratedMap, GenerateError> {
    MapGenerator::new().generate(width, height, config)
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(seed: u64) -> GeneratorConfig {
        GeneratorConfig { seed, use_fixed_seed: true, ..GeneratorConfig::default() }
    }

    #[test]
    fn default_config_is_valid() {
        GeneratorConfig::default().validate().expect("defaults must validate");
    }

    /// Partial JSON overrides only the named knobs.
    #[test]
    fn partial_json_keeps_defaults() {
        let config = GeneratorConfig::from_json_str(
            r#"{ "seed": 7, "use_fixed_seed": true, "land_percentage": 60, "wind_direction": "E" }"#,
        )
        .expect("valid partial config");
        assert_eq!(config.seed, 7);
        assert_eq!(config.land_percentage, 60);
        assert_eq!(config.wind_direction, HexDirection::E);
        assert_eq!(config.water_level, GeneratorConfig::default().water_level);
    }

    #[test]
    fn invalid_knobs_are_rejected() {
        let cases = [
            GeneratorConfig { region_count: 0, ..GeneratorConfig::default() },
            GeneratorConfig { region_count: 5, ..GeneratorConfig::default() },
            GeneratorConfig { chunk_size_min: 50, chunk_size_max: 50, ..GeneratorConfig::default() },
            GeneratorConfig { elevation_minimum: 9, ..GeneratorConfig::default() },
            GeneratorConfig { elevation_maximum: 200, ..GeneratorConfig::default() },
            GeneratorConfig { water_level: 9, ..GeneratorConfig::default() },
            GeneratorConfig { land_percentage: 101, ..GeneratorConfig::default() },
            GeneratorConfig { sink_probability: 1.5, ..GeneratorConfig::default() },
            GeneratorConfig { jitter_probability: f32::NAN, ..GeneratorConfig::default() },
            GeneratorConfig { runoff_factor: -0.1, ..GeneratorConfig::default() },
            GeneratorConfig { high_temperature: 2.0, ..GeneratorConfig::default() },
        ];
        for (i, config) in cases.iter().enumerate() {
            assert!(config.validate().is_err(), "case {i} should be rejected: {config:?}");
        }
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = GeneratorConfig::from_json_str("{ \"seed\": ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)), "got {err}");
    }

    #[test]
    fn bad_dimensions_fail_before_generation() {
        let err = generate(21, 15, &fixed(1)).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidDimensions { width: 21, .. }), "got {err}");
    }

    #[test]
    fn report_records_drawn_seed() {
        let config = GeneratorConfig { climate_cycles: 2, ..GeneratorConfig::default() };
        let map = generate(20, 15, &config).expect("generation succeeds");
        let replay = GeneratorConfig { seed: map.report.seed, use_fixed_seed: true, ..config };
        let again = generate(20, 15, &replay).expect("replay succeeds");
        assert_eq!(map.grid.snapshot(), again.grid.snapshot());
    }

    #[test]
    fn generator_is_reusable_across_sizes() {
        let mut generator = MapGenerator::new();
        let a = generator.generate(20, 15, &fixed(3)).unwrap();
        let b = generator.generate(40, 30, &fixed(3)).unwrap();
        assert_eq!(a.grid.len(), 300);
        assert_eq!(b.grid.len(), 1200);
        assert_eq!(b.climate.len(), 1200);
    }
}
