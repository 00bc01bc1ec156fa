//! Error types for hexmap-core.

use thiserror::Error;

/// Rejected generation request. Nothing has been mutated when this is returned.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Grid dimensions are zero or not a multiple of the rendering chunk size.
    #[error("invalid grid dimensions {width}x{height}: must be positive multiples of {chunk_x}x{chunk_z}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        chunk_x: usize,
        chunk_z: usize,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A generator knob holds a value the pipeline cannot work with.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("region count {0} is outside 1..=4")]
    RegionCount(u32),

    #[error("chunk size range {min}..{max} is empty")]
    ChunkSizeRange { min: u32, max: u32 },

    #[error("elevation range {min}..={max} is invalid (must satisfy -127 <= min < max <= 128)")]
    ElevationRange { min: i32, max: i32 },

    #[error("water level {level} lies outside 0..={max}")]
    WaterLevel { level: i32, max: i32 },

    #[error("temperature range {low}..={high} must lie within 0..=1")]
    TemperatureRange { low: f32, high: f32 },

    #[error("{name} = {value} exceeds 100%")]
    Percentage { name: &'static str, value: u32 },

    #[error("{name} = {value} is not a probability in [0, 1]")]
    Probability { name: &'static str, value: f32 },

    #[error("{name} = {value} must be finite and non-negative")]
    Factor { name: &'static str, value: f32 },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while reading or writing the binary map record.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported map format version {0}")]
    UnsupportedVersion(u32),

    #[error("stored grid dimensions {width}x{height} are invalid")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("cell {cell}: river byte {byte:#04x} encodes no direction")]
    InvalidDirection { cell: usize, byte: u8 },
}
