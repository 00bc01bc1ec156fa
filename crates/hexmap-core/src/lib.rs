//! Hexagonal world generation and grid queries.
//!
//! [`generate`] sculpts land, erodes it, runs the water cycle, carves rivers
//! and assigns biomes. A [`Navigator`] answers movement and sight queries on
//! the result, and [`persist`] stores it as a versioned binary record.

pub mod climate;
pub mod coords;
pub mod error;
pub mod generator;
pub mod grid;
pub mod hydraulic;
pub mod land;
pub mod persist;
pub mod search;
pub mod util;

pub use climate::biomes::TerrainType;
pub use climate::temperature::Hemisphere;
pub use climate::ClimateField;
pub use coords::{HexCoordinates, HexDirection, HexEdgeType};
pub use error::{ConfigError, GenerateError, PersistError};
pub use generator::{generate, GeneratedMap, GenerationReport, GeneratorConfig, MapGenerator};
pub use grid::{CellSnapshot, HexCell, HexGrid, CHUNK_SIZE_X, CHUNK_SIZE_Z};
pub use search::{Navigator, Path, TravelCosts};
