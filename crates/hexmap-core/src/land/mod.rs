//! Landmass shaping: region layout, chunk sculpting and erosion.
pub mod erosion;
pub mod regions;
pub mod sculpt;

pub use erosion::{erode, ErosionOutcome};
pub use regions::{plan_regions, MapRegion, RegionLayout};
pub use sculpt::{sculpt_land, SculptOutcome};
