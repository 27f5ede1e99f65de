//! Terrain field generator
//!
//! Three fractal fields (elevation, moisture, warmth) are sampled per hex and
//! thresholded into a `TerrainType`; special features come from an independent
//! hash per feature.

pub mod field;
pub mod generator;
pub mod params;
pub mod types;

pub use field::{noise_seed, FractalField};
pub use generator::{resolve_terrain, FieldSample, TerrainGenerator, TerrainSource};
pub use params::TerrainParams;
pub use types::{TerrainCell, TerrainFeature, TerrainType};
