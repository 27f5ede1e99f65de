//! Procedurally generated, unbounded hex world
//!
//! Terrain and settlements are pure functions of a seed and a coordinate.
//! Human edits live in a separate overlay store, and a viewport cache keeps
//! the neighborhood around a moving center resident.

pub mod ascii;
pub mod config;
pub mod error;
pub mod hex;
pub mod overlay;
pub mod persistence;
pub mod seeds;
pub mod settlement;
pub mod terrain;
pub mod viewport;

pub use config::WorldConfig;
pub use error::{WorldError, WorldResult};
pub use hex::{HexCoord, HexDirection};
pub use overlay::{ExplorationLevel, Overlay, OverlayPatch, OverlayStore};
pub use settlement::{SettlementRecord, SettlementType};
pub use terrain::{TerrainCell, TerrainFeature, TerrainType};
pub use viewport::{CacheEntry, WorldCache};
