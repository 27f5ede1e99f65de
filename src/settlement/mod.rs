//! Settlement generator
//!
//! Decides which hexes hold a settlement and what it looks like, reading only
//! the terrain of a bounded neighborhood.

pub mod generator;
pub mod naming;
pub mod params;
pub mod types;

pub use generator::{resolve_settlement, Candidate, SettlementGenerator};
pub use params::{SettlementParams, TerrainChances};
pub use types::{SettlementFeature, SettlementRecord, SettlementType, TradeGood};
