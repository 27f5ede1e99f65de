//! Order-independent terrain resolution.
//!
//! Every decision reads only sampled field values, never a neighbor's generated
//! terrain, so any hex resolves identically no matter what was visited before.

use log::trace;

use super::field::FractalField;
use super::params::TerrainParams;
use super::types::{TerrainCell, TerrainFeature, TerrainType};
use crate::config::WorldConfig;
use crate::hex::HexCoord;
use crate::seeds::{hash_coord, unit, WorldSeeds};

/// Anything that can answer "what terrain is at this hex".
pub trait TerrainSource {
    fn terrain_at(&self, coord: HexCoord) -> TerrainCell;

    /// Primary terrain only. Implementations may skip feature rolls.
    fn terrain_type_at(&self, coord: HexCoord) -> TerrainType {
        self.terrain_at(coord).terrain
    }
}

/// Raw field values at one hex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample {
    pub elevation: f64,
    pub moisture: f64,
    pub warmth: f64,
}

#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    params: TerrainParams,
    features_seed: u64,
    elevation: FractalField,
    moisture: FractalField,
    warmth: FractalField,
}

impl TerrainGenerator {
    pub fn new(config: &WorldConfig) -> Self {
        Self::from_parts(&config.seeds(), config.terrain.clone())
    }

    pub fn from_parts(seeds: &WorldSeeds, params: TerrainParams) -> Self {
        let elevation = FractalField::new(
            seeds.elevation,
            params.elevation_frequency,
            params.elevation_octaves,
            params.persistence,
        );
        let moisture = FractalField::new(
            seeds.moisture,
            params.moisture_frequency,
            params.moisture_octaves,
            params.persistence,
        );
        let warmth = FractalField::new(
            seeds.warmth,
            params.warmth_frequency,
            params.warmth_octaves,
            params.persistence,
        );
        Self {
            params,
            features_seed: seeds.features,
            elevation,
            moisture,
            warmth,
        }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn sample(&self, coord: HexCoord) -> FieldSample {
        FieldSample {
            elevation: self.elevation.sample(coord),
            moisture: self.moisture.sample(coord),
            warmth: self.warmth.sample(coord),
        }
    }

    /// Resolve terrain, features and field values for one hex.
    pub fn resolve(&self, coord: HexCoord) -> TerrainCell {
        let sample = self.sample(coord);
        let terrain = self.classify(coord, &sample);
        let features = self.features(coord, terrain);
        trace!("resolved {} as {} {:?}", coord, terrain, features);
        TerrainCell {
            coord,
            terrain,
            features,
            elevation: sample.elevation,
            moisture: sample.moisture,
            warmth: sample.warmth,
        }
    }

    /// Primary terrain without rolling features.
    pub fn terrain_type(&self, coord: HexCoord) -> TerrainType {
        self.classify(coord, &self.sample(coord))
    }

    fn is_water(&self, elevation: f64, moisture: f64) -> bool {
        elevation < self.params.sea_level && moisture >= self.params.water_moisture
    }

    /// Water predicate evaluated on raw fields, so it is safe to ask about
    /// neighbors without resolving them.
    fn water_at(&self, coord: HexCoord) -> bool {
        let elevation = self.elevation.sample(coord);
        if elevation >= self.params.sea_level {
            return false;
        }
        self.is_water(elevation, self.moisture.sample(coord))
    }

    fn classify(&self, coord: HexCoord, sample: &FieldSample) -> TerrainType {
        let p = &self.params;
        let FieldSample {
            elevation,
            moisture,
            warmth,
        } = *sample;

        if elevation >= p.mountain_level {
            return TerrainType::Mountains;
        }
        if elevation >= p.hill_level {
            return TerrainType::Hills;
        }
        if self.is_water(elevation, moisture) {
            return TerrainType::Water;
        }
        if moisture < p.arid_moisture && warmth >= p.desert_warmth {
            // Desert never borders water; a wet neighbor softens it to plains.
            if coord.neighbors().iter().any(|&n| self.water_at(n)) {
                return TerrainType::Plains;
            }
            return TerrainType::Desert;
        }
        if moisture >= p.forest_moisture {
            return TerrainType::Forest;
        }
        TerrainType::Plains
    }

    fn features(&self, coord: HexCoord, terrain: TerrainType) -> Vec<TerrainFeature> {
        TerrainFeature::ALL
            .iter()
            .enumerate()
            .filter(|(_, feature)| feature.allowed_on(terrain))
            .filter(|(i, feature)| {
                let roll = unit(hash_coord(self.features_seed, coord.q, coord.r, *i as u64 + 1));
                roll < feature.base_chance() * self.params.feature_density
            })
            .map(|(_, feature)| *feature)
            .collect()
    }
}

impl TerrainSource for TerrainGenerator {
    fn terrain_at(&self, coord: HexCoord) -> TerrainCell {
        self.resolve(coord)
    }

    fn terrain_type_at(&self, coord: HexCoord) -> TerrainType {
        self.terrain_type(coord)
    }
}

/// One-shot terrain resolution. Prefer holding a `TerrainGenerator` when
/// resolving many hexes.
pub fn resolve_terrain(config: &WorldConfig, coord: HexCoord) -> TerrainCell {
    TerrainGenerator::new(config).resolve(coord)
}
