//! Settlement density tuning.

use serde::{Deserialize, Serialize};

use crate::terrain::TerrainType;

/// Base settlement chance per hex for each terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainChances {
    pub plains: f64,
    pub forest: f64,
    pub hills: f64,
    pub mountains: f64,
    pub water: f64,
    pub desert: f64,
}

impl TerrainChances {
    pub fn for_terrain(&self, terrain: TerrainType) -> f64 {
        match terrain {
            TerrainType::Plains => self.plains,
            TerrainType::Forest => self.forest,
            TerrainType::Hills => self.hills,
            TerrainType::Mountains => self.mountains,
            TerrainType::Water => self.water,
            TerrainType::Desert => self.desert,
        }
    }

    pub fn max(&self) -> f64 {
        TerrainType::ALL
            .iter()
            .map(|&t| self.for_terrain(t))
            .fold(0.0, f64::max)
    }
}

impl Default for TerrainChances {
    fn default() -> Self {
        Self {
            plains: 0.15,
            forest: 0.08,
            hills: 0.12,
            mountains: 0.05,
            water: 0.0,
            desert: 0.02,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementParams {
    /// Global multiplier on every placement chance (1.0 = normal)
    pub density: f64,
    pub chances: TerrainChances,
    /// Multiplier for hexes bordering water
    pub coastal_bonus: f64,
    /// Multiplier for mountains with no plains neighbor
    pub isolated_mountain_factor: f64,
    /// Multiplier for desert without an oasis
    pub dry_desert_factor: f64,
}

impl SettlementParams {
    /// Upper bound on any hex's placement chance. Hexes whose placement roll
    /// is above this can be rejected before terrain is resolved.
    pub fn max_chance(&self) -> f64 {
        self.chances.max()
            * self.density
            * self.coastal_bonus.max(1.0)
            * self.isolated_mountain_factor.max(1.0)
            * self.dry_desert_factor.max(1.0)
    }
}

impl Default for SettlementParams {
    fn default() -> Self {
        Self {
            density: 1.0,
            chances: TerrainChances::default(),
            coastal_bonus: 1.5,
            isolated_mountain_factor: 0.5,
            dry_desert_factor: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_max_chance() {
        let p = SettlementParams::default();
        assert!((p.max_chance() - 0.225).abs() < 1e-12);
    }

    #[test]
    fn test_water_is_empty_by_default() {
        assert_eq!(TerrainChances::default().for_terrain(TerrainType::Water), 0.0);
    }
}
