//! Terrain variants, special features and the resolved per-hex cell.

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;

/// Primary terrain of a hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerrainType {
    Plains,
    Forest,
    Hills,
    Mountains,
    Water,
    Desert,
}

impl TerrainType {
    pub const ALL: [TerrainType; 6] = [
        TerrainType::Plains,
        TerrainType::Forest,
        TerrainType::Hills,
        TerrainType::Mountains,
        TerrainType::Water,
        TerrainType::Desert,
    ];

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainType::Plains => "Plains",
            TerrainType::Forest => "Forest",
            TerrainType::Hills => "Hills",
            TerrainType::Mountains => "Mountains",
            TerrainType::Water => "Water",
            TerrainType::Desert => "Desert",
        }
    }

    /// Get color for rendering
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            TerrainType::Plains => (144, 238, 144),
            TerrainType::Forest => (34, 139, 34),
            TerrainType::Hills => (205, 133, 63),
            TerrainType::Mountains => (139, 115, 85),
            TerrainType::Water => (70, 130, 180),
            TerrainType::Desert => (244, 164, 96),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TerrainType::Plains => "Flat grasslands suitable for travel",
            TerrainType::Forest => "Dense woodland with abundant resources",
            TerrainType::Hills => "Rolling hills with moderate elevation",
            TerrainType::Mountains => "Towering peaks difficult to traverse",
            TerrainType::Water => "Lakes and rivers providing fresh water",
            TerrainType::Desert => "Arid wasteland with scarce resources",
        }
    }

    /// Relative abundance used for map statistics and legends.
    pub fn base_weight(&self) -> u32 {
        match self {
            TerrainType::Plains => 30,
            TerrainType::Forest => 25,
            TerrainType::Hills => 20,
            TerrainType::Mountains => 10,
            TerrainType::Water => 10,
            TerrainType::Desert => 5,
        }
    }

    /// Cost to enter a hex of this terrain; `None` means impassable on foot.
    pub fn movement_cost(&self) -> Option<f32> {
        match self {
            TerrainType::Plains => Some(1.0),
            TerrainType::Forest => Some(1.5),
            TerrainType::Hills => Some(2.0),
            TerrainType::Mountains => Some(3.0),
            TerrainType::Water => None,
            TerrainType::Desert => Some(1.5),
        }
    }

    pub fn is_land(&self) -> bool {
        !matches!(self, TerrainType::Water)
    }
}

impl std::fmt::Display for TerrainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Special features layered on top of the primary terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerrainFeature {
    Spring,
    Oasis,
    Cave,
    Ruins,
    StandingStones,
    AncientGrove,
    Island,
}

impl TerrainFeature {
    /// Roll order; each feature's index also salts its hash stream.
    pub const ALL: [TerrainFeature; 7] = [
        TerrainFeature::Spring,
        TerrainFeature::Oasis,
        TerrainFeature::Cave,
        TerrainFeature::Ruins,
        TerrainFeature::StandingStones,
        TerrainFeature::AncientGrove,
        TerrainFeature::Island,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainFeature::Spring => "Spring",
            TerrainFeature::Oasis => "Oasis",
            TerrainFeature::Cave => "Cave",
            TerrainFeature::Ruins => "Ruins",
            TerrainFeature::StandingStones => "Standing Stones",
            TerrainFeature::AncientGrove => "Ancient Grove",
            TerrainFeature::Island => "Island",
        }
    }

    /// Chance per eligible hex before the density multiplier.
    pub fn base_chance(&self) -> f64 {
        match self {
            TerrainFeature::Spring => 0.04,
            TerrainFeature::Oasis => 0.12,
            TerrainFeature::Cave => 0.08,
            TerrainFeature::Ruins => 0.03,
            TerrainFeature::StandingStones => 0.03,
            TerrainFeature::AncientGrove => 0.05,
            TerrainFeature::Island => 0.06,
        }
    }

    pub fn allowed_on(&self, terrain: TerrainType) -> bool {
        use TerrainType::*;
        match self {
            TerrainFeature::Spring => matches!(terrain, Plains | Forest | Hills),
            TerrainFeature::Oasis => terrain == Desert,
            TerrainFeature::Cave => matches!(terrain, Hills | Mountains),
            TerrainFeature::Ruins => terrain.is_land(),
            TerrainFeature::StandingStones => matches!(terrain, Plains | Hills),
            TerrainFeature::AncientGrove => terrain == Forest,
            TerrainFeature::Island => terrain == Water,
        }
    }
}

/// Fully resolved terrain for one hex. Immutable once computed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainCell {
    pub coord: HexCoord,
    pub terrain: TerrainType,
    pub features: Vec<TerrainFeature>,
    /// Sampled field values in [0, 1)
    pub elevation: f64,
    pub moisture: f64,
    pub warmth: f64,
}

impl TerrainCell {
    pub fn has_feature(&self, feature: TerrainFeature) -> bool {
        self.features.contains(&feature)
    }

    /// Same terrain and features; field values are not compared.
    pub fn same_content(&self, other: &TerrainCell) -> bool {
        self.coord == other.coord && self.terrain == other.terrain && self.features == other.features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_water_is_impassable() {
        for terrain in TerrainType::ALL {
            assert_eq!(terrain.movement_cost().is_none(), terrain == TerrainType::Water);
        }
    }

    #[test]
    fn test_every_feature_has_a_home() {
        for feature in TerrainFeature::ALL {
            assert!(
                TerrainType::ALL.iter().any(|&t| feature.allowed_on(t)),
                "{:?} can never appear",
                feature
            );
            assert!(feature.base_chance() > 0.0 && feature.base_chance() < 1.0);
        }
    }

    #[test]
    fn test_water_only_features() {
        assert!(TerrainFeature::Island.allowed_on(TerrainType::Water));
        assert!(!TerrainFeature::Ruins.allowed_on(TerrainType::Water));
        assert!(!TerrainFeature::Spring.allowed_on(TerrainType::Water));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TerrainType::Mountains).unwrap();
        assert_eq!(json, "\"Mountains\"");
        let back: TerrainFeature = serde_json::from_str("\"StandingStones\"").unwrap();
        assert_eq!(back, TerrainFeature::StandingStones);
    }
}
