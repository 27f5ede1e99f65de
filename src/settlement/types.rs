//! Settlement variants, tags and the resolved settlement record.

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::terrain::TerrainType;

/// The twelve kinds of settlement, in draw-priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SettlementType {
    Farmstead,
    Hamlet,
    Village,
    Town,
    City,
    LoggingCamp,
    MiningCamp,
    Monastery,
    Watchtower,
    RuinsVillage,
    RuinsKeep,
    AncientRuins,
}

impl SettlementType {
    pub const ALL: [SettlementType; 12] = [
        SettlementType::Farmstead,
        SettlementType::Hamlet,
        SettlementType::Village,
        SettlementType::Town,
        SettlementType::City,
        SettlementType::LoggingCamp,
        SettlementType::MiningCamp,
        SettlementType::Monastery,
        SettlementType::Watchtower,
        SettlementType::RuinsVillage,
        SettlementType::RuinsKeep,
        SettlementType::AncientRuins,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SettlementType::Farmstead => "Farmstead",
            SettlementType::Hamlet => "Hamlet",
            SettlementType::Village => "Village",
            SettlementType::Town => "Town",
            SettlementType::City => "City",
            SettlementType::LoggingCamp => "Logging Camp",
            SettlementType::MiningCamp => "Mining Camp",
            SettlementType::Monastery => "Monastery",
            SettlementType::Watchtower => "Watchtower",
            SettlementType::RuinsVillage => "Ruined Village",
            SettlementType::RuinsKeep => "Ruined Keep",
            SettlementType::AncientRuins => "Ancient Ruins",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SettlementType::Farmstead => "An isolated farm working the surrounding land",
            SettlementType::Hamlet => "A handful of homes clustered together",
            SettlementType::Village => "A small community with a few trades",
            SettlementType::Town => "A walled market town",
            SettlementType::City => "A great city and seat of regional power",
            SettlementType::LoggingCamp => "Woodcutters felling timber for the lowlands",
            SettlementType::MiningCamp => "Diggings and workings cut into the rock",
            SettlementType::Monastery => "A secluded religious community",
            SettlementType::Watchtower => "A lonely tower watching the approaches",
            SettlementType::RuinsVillage => "The crumbling remains of a village",
            SettlementType::RuinsKeep => "A fallen fortification",
            SettlementType::AncientRuins => "Weathered stonework of a forgotten age",
        }
    }

    /// Inclusive population range. Ruins are uninhabited.
    pub fn population_range(&self) -> (u32, u32) {
        match self {
            SettlementType::Farmstead => (5, 20),
            SettlementType::Hamlet => (20, 100),
            SettlementType::Village => (100, 500),
            SettlementType::Town => (500, 2500),
            SettlementType::City => (2500, 20000),
            SettlementType::LoggingCamp => (10, 50),
            SettlementType::MiningCamp => (20, 120),
            SettlementType::Monastery => (10, 80),
            SettlementType::Watchtower => (5, 30),
            SettlementType::RuinsVillage | SettlementType::RuinsKeep | SettlementType::AncientRuins => (0, 0),
        }
    }

    /// Relative frequency multiplier applied on top of terrain affinity.
    pub fn rarity(&self) -> f64 {
        match self {
            SettlementType::Farmstead => 1.0,
            SettlementType::Hamlet => 0.8,
            SettlementType::Village => 0.5,
            SettlementType::Town => 0.25,
            SettlementType::City => 0.06,
            SettlementType::LoggingCamp => 0.9,
            SettlementType::MiningCamp => 0.9,
            SettlementType::Monastery => 0.4,
            SettlementType::Watchtower => 0.5,
            SettlementType::RuinsVillage => 0.5,
            SettlementType::RuinsKeep => 0.4,
            SettlementType::AncientRuins => 0.3,
        }
    }

    /// Minimum hex distance between two settlements of this kind.
    pub fn exclusion_radius(&self) -> u32 {
        match self {
            SettlementType::Farmstead => 2,
            SettlementType::Hamlet => 3,
            SettlementType::Village => 4,
            SettlementType::Town => 6,
            SettlementType::City => 10,
            SettlementType::LoggingCamp => 3,
            SettlementType::MiningCamp => 3,
            SettlementType::Monastery => 5,
            SettlementType::Watchtower => 4,
            SettlementType::RuinsVillage => 3,
            SettlementType::RuinsKeep => 4,
            SettlementType::AncientRuins => 5,
        }
    }

    /// Largest exclusion radius of any kind; bounds the neighborhood a
    /// placement decision may read.
    pub fn max_exclusion_radius() -> u32 {
        Self::ALL
            .iter()
            .map(|kind| kind.exclusion_radius())
            .max()
            .unwrap_or(0)
    }

    /// Draw weight of this kind on a given terrain.
    pub fn terrain_affinity(&self, terrain: TerrainType) -> u32 {
        use TerrainType::*;
        match (self, terrain) {
            (_, Water) => 0,
            (SettlementType::Farmstead, Plains) => 35,
            (SettlementType::Farmstead, Forest) => 15,
            (SettlementType::Farmstead, Hills) => 12,
            (SettlementType::Farmstead, _) => 0,
            (SettlementType::Hamlet, Plains) => 25,
            (SettlementType::Hamlet, Forest) => 15,
            (SettlementType::Hamlet, Hills) => 18,
            (SettlementType::Hamlet, Mountains) => 10,
            (SettlementType::Hamlet, Desert) => 40,
            (SettlementType::Village, Plains) => 20,
            (SettlementType::Village, Forest) => 10,
            (SettlementType::Village, Hills) => 20,
            (SettlementType::Village, _) => 0,
            (SettlementType::Town, Plains) => 8,
            (SettlementType::Town, Hills) => 12,
            (SettlementType::Town, _) => 0,
            (SettlementType::City, Plains) => 2,
            (SettlementType::City, _) => 0,
            (SettlementType::LoggingCamp, Forest) => 25,
            (SettlementType::LoggingCamp, _) => 0,
            (SettlementType::MiningCamp, Hills) => 15,
            (SettlementType::MiningCamp, Mountains) => 35,
            (SettlementType::MiningCamp, _) => 0,
            (SettlementType::Monastery, Forest) => 8,
            (SettlementType::Monastery, Mountains) => 15,
            (SettlementType::Monastery, Desert) => 20,
            (SettlementType::Monastery, _) => 0,
            (SettlementType::Watchtower, Hills) => 15,
            (SettlementType::Watchtower, Mountains) => 15,
            (SettlementType::Watchtower, _) => 0,
            (SettlementType::RuinsVillage, Plains) => 10,
            (SettlementType::RuinsVillage, Forest) => 15,
            (SettlementType::RuinsVillage, Desert) => 20,
            (SettlementType::RuinsVillage, _) => 0,
            (SettlementType::RuinsKeep, Hills) => 8,
            (SettlementType::RuinsKeep, Mountains) => 15,
            (SettlementType::RuinsKeep, _) => 0,
            (SettlementType::AncientRuins, Forest) => 12,
            (SettlementType::AncientRuins, Mountains) => 10,
            (SettlementType::AncientRuins, Desert) => 20,
            (SettlementType::AncientRuins, _) => 0,
        }
    }

    /// Extra draw weight when the hex borders water (fishing hamlets, ports).
    pub fn shore_affinity(&self) -> u32 {
        match self {
            SettlementType::Hamlet => 25,
            SettlementType::Village => 25,
            SettlementType::Town => 25,
            SettlementType::City => 15,
            SettlementType::Watchtower => 10,
            _ => 0,
        }
    }

    pub fn is_ruin(&self) -> bool {
        matches!(
            self,
            SettlementType::RuinsVillage | SettlementType::RuinsKeep | SettlementType::AncientRuins
        )
    }

    /// Single-character map marker.
    pub fn map_char(&self) -> char {
        match self {
            SettlementType::Farmstead => 'f',
            SettlementType::Hamlet => 'h',
            SettlementType::Village => 'v',
            SettlementType::Town => 't',
            SettlementType::City => 'C',
            SettlementType::LoggingCamp => 'l',
            SettlementType::MiningCamp => 'm',
            SettlementType::Monastery => 'M',
            SettlementType::Watchtower => 'w',
            SettlementType::RuinsVillage | SettlementType::RuinsKeep | SettlementType::AncientRuins => 'x',
        }
    }
}

impl std::fmt::Display for SettlementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Notable buildings or traits of a settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SettlementFeature {
    MarketSquare,
    Inn,
    Blacksmith,
    Temple,
    Mill,
    Harbor,
    Library,
    HerbGarden,
    Scriptorium,
    CollapsedBuildings,
    OvergrownRoads,
    HiddenCellars,
    AncientWell,
}

impl SettlementFeature {
    /// Lowest prosperity at which the feature can be present.
    pub fn min_prosperity(&self) -> u8 {
        match self {
            SettlementFeature::MarketSquare => 3,
            SettlementFeature::Temple => 3,
            SettlementFeature::Scriptorium => 3,
            SettlementFeature::Blacksmith => 2,
            SettlementFeature::Harbor => 2,
            _ => 1,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SettlementFeature::MarketSquare => "market square",
            SettlementFeature::Inn => "inn",
            SettlementFeature::Blacksmith => "blacksmith",
            SettlementFeature::Temple => "temple",
            SettlementFeature::Mill => "mill",
            SettlementFeature::Harbor => "harbor",
            SettlementFeature::Library => "library",
            SettlementFeature::HerbGarden => "herb garden",
            SettlementFeature::Scriptorium => "scriptorium",
            SettlementFeature::CollapsedBuildings => "collapsed buildings",
            SettlementFeature::OvergrownRoads => "overgrown roads",
            SettlementFeature::HiddenCellars => "hidden cellars",
            SettlementFeature::AncientWell => "ancient well",
        }
    }
}

/// Goods a settlement produces for trade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeGood {
    Grain,
    Livestock,
    Pottery,
    Cloth,
    Tools,
    Timber,
    Furs,
    IronOre,
    Coal,
    Stone,
    Gems,
    Fish,
}

impl TradeGood {
    pub fn min_prosperity(&self) -> u8 {
        match self {
            TradeGood::Gems => 3,
            TradeGood::Cloth => 3,
            TradeGood::Pottery | TradeGood::Tools => 2,
            _ => 1,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TradeGood::Grain => "grain",
            TradeGood::Livestock => "livestock",
            TradeGood::Pottery => "pottery",
            TradeGood::Cloth => "cloth",
            TradeGood::Tools => "tools",
            TradeGood::Timber => "timber",
            TradeGood::Furs => "furs",
            TradeGood::IronOre => "iron ore",
            TradeGood::Coal => "coal",
            TradeGood::Stone => "stone",
            TradeGood::Gems => "gems",
            TradeGood::Fish => "fish",
        }
    }
}

/// A generated settlement. Pure function of seed, coordinate and neighborhood.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub coord: HexCoord,
    pub kind: SettlementType,
    pub name: String,
    pub population: u32,
    /// 1 (struggling) to 5 (thriving)
    pub prosperity: u8,
    pub coastal: bool,
    pub features: Vec<SettlementFeature>,
    pub trade_goods: Vec<TradeGood>,
}

impl SettlementRecord {
    /// One-line summary for map legends and logs.
    pub fn summary(&self) -> String {
        if self.kind.is_ruin() {
            format!("{} ({})", self.name, self.kind)
        } else {
            format!("{} ({}, pop {})", self.name, self.kind, self.population)
        }
    }

    pub fn describe(&self) -> String {
        let mut text = format!("{}. Prosperity {}/5.", self.kind.description(), self.prosperity);
        if !self.features.is_empty() {
            let names: Vec<_> = self.features.iter().map(|f| f.display_name()).collect();
            text.push_str(&format!(" Notable: {}.", names.join(", ")));
        }
        if !self.trade_goods.is_empty() {
            let names: Vec<_> = self.trade_goods.iter().map(|g| g.display_name()).collect();
            text.push_str(&format!(" Trades in {}.", names.join(", ")));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_can_be_drawn() {
        for kind in SettlementType::ALL {
            let land: u32 = TerrainType::ALL.iter().map(|&t| kind.terrain_affinity(t)).sum();
            assert!(land + kind.shore_affinity() > 0, "{:?} unreachable", kind);
        }
    }

    #[test]
    fn test_nothing_has_water_affinity() {
        for kind in SettlementType::ALL {
            assert_eq!(kind.terrain_affinity(TerrainType::Water), 0);
        }
    }

    #[test]
    fn test_bigger_settlements_are_rarer_and_farther_apart() {
        let ladder = [
            SettlementType::Farmstead,
            SettlementType::Hamlet,
            SettlementType::Village,
            SettlementType::Town,
            SettlementType::City,
        ];
        for pair in ladder.windows(2) {
            assert!(pair[0].rarity() > pair[1].rarity());
            assert!(pair[0].exclusion_radius() < pair[1].exclusion_radius());
            assert!(pair[0].population_range().1 <= pair[1].population_range().1);
        }
        assert_eq!(SettlementType::max_exclusion_radius(), 10);
    }

    #[test]
    fn test_ruins_are_empty() {
        for kind in SettlementType::ALL {
            let (min, max) = kind.population_range();
            assert!(min <= max);
            assert_eq!(kind.is_ruin(), max == 0);
        }
    }
}
