//! Settlement placement
//!
//! Placement is decided per hex from stable hashes plus the terrain of a
//! bounded neighborhood:
//! 1. A placement roll is compared against the terrain's chance (with coastal,
//!    mountain and desert modifiers). Hexes that pass are *candidates*.
//! 2. The same roll, rescaled, draws the candidate's kind from the
//!    affinity-weighted table.
//! 3. A candidate is dropped if a stronger candidate sits inside its exclusion
//!    radius. "Stronger" means a larger exclusion radius, then a higher
//!    priority hash, then the larger coordinate.
//!
//! Step 3 only looks at candidates, which are computed without recursion, so
//! the answer for a hex never depends on what else has been resolved.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::naming;
use super::params::SettlementParams;
use super::types::{SettlementFeature, SettlementRecord, SettlementType, TradeGood};
use crate::config::WorldConfig;
use crate::hex::HexCoord;
use crate::seeds::{hash_coord, unit};
use crate::terrain::{TerrainFeature, TerrainSource, TerrainType};

const SALT_PLACEMENT: u64 = 1;
const SALT_PRIORITY: u64 = 2;
const SALT_PROSPERITY: u64 = 3;
const SALT_POPULATION: u64 = 4;
const SALT_DETAILS: u64 = 5;
const SALT_NAME: u64 = 6;

/// Cumulative prosperity weights for levels 1..=5 (10/20/40/20/10).
const PROSPERITY_CUMULATIVE: [f64; 5] = [0.10, 0.30, 0.70, 0.90, 1.00];

const NO_FEATURES: &[SettlementFeature] = &[];
const TOWN_FEATURES: &[SettlementFeature] = &[
    SettlementFeature::MarketSquare,
    SettlementFeature::Inn,
    SettlementFeature::Blacksmith,
    SettlementFeature::Temple,
];
const VILLAGE_FEATURES: &[SettlementFeature] = &[
    SettlementFeature::Inn,
    SettlementFeature::Blacksmith,
    SettlementFeature::Temple,
    SettlementFeature::Mill,
];
const MONASTERY_FEATURES: &[SettlementFeature] = &[
    SettlementFeature::Library,
    SettlementFeature::HerbGarden,
    SettlementFeature::Scriptorium,
];
const RUIN_FEATURES: &[SettlementFeature] = &[
    SettlementFeature::CollapsedBuildings,
    SettlementFeature::OvergrownRoads,
    SettlementFeature::HiddenCellars,
    SettlementFeature::AncientWell,
];

/// A hex that passed the placement roll, before spacing is enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub coord: HexCoord,
    pub kind: SettlementType,
    pub terrain: TerrainType,
    pub coastal: bool,
}

#[derive(Clone, Debug)]
pub struct SettlementGenerator {
    params: SettlementParams,
    placement_seed: u64,
    names_seed: u64,
    max_chance: f64,
}

impl SettlementGenerator {
    pub fn new(config: &WorldConfig) -> Self {
        let seeds = config.seeds();
        let params = config.settlements.clone();
        let max_chance = params.max_chance();
        Self {
            params,
            placement_seed: seeds.settlements,
            names_seed: seeds.names,
            max_chance,
        }
    }

    pub fn params(&self) -> &SettlementParams {
        &self.params
    }

    /// Resolve the settlement at `coord`, if any.
    pub fn resolve<S: TerrainSource + ?Sized>(
        &self,
        terrain: &S,
        coord: HexCoord,
    ) -> Option<SettlementRecord> {
        let candidate = self.candidate(terrain, coord)?;
        if self.is_suppressed(terrain, &candidate) {
            return None;
        }
        Some(self.build_record(&candidate))
    }

    /// Placement roll and kind draw for one hex, ignoring spacing.
    pub fn candidate<S: TerrainSource + ?Sized>(
        &self,
        terrain: &S,
        coord: HexCoord,
    ) -> Option<Candidate> {
        let roll = unit(hash_coord(self.placement_seed, coord.q, coord.r, SALT_PLACEMENT));
        if roll >= self.max_chance {
            return None;
        }

        let here = terrain.terrain_type_at(coord);
        let mut chance = self.params.chances.for_terrain(here) * self.params.density;
        if chance <= 0.0 || !here.is_land() {
            return None;
        }

        let around: Vec<TerrainType> = coord
            .neighbors()
            .iter()
            .map(|&n| terrain.terrain_type_at(n))
            .collect();
        let coastal = around.contains(&TerrainType::Water);

        if coastal {
            chance *= self.params.coastal_bonus;
        }
        if here == TerrainType::Mountains && !around.contains(&TerrainType::Plains) {
            chance *= self.params.isolated_mountain_factor;
        }
        if here == TerrainType::Desert && !terrain.terrain_at(coord).has_feature(TerrainFeature::Oasis) {
            chance *= self.params.dry_desert_factor;
        }
        if roll >= chance {
            return None;
        }

        let kind = draw_kind(here, coastal, roll / chance)?;
        Some(Candidate {
            coord,
            kind,
            terrain: here,
            coastal,
        })
    }

    /// True when a stronger candidate sits inside this one's exclusion radius.
    ///
    /// Rivals are compared as candidates even if they are suppressed in turn,
    /// so a hex can lose to a neighbor that never becomes a settlement. That
    /// over-suppression is accepted: it keeps each answer local to one radius
    /// and independent of resolution order.
    fn is_suppressed<S: TerrainSource + ?Sized>(&self, terrain: &S, candidate: &Candidate) -> bool {
        let radius = candidate.kind.exclusion_radius();
        if radius <= 1 {
            return false;
        }
        candidate
            .coord
            .spiral(radius - 1)
            .into_iter()
            .skip(1)
            .filter_map(|c| self.candidate(terrain, c))
            .any(|rival| rival.kind.exclusion_radius() >= radius && self.outranks(&rival, candidate))
    }

    fn priority(&self, coord: HexCoord) -> u64 {
        hash_coord(self.placement_seed, coord.q, coord.r, SALT_PRIORITY)
    }

    fn outranks(&self, a: &Candidate, b: &Candidate) -> bool {
        let (ea, eb) = (a.kind.exclusion_radius(), b.kind.exclusion_radius());
        if ea != eb {
            return ea > eb;
        }
        let (pa, pb) = (self.priority(a.coord), self.priority(b.coord));
        if pa != pb {
            return pa > pb;
        }
        a.coord > b.coord
    }

    fn build_record(&self, candidate: &Candidate) -> SettlementRecord {
        let HexCoord { q, r } = candidate.coord;
        let kind = candidate.kind;

        let prosperity = prosperity_level(unit(hash_coord(self.placement_seed, q, r, SALT_PROSPERITY)));
        let population = population(
            kind,
            prosperity,
            unit(hash_coord(self.placement_seed, q, r, SALT_POPULATION)),
        );

        let mut rng = ChaCha8Rng::seed_from_u64(hash_coord(self.names_seed, q, r, SALT_DETAILS));
        let features = settlement_features(kind, prosperity, candidate.coastal, &mut rng);
        let trade_goods = trade_goods(kind, prosperity, candidate.coastal, &mut rng);

        let mut name_rng = ChaCha8Rng::seed_from_u64(hash_coord(self.names_seed, q, r, SALT_NAME));
        let name = naming::settlement_name(kind, candidate.terrain, candidate.coastal, &mut name_rng);

        SettlementRecord {
            coord: candidate.coord,
            kind,
            name,
            population,
            prosperity,
            coastal: candidate.coastal,
            features,
            trade_goods,
        }
    }
}

/// Weighted draw over kinds. `fraction` in [0, 1) selects a point along the
/// cumulative weights, walked in priority order.
fn draw_kind(terrain: TerrainType, coastal: bool, fraction: f64) -> Option<SettlementType> {
    let weights: Vec<(SettlementType, f64)> = SettlementType::ALL
        .iter()
        .map(|&kind| {
            let shore = if coastal { kind.shore_affinity() } else { 0 };
            let affinity = kind.terrain_affinity(terrain) + shore;
            (kind, affinity as f64 * kind.rarity())
        })
        .filter(|(_, w)| *w > 0.0)
        .collect();

    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let target = fraction * total;
    let mut acc = 0.0;
    for &(kind, weight) in &weights {
        acc += weight;
        if target < acc {
            return Some(kind);
        }
    }
    weights.last().map(|(kind, _)| *kind)
}

fn prosperity_level(roll: f64) -> u8 {
    PROSPERITY_CUMULATIVE
        .iter()
        .position(|&edge| roll < edge)
        .map_or(5, |i| i as u8 + 1)
}

/// Prosperity sets the floor, the roll spreads within it.
fn population(kind: SettlementType, prosperity: u8, roll: f64) -> u32 {
    let (min, max) = kind.population_range();
    if max == 0 {
        return 0;
    }
    let fraction = (prosperity.saturating_sub(1)) as f64 / 4.0 * 0.6 + roll * 0.4;
    let span = (max - min) as f64;
    (min + (span * fraction).round() as u32).min(max)
}

fn settlement_features(
    kind: SettlementType,
    prosperity: u8,
    coastal: bool,
    rng: &mut impl Rng,
) -> Vec<SettlementFeature> {
    use SettlementFeature::Harbor;

    let (pool, count): (&[SettlementFeature], usize) = match kind {
        SettlementType::Town | SettlementType::City => (TOWN_FEATURES, rng.gen_range(2..=4usize)),
        SettlementType::Village => (VILLAGE_FEATURES, rng.gen_range(1..=2usize)),
        SettlementType::Monastery => (MONASTERY_FEATURES, MONASTERY_FEATURES.len()),
        SettlementType::RuinsVillage | SettlementType::RuinsKeep | SettlementType::AncientRuins => {
            (RUIN_FEATURES, rng.gen_range(1..=3usize))
        }
        _ => (NO_FEATURES, 0),
    };

    let eligible: Vec<SettlementFeature> = pool
        .iter()
        .copied()
        .filter(|f| f.min_prosperity() <= prosperity)
        .collect();
    let mut features: Vec<SettlementFeature> = eligible
        .choose_multiple(rng, count.min(eligible.len()))
        .copied()
        .collect();

    if coastal
        && matches!(kind, SettlementType::Town | SettlementType::City)
        && Harbor.min_prosperity() <= prosperity
    {
        features.push(Harbor);
    }
    features.sort();
    features
}

fn trade_goods(
    kind: SettlementType,
    prosperity: u8,
    coastal: bool,
    rng: &mut impl Rng,
) -> Vec<TradeGood> {
    use TradeGood::*;

    let mut goods: Vec<TradeGood> = match kind {
        SettlementType::LoggingCamp => eligible_goods(prosperity, &[Timber, Furs]),
        SettlementType::MiningCamp => eligible_goods(prosperity, &[IronOre, Coal, Stone, Gems])
            .choose(rng)
            .copied()
            .into_iter()
            .collect(),
        SettlementType::Farmstead => eligible_goods(prosperity, &[Grain, Livestock])
            .choose(rng)
            .copied()
            .into_iter()
            .collect(),
        SettlementType::Village | SettlementType::Town | SettlementType::City => {
            let pool = eligible_goods(prosperity, &[Grain, Livestock, Pottery, Cloth, Tools]);
            let count = rng.gen_range(1..=3usize).min(pool.len());
            pool.choose_multiple(rng, count).copied().collect()
        }
        _ => Vec::new(),
    };

    if coastal
        && matches!(
            kind,
            SettlementType::Hamlet | SettlementType::Village | SettlementType::Town | SettlementType::City
        )
    {
        goods.push(Fish);
    }
    goods.sort();
    goods
}

fn eligible_goods(prosperity: u8, pool: &[TradeGood]) -> Vec<TradeGood> {
    pool.iter()
        .copied()
        .filter(|g| g.min_prosperity() <= prosperity)
        .collect()
}

/// One-shot settlement resolution against any terrain source.
pub fn resolve_settlement<S: TerrainSource + ?Sized>(
    config: &WorldConfig,
    terrain: &S,
    coord: HexCoord,
) -> Option<SettlementRecord> {
    SettlementGenerator::new(config).resolve(terrain, coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{TerrainCell, TerrainGenerator};
    use std::collections::HashMap;

    fn world(seed: &str) -> (TerrainGenerator, SettlementGenerator) {
        let config = WorldConfig::new(seed);
        (TerrainGenerator::new(&config), SettlementGenerator::new(&config))
    }

    fn settlements_within(seed: &str, radius: u32) -> HashMap<HexCoord, SettlementRecord> {
        let (terrain, settlements) = world(seed);
        HexCoord::ORIGIN
            .spiral(radius)
            .into_iter()
            .filter_map(|c| settlements.resolve(&terrain, c).map(|s| (c, s)))
            .collect()
    }

    /// Flat world of a single terrain.
    struct Uniform(TerrainType);

    impl TerrainSource for Uniform {
        fn terrain_at(&self, coord: HexCoord) -> TerrainCell {
            TerrainCell {
                coord,
                terrain: self.0,
                features: Vec::new(),
                elevation: 0.5,
                moisture: 0.5,
                warmth: 0.5,
            }
        }
    }

    #[test]
    fn test_settlements_exist() {
        let found = settlements_within("Arden", 20);
        assert!(found.len() > 20, "only {} settlements", found.len());
    }

    #[test]
    fn test_arden_village_is_pinned() {
        let (terrain, settlements) = world("Arden");
        let record = settlements
            .resolve(&terrain, HexCoord::new(1, 0))
            .expect("village east of the origin");
        assert_eq!(record.kind, SettlementType::Village);
        assert_eq!(record.name, "Beechbutte");
        assert_eq!(record.population, 252);
        assert_eq!(record.prosperity, 3);
        assert!(!record.coastal);
        assert!(settlements.resolve(&terrain, HexCoord::ORIGIN).is_none());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let a = settlements_within("Arden", 12);
        let b = settlements_within("Arden", 12);
        assert_eq!(a, b);
    }

    #[test]
    fn test_order_does_not_matter() {
        let (terrain, settlements) = world("alpha");
        let coords = HexCoord::ORIGIN.spiral(12);
        let forward: Vec<_> = coords.iter().map(|&c| settlements.resolve(&terrain, c)).collect();
        let (terrain, settlements) = world("alpha");
        let mut backward: Vec<_> = coords.iter().rev().map(|&c| settlements.resolve(&terrain, c)).collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_same_kind_spacing() {
        for seed in ["Arden", "alpha"] {
            let found = settlements_within(seed, 25);
            let list: Vec<_> = found.values().collect();
            for (i, a) in list.iter().enumerate() {
                for b in &list[i + 1..] {
                    if a.kind == b.kind {
                        assert!(
                            a.coord.distance(&b.coord) >= a.kind.exclusion_radius(),
                            "{:?} at {} and {} too close",
                            a.kind,
                            a.coord,
                            b.coord
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_no_settlements_on_water() {
        let (terrain, settlements) = world("Arden");
        for coord in HexCoord::ORIGIN.spiral(20) {
            if terrain.terrain_type(coord) == TerrainType::Water {
                assert!(settlements.resolve(&terrain, coord).is_none());
            }
        }
        assert!(settlements.resolve(&Uniform(TerrainType::Water), HexCoord::ORIGIN).is_none());
    }

    #[test]
    fn test_records_are_well_formed() {
        for record in settlements_within("Arden", 20).values() {
            assert!((1..=5).contains(&record.prosperity));
            let (min, max) = record.kind.population_range();
            assert!(record.population >= min && record.population <= max);
            assert!(!record.name.is_empty());
            assert_eq!(record.kind.is_ruin(), record.name.starts_with("Ruins of "));
            for feature in &record.features {
                assert!(feature.min_prosperity() <= record.prosperity);
            }
            for good in &record.trade_goods {
                assert!(good.min_prosperity() <= record.prosperity);
            }
        }
    }

    #[test]
    fn test_zero_density_means_empty_world() {
        let mut config = WorldConfig::new("Arden");
        config.settlements.density = 0.0;
        let terrain = TerrainGenerator::new(&config);
        let settlements = SettlementGenerator::new(&config);
        assert!(HexCoord::ORIGIN
            .spiral(15)
            .into_iter()
            .all(|c| settlements.resolve(&terrain, c).is_none()));
    }

    #[test]
    fn test_inland_plains_draw_farming_kinds() {
        let config = WorldConfig::new("plainsworld");
        let settlements = SettlementGenerator::new(&config);
        let plains = Uniform(TerrainType::Plains);
        let mut seen = 0;
        for coord in HexCoord::ORIGIN.spiral(20) {
            if let Some(c) = settlements.candidate(&plains, coord) {
                seen += 1;
                assert!(c.kind.terrain_affinity(TerrainType::Plains) > 0);
                assert!(!c.coastal);
            }
        }
        assert!(seen > 50);
    }

    #[test]
    fn test_uniform_plains_respects_spacing() {
        let config = WorldConfig::new("plainsworld");
        let settlements = SettlementGenerator::new(&config);
        let plains = Uniform(TerrainType::Plains);
        let placed: Vec<_> = HexCoord::ORIGIN
            .spiral(15)
            .into_iter()
            .filter_map(|c| settlements.resolve(&plains, c))
            .collect();
        assert!(!placed.is_empty());
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                if a.kind == b.kind {
                    assert!(a.coord.distance(&b.coord) >= a.kind.exclusion_radius());
                }
            }
        }
    }

    #[test]
    fn test_draw_kind_covers_weights() {
        assert_eq!(draw_kind(TerrainType::Plains, false, 0.0), Some(SettlementType::Farmstead));
        assert_eq!(draw_kind(TerrainType::Water, false, 0.5), None);
        let last = draw_kind(TerrainType::Plains, false, 0.999_999);
        assert_eq!(last, Some(SettlementType::RuinsVillage));
        assert_eq!(draw_kind(TerrainType::Mountains, false, 0.0), Some(SettlementType::Hamlet));
    }

    #[test]
    fn test_prosperity_distribution_edges() {
        assert_eq!(prosperity_level(0.0), 1);
        assert_eq!(prosperity_level(0.29), 2);
        assert_eq!(prosperity_level(0.5), 3);
        assert_eq!(prosperity_level(0.85), 4);
        assert_eq!(prosperity_level(0.99), 5);
    }

    #[test]
    fn test_population_scales_with_prosperity() {
        let poor = population(SettlementType::Town, 1, 0.5);
        let rich = population(SettlementType::Town, 5, 0.5);
        assert!(poor < rich);
        assert_eq!(population(SettlementType::RuinsKeep, 5, 0.9), 0);
        assert!(population(SettlementType::City, 5, 0.999) <= 20000);
    }
}
