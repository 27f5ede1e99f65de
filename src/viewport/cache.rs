//! Ring-structured world cache.
//!
//! Residency is driven by distance from the center, not by recency: under
//! directional movement the hexes nearest the observer are the ones about to
//! be looked at again.

use std::collections::{BTreeMap, HashMap};

use chrono::Local;
use log::{debug, error, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::error::WorldResult;
use crate::hex::HexCoord;
use crate::overlay::{Overlay, OverlayPatch, OverlayStore};
use crate::persistence::{LoadReport, ResidentRecord, WorldSnapshot, SNAPSHOT_VERSION};
use crate::settlement::{SettlementGenerator, SettlementRecord};
use crate::terrain::{TerrainCell, TerrainGenerator};

/// Everything known about one hex, as handed to renderers and exporters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub coord: HexCoord,
    pub terrain: TerrainCell,
    pub settlement: Option<SettlementRecord>,
    pub overlay: Option<Overlay>,
    /// Ring distance from the cache center at the time of the call
    pub ring: u32,
}

/// Cache statistics for monitoring
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Resolves answered from the resident set
    pub hits: usize,
    /// Resolves that had to generate
    pub misses: usize,
    /// Hexes generated ahead of need by `move_center`
    pub preloaded: usize,
    /// Entries dropped for being too far from the center
    pub evictions: usize,
    /// Current number of resident hexes
    pub resident: usize,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }

    /// Format as human-readable string
    pub fn summary(&self) -> String {
        format!(
            "Hits: {} | Misses: {} | Rate: {:.1}% | Preloaded: {} | Evicted: {} | Resident: {}",
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.preloaded,
            self.evictions,
            self.resident
        )
    }
}

/// What a `move_center` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub from: HexCoord,
    pub to: HexCoord,
    pub preloaded: usize,
    pub evicted: usize,
}

/// Generated content held for a resident hex.
#[derive(Clone, Debug, PartialEq)]
struct Resident {
    seed: u64,
    terrain: TerrainCell,
    settlement: Option<SettlementRecord>,
}

/// Bounded window over the infinite world plus the overlay store.
///
/// Single owner: every operation takes `&mut self` and finishes before the
/// next one starts. Generation may fan out across threads during preload,
/// but insertion into the resident map is always serial.
pub struct WorldCache {
    config: WorldConfig,
    terrain: TerrainGenerator,
    settlements: SettlementGenerator,
    overlays: OverlayStore,
    resident: HashMap<HexCoord, Resident>,
    center: HexCoord,
    stats: CacheStats,
}

impl WorldCache {
    /// Empty cache centered on the origin. Nothing is generated until the
    /// first `resolve` or `move_center`.
    pub fn new(config: WorldConfig) -> Self {
        let terrain = TerrainGenerator::new(&config);
        let settlements = SettlementGenerator::new(&config);
        Self {
            config,
            terrain,
            settlements,
            overlays: OverlayStore::new(),
            resident: HashMap::new(),
            center: HexCoord::ORIGIN,
            stats: CacheStats::default(),
        }
    }

    /// Cache with its window already preloaded around `center`.
    pub fn with_center(config: WorldConfig, center: HexCoord) -> Self {
        let mut cache = Self::new(config);
        cache.move_center(center);
        cache
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn center(&self) -> HexCoord {
        self.center
    }

    pub fn terrain_generator(&self) -> &TerrainGenerator {
        &self.terrain
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            resident: self.resident.len(),
            ..self.stats.clone()
        }
    }

    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    pub fn is_resident(&self, coord: HexCoord) -> bool {
        self.resident.contains_key(&coord)
    }

    /// Resident coordinates, sorted.
    pub fn resident_coords(&self) -> Vec<HexCoord> {
        let mut coords: Vec<_> = self.resident.keys().copied().collect();
        coords.sort();
        coords
    }

    /// Resolve a hex, generating and caching it if it is not resident.
    ///
    /// Hexes beyond the eviction radius are generated and returned but not
    /// kept, so lookups far from the center never grow the resident set.
    pub fn resolve(&mut self, coord: HexCoord) -> CacheEntry {
        if self.resident.contains_key(&coord) {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
            if coord.distance(&self.center) <= self.config.viewport.evict_radius() {
                let resident = self.generate(coord);
                self.insert_resident(coord, resident);
            }
        }
        self.entry_for(coord)
    }

    /// Resident entry without generating anything.
    pub fn peek(&self, coord: HexCoord) -> Option<CacheEntry> {
        self.resident.get(&coord).map(|_| self.entry_for(coord))
    }

    /// Recenter the window: evict everything beyond the eviction radius and
    /// preload the active and buffer rings, nearest first.
    ///
    /// A teleport is just a large move; the same rules apply.
    pub fn move_center(&mut self, new_center: HexCoord) -> MoveReport {
        let from = self.center;
        self.center = new_center;

        let evict_radius = self.config.viewport.evict_radius();
        let before = self.resident.len();
        self.resident
            .retain(|coord, _| coord.distance(&new_center) <= evict_radius);
        let evicted = before - self.resident.len();
        self.stats.evictions += evicted;

        let preloaded = self.preload();

        if evicted > 0 || preloaded > 0 {
            debug!(
                "moved {} -> {}: preloaded {}, evicted {}, resident {}",
                from,
                new_center,
                preloaded,
                evicted,
                self.resident.len()
            );
        }

        MoveReport {
            from,
            to: new_center,
            preloaded,
            evicted,
        }
    }

    /// Generate every missing hex within the preload radius, in ring order.
    fn preload(&mut self) -> usize {
        let missing: Vec<HexCoord> = self
            .center
            .spiral(self.config.viewport.preload_radius())
            .into_iter()
            .filter(|c| !self.resident.contains_key(c))
            .collect();

        let generated: Vec<(HexCoord, Resident)> = if self.config.viewport.parallel_preload {
            let terrain = &self.terrain;
            let settlements = &self.settlements;
            let seed = self.config.seed;
            missing
                .par_iter()
                .map(|&c| (c, generate_resident(seed, terrain, settlements, c)))
                .collect()
        } else {
            missing.iter().map(|&c| (c, self.generate(c))).collect()
        };

        let count = generated.len();
        for (coord, resident) in generated {
            self.insert_resident(coord, resident);
        }
        self.stats.preloaded += count;
        count
    }

    /// Active-radius entries in spiral order: center, then each ring outward.
    pub fn visible_cells(&mut self) -> Vec<CacheEntry> {
        self.center
            .spiral(self.config.viewport.active_radius)
            .into_iter()
            .map(|c| self.resolve(c))
            .collect()
    }

    /// Every resident hex, ordered by coordinate.
    pub fn export_resident(&self) -> BTreeMap<HexCoord, CacheEntry> {
        self.resident
            .keys()
            .map(|&c| (c, self.entry_for(c)))
            .collect()
    }

    /// The full overlay map, including overlays on non-resident hexes.
    pub fn export_overlays(&self) -> BTreeMap<HexCoord, Overlay> {
        self.overlays.export()
    }

    pub fn overlays(&self) -> &OverlayStore {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut OverlayStore {
        &mut self.overlays
    }

    pub fn get_overlay(&self, coord: HexCoord) -> Option<&Overlay> {
        self.overlays.get(coord)
    }

    pub fn put_overlay(&mut self, coord: HexCoord, patch: &OverlayPatch) -> Option<&Overlay> {
        self.overlays.put(coord, patch)
    }

    pub fn delete_overlay(&mut self, coord: HexCoord) -> Option<Overlay> {
        self.overlays.delete(coord)
    }

    /// Overlay name, else settlement name, else terrain name.
    pub fn display_name(&mut self, coord: HexCoord) -> String {
        if let Some(name) = self.overlays.get(coord).and_then(|o| o.custom_name.clone()) {
            return name;
        }
        let entry = self.resolve(coord);
        match entry.settlement {
            Some(settlement) => settlement.name,
            None => entry.terrain.terrain.display_name().to_string(),
        }
    }

    /// Overlay description, else settlement description, else terrain
    /// description.
    pub fn display_description(&mut self, coord: HexCoord) -> String {
        if let Some(text) = self.overlays.get(coord).and_then(|o| o.description.clone()) {
            return text;
        }
        let entry = self.resolve(coord);
        match entry.settlement {
            Some(settlement) => settlement.describe(),
            None => entry.terrain.terrain.description().to_string(),
        }
    }

    /// Verify every resident entry belongs where it is stored and to this
    /// world's seed. Offending entries are dropped and returned.
    pub fn check_consistency(&mut self) -> Vec<HexCoord> {
        let seed = self.config.seed;
        let mut bad: Vec<HexCoord> = self
            .resident
            .iter()
            .filter(|(coord, r)| {
                r.seed != seed
                    || r.terrain.coord != **coord
                    || r.settlement.as_ref().is_some_and(|s| s.coord != **coord)
            })
            .map(|(coord, _)| *coord)
            .collect();
        bad.sort();

        for coord in &bad {
            error!("cache consistency violation at {}, entry dropped", coord);
            self.resident.remove(coord);
        }
        debug_assert!(bad.is_empty(), "cache consistency violations: {:?}", bad);
        bad
    }

    /// Capture resident entries and overlays for persistence.
    pub fn snapshot(&self) -> WorldResult<WorldSnapshot> {
        let mut resident = BTreeMap::new();
        for (coord, r) in &self.resident {
            let record = ResidentRecord {
                terrain: r.terrain.clone(),
                settlement: r.settlement.clone(),
            };
            resident.insert(coord.key(), serde_json::to_value(record)?);
        }

        let mut overlays = BTreeMap::new();
        for overlay in self.overlays.iter() {
            overlays.insert(overlay.coord.key(), serde_json::to_value(overlay)?);
        }

        Ok(WorldSnapshot {
            version: SNAPSHOT_VERSION,
            seed: self.config.seed,
            seed_label: self.config.seed_label.clone(),
            center: self.center,
            saved_at: Some(Local::now().to_rfc3339()),
            resident,
            overlays,
        })
    }

    /// Replace resident state and overlays with a snapshot.
    ///
    /// Header problems (wrong seed, unknown version) fail before anything
    /// changes. Individual bad records are skipped and reported. A resident
    /// record that no longer matches what this world generates is treated
    /// as corrupt and skipped; it will be regenerated on demand.
    pub fn bulk_load(&mut self, snapshot: &WorldSnapshot) -> WorldResult<LoadReport> {
        snapshot.check_header(self.config.seed)?;

        let mut report = LoadReport::default();
        let mut resident = HashMap::new();
        for (key, value) in &snapshot.resident {
            match self.validate_resident(key, value) {
                Ok((coord, r)) => {
                    resident.insert(coord, r);
                }
                Err(reason) => report.skip(key.as_str(), reason),
            }
        }

        let mut overlays = OverlayStore::new();
        for (key, value) in &snapshot.overlays {
            match Overlay::from_record(key, value.clone()) {
                Ok(overlay) => overlays.insert(overlay),
                Err(e) => report.skip(key.as_str(), e.to_string()),
            }
        }

        report.resident_loaded = resident.len();
        report.overlays_loaded = overlays.len();

        self.resident = resident;
        self.overlays = overlays;
        self.center = snapshot.center;
        self.preload();

        info!("bulk load: {}", report.summary());
        Ok(report)
    }

    fn validate_resident(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(HexCoord, Resident), String> {
        let coord = HexCoord::from_key(key).map_err(|e| e.to_string())?;
        let record: ResidentRecord =
            serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
        if record.terrain.coord != coord {
            return Err(format!("terrain record is for {}", record.terrain.coord));
        }

        let expected = self.generate(coord);
        if !record.terrain.same_content(&expected.terrain) || record.settlement != expected.settlement {
            return Err("does not match generated content for this seed".to_string());
        }

        Ok((
            coord,
            Resident {
                seed: self.config.seed,
                terrain: record.terrain,
                settlement: record.settlement,
            },
        ))
    }

    fn generate(&self, coord: HexCoord) -> Resident {
        generate_resident(self.config.seed, &self.terrain, &self.settlements, coord)
    }

    fn insert_resident(&mut self, coord: HexCoord, resident: Resident) {
        if self.resident.contains_key(&coord) {
            error!("{} generated while already resident, keeping existing entry", coord);
            debug_assert!(false, "{} resident twice", coord);
            return;
        }
        self.resident.insert(coord, resident);
    }

    fn entry_for(&self, coord: HexCoord) -> CacheEntry {
        let resident = self.resident.get(&coord);
        let (terrain, settlement) = match resident {
            Some(r) => (r.terrain.clone(), r.settlement.clone()),
            None => {
                let r = self.generate(coord);
                (r.terrain, r.settlement)
            }
        };
        CacheEntry {
            coord,
            terrain,
            settlement,
            overlay: self.overlays.get(coord).cloned(),
            ring: coord.distance(&self.center),
        }
    }
}

fn generate_resident(
    seed: u64,
    terrain: &TerrainGenerator,
    settlements: &SettlementGenerator,
    coord: HexCoord,
) -> Resident {
    Resident {
        seed,
        terrain: terrain.resolve(coord),
        settlement: settlements.resolve(terrain, coord),
    }
}
