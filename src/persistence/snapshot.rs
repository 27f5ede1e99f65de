//! World snapshots.
//!
//! A snapshot is the resident cache plus every overlay, written as one pretty
//! JSON document. Records are kept as raw JSON values keyed by coordinate so
//! one bad record can be skipped without rejecting the whole file.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::error::{WorldError, WorldResult};
use crate::hex::HexCoord;
use crate::settlement::SettlementRecord;
use crate::terrain::TerrainCell;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub version: u32,
    pub seed: u64,
    #[serde(default)]
    pub seed_label: Option<String>,
    pub center: HexCoord,
    /// RFC 3339 time the snapshot was taken
    #[serde(default)]
    pub saved_at: Option<String>,
    /// Coordinate key to `ResidentRecord`
    #[serde(default)]
    pub resident: BTreeMap<String, serde_json::Value>,
    /// Coordinate key to `Overlay`
    #[serde(default)]
    pub overlays: BTreeMap<String, serde_json::Value>,
}

/// Generated content of one resident hex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResidentRecord {
    pub terrain: TerrainCell,
    #[serde(default)]
    pub settlement: Option<SettlementRecord>,
}

impl WorldSnapshot {
    /// Default configuration for the world this snapshot was taken from.
    ///
    /// Lets a session be restored without knowing its seed up front.
    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            seed_label: self.seed_label.clone(),
            ..WorldConfig::from_seed(self.seed)
        }
    }

    /// Check the header before any record is looked at.
    pub fn check_header(&self, seed: u64) -> WorldResult<()> {
        if self.version > SNAPSHOT_VERSION || self.version == 0 {
            return Err(WorldError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if self.seed != seed {
            return Err(WorldError::SeedMismatch {
                expected: seed,
                found: self.seed,
            });
        }
        Ok(())
    }
}

/// A record that was skipped during a load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    pub key: String,
    pub reason: String,
}

/// Outcome of a partially successful load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub resident_loaded: usize,
    pub overlays_loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn skip(&mut self, key: impl Into<String>, reason: impl Into<String>) {
        let record = SkippedRecord {
            key: key.into(),
            reason: reason.into(),
        };
        log::warn!("skipping record {}: {}", record.key, record.reason);
        self.skipped.push(record);
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Resident: {} | Overlays: {} | Skipped: {}",
            self.resident_loaded,
            self.overlays_loaded,
            self.skipped.len()
        )
    }
}

/// Write a snapshot to disk, creating parent directories as needed.
pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &WorldSnapshot) -> WorldResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| WorldError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| WorldError::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), snapshot)?;
    info!(
        "saved snapshot to {} ({} resident, {} overlays)",
        path.display(),
        snapshot.resident.len(),
        snapshot.overlays.len()
    );
    Ok(())
}

/// Read a snapshot from disk. Records are not validated here.
pub fn load_snapshot(path: impl AsRef<Path>) -> WorldResult<WorldSnapshot> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| WorldError::io(path, e))?;
    let snapshot: WorldSnapshot = serde_json::from_reader(BufReader::new(file))?;
    info!("read snapshot {} (version {})", path.display(), snapshot.version);
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn empty(seed: u64) -> WorldSnapshot {
        WorldSnapshot {
            version: SNAPSHOT_VERSION,
            seed,
            seed_label: None,
            center: HexCoord::new(4, -2),
            saved_at: None,
            resident: BTreeMap::new(),
            overlays: BTreeMap::new(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saves").join("world.json");
        let mut snapshot = empty(5);
        snapshot
            .overlays
            .insert("+0001_+0001".into(), serde_json::json!({ "coord": { "q": 1, "r": 1 } }));
        save_snapshot(&path, &snapshot).unwrap();
        assert_eq!(load_snapshot(&path).unwrap(), snapshot);
    }

    #[test]
    fn test_header_checks() {
        assert!(empty(5).check_header(5).is_ok());
        assert!(matches!(
            empty(5).check_header(6),
            Err(WorldError::SeedMismatch { expected: 6, found: 5 })
        ));
        let mut future = empty(5);
        future.version = SNAPSHOT_VERSION + 1;
        assert!(matches!(
            future.check_header(5),
            Err(WorldError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_world_config_follows_header() {
        let mut snapshot = empty(0x5eed_1234_abcd_0001);
        snapshot.seed_label = Some("Arden".into());
        let config = snapshot.world_config();
        assert_eq!(config.seed, 0x5eed_1234_abcd_0001);
        assert_eq!(config.seed_label.as_deref(), Some("Arden"));
        assert!(snapshot.check_header(config.seed).is_ok());
        assert_eq!(config.viewport, WorldConfig::default().viewport);
    }

    #[test]
    fn test_missing_and_garbage_files() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_snapshot(dir.path().join("nope.json")),
            Err(WorldError::Io { .. })
        ));
        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "{ not json").unwrap();
        assert!(matches!(load_snapshot(&garbage), Err(WorldError::Json(_))));
    }

    #[test]
    fn test_report_summary() {
        let mut report = LoadReport::default();
        assert!(report.is_clean());
        report.skip("+0000_+0000", "bad");
        assert!(!report.is_clean());
        assert_eq!(report.summary(), "Resident: 0 | Overlays: 0 | Skipped: 1");
    }
}
