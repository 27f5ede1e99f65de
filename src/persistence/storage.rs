//! Overlay persistence.
//!
//! Overlays are stored one record per hex behind the `OverlayStorage` trait.
//! `FileOverlayStorage` lays them out on disk as:
//! `{base_dir}/world_{seed}/{key}.json`

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::snapshot::LoadReport;
use crate::error::{WorldError, WorldResult};
use crate::hex::HexCoord;
use crate::overlay::{Overlay, OverlayStore};

/// Key-value store for overlays, addressed by hex.
pub trait OverlayStorage {
    /// Load one overlay. Missing records are `Ok(None)`.
    fn load(&self, coord: HexCoord) -> WorldResult<Option<Overlay>>;

    fn save(&mut self, overlay: &Overlay) -> WorldResult<()>;

    /// Remove a record. Returns whether anything was removed.
    fn remove(&mut self, coord: HexCoord) -> WorldResult<bool>;

    /// Every hex with a stored record.
    fn list(&self) -> WorldResult<Vec<HexCoord>>;
}

/// In-process storage, mainly for tests and tools.
#[derive(Clone, Debug, Default)]
pub struct MemoryOverlayStorage {
    records: BTreeMap<HexCoord, Overlay>,
}

impl MemoryOverlayStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl OverlayStorage for MemoryOverlayStorage {
    fn load(&self, coord: HexCoord) -> WorldResult<Option<Overlay>> {
        Ok(self.records.get(&coord).cloned())
    }

    fn save(&mut self, overlay: &Overlay) -> WorldResult<()> {
        self.records.insert(overlay.coord, overlay.clone());
        Ok(())
    }

    fn remove(&mut self, coord: HexCoord) -> WorldResult<bool> {
        Ok(self.records.remove(&coord).is_some())
    }

    fn list(&self) -> WorldResult<Vec<HexCoord>> {
        Ok(self.records.keys().copied().collect())
    }
}

/// One pretty-printed JSON file per edited hex.
pub struct FileOverlayStorage {
    /// Base directory for all worlds
    base_dir: PathBuf,
    /// World seed (used for directory organization)
    world_seed: u64,
}

impl FileOverlayStorage {
    pub fn new<P: AsRef<Path>>(base_dir: P, world_seed: u64) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            world_seed,
        }
    }

    /// Directory holding this world's overlays
    pub fn world_dir(&self) -> PathBuf {
        self.base_dir.join(format!("world_{}", self.world_seed))
    }

    fn record_path(&self, coord: HexCoord) -> PathBuf {
        self.world_dir().join(format!("{}.json", coord.key()))
    }

    fn ensure_dir(&self) -> WorldResult<()> {
        let dir = self.world_dir();
        fs::create_dir_all(&dir).map_err(|e| WorldError::io(dir, e))
    }

    /// Remove every stored overlay for this world.
    pub fn clear(&self) -> WorldResult<()> {
        let dir = self.world_dir();
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| WorldError::io(dir, e))?;
        }
        Ok(())
    }
}

impl OverlayStorage for FileOverlayStorage {
    fn load(&self, coord: HexCoord) -> WorldResult<Option<Overlay>> {
        let path = self.record_path(coord);
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(&path).map_err(|e| WorldError::io(&path, e))?;
        let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
        Overlay::from_record(&coord.key(), value).map(Some)
    }

    fn save(&mut self, overlay: &Overlay) -> WorldResult<()> {
        self.ensure_dir()?;
        let path = self.record_path(overlay.coord);
        let file = File::create(&path).map_err(|e| WorldError::io(&path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), overlay)?;
        Ok(())
    }

    fn remove(&mut self, coord: HexCoord) -> WorldResult<bool> {
        let path = self.record_path(coord);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| WorldError::io(&path, e))?;
        Ok(true)
    }

    fn list(&self) -> WorldResult<Vec<HexCoord>> {
        let dir = self.world_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut coords = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| WorldError::io(&dir, e))? {
            let path = entry.map_err(|e| WorldError::io(&dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                match HexCoord::from_key(stem) {
                    Ok(coord) => coords.push(coord),
                    Err(_) => warn!("ignoring stray file {}", path.display()),
                }
            }
        }
        coords.sort();
        Ok(coords)
    }
}

impl OverlayStore {
    /// Merge every stored overlay into this store.
    ///
    /// Invalid records are skipped and reported. Listing or IO failures abort
    /// the load before anything is applied.
    pub fn load_from(&mut self, storage: &dyn OverlayStorage) -> WorldResult<LoadReport> {
        let mut report = LoadReport::default();
        let mut loaded = Vec::new();

        for coord in storage.list()? {
            match storage.load(coord) {
                Ok(Some(overlay)) => loaded.push(overlay),
                Ok(None) => {}
                Err(e @ WorldError::Io { .. }) => return Err(e),
                Err(e) => report.skip(coord.key(), e.to_string()),
            }
        }

        report.overlays_loaded = loaded.len();
        for overlay in loaded {
            self.insert(overlay);
        }
        info!("loaded {} overlays ({} skipped)", report.overlays_loaded, report.skipped.len());
        Ok(report)
    }

    /// Write every overlay to storage and remove stored records that no
    /// longer exist in the store. Returns the number written.
    pub fn save_to(&self, storage: &mut dyn OverlayStorage) -> WorldResult<usize> {
        let live: HashSet<HexCoord> = self.iter().map(|o| o.coord).collect();
        for coord in storage.list()? {
            if !live.contains(&coord) {
                storage.remove(coord)?;
            }
        }
        for overlay in self.iter() {
            storage.save(overlay)?;
        }
        info!("saved {} overlays", live.len());
        Ok(live.len())
    }
}
