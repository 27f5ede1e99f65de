//! User-authored overlays.
//!
//! An overlay shadows generated content for display and export. The generator
//! never reads it, so editing or deleting an overlay can never change what a
//! hex generates.

use std::collections::{BTreeMap, HashMap};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};
use crate::hex::HexCoord;

/// How thoroughly a hex has been explored. Stored as 0, 1 or 2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ExplorationLevel {
    #[default]
    Unexplored,
    Surface,
    Thorough,
}

impl ExplorationLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            ExplorationLevel::Unexplored => "Unexplored",
            ExplorationLevel::Surface => "Surface",
            ExplorationLevel::Thorough => "Thorough",
        }
    }
}

impl TryFrom<u8> for ExplorationLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(ExplorationLevel::Unexplored),
            1 => Ok(ExplorationLevel::Surface),
            2 => Ok(ExplorationLevel::Thorough),
            other => Err(format!("exploration level {} out of range 0..=2", other)),
        }
    }
}

impl From<ExplorationLevel> for u8 {
    fn from(level: ExplorationLevel) -> u8 {
        match level {
            ExplorationLevel::Unexplored => 0,
            ExplorationLevel::Surface => 1,
            ExplorationLevel::Thorough => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    pub coord: HexCoord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exploration_level: Option<ExplorationLevel>,
    /// RFC 3339 timestamp of the last edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<String>,
}

impl Overlay {
    pub fn new(coord: HexCoord) -> Self {
        Self {
            coord,
            custom_name: None,
            description: None,
            notes: None,
            exploration_level: None,
            last_edited: None,
        }
    }

    /// True when the overlay overrides nothing and need not be stored.
    pub fn is_empty(&self) -> bool {
        self.custom_name.is_none()
            && self.description.is_none()
            && self.notes.is_none()
            && self.exploration_level.is_none()
    }

    /// Merge a patch into this overlay.
    pub fn apply(&mut self, patch: &OverlayPatch) {
        merge_text(&mut self.custom_name, &patch.custom_name);
        merge_text(&mut self.description, &patch.description);
        merge_text(&mut self.notes, &patch.notes);
        if let Some(level) = patch.exploration_level {
            self.exploration_level = level;
        }
    }

    /// Parse and validate a record that came from outside the process.
    ///
    /// The key must parse and name the same hex as the record itself; the
    /// exploration level must be in range.
    pub fn from_record(key: &str, value: serde_json::Value) -> WorldResult<Overlay> {
        let coord = HexCoord::from_key(key)?;
        let overlay: Overlay = serde_json::from_value(value).map_err(|e| WorldError::InvalidRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        if overlay.coord != coord {
            return Err(WorldError::InvalidRecord {
                key: key.to_string(),
                reason: format!("record is for {}", overlay.coord),
            });
        }
        Ok(overlay)
    }
}

/// `None` keeps the current value, an empty string clears it.
fn merge_text(field: &mut Option<String>, update: &Option<String>) {
    if let Some(text) = update {
        *field = if text.is_empty() { None } else { Some(text.clone()) };
    }
}

/// A partial overlay edit. Unset fields leave the stored value alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayPatch {
    pub custom_name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    /// `Some(None)` clears the level
    pub exploration_level: Option<Option<ExplorationLevel>>,
}

impl OverlayPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn exploration(mut self, level: ExplorationLevel) -> Self {
        self.exploration_level = Some(Some(level));
        self
    }

    pub fn clear_exploration(mut self) -> Self {
        self.exploration_level = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &OverlayPatch::default()
    }
}

/// Sparse map of overlays keyed by hex. Edits are visible immediately and
/// never expire.
#[derive(Clone, Debug, Default)]
pub struct OverlayStore {
    overlays: HashMap<HexCoord, Overlay>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: HexCoord) -> Option<&Overlay> {
        self.overlays.get(&coord)
    }

    /// Merge `patch` into the overlay at `coord`, creating it if needed.
    ///
    /// Returns the stored overlay, or `None` if the edit left it empty and it
    /// was removed.
    pub fn put(&mut self, coord: HexCoord, patch: &OverlayPatch) -> Option<&Overlay> {
        let mut overlay = self.overlays.remove(&coord).unwrap_or_else(|| Overlay::new(coord));
        overlay.apply(patch);
        if overlay.is_empty() {
            log::debug!("overlay at {} is empty after edit, removed", coord);
            return None;
        }
        overlay.last_edited = Some(Local::now().to_rfc3339());
        self.overlays.insert(coord, overlay);
        self.overlays.get(&coord)
    }

    pub fn delete(&mut self, coord: HexCoord) -> Option<Overlay> {
        self.overlays.remove(&coord)
    }

    /// Store a complete overlay as-is (used when restoring saved state).
    /// Empty overlays are dropped.
    pub fn insert(&mut self, overlay: Overlay) {
        if overlay.is_empty() {
            self.overlays.remove(&overlay.coord);
        } else {
            self.overlays.insert(overlay.coord, overlay);
        }
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        self.overlays.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.values()
    }

    /// Every overlay, ordered by coordinate.
    pub fn export(&self) -> BTreeMap<HexCoord, Overlay> {
        self.overlays.iter().map(|(c, o)| (*c, o.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let mut store = OverlayStore::new();
        let c = HexCoord::new(3, -1);
        store.put(c, &OverlayPatch::new().name("Thornfield"));
        let overlay = store.get(c).unwrap();
        assert_eq!(overlay.custom_name.as_deref(), Some("Thornfield"));
        assert!(overlay.last_edited.is_some());
    }

    #[test]
    fn test_put_merges_fields() {
        let mut store = OverlayStore::new();
        let c = HexCoord::ORIGIN;
        store.put(c, &OverlayPatch::new().name("Keep"));
        store.put(c, &OverlayPatch::new().notes("bandits"));
        let overlay = store.get(c).unwrap();
        assert_eq!(overlay.custom_name.as_deref(), Some("Keep"));
        assert_eq!(overlay.notes.as_deref(), Some("bandits"));

        store.put(c, &OverlayPatch::new().name("Old Keep"));
        assert_eq!(store.get(c).unwrap().custom_name.as_deref(), Some("Old Keep"));
        assert_eq!(store.get(c).unwrap().notes.as_deref(), Some("bandits"));
    }

    #[test]
    fn test_empty_string_clears_and_empty_overlay_is_removed() {
        let mut store = OverlayStore::new();
        let c = HexCoord::new(1, 1);
        store.put(c, &OverlayPatch::new().name("X"));
        let result = store.put(c, &OverlayPatch::new().name(""));
        assert!(result.is_none());
        assert!(!store.contains(c));
    }

    #[test]
    fn test_empty_patch_creates_nothing() {
        let mut store = OverlayStore::new();
        assert!(OverlayPatch::new().is_empty());
        assert!(store.put(HexCoord::ORIGIN, &OverlayPatch::new()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete() {
        let mut store = OverlayStore::new();
        let c = HexCoord::new(-4, 2);
        store.put(c, &OverlayPatch::new().exploration(ExplorationLevel::Surface));
        assert!(store.delete(c).is_some());
        assert!(store.get(c).is_none());
        assert!(store.delete(c).is_none());
    }

    #[test]
    fn test_exploration_level_can_be_cleared() {
        let mut store = OverlayStore::new();
        let c = HexCoord::new(2, 2);
        store.put(c, &OverlayPatch::new().exploration(ExplorationLevel::Thorough).notes("n"));
        store.put(c, &OverlayPatch::new().clear_exploration());
        assert_eq!(store.get(c).unwrap().exploration_level, None);
    }

    #[test]
    fn test_record_validation() {
        let good = serde_json::json!({
            "coord": { "q": 2, "r": -3 },
            "custom_name": "Mill",
            "exploration_level": 1
        });
        let overlay = Overlay::from_record("+0002_-0003", good.clone()).unwrap();
        assert_eq!(overlay.exploration_level, Some(ExplorationLevel::Surface));

        assert!(matches!(
            Overlay::from_record("+0002_-0004", good),
            Err(WorldError::InvalidRecord { .. })
        ));
        assert!(matches!(
            Overlay::from_record("nonsense", serde_json::json!({})),
            Err(WorldError::InvalidKey(_))
        ));

        let bad_level = serde_json::json!({ "coord": { "q": 0, "r": 0 }, "exploration_level": 7 });
        assert!(matches!(
            Overlay::from_record("+0000_+0000", bad_level),
            Err(WorldError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_export_is_sorted() {
        let mut store = OverlayStore::new();
        for (q, r) in [(3, 0), (-2, 5), (0, 0)] {
            store.put(HexCoord::new(q, r), &OverlayPatch::new().notes("x"));
        }
        let keys: Vec<_> = store.export().into_keys().collect();
        assert_eq!(keys, vec![HexCoord::new(-2, 5), HexCoord::new(0, 0), HexCoord::new(3, 0)]);
    }
}
