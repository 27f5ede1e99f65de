//! World configuration.
//!
//! Built once at startup and handed to every component by reference. Nothing
//! in the crate reads configuration from global state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};
use crate::seeds::{numeric_seed, resolve_seed, WorldSeeds};
use crate::settlement::SettlementParams;
use crate::terrain::TerrainParams;
use crate::viewport::ViewportConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct WorldConfig {
    /// Resolved master seed. A JSON config may give a number or any string.
    pub seed: u64,
    /// The text the seed was resolved from, when it was not a plain number.
    pub seed_label: Option<String>,
    pub terrain: TerrainParams,
    pub settlements: SettlementParams,
    pub viewport: ViewportConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            seed_label: None,
            terrain: TerrainParams::default(),
            settlements: SettlementParams::default(),
            viewport: ViewportConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Default configuration for a seed given as text ("Arden", "42", "-7").
    pub fn new(seed_input: &str) -> Self {
        let mut config = Self::default();
        config.set_seed(seed_input);
        config
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn set_seed(&mut self, seed_input: &str) {
        self.seed = resolve_seed(seed_input);
        self.seed_label = match numeric_seed(seed_input) {
            Some(_) => None,
            None => Some(seed_input.trim().to_string()),
        };
    }

    pub fn seeds(&self) -> WorldSeeds {
        WorldSeeds::from_master(self.seed)
    }

    /// Human-readable seed: the text it was typed as, if any.
    pub fn seed_display(&self) -> String {
        match &self.seed_label {
            Some(label) => format!("\"{}\" ({})", label, self.seed),
            None => self.seed.to_string(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| WorldError::io(path, e))?;
        let config: WorldConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn save_json_file(&self, path: impl AsRef<Path>) -> WorldResult<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| WorldError::io(path, e))
    }
}

/// On-disk form of `WorldConfig`: the seed may be a number or any string,
/// and every field may be left out.
#[derive(Deserialize)]
#[serde(default)]
struct ConfigFile {
    seed: SeedInput,
    seed_label: Option<String>,
    terrain: TerrainParams,
    settlements: SettlementParams,
    viewport: ViewportConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let defaults = WorldConfig::default();
        Self {
            seed: SeedInput::Unsigned(defaults.seed),
            seed_label: defaults.seed_label,
            terrain: defaults.terrain,
            settlements: defaults.settlements,
            viewport: defaults.viewport,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeedInput {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl From<ConfigFile> for WorldConfig {
    fn from(file: ConfigFile) -> Self {
        let mut config = WorldConfig {
            seed: 0,
            seed_label: file.seed_label,
            terrain: file.terrain,
            settlements: file.settlements,
            viewport: file.viewport,
        };
        match file.seed {
            SeedInput::Unsigned(value) => config.seed = value,
            SeedInput::Signed(value) => config.seed = value as u64,
            // text seeds carry their own label unless they are just a number
            SeedInput::Text(text) => {
                let label = config.seed_label.take();
                config.set_seed(&text);
                config.seed_label = config.seed_label.take().or(label);
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_seed_keeps_label() {
        let config = WorldConfig::new("Arden");
        assert_eq!(config.seed, resolve_seed("Arden"));
        assert_eq!(config.seed_label.as_deref(), Some("Arden"));

        assert_eq!(WorldConfig::new("  Arden "), config);

        let numeric = WorldConfig::new("42");
        assert_eq!(numeric.seed, 42);
        assert!(numeric.seed_label.is_none());
        assert_eq!(numeric.seed_display(), "42");
    }

    #[test]
    fn test_json_seed_forms() {
        let a: WorldConfig = serde_json::from_str(r#"{ "seed": 42 }"#).unwrap();
        let b: WorldConfig = serde_json::from_str(r#"{ "seed": "Arden" }"#).unwrap();
        let c: WorldConfig = serde_json::from_str(r#"{ "seed": -1 }"#).unwrap();
        assert_eq!(a.seed, 42);
        assert_eq!(b.seed, resolve_seed("Arden"));
        assert_eq!(c.seed, u64::MAX);
        assert_eq!(a.viewport, ViewportConfig::default());
        assert!(a.seed_label.is_none());
    }

    #[test]
    fn test_json_text_seed_sets_label() {
        let config: WorldConfig = serde_json::from_str(r#"{ "seed": " Arden " }"#).unwrap();
        assert_eq!(config, WorldConfig::new("Arden"));
        assert_eq!(config.seed_display(), format!("\"Arden\" ({})", resolve_seed("Arden")));

        let quoted_number: WorldConfig = serde_json::from_str(r#"{ "seed": "42" }"#).unwrap();
        assert_eq!(quoted_number.seed, 42);
        assert!(quoted_number.seed_label.is_none());

        let empty: WorldConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, WorldConfig::default());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        let mut config = WorldConfig::new("Arden");
        config.viewport.active_radius = 8;
        config.settlements.density = 0.5;
        config.save_json_file(&path).unwrap();

        let loaded = WorldConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = WorldConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, WorldError::Io { .. }));
    }
}
