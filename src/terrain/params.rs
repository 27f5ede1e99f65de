//! Tunable parameters for the terrain field generator.

use serde::{Deserialize, Serialize};

/// Noise shape and classification thresholds.
///
/// Field values lie in [0, 1] and cluster around 0.5, so the thresholds below
/// read as quantiles of each field rather than physical units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Base frequency of the elevation field (cycles per hex)
    pub elevation_frequency: f64,
    /// Octaves summed for elevation
    pub elevation_octaves: u32,
    /// Base frequency of the moisture field
    pub moisture_frequency: f64,
    /// Octaves summed for moisture
    pub moisture_octaves: u32,
    /// Base frequency of the warmth field
    pub warmth_frequency: f64,
    /// Octaves summed for warmth
    pub warmth_octaves: u32,
    /// Amplitude falloff per octave
    pub persistence: f64,

    /// Elevation at or above which terrain is Mountains
    pub mountain_level: f64,
    /// Elevation at or above which terrain is Hills
    pub hill_level: f64,
    /// Elevation below which wet ground floods
    pub sea_level: f64,
    /// Minimum moisture for lowland to become Water
    pub water_moisture: f64,
    /// Moisture below which warm ground may become Desert
    pub arid_moisture: f64,
    /// Minimum warmth for Desert
    pub desert_warmth: f64,
    /// Moisture at or above which land is Forest
    pub forest_moisture: f64,

    /// Multiplier on every special-feature chance (1.0 = normal)
    pub feature_density: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            elevation_frequency: 0.07,
            elevation_octaves: 4,
            moisture_frequency: 0.09,
            moisture_octaves: 3,
            warmth_frequency: 0.04,
            warmth_octaves: 2,
            persistence: 0.5,
            mountain_level: 0.70,
            hill_level: 0.60,
            sea_level: 0.42,
            water_moisture: 0.48,
            arid_moisture: 0.40,
            desert_warmth: 0.55,
            forest_moisture: 0.56,
            feature_density: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands_are_ordered() {
        let p = TerrainParams::default();
        assert!(p.hill_level < p.mountain_level);
        assert!(p.sea_level < p.hill_level);
        // a dry cell can never also be wet enough to flood
        assert!(p.arid_moisture < p.water_moisture);
        assert!(p.water_moisture < p.forest_moisture);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let p: TerrainParams = serde_json::from_str(r#"{ "mountain_level": 0.75 }"#).unwrap();
        assert_eq!(p.mountain_level, 0.75);
        assert_eq!(p.hill_level, TerrainParams::default().hill_level);
    }
}
