//! World cache (viewport)
//!
//! Keeps a bounded window of resolved hexes around a moving center. Everything
//! in the window is re-derivable, so eviction simply drops entries.

pub mod cache;

use serde::{Deserialize, Serialize};

pub use cache::{CacheEntry, CacheStats, MoveReport, WorldCache};

/// Window sizes, in hexes from the center.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Radius returned by `visible_cells`
    pub active_radius: u32,
    /// Extra rings preloaded beyond the active radius
    pub buffer_radius: u32,
    /// Extra rings kept before eviction, so small back-and-forth moves do not
    /// thrash the boundary
    pub evict_margin: u32,
    /// Generate preloaded hexes on the rayon pool
    pub parallel_preload: bool,
}

impl ViewportConfig {
    /// Radius that is resolved eagerly around the center.
    pub fn preload_radius(&self) -> u32 {
        self.active_radius.saturating_add(self.buffer_radius)
    }

    /// Entries farther than this from the center are evicted.
    pub fn evict_radius(&self) -> u32 {
        self.preload_radius().saturating_add(self.evict_margin)
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            active_radius: 15,
            buffer_radius: 5,
            evict_margin: 3,
            parallel_preload: true,
        }
    }
}
