//! ASCII rendering and export for hex maps
//!
//! Rows follow the axial `r` axis; each row is shifted half a cell per step so
//! the hexes interlock. Every cell takes two columns.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::error::{WorldError, WorldResult};
use crate::hex::HexCoord;
use crate::terrain::TerrainType;
use crate::viewport::{CacheEntry, WorldCache};

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Terrain characters only
    Terrain,
    /// Settlement markers over terrain
    Settlements,
    /// Elevation gradient
    Elevation,
    /// Moisture gradient
    Moisture,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Terrain => "Terrain",
            AsciiMode::Settlements => "Settlements",
            AsciiMode::Elevation => "Elevation",
            AsciiMode::Moisture => "Moisture",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[
            AsciiMode::Terrain,
            AsciiMode::Settlements,
            AsciiMode::Elevation,
            AsciiMode::Moisture,
        ]
    }
}

impl std::str::FromStr for AsciiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AsciiMode::all()
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown map mode '{}'", s))
    }
}

/// Get ASCII character for a terrain
pub fn terrain_char(terrain: TerrainType) -> char {
    match terrain {
        TerrainType::Plains => '.',
        TerrainType::Forest => 'T',
        TerrainType::Hills => 'n',
        TerrainType::Mountains => '^',
        TerrainType::Water => '~',
        TerrainType::Desert => ':',
    }
}

/// Get ASCII character for elevation (0.0 to 1.0)
pub fn elevation_char(elevation: f64) -> char {
    const CHARS: &[char] = &['_', '.', '-', '=', '+', '*', '#', '%', '^', 'A'];
    let idx = (elevation.clamp(0.0, 1.0) * (CHARS.len() - 1) as f64) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Get ASCII character for moisture (0.0 to 1.0)
pub fn moisture_char(moisture: f64) -> char {
    const CHARS: &[char] = &['_', '.', '-', ':', ';', '=', '+', '#', '%', '~'];
    let idx = (moisture.clamp(0.0, 1.0) * (CHARS.len() - 1) as f64) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Character shown for one cache entry.
pub fn cell_char(entry: &CacheEntry, mode: AsciiMode) -> char {
    match mode {
        AsciiMode::Terrain => terrain_char(entry.terrain.terrain),
        AsciiMode::Settlements => {
            if entry.overlay.as_ref().is_some_and(|o| o.custom_name.is_some()) {
                '*'
            } else if let Some(settlement) = &entry.settlement {
                settlement.kind.map_char()
            } else {
                terrain_char(entry.terrain.terrain)
            }
        }
        AsciiMode::Elevation => elevation_char(entry.terrain.elevation),
        AsciiMode::Moisture => moisture_char(entry.terrain.moisture),
    }
}

/// Column and row of a hex within a map of `radius` around `center`.
fn grid_position(coord: HexCoord, center: HexCoord, radius: u32) -> (usize, usize) {
    let dq = coord.q as i64 - center.q as i64;
    let dr = coord.r as i64 - center.r as i64;
    let radius = radius as i64;
    let col = 2 * dq + dr + 2 * radius;
    let row = dr + radius;
    (col.max(0) as usize, row.max(0) as usize)
}

/// Lay out cells on a character grid. Cells outside `radius` are ignored.
fn layout<T: Clone>(
    cells: &[CacheEntry],
    center: HexCoord,
    radius: u32,
    blank: T,
    paint: impl Fn(&CacheEntry) -> T,
) -> Vec<Vec<T>> {
    let size = 2 * radius as usize + 1;
    let width = 4 * radius as usize + 1;
    let mut grid = vec![vec![blank; width]; size];
    for entry in cells.iter().filter(|e| e.coord.distance(&center) <= radius) {
        let (col, row) = grid_position(entry.coord, center, radius);
        if let Some(slot) = grid.get_mut(row).and_then(|line| line.get_mut(col)) {
            *slot = paint(entry);
        }
    }
    grid
}

/// Render cells as plain ASCII.
pub fn render_hex_map(cells: &[CacheEntry], center: HexCoord, radius: u32, mode: AsciiMode) -> String {
    let grid = layout(cells, center, radius, ' ', |e| cell_char(e, mode));
    let mut result = String::with_capacity(grid.len() * (grid.first().map_or(0, Vec::len) + 1));
    for line in grid {
        let text: String = line.into_iter().collect();
        result.push_str(text.trim_end());
        result.push('\n');
    }
    result
}

/// Render cells with 24-bit ANSI colors (terrain color as background).
pub fn render_colored_hex_map(
    cells: &[CacheEntry],
    center: HexCoord,
    radius: u32,
    mode: AsciiMode,
) -> String {
    let grid = layout(cells, center, radius, None, |e| Some((cell_char(e, mode), e.terrain.terrain)));
    let mut result = String::new();
    for line in grid {
        for slot in line {
            match slot {
                Some((ch, terrain)) => {
                    let bg = terrain.color();
                    result.push_str(&ansi_colored_char(ch, contrast(bg), bg));
                }
                None => result.push(' '),
            }
        }
        result.push_str("\x1b[0m\n");
    }
    result
}

/// Black or white, whichever reads better on `bg`.
fn contrast(bg: (u8, u8, u8)) -> (u8, u8, u8) {
    let luma = 0.299 * bg.0 as f32 + 0.587 * bg.1 as f32 + 0.114 * bg.2 as f32;
    if luma > 140.0 {
        (20, 20, 20)
    } else {
        (240, 240, 240)
    }
}

/// Format a character with ANSI true color (24-bit) - foreground and background
pub fn ansi_colored_char(ch: char, fg: (u8, u8, u8), bg: (u8, u8, u8)) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.0, fg.1, fg.2,
        bg.0, bg.1, bg.2,
        ch
    )
}

/// Generate legend for terrain and settlement characters
pub fn terrain_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== LEGEND ===\n");
    legend.push_str("TERRAIN:\n");
    legend.push_str("  . Plains   T Forest   n Hills   ^ Mountains   ~ Water   : Desert\n");
    legend.push_str("SETTLEMENTS:\n");
    legend.push_str("  f Farmstead   h Hamlet   v Village   t Town   C City\n");
    legend.push_str("  l Logging     m Mining   M Monastery w Watchtower x Ruins\n");
    legend.push_str("  * Named by hand\n");
    legend
}

/// Write the visible window, a legend and the settlement list to a text file.
pub fn export_map_file(cache: &mut WorldCache, path: impl AsRef<Path>, mode: AsciiMode) -> WorldResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| WorldError::io(path, e))?;
    let mut out = BufWriter::new(file);

    let cells = cache.visible_cells();
    let center = cache.center();
    let radius = cache.config().viewport.active_radius;
    let seed = cache.config().seed_display();

    let write = |out: &mut BufWriter<File>, text: String| -> WorldResult<()> {
        out.write_all(text.as_bytes()).map_err(|e| WorldError::io(path, e))
    };

    write(&mut out, "=== HEXWORLD MAP ===\n".to_string())?;
    write(&mut out, format!("Seed: {}\n", seed))?;
    write(&mut out, format!("Center: {} | Radius: {} | Mode: {}\n", center, radius, mode.name()))?;
    write(&mut out, format!("Generated: {}\n\n", Local::now().format("%Y-%m-%d %H:%M:%S")))?;
    write(&mut out, render_hex_map(&cells, center, radius, mode))?;
    write(&mut out, format!("\n{}\n", terrain_legend()))?;

    write(&mut out, "=== SETTLEMENTS ===\n".to_string())?;
    for entry in &cells {
        if let Some(settlement) = &entry.settlement {
            write(&mut out, format!("  {:>12}  {}\n", entry.coord.to_string(), settlement.summary()))?;
        }
    }
    out.flush().map_err(|e| WorldError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::viewport::ViewportConfig;

    fn cache() -> WorldCache {
        let mut config = WorldConfig::new("Arden");
        config.viewport = ViewportConfig {
            active_radius: 3,
            buffer_radius: 1,
            evict_margin: 1,
            parallel_preload: false,
        };
        WorldCache::with_center(config, HexCoord::ORIGIN)
    }

    #[test]
    fn test_map_shape() {
        let mut cache = cache();
        let cells = cache.visible_cells();
        let map = render_hex_map(&cells, HexCoord::ORIGIN, 3, AsciiMode::Terrain);
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines.len(), 7);
        let painted: usize = lines.iter().map(|l| l.chars().filter(|c| *c != ' ').count()).sum();
        assert_eq!(painted, cells.len());
        // middle row holds the center, which is a mountain for this seed
        assert_eq!(lines[3].chars().nth(6), Some('^'));
    }

    #[test]
    fn test_settlement_markers_differ_from_terrain() {
        use crate::settlement::SettlementType;
        use crate::terrain::TerrainType;

        let terrain: Vec<char> = TerrainType::ALL.iter().map(|&t| terrain_char(t)).collect();
        for kind in SettlementType::ALL {
            let marker = kind.map_char();
            assert!(!terrain.contains(&marker), "{:?} drawn as terrain {}", kind, marker);
            assert_ne!(marker, '*');
            assert!(terrain_legend().contains(&format!("{} ", marker)), "{:?} missing from legend", kind);
        }
        assert!(!terrain.contains(&'*'));
    }

    #[test]
    fn test_grid_positions_are_unique() {
        let center = HexCoord::new(4, -9);
        let mut seen = std::collections::HashSet::new();
        for coord in center.spiral(5) {
            assert!(seen.insert(grid_position(coord, center, 5)));
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("terrain".parse::<AsciiMode>(), Ok(AsciiMode::Terrain));
        assert_eq!("SETTLEMENTS".parse::<AsciiMode>(), Ok(AsciiMode::Settlements));
        assert!("plates".parse::<AsciiMode>().is_err());
    }

    #[test]
    fn test_gradient_chars_clamp() {
        assert_eq!(elevation_char(-1.0), '_');
        assert_eq!(elevation_char(2.0), 'A');
        assert_eq!(moisture_char(0.0), '_');
    }

    #[test]
    fn test_export_map_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.txt");
        let mut cache = cache();
        export_map_file(&mut cache, &path, AsciiMode::Settlements).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("=== HEXWORLD MAP ==="));
        assert!(text.contains("Arden"));
        assert!(text.contains("=== SETTLEMENTS ==="));
    }

    #[test]
    fn test_colored_map_has_escape_codes() {
        let mut cache = cache();
        let cells = cache.visible_cells();
        let map = render_colored_hex_map(&cells, HexCoord::ORIGIN, 3, AsciiMode::Terrain);
        assert!(map.contains("\x1b[48;2;"));
    }
}
