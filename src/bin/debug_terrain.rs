//! Debug report for terrain and settlement generation around one center

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};

use clap::Parser;
use rayon::prelude::*;

use hexworld::ascii::terrain_char;
use hexworld::settlement::{SettlementGenerator, SettlementType};
use hexworld::terrain::{TerrainGenerator, TerrainType};
use hexworld::{HexCoord, TerrainCell, WorldConfig};

#[derive(Parser, Debug)]
#[command(name = "debug_terrain")]
#[command(about = "Write terrain and settlement statistics for a region")]
struct Args {
    /// World seed
    #[arg(short, long, default_value = "Arden")]
    seed: String,

    /// Region radius around the origin
    #[arg(short, long, default_value = "40")]
    radius: u32,

    /// Output file
    #[arg(short, long, default_value = "terrain_debug.txt")]
    output: String,
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = WorldConfig::new(&args.seed);
    let terrain = TerrainGenerator::new(&config);
    let settlements = SettlementGenerator::new(&config);

    let coords = HexCoord::ORIGIN.spiral(args.radius);
    log::info!("resolving {} hexes for seed {}", coords.len(), config.seed_display());

    let cells: HashMap<HexCoord, TerrainCell> = coords
        .par_iter()
        .map(|&c| (c, terrain.resolve(c)))
        .collect();
    let placed: BTreeMap<HexCoord, SettlementType> = coords
        .par_iter()
        .filter_map(|&c| settlements.resolve(&terrain, c).map(|s| (c, s.kind)))
        .collect();

    let mut file = BufWriter::new(File::create(&args.output)?);
    writeln!(file, "=== TERRAIN DEBUG seed={} radius={} ===", config.seed_display(), args.radius)?;
    writeln!(file, "Hexes: {}", cells.len())?;
    writeln!(file)?;

    // Distribution
    writeln!(file, "TERRAIN DISTRIBUTION:")?;
    for t in TerrainType::ALL {
        let count = cells.values().filter(|c| c.terrain == t).count();
        writeln!(
            file,
            "  {} {:<10} {:>6} ({:>5.1}%)",
            terrain_char(t),
            t.display_name(),
            count,
            100.0 * count as f64 / cells.len() as f64
        )?;
    }
    writeln!(file)?;

    // Clustering: share of neighbors with the same terrain
    writeln!(file, "CLUSTERING (same-terrain neighbor share):")?;
    for t in TerrainType::ALL {
        let mut same = 0usize;
        let mut total = 0usize;
        for cell in cells.values().filter(|c| c.terrain == t) {
            for n in cell.coord.neighbors() {
                if let Some(other) = cells.get(&n) {
                    total += 1;
                    if other.terrain == t {
                        same += 1;
                    }
                }
            }
        }
        if total > 0 {
            writeln!(file, "  {:<10} {:>5.1}%", t.display_name(), 100.0 * same as f64 / total as f64)?;
        }
    }
    writeln!(file)?;

    let desert_by_water = cells
        .values()
        .filter(|c| c.terrain == TerrainType::Desert)
        .filter(|c| c.coord.neighbors().iter().any(|n| terrain.terrain_type(*n) == TerrainType::Water))
        .count();
    writeln!(file, "Desert hexes touching water: {}", desert_by_water)?;

    let mut too_close = 0usize;
    for (coord, kind) in &placed {
        let radius = kind.exclusion_radius();
        if coord
            .spiral(radius.saturating_sub(1))
            .into_iter()
            .any(|other| {
                other != *coord && placed.get(&other).is_some_and(|k| k.exclusion_radius() >= radius)
            })
        {
            too_close += 1;
        }
    }
    writeln!(file, "Settlements inside another's exclusion radius: {}", too_close)?;
    writeln!(file)?;

    writeln!(file, "SETTLEMENTS ({}):", placed.len())?;
    for kind in SettlementType::ALL {
        let count = placed.values().filter(|k| **k == kind).count();
        if count > 0 {
            writeln!(file, "  {} {:<14} {:>4}", kind.map_char(), kind.display_name(), count)?;
        }
    }

    file.flush()?;
    println!("Debug output written to {}", args.output);
    if desert_by_water > 0 || too_close > 0 {
        log::warn!("{} desert/water and {} spacing violations", desert_by_water, too_close);
    }
    Ok(())
}
