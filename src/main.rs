use clap::Parser;
use log::{info, warn};

use hexworld::ascii::{self, AsciiMode};
use hexworld::persistence::{load_snapshot, save_snapshot, WorldSnapshot};
use hexworld::{HexCoord, HexDirection, OverlayPatch, WorldCache, WorldConfig, WorldResult};

#[derive(Parser, Debug)]
#[command(name = "hexworld")]
#[command(about = "Explore a procedurally generated hex world from the terminal")]
struct Args {
    /// World seed: any integer or text (defaults to the config file's seed, then the loaded snapshot's, then random)
    #[arg(short, long)]
    seed: Option<String>,

    /// JSON world configuration
    #[arg(short, long)]
    config: Option<String>,

    /// Starting center as "q,r"
    #[arg(long, default_value = "0,0", allow_hyphen_values = true)]
    center: HexCoord,

    /// Override the active viewport radius
    #[arg(short, long)]
    radius: Option<u32>,

    /// Comma-separated steps to walk before rendering (e.g. "e,e,ne,se")
    #[arg(long, value_delimiter = ',')]
    walk: Vec<HexDirection>,

    /// Map mode: terrain, settlements, elevation or moisture
    #[arg(short, long, default_value = "settlements")]
    mode: AsciiMode,

    /// Restore cache and overlays from a snapshot before exploring
    #[arg(long)]
    load: Option<String>,

    /// Write a snapshot of the session on exit
    #[arg(long)]
    save: Option<String>,

    /// Name the hex at the final center
    #[arg(long)]
    name: Option<String>,

    /// Attach a note to the hex at the final center
    #[arg(long)]
    note: Option<String>,

    /// Export the rendered map and settlement list to a text file
    #[arg(long)]
    export_map: Option<String>,

    /// Use 24-bit ANSI colors
    #[arg(long)]
    color: bool,
}

/// A config file wins, then the loaded snapshot's seed, then a random seed.
/// `--seed` and `--radius` apply on top of whichever was chosen.
fn build_config(args: &Args, snapshot: Option<&WorldSnapshot>) -> WorldResult<WorldConfig> {
    let mut config = match (&args.config, snapshot) {
        (Some(path), _) => WorldConfig::from_json_file(path)?,
        (None, Some(snapshot)) => snapshot.world_config(),
        (None, None) => WorldConfig::from_seed(rand::random()),
    };
    if let Some(seed) = &args.seed {
        config.set_seed(seed);
    }
    if let Some(radius) = args.radius {
        config.viewport.active_radius = radius;
    }
    Ok(config)
}

fn run(args: Args) -> WorldResult<()> {
    let loaded = match &args.load {
        Some(path) => Some((path, load_snapshot(path)?)),
        None => None,
    };
    let config = build_config(&args, loaded.as_ref().map(|(_, snapshot)| snapshot))?;
    println!("World seed: {}", config.seed_display());

    let mut cache = WorldCache::new(config);

    if let Some((path, snapshot)) = &loaded {
        let report = cache.bulk_load(snapshot)?;
        if !report.is_clean() {
            warn!("snapshot {} loaded with problems", path);
        }
        println!("Loaded {}: {}", path, report.summary());
    } else {
        cache.move_center(args.center);
    }

    for step in &args.walk {
        let next = cache.center().neighbor(*step);
        let report = cache.move_center(next);
        info!(
            "step {} -> {}: preloaded {}, evicted {}",
            step.label(),
            report.to,
            report.preloaded,
            report.evicted
        );
    }

    let center = cache.center();
    let mut patch = OverlayPatch::new();
    if let Some(name) = &args.name {
        patch = patch.name(name.clone());
    }
    if let Some(note) = &args.note {
        patch = patch.notes(note.clone());
    }
    if !patch.is_empty() {
        cache.put_overlay(center, &patch);
    }

    let radius = cache.config().viewport.active_radius;
    let cells = cache.visible_cells();
    let map = if args.color {
        ascii::render_colored_hex_map(&cells, center, radius, args.mode)
    } else {
        ascii::render_hex_map(&cells, center, radius, args.mode)
    };
    println!();
    println!("{}", map);
    println!("{}", ascii::terrain_legend());

    println!("Center {}: {}", center, cache.display_name(center));
    println!("  {}", cache.display_description(center));
    let settlements = cells.iter().filter(|e| e.settlement.is_some()).count();
    println!("Settlements in view: {}", settlements);
    println!("Cache: {}", cache.stats().summary());

    if let Some(path) = &args.export_map {
        ascii::export_map_file(&mut cache, path, args.mode)?;
        println!("Map exported to: {}", path);
    }

    if let Some(path) = &args.save {
        let snapshot = cache.snapshot()?;
        save_snapshot(path, &snapshot)?;
        println!("Snapshot saved to: {}", path);
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
