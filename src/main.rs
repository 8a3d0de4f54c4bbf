use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use strata_blocks::block_name;
use strata_runtime::{StrataConfig, WorldStore, load_config_from_path};

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Chunked voxel world storage and terrain generation")]
struct Cli {
    /// World directory; created when missing.
    #[arg(long, default_value = "world")]
    world: PathBuf,
    /// TOML file with [world], [store], [terrain], [climate], [trees].
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for a new world. Ignored once the world exists.
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and populate every column within `radius` of spawn, then save.
    Pregen {
        #[arg(long, default_value_t = 4)]
        radius: i32,
    },
    /// Stream columns around spawn through the background workers.
    Run {
        #[arg(long, default_value_t = 4)]
        radius: i32,
        #[arg(long, default_value_t = 200)]
        ticks: u64,
    },
    /// Print world metadata.
    Info,
    /// Summarise one column, generating it in memory when absent.
    Inspect {
        #[arg(long, allow_negative_numbers = true)]
        x: i32,
        #[arg(long, allow_negative_numbers = true)]
        z: i32,
    },
}

const TICK: Duration = Duration::from_millis(50);

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path)?,
        None => StrataConfig::default(),
    };
    if cli.seed.is_some() {
        config.world.seed = cli.seed;
    }
    let store = WorldStore::open(&cli.world, &config)?;

    match cli.command {
        Command::Pregen { radius } => pregen(&store, radius),
        Command::Run { radius, ticks } => run(&store, radius, ticks),
        Command::Info => info(&store),
        Command::Inspect { x, z } => inspect(&store, x, z),
    }
    Ok(())
}

fn spawn_column(store: &WorldStore) -> (i32, i32) {
    let info = store.get_world_info();
    (info.spawn_x >> 4, info.spawn_z >> 4)
}

fn pregen(store: &WorldStore, radius: i32) {
    let (cx, cz) = spawn_column(store);
    let radius = radius.max(0);
    // One extra ring so every column inside the radius can be populated.
    for dz in -radius - 1..=radius + 1 {
        for dx in -radius - 1..=radius + 1 {
            store.generate_chunk(cx + dx, cz + dz);
        }
    }
    let mut populated = 0;
    for dz in -radius..=radius {
        for dx in -radius..=radius {
            if store.populate_chunk(cx + dx, cz + dz) {
                populated += 1;
            }
        }
    }
    let saved = store.save_all();
    log::info!("pregen: {populated} columns populated, {saved} saved");
    log::info!("{:?}", store.stats());
}

fn run(store: &WorldStore, radius: i32, ticks: u64) {
    let (cx, cz) = spawn_column(store);
    let start = store.get_world_info().time;
    for dz in -radius..=radius {
        for dx in -radius..=radius {
            store.queue_population(cx + dx, cz + dz);
        }
    }
    for tick in start + 1..=start + ticks {
        let report = store.update(tick);
        if report.integrated > 0 || report.populated > 0 {
            log::debug!("tick {tick}: {report:?}");
        }
        thread::sleep(TICK);
    }
    let saved = store.save_all();
    log::info!("ran {ticks} ticks, {saved} columns saved");
    log::info!("{:?}", store.stats());
}

fn info(store: &WorldStore) {
    let info = store.get_world_info();
    let height = store.world_height();
    println!("name:   {}", info.name);
    println!("seed:   {}", info.seed);
    println!("time:   {}", info.time);
    println!("spawn:  {} {} {}", info.spawn_x, info.spawn_y, info.spawn_z);
    println!("height: {}..={}", height.min_y, height.max_y);
}

fn inspect(store: &WorldStore, x: i32, z: i32) {
    let Some(handle) = store.get_chunk(x, z, true) else {
        return;
    };
    let column = handle.read().unwrap_or_else(|e| e.into_inner());
    let heights = column.height_map();
    let (lo, hi) = heights
        .iter()
        .fold((i32::MAX, i32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)));
    let mut biomes: BTreeMap<&str, usize> = BTreeMap::new();
    for bz in 0..16 {
        for bx in 0..16 {
            *biomes.entry(column.biome_at(bx, bz).name()).or_default() += 1;
        }
    }
    println!("column ({x}, {z})");
    println!("  generated {} populated {} modified {}", column.is_generated(), column.is_populated(), column.is_modified());
    println!("  surface {lo}..={hi}, top at (8, 8): {}", block_name(column.get_block(8, column.height_at(8, 8), 8)));
    println!("  sections {}", column.sections().filter(|s| !s.is_empty()).count());
    for (name, count) in biomes {
        println!("  {name:<13} {count}");
    }
}
