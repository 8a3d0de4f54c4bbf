use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::thread;

use strata_chunk::WorldHeight;
use strata_world::WorldGenConfig;

/// Whole configuration file: `[world]`, `[store]`, and the worldgen
/// sections (`[terrain]`, `[climate]`, `[trees]`) at top level.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StrataConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(flatten)]
    pub worldgen: WorldGenConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Seed for a new world. Ignored once `world.dat` exists; a clock-derived
    /// seed is used when absent.
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default = "default_min_y")]
    pub min_y: i32,
    #[serde(default = "default_max_y")]
    pub max_y: i32,
}
fn default_name() -> String {
    "world".into()
}
fn default_min_y() -> i32 {
    0
}
fn default_max_y() -> i32 {
    255
}
impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            seed: None,
            min_y: default_min_y(),
            max_y: default_max_y(),
        }
    }
}

impl WorldConfig {
    pub fn height(&self) -> WorldHeight {
        WorldHeight::new(self.min_y.min(self.max_y), self.max_y.max(self.min_y))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_max_loaded")]
    pub max_loaded_chunks: usize,
    #[serde(default = "default_autosave")]
    pub autosave_interval_ticks: u64,
    /// Background generation threads; 0 picks one less than the core count.
    #[serde(default)]
    pub generation_workers: usize,
    #[serde(default = "default_population_budget")]
    pub population_budget_per_tick: usize,
}
fn default_max_loaded() -> usize {
    1024
}
fn default_autosave() -> u64 {
    6000
}
fn default_population_budget() -> usize {
    4
}
impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_loaded_chunks: default_max_loaded(),
            autosave_interval_ticks: default_autosave(),
            generation_workers: 0,
            population_budget_per_tick: default_population_budget(),
        }
    }
}

impl StoreConfig {
    pub fn worker_threads(&self) -> usize {
        if self.generation_workers > 0 {
            return self.generation_workers;
        }
        thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1))
            .unwrap_or(2)
            .max(1)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<StrataConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: StrataConfig = toml::from_str(&s)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg: StrataConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.world.name, "world");
        assert_eq!(cfg.world.seed, None);
        assert_eq!(cfg.world.height(), WorldHeight::default());
        assert_eq!(cfg.store.max_loaded_chunks, 1024);
        assert_eq!(cfg.store.autosave_interval_ticks, 6000);
        assert_eq!(cfg.store.population_budget_per_tick, 4);
        assert!(cfg.store.worker_threads() >= 1);
        assert_eq!(cfg.worldgen.terrain.max_height, 110);
    }

    #[test]
    fn sections_parse_side_by_side() {
        let cfg: StrataConfig = toml::from_str(
            r#"
[world]
name = "alpha"
seed = -99
min_y = -64
max_y = 319

[store]
max_loaded_chunks = 64
generation_workers = 3

[terrain]
min_height = 50
smooth = false

[climate]
humidity_wavelength = 200.0
"#,
        )
        .unwrap();
        assert_eq!(cfg.world.name, "alpha");
        assert_eq!(cfg.world.seed, Some(-99));
        assert_eq!(cfg.world.height(), WorldHeight::new(-64, 319));
        assert_eq!(cfg.store.max_loaded_chunks, 64);
        assert_eq!(cfg.store.worker_threads(), 3);
        assert_eq!(cfg.store.autosave_interval_ticks, 6000);
        assert_eq!(cfg.worldgen.terrain.min_height, 50);
        assert!(!cfg.worldgen.terrain.smooth);
        assert_eq!(cfg.worldgen.climate.humidity_wavelength, 200.0);
        assert_eq!(cfg.worldgen.trees.trunk_max, 6);
    }
}
