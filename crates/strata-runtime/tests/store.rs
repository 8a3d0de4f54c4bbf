use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use strata_blocks::types::{AIR, GOLD_ORE, STONE};
use strata_chunk::ChunkPos;
use strata_io::paths::column_path;
use strata_runtime::{StrataConfig, WorldStore};

fn config(seed: i64) -> StrataConfig {
    let mut cfg = StrataConfig::default();
    cfg.world.name = "test".into();
    cfg.world.seed = Some(seed);
    cfg.store.generation_workers = 2;
    cfg
}

fn open(dir: &Path, cfg: &StrataConfig) -> WorldStore {
    WorldStore::open(dir, cfg).unwrap()
}

fn chunk_files(dir: &Path) -> usize {
    fn walk(p: &Path) -> usize {
        fs::read_dir(p)
            .map(|entries| {
                entries
                    .flatten()
                    .map(|e| {
                        let path = e.path();
                        if path.is_dir() { walk(&path) } else { 1 }
                    })
                    .sum()
            })
            .unwrap_or(0)
    }
    walk(&dir.join("chunks"))
}

fn pump_until(store: &WorldStore, mut done: impl FnMut(&WorldStore) -> bool) -> bool {
    for tick in 1..=500 {
        store.update(tick);
        if done(store) {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn fresh_world_reads_air_without_generating() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), &config(1));
    assert_eq!(store.get_block(0, 64, 0), AIR);
    assert_eq!(store.get_loaded_chunk_count(), 0);
    assert!(store.get_chunk(0, 0, false).is_none());
    assert_eq!(chunk_files(dir.path()), 0);
    assert!(dir.path().join("world.dat").is_file());

    let info = store.get_world_info();
    assert_eq!(info.seed, 1);
    assert_eq!(info.name, "test");
    assert_eq!(info.spawn(), (0, 64, 0));
}

#[test]
fn set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), &config(2));
    assert!(store.set_block(-17, 70, 33, STONE));
    assert_eq!(store.get_block(-17, 70, 33), STONE);
    let handle = store.get_chunk(-2, 2, false).unwrap();
    let column = handle.read().unwrap();
    assert!(column.is_generated());
    assert!(column.is_modified());
    assert_eq!(column.get_block(15, 70, 1), STONE);

    assert!(!store.set_block(0, 256, 0, STONE));
    assert!(!store.set_block(0, -1, 0, STONE));
}

#[test]
fn repeated_get_chunk_returns_same_handle() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), &config(3));
    let a = store.get_chunk(4, -4, true).unwrap();
    let b = store.get_chunk(4, -4, true).unwrap();
    let c = store.get_chunk(4, -4, false).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &c));
    let stats = store.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.generations, 1);
    assert_eq!(store.get_loaded_chunk_count(), 1);
}

#[test]
fn saved_columns_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let before = {
        let store = open(dir.path(), &config(4));
        assert!(store.set_block(100, 80, -100, GOLD_ORE));
        store.update(1234);
        store.set_spawn(5, 90, -5);
        assert_eq!(store.save_all(), 1);
        let handle = store.get_chunk(6, -7, false).unwrap();
        let column = handle.read().unwrap();
        assert!(!column.is_modified());
        column.to_record()
    };

    let store = open(dir.path(), &config(999));
    let info = store.get_world_info();
    assert_eq!(info.seed, 4);
    assert_eq!(info.time, 1234);
    assert_eq!(info.spawn(), (5, 90, -5));

    let handle = store.get_chunk(6, -7, false).unwrap();
    let column = handle.read().unwrap();
    assert!(!column.is_modified());
    assert_eq!(column.to_record(), before);
    drop(column);
    assert_eq!(store.get_block(100, 80, -100), GOLD_ORE);
    assert_eq!(store.stats().loads, 1);
}

#[test]
fn unsaved_edits_are_not_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open(dir.path(), &config(5));
        store.set_block(0, 200, 0, STONE);
    }
    let store = open(dir.path(), &config(5));
    assert!(store.get_chunk(0, 0, false).is_none());
    assert_eq!(store.get_block_or_generate(0, 200, 0), AIR);
}

#[test]
fn population_waits_for_neighbourhood() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), &config(6));
    assert!(!store.populate_chunk(0, 0));

    store.generate_chunk(0, 0);
    assert!(!store.are_surrounding_chunks_generated(0, 0, 1));
    assert!(!store.populate_chunk(0, 0));

    for dz in -1..=1 {
        for dx in -1..=1 {
            store.generate_chunk(dx, dz);
        }
    }
    assert!(store.are_surrounding_chunks_generated(0, 0, 1));
    assert!(store.populate_chunk(0, 0));
    assert!(store.get_chunk(0, 0, false).unwrap().read().unwrap().is_populated());
    assert!(!store.populate_chunk(0, 0));
}

#[test]
fn neighbourhood_check_sees_disk_without_loading() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open(dir.path(), &config(7));
        for dz in -1..=1 {
            for dx in -1..=1 {
                store.generate_chunk(dx, dz);
            }
        }
        assert_eq!(store.save_all(), 9);
    }
    let store = open(dir.path(), &config(7));
    assert!(store.are_surrounding_chunks_generated(0, 0, 1));
    assert!(!store.are_surrounding_chunks_generated(0, 0, 2));
    assert_eq!(store.get_loaded_chunk_count(), 0);
}

#[test]
fn eviction_drops_a_tenth_oldest_and_saves_them() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(8);
    cfg.store.max_loaded_chunks = 10;
    let store = open(dir.path(), &cfg);
    for x in 0..10 {
        store.get_chunk(x, 0, true).unwrap();
    }
    assert_eq!(store.get_loaded_chunk_count(), 10);
    assert_eq!(store.stats().evictions, 0);

    assert!(store.touch_chunk(0, 0));
    store.get_chunk(10, 0, true).unwrap();

    // 11 resident, so ceil(11 / 10) = 2 go: columns 1 and 2.
    assert_eq!(store.get_loaded_chunk_count(), 9);
    assert!(store.is_chunk_loaded(0, 0));
    assert!(!store.is_chunk_loaded(1, 0));
    assert!(!store.is_chunk_loaded(2, 0));
    assert!(store.is_chunk_loaded(10, 0));
    let stats = store.stats();
    assert_eq!(stats.evictions, 2);
    assert_eq!(stats.saves, 2);
    assert!(dir.path().join(column_path(ChunkPos::new(1, 0))).is_file());
    assert!(dir.path().join(column_path(ChunkPos::new(2, 0))).is_file());
    assert!(!dir.path().join(column_path(ChunkPos::new(3, 0))).exists());

    let back = store.get_chunk(1, 0, false).unwrap();
    assert!(!back.read().unwrap().is_modified());
    assert_eq!(store.stats().loads, 1);
}

#[test]
fn generation_is_stable_across_stores() {
    let (a_dir, b_dir) = (tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap());
    let a = open(a_dir.path(), &config(9));
    let b = open(b_dir.path(), &config(9));
    for (x, z) in [(0, 0), (-7, 12), (40, -3)] {
        let ra = a.generate_chunk(x, z).read().unwrap().to_record();
        let rb = b.generate_chunk(x, z).read().unwrap().to_record();
        assert_eq!(ra, rb);
    }
}

#[test]
fn corrupt_column_is_regenerated() {
    let dir = tempfile::tempdir().unwrap();
    let reference = {
        let other = tempfile::tempdir().unwrap();
        let store = open(other.path(), &config(10));
        let record = store.generate_chunk(1, 1).read().unwrap().to_record();
        record
    };

    let path = dir.path().join(column_path(ChunkPos::new(1, 1)));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"\x00\x01garbage").unwrap();

    let store = open(dir.path(), &config(10));
    assert!(store.get_chunk(1, 1, false).is_none());
    let handle = store.get_chunk(1, 1, true).unwrap();
    assert_eq!(handle.read().unwrap().to_record(), reference);
}

#[test]
fn corrupt_world_info_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("world.dat"), b"nonsense").unwrap();
    {
        let store = open(dir.path(), &config(77));
        let info = store.get_world_info();
        assert_eq!(info.seed, 77);
        assert_eq!(info.name, "test");
        assert_eq!(info.time, 0);
    }
    let store = open(dir.path(), &config(1));
    assert_eq!(store.get_world_info().seed, 77);
}

#[test]
fn requested_chunk_arrives_on_update() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), &config(11));
    assert!(store.request_chunk(20, 20));
    assert!(!store.request_chunk(20, 20));
    assert!(!store.is_chunk_loaded(20, 20));

    assert!(pump_until(&store, |s| s.is_chunk_loaded(20, 20)));
    assert_eq!(store.stats().in_flight, 0);
    assert!(store.get_chunk(20, 20, false).unwrap().read().unwrap().is_generated());
    assert!(!store.request_chunk(20, 20));
}

#[test]
fn synchronous_load_supersedes_background_job() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), &config(12));
    store.request_chunk(30, 30);
    let first = store.get_chunk(30, 30, true).unwrap();
    for tick in 1..=20 {
        store.update(tick);
        thread::sleep(Duration::from_millis(5));
    }
    let again = store.get_chunk(30, 30, false).unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(store.get_loaded_chunk_count(), 1);
    assert_eq!(store.stats().in_flight, 0);
}

#[test]
fn queued_population_runs_when_ready() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), &config(13));
    for dz in -1..=1 {
        for dx in -1..=1 {
            store.generate_chunk(dx, dz);
        }
    }
    store.queue_population(0, 0);
    store.queue_population(0, 0);
    assert_eq!(store.stats().pending_population, 1);
    let report = store.update(1);
    assert_eq!(report.populated, 1);
    assert_eq!(store.stats().pending_population, 0);
}

#[test]
fn queued_population_pulls_in_missing_neighbours() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), &config(14));
    store.queue_population(50, 50);
    assert!(pump_until(&store, |s| {
        s.get_chunk(50, 50, false)
            .is_some_and(|h| h.read().unwrap().is_populated())
    }));
    assert!(store.are_surrounding_chunks_generated(50, 50, 1));
}

#[test]
fn autosave_follows_interval() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(15);
    cfg.store.autosave_interval_ticks = 10;
    let store = open(dir.path(), &cfg);
    store.set_block(3, 100, 3, STONE);
    assert_eq!(store.update(5).autosaved, 0);
    assert_eq!(chunk_files(dir.path()), 0);
    assert_eq!(store.update(10).autosaved, 1);
    assert_eq!(chunk_files(dir.path()), 1);
    assert_eq!(store.update(15).autosaved, 0);
}

fn wait_for(mut done: impl FnMut() -> bool) -> bool {
    for _ in 0..500 {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn stale_background_result_does_not_replace_saved_edit() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(16);
    cfg.store.max_loaded_chunks = 2;
    let store = open(dir.path(), &cfg);

    // First job finishes but is not integrated yet.
    assert!(store.request_chunk(0, 0));
    assert!(wait_for(|| store.stats().generations >= 1));

    // Synchronous load supersedes it, then the edit is evicted to disk.
    assert!(store.set_block(3, 50, 3, STONE));
    store.get_chunk(1, 0, true).unwrap();
    store.get_chunk(2, 0, true).unwrap();
    assert!(!store.is_chunk_loaded(0, 0));
    assert!(dir.path().join(column_path(ChunkPos::new(0, 0))).is_file());

    // A second request queues behind the stale result.
    assert!(store.request_chunk(0, 0));
    assert!(wait_for(|| store.stats().loads >= 1));
    assert!(pump_until(&store, |s| s.is_chunk_loaded(0, 0)));

    assert_eq!(store.get_block(3, 50, 3), STONE);
    assert_eq!(store.stats().in_flight, 0);
}

#[test]
fn evicted_column_can_still_be_populated() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(17);
    cfg.store.max_loaded_chunks = 9;
    let store = open(dir.path(), &cfg);

    store.generate_chunk(0, 0);
    for dz in -1..=1 {
        for dx in -1..=1 {
            if (dx, dz) != (0, 0) {
                store.generate_chunk(dx, dz);
            }
        }
    }
    store.generate_chunk(5, 5);

    assert!(!store.is_chunk_loaded(0, 0));
    assert!(store.are_surrounding_chunks_generated(0, 0, 1));
    assert!(store.populate_chunk(0, 0));
    let handle = store.get_chunk(0, 0, false).unwrap();
    assert!(handle.read().unwrap().is_populated());
    assert!(!store.populate_chunk(0, 0));
}

#[test]
fn failed_eviction_save_keeps_column_resident() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(18);
    cfg.store.max_loaded_chunks = 2;
    let store = open(dir.path(), &cfg);

    // A regular file where the region directory should go.
    let region = dir.path().join(column_path(ChunkPos::new(0, 0)));
    let region = region.parent().unwrap();
    fs::create_dir_all(region.parent().unwrap()).unwrap();
    fs::write(region, b"in the way").unwrap();

    store.get_chunk(0, 0, true).unwrap();
    store.get_chunk(1, 0, true).unwrap();
    store.get_chunk(2, 0, true).unwrap();

    assert_eq!(store.get_loaded_chunk_count(), 3);
    assert!(store.is_chunk_loaded(0, 0));
    assert!(store.get_chunk(0, 0, false).unwrap().read().unwrap().is_modified());
    let stats = store.stats();
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.save_failures, 1);

    fs::remove_file(region).unwrap();
    assert_eq!(store.save_all(), 3);
    assert!(!store.get_chunk(0, 0, false).unwrap().read().unwrap().is_modified());
    assert!(dir.path().join(column_path(ChunkPos::new(0, 0))).is_file());
}
