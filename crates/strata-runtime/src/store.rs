use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use strata_blocks::BlockId;
use strata_blocks::types::AIR;
use strata_chunk::{ChunkPos, Column, Generator, Neighborhood, WorldHeight};
use strata_io::{ChunkIo, IoError, WorldInfo};
use strata_world::generation::biome::SEA_LEVEL;
use strata_world::{TerrainGenerator, WorldGenParams};
use thiserror::Error;

use crate::config::StrataConfig;
use crate::stats::{StatCounters, StoreStats};
use crate::workers::{self, GenerationPool};

/// Shared handle to a resident column. Two handles to the same resident
/// column are `Arc::ptr_eq`.
pub type ColumnHandle = Arc<RwLock<Column>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("cannot start generation workers: {0}")]
    Workers(#[from] rayon::ThreadPoolBuildError),
}

/// What one `update` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Background results inserted into the resident table.
    pub integrated: usize,
    pub populated: usize,
    /// Columns written by an autosave, zero when none ran.
    pub autosaved: usize,
}

struct Resident {
    column: ColumnHandle,
    last_used: u64,
}

/// Bounded cache of resident columns over a world directory.
///
/// Lock order is resident table, then a column, then the disk lock inside
/// [`ChunkIo`]. The in-flight map and population queue are never held together
/// with the table.
///
/// Every background request gets a fresh ticket. A worker result is installed
/// only while its ticket is still the one recorded for that position, so a
/// job that was superseded by a synchronous load never lands later. Do not call back into the store while holding a column
/// guard obtained from it.
pub struct WorldStore {
    io: Arc<ChunkIo>,
    generator: Arc<dyn Generator>,
    height: WorldHeight,
    max_loaded: usize,
    autosave_interval: u64,
    population_budget: usize,
    info: Mutex<WorldInfo>,
    resident: Mutex<HashMap<ChunkPos, Resident>>,
    clock: AtomicU64,
    in_flight: Mutex<HashMap<ChunkPos, u64>>,
    next_ticket: AtomicU64,
    pending_population: Mutex<VecDeque<ChunkPos>>,
    last_autosave: AtomicU64,
    workers: GenerationPool,
    stats: Arc<StatCounters>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read(column: &ColumnHandle) -> RwLockReadGuard<'_, Column> {
    column.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(column: &ColumnHandle) -> RwLockWriteGuard<'_, Column> {
    column.write().unwrap_or_else(PoisonError::into_inner)
}

fn clock_seed() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}

impl WorldStore {
    /// Opens (or creates) a world directory using the terrain generator.
    pub fn open(root: impl Into<PathBuf>, config: &StrataConfig) -> Result<Self, StoreError> {
        let params = WorldGenParams::from_config(&config.worldgen);
        Self::open_with(root, config, move |seed, height| -> Arc<dyn Generator> {
            Arc::new(TerrainGenerator::new(seed, height, params))
        })
    }

    /// Like [`WorldStore::open`] with a caller-supplied generator, built once
    /// the world seed is known.
    pub fn open_with<F>(root: impl Into<PathBuf>, config: &StrataConfig, make_generator: F) -> Result<Self, StoreError>
    where
        F: FnOnce(i64, WorldHeight) -> Arc<dyn Generator>,
    {
        let io = Arc::new(ChunkIo::open(root)?);
        let height = config.world.height();
        let fresh = || {
            WorldInfo::new(
                config.world.name.clone(),
                config.world.seed.unwrap_or_else(clock_seed),
                (0, SEA_LEVEL + 2, 0),
            )
        };
        let info = match io.load_world_info() {
            Ok(Some(info)) => {
                log::info!(
                    "opened world '{}' at {} (seed {}, time {})",
                    info.name,
                    io.root().display(),
                    info.seed,
                    info.time
                );
                info
            }
            Ok(None) => {
                let info = fresh();
                log::info!("created world '{}' at {} (seed {})", info.name, io.root().display(), info.seed);
                persist_info(&io, &info);
                info
            }
            Err(e) => {
                log::warn!("world metadata unreadable, using defaults: {e}");
                let info = fresh();
                persist_info(&io, &info);
                info
            }
        };

        let generator = make_generator(info.seed, height);
        let stats = Arc::new(StatCounters::default());
        let workers = GenerationPool::new(
            config.store.worker_threads(),
            Arc::clone(&io),
            Arc::clone(&generator),
            height,
            Arc::clone(&stats),
        )?;
        log::debug!("{} generation workers", workers.workers());

        Ok(Self {
            io,
            generator,
            height,
            max_loaded: config.store.max_loaded_chunks.max(1),
            autosave_interval: config.store.autosave_interval_ticks,
            population_budget: config.store.population_budget_per_tick,
            last_autosave: AtomicU64::new(info.time),
            info: Mutex::new(info),
            resident: Mutex::new(HashMap::new()),
            clock: AtomicU64::new(0),
            in_flight: Mutex::new(HashMap::new()),
            next_ticket: AtomicU64::new(0),
            pending_population: Mutex::new(VecDeque::new()),
            workers,
            stats,
        })
    }

    #[inline]
    pub fn world_height(&self) -> WorldHeight {
        self.height
    }

    #[inline]
    fn stamp(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Resident hit path: refreshes recency and counts a hit.
    fn lookup(&self, pos: ChunkPos) -> Option<ColumnHandle> {
        let mut table = lock(&self.resident);
        let entry = table.get_mut(&pos)?;
        entry.last_used = self.stamp();
        StatCounters::bump(&self.stats.hits);
        Some(Arc::clone(&entry.column))
    }

    /// Inserts `column` unless another thread got there first, in which case
    /// the existing handle wins. Supersedes any background job for `pos`.
    fn install(&self, pos: ChunkPos, column: Column) -> ColumnHandle {
        let handle = {
            let mut table = lock(&self.resident);
            let stamp = self.stamp();
            let handle = match table.entry(pos) {
                Entry::Occupied(mut e) => {
                    e.get_mut().last_used = stamp;
                    Arc::clone(&e.get().column)
                }
                Entry::Vacant(e) => {
                    let handle = Arc::new(RwLock::new(column));
                    e.insert(Resident {
                        column: Arc::clone(&handle),
                        last_used: stamp,
                    });
                    handle
                }
            };
            if table.len() > self.max_loaded {
                self.evict_locked(&mut table);
            }
            handle
        };
        lock(&self.in_flight).remove(&pos);
        handle
    }

    /// Drops the ⌈N/10⌉ least recently used columns, saving dirty ones first.
    /// A dirty column that fails to save stays resident.
    fn evict_locked(&self, table: &mut HashMap<ChunkPos, Resident>) {
        let count = table.len().div_ceil(10);
        let mut by_age: Vec<(u64, ChunkPos)> = table.iter().map(|(p, r)| (r.last_used, *p)).collect();
        by_age.sort_unstable();
        let mut evicted = 0;
        for (_, pos) in by_age.into_iter().take(count) {
            let persisted = match table.get(&pos) {
                Some(resident) => self.save_if_dirty(pos, &resident.column),
                None => continue,
            };
            if persisted {
                table.remove(&pos);
                StatCounters::bump(&self.stats.evictions);
                evicted += 1;
            }
        }
        log::debug!("evicted {evicted}/{count} columns, {} resident", table.len());
    }

    /// True when the column is clean or was written successfully.
    fn save_if_dirty(&self, pos: ChunkPos, handle: &ColumnHandle) -> bool {
        let mut column = write(handle);
        if !column.is_modified() {
            return true;
        }
        match self.io.save_column(&column) {
            Ok(()) => {
                column.mark_saved();
                StatCounters::bump(&self.stats.saves);
                true
            }
            Err(e) => {
                StatCounters::bump(&self.stats.save_failures);
                log::error!("failed to save column {pos}: {e}");
                false
            }
        }
    }

    fn obtain(&self, pos: ChunkPos, generate_if_absent: bool) -> Option<ColumnHandle> {
        if let Some(handle) = self.lookup(pos) {
            return Some(handle);
        }
        StatCounters::bump(&self.stats.misses);
        let column = match workers::load_from_disk(pos, &self.io, self.height, &self.stats) {
            Some(column) => column,
            None if generate_if_absent => {
                workers::generate_fresh(pos, self.generator.as_ref(), self.height, &self.stats)
            }
            None => return None,
        };
        Some(self.install(pos, column))
    }

    /// Resident column, else the saved one, else (when asked) a new generated
    /// column. `None` only when absent and `generate_if_absent` is false.
    pub fn get_chunk(&self, x: i32, z: i32, generate_if_absent: bool) -> Option<ColumnHandle> {
        self.obtain(ChunkPos::new(x, z), generate_if_absent)
    }

    /// Like `get_chunk(x, z, true)`, also running the terrain pass on a
    /// resident column that has not had it.
    pub fn generate_chunk(&self, x: i32, z: i32) -> ColumnHandle {
        let pos = ChunkPos::new(x, z);
        let handle = match self.obtain(pos, false) {
            Some(handle) => handle,
            None => {
                let column = workers::generate_fresh(pos, self.generator.as_ref(), self.height, &self.stats);
                self.install(pos, column)
            }
        };
        if write(&handle).generate(self.generator.as_ref()) {
            StatCounters::bump(&self.stats.generations);
        }
        handle
    }

    fn is_generated(&self, pos: ChunkPos) -> bool {
        let handle = lock(&self.resident).get(&pos).map(|r| Arc::clone(&r.column));
        match handle {
            Some(handle) => read(&handle).is_generated(),
            None => self.io.has_column(pos),
        }
    }

    /// Every column within `radius` (Chebyshev) is generated, resident or on
    /// disk. Nothing is loaded or generated.
    pub fn are_surrounding_chunks_generated(&self, x: i32, z: i32, radius: i32) -> bool {
        Neighborhood::capture(ChunkPos::new(x, z), radius, |p| self.is_generated(p)).all_generated()
    }

    /// Runs the feature pass, loading the column from disk when it is not
    /// resident. False when the column does not exist, is already populated
    /// or not generated, or its neighbourhood is incomplete.
    pub fn populate_chunk(&self, x: i32, z: i32) -> bool {
        let pos = ChunkPos::new(x, z);
        let Some(handle) = self.obtain(pos, false) else {
            return false;
        };
        let neighbors = Neighborhood::capture(pos, 1, |p| self.is_generated(p));
        let mut column = write(&handle);
        if !column.populate(self.generator.as_ref(), &neighbors) {
            return false;
        }
        column.recalculate_lighting();
        log::debug!("populated column {pos}");
        true
    }

    /// Block at world coordinates; air when the column is neither resident
    /// nor saved. Never generates.
    pub fn get_block(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        self.block_at(wx, wy, wz, false)
    }

    pub fn get_block_or_generate(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        self.block_at(wx, wy, wz, true)
    }

    fn block_at(&self, wx: i32, wy: i32, wz: i32, generate: bool) -> BlockId {
        match self.obtain(ChunkPos::from_block(wx, wz), generate) {
            Some(handle) => read(&handle).get_block(ChunkPos::local(wx), wy, ChunkPos::local(wz)),
            None => AIR,
        }
    }

    /// Writes a block, generating the column first when needed. False when
    /// `wy` is outside the world height.
    pub fn set_block(&self, wx: i32, wy: i32, wz: i32, id: BlockId) -> bool {
        if !self.height.contains(wy) {
            return false;
        }
        let handle = self.generate_chunk(wx >> 4, wz >> 4);
        write(&handle).set_block(ChunkPos::local(wx), wy, ChunkPos::local(wz), id)
    }

    /// Refreshes recency without counting a hit. False if not resident.
    pub fn touch_chunk(&self, x: i32, z: i32) -> bool {
        let mut table = lock(&self.resident);
        match table.get_mut(&ChunkPos::new(x, z)) {
            Some(entry) => {
                entry.last_used = self.stamp();
                true
            }
            None => false,
        }
    }

    pub fn is_chunk_loaded(&self, x: i32, z: i32) -> bool {
        lock(&self.resident).contains_key(&ChunkPos::new(x, z))
    }

    /// Queues a background load or generation. The column becomes resident
    /// during a later [`WorldStore::update`]. False when it is already
    /// resident or already queued.
    pub fn request_chunk(&self, x: i32, z: i32) -> bool {
        let pos = ChunkPos::new(x, z);
        if self.is_chunk_loaded(x, z) {
            return false;
        }
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1;
        match lock(&self.in_flight).entry(pos) {
            Entry::Occupied(_) => return false,
            Entry::Vacant(e) => {
                e.insert(ticket);
            }
        }
        if !self.workers.submit(pos, ticket) {
            let mut in_flight = lock(&self.in_flight);
            if in_flight.get(&pos) == Some(&ticket) {
                in_flight.remove(&pos);
            }
            return false;
        }
        true
    }

    /// Defers the feature pass for `(x, z)` until its neighbourhood is
    /// generated. Missing columns are requested in the background.
    pub fn queue_population(&self, x: i32, z: i32) {
        let pos = ChunkPos::new(x, z);
        {
            let mut pending = lock(&self.pending_population);
            if pending.contains(&pos) {
                return;
            }
            pending.push_back(pos);
        }
        self.request_chunk(x, z);
    }

    /// One tick: record the time, integrate background results, spend the
    /// population budget, and autosave on schedule.
    pub fn update(&self, tick: u64) -> TickReport {
        lock(&self.info).time = tick;

        let mut report = TickReport::default();
        for out in self.workers.drain() {
            // Superseded jobs have lost their ticket.
            {
                let mut in_flight = lock(&self.in_flight);
                if in_flight.get(&out.pos) != Some(&out.ticket) {
                    log::trace!("dropping superseded result for {}", out.pos);
                    continue;
                }
                in_flight.remove(&out.pos);
            }
            self.install(out.pos, out.column);
            report.integrated += 1;
        }

        report.populated = self.run_population();

        let last = self.last_autosave.load(Ordering::Relaxed);
        if tick < last {
            // Tick counter restarted; measure the interval from here.
            self.last_autosave.store(tick, Ordering::Relaxed);
        } else if self.autosave_interval > 0 && tick - last >= self.autosave_interval {
            self.last_autosave.store(tick, Ordering::Relaxed);
            report.autosaved = self.save_all();
            log::info!("autosave at tick {tick}: {} columns", report.autosaved);
        }
        report
    }

    fn run_population(&self) -> usize {
        let batch: Vec<ChunkPos> = {
            let mut pending = lock(&self.pending_population);
            let n = self.population_budget.min(pending.len());
            pending.drain(..n).collect()
        };
        let mut done = 0;
        let mut retry = Vec::new();
        for pos in batch {
            let handle = lock(&self.resident).get(&pos).map(|r| Arc::clone(&r.column));
            let Some(handle) = handle else {
                self.request_chunk(pos.x, pos.z);
                retry.push(pos);
                continue;
            };
            if read(&handle).is_populated() {
                continue;
            }
            if self.populate_chunk(pos.x, pos.z) {
                done += 1;
                continue;
            }
            for dz in -1..=1 {
                for dx in -1..=1 {
                    let n = pos.offset(dx, dz);
                    if !self.is_generated(n) {
                        self.request_chunk(n.x, n.z);
                    }
                }
            }
            retry.push(pos);
        }
        if !retry.is_empty() {
            lock(&self.pending_population).extend(retry);
        }
        done
    }

    /// Writes every dirty resident column, then the world metadata. Returns
    /// the number of columns written; failures are logged and counted.
    pub fn save_all(&self) -> usize {
        let handles: Vec<(ChunkPos, ColumnHandle)> = lock(&self.resident)
            .iter()
            .map(|(p, r)| (*p, Arc::clone(&r.column)))
            .collect();
        let mut written = 0;
        for (pos, handle) in handles {
            let dirty = read(&handle).is_modified();
            if dirty && self.save_if_dirty(pos, &handle) {
                written += 1;
            }
        }
        let info = lock(&self.info).clone();
        persist_info(&self.io, &info);
        log::debug!("saved {written} columns");
        written
    }

    pub fn get_loaded_chunk_count(&self) -> usize {
        lock(&self.resident).len()
    }

    pub fn get_world_info(&self) -> WorldInfo {
        lock(&self.info).clone()
    }

    /// Updates the spawn point and writes the metadata immediately.
    pub fn set_spawn(&self, x: i32, y: i32, z: i32) {
        let info = {
            let mut info = lock(&self.info);
            info.spawn_x = x;
            info.spawn_y = y;
            info.spawn_z = z;
            info.clone()
        };
        persist_info(&self.io, &info);
    }

    pub fn stats(&self) -> StoreStats {
        let resident = self.get_loaded_chunk_count();
        let in_flight = lock(&self.in_flight).len();
        let pending = lock(&self.pending_population).len();
        self.stats.snapshot(resident, in_flight, pending)
    }
}

fn persist_info(io: &ChunkIo, info: &WorldInfo) {
    if let Err(e) = io.save_world_info(info) {
        log::error!("failed to write world metadata: {e}");
    }
}
