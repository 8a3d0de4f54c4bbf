use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use strata_chunk::{ChunkPos, Column, Generator, WorldHeight};
use strata_io::ChunkIo;

use crate::stats::StatCounters;

/// A finished job. `ticket` is the one handed to [`GenerationPool::submit`].
pub(crate) struct GenOut {
    pub pos: ChunkPos,
    pub ticket: u64,
    pub column: Column,
}

/// Disk copy when one is readable, else a freshly generated column. An
/// unreadable file is logged and regenerated.
pub(crate) fn load_or_generate(
    pos: ChunkPos,
    io: &ChunkIo,
    generator: &dyn Generator,
    height: WorldHeight,
    stats: &StatCounters,
) -> Column {
    if let Some(column) = load_from_disk(pos, io, height, stats) {
        return column;
    }
    generate_fresh(pos, generator, height, stats)
}

pub(crate) fn load_from_disk(
    pos: ChunkPos,
    io: &ChunkIo,
    height: WorldHeight,
    stats: &StatCounters,
) -> Option<Column> {
    match io.load_column(pos, height) {
        Ok(Some(column)) => {
            StatCounters::bump(&stats.loads);
            log::debug!("loaded column {pos}");
            Some(column)
        }
        Ok(None) => None,
        Err(e) => {
            log::warn!("column {pos} unreadable, regenerating: {e}");
            None
        }
    }
}

pub(crate) fn generate_fresh(
    pos: ChunkPos,
    generator: &dyn Generator,
    height: WorldHeight,
    stats: &StatCounters,
) -> Column {
    let mut column = Column::new(pos.x, pos.z, height);
    column.generate(generator);
    StatCounters::bump(&stats.generations);
    log::debug!("generated column {pos}");
    column
}

/// Background lane: positions in, finished columns out.
pub(crate) struct GenerationPool {
    job_tx: Sender<(ChunkPos, u64)>,
    res_rx: Receiver<GenOut>,
    _pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    workers: usize,
}

impl GenerationPool {
    pub fn new(
        workers: usize,
        io: Arc<ChunkIo>,
        generator: Arc<dyn Generator>,
        height: WorldHeight,
        stats: Arc<StatCounters>,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<(ChunkPos, u64)>();
        let (res_tx, res_rx) = unbounded::<GenOut>();
        let queued = Arc::new(AtomicUsize::new(0));
        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("strata-gen-{i}"))
                .build()?,
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let io = Arc::clone(&io);
            let generator = Arc::clone(&generator);
            let stats = Arc::clone(&stats);
            let queued = Arc::clone(&queued);
            pool.spawn(move || {
                while let Ok((pos, ticket)) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    let column = load_or_generate(pos, &io, generator.as_ref(), height, &stats);
                    if tx.send(GenOut { pos, ticket, column }).is_err() {
                        break;
                    }
                }
            });
        }
        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            queued,
            workers,
        })
    }

    pub fn submit(&self, pos: ChunkPos, ticket: u64) -> bool {
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send((pos, ticket)).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
            log::error!("generation workers gone; dropped request for {pos}");
            return false;
        }
        true
    }

    pub fn drain(&self) -> Vec<GenOut> {
        self.res_rx.try_iter().collect()
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }
}
