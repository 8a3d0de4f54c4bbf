use std::sync::atomic::{AtomicU64, Ordering};

/// Counters since the store was opened, plus current queue sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub generations: u64,
    pub evictions: u64,
    pub saves: u64,
    pub save_failures: u64,
    pub resident: usize,
    pub in_flight: usize,
    pub pending_population: usize,
}

#[derive(Default)]
pub(crate) struct StatCounters {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub loads: AtomicU64,
    pub generations: AtomicU64,
    pub evictions: AtomicU64,
    pub saves: AtomicU64,
    pub save_failures: AtomicU64,
}

impl StatCounters {
    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, resident: usize, in_flight: usize, pending_population: usize) -> StoreStats {
        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            generations: self.generations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            saves: self.saves.load(Ordering::Relaxed),
            save_failures: self.save_failures.load(Ordering::Relaxed),
            resident,
            in_flight,
            pending_population,
        }
    }
}
