use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rayon::ThreadPoolBuilder;

use crate::config::Config;
use crate::error::Result;
use crate::io::{io_error, FileSource, MemorySource, Source};
use crate::merge::merge_all;
use crate::partition::partition;
use crate::rank::RankedWords;
use crate::table::{ConcurrentTable, LocalTable, TableMetrics};
use crate::worker::{Strategy, Worker, WorkerStats};

/// Outcome of one counting run.
#[derive(Debug, Clone)]
pub struct Report {
    pub ranked: RankedWords,
    /// Shared table metrics plus those of any private tables.
    pub metrics: TableMetrics,
    pub workers: Vec<WorkerStats>,
    pub strategy: Strategy,
    pub bytes: u64,
    /// Capacity of the shared table once all counts were in.
    pub capacity: usize,
}

impl Report {
    pub fn words(&self) -> u64 {
        self.workers.iter().map(|w| w.words).sum()
    }
}

pub fn count_file(path: impl AsRef<Path>, config: &Config) -> Result<Report> {
    count(&FileSource::new(path.as_ref()), config)
}

pub fn count_bytes(bytes: &[u8], config: &Config) -> Result<Report> {
    count(&MemorySource::new(bytes), config)
}

/**
    Counts the words of `source` with `config.workers` workers and ranks them.

    The input is split into word aligned ranges, one per worker. Every worker opens its own
    cursor on the input and counts its range either straight into the shared table or into a
    private table that is merged into the shared one after all workers finished, depending on
    `config.strategy`. The first error aborts the run.
*/
pub fn count<S: Source>(source: &S, config: &Config) -> Result<Report> {
    config.validate()?;
    let started = Instant::now();

    let bytes = source.len()?;
    let ranges = {
        let mut cursor = source.open()?;
        partition(&mut cursor, bytes, config.workers).map_err(|e| io_error(source, e))?
    };
    let strategy = config.strategy.resolve(config.workers);

    let shared = ConcurrentTable::new(
        config.shared_capacity(bytes),
        config.load_factor,
        config.slots_per_guard,
        config.hasher,
    );
    debug!(
        "counting {} ({} bytes) with {} workers, {:?} tables, {} initial slots",
        source.name(),
        bytes,
        config.workers,
        strategy,
        shared.capacity()
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("wordfreq-worker-{}", i))
        .build()?;

    let workers: Vec<Worker> = ranges
        .into_iter()
        .enumerate()
        .map(|(index, range)| Worker::new(index, range, config.hyphens))
        .collect();

    let (stats, private_metrics) = pool.install(|| -> Result<_> {
        match strategy {
            Strategy::Private => {
                let capacity = config.private_capacity(bytes);
                let filled = workers
                    .into_par_iter()
                    .map(|worker| -> Result<(LocalTable, WorkerStats)> {
                        let mut table =
                            LocalTable::new(capacity, config.load_factor, config.hasher);
                        let stats = worker
                            .run(source.open()?, &mut table)
                            .map_err(|e| io_error(source, e))?;
                        Ok((table, stats))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let (tables, stats): (Vec<_>, Vec<_>) = filled.into_iter().unzip();
                Ok((stats, merge_all(&shared, tables)))
            }
            _ => {
                let stats = workers
                    .into_par_iter()
                    .map(|worker| -> Result<WorkerStats> {
                        let mut counter = &shared;
                        worker
                            .run(source.open()?, &mut counter)
                            .map_err(|e| io_error(source, e))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok((stats, TableMetrics::default()))
            }
        }
    })?;

    let metrics = shared.metrics() + private_metrics;
    let capacity = shared.capacity();
    let ranked = RankedWords::from_table(shared);

    info!(
        "counted {} words, {} distinct, in {:.2?}",
        stats.iter().map(|s| s.words).sum::<u64>(),
        ranked.len(),
        started.elapsed()
    );

    Ok(Report {
        ranked,
        metrics,
        workers: stats,
        strategy,
        bytes,
        capacity,
    })
}
