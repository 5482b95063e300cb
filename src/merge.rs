use log::trace;
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::table::{ConcurrentTable, LocalTable, TableMetrics};

/**
    Folds every private table into `shared`, each exactly once, and drops it afterwards.

    The merges run in parallel; the segment guards of `shared` keep them apart. Summation is
    commutative, so the result doesn't depend on the order the merges finish in. Returns the
    metrics collected by the private tables while the workers filled them.
*/
pub fn merge_all(shared: &ConcurrentTable, privates: Vec<LocalTable>) -> TableMetrics {
    privates
        .into_par_iter()
        .enumerate()
        .map(|(index, private)| {
            let metrics = private.metrics();
            trace!("merging table {} with {} keys", index, private.len());
            shared.merge_from(private);
            metrics
        })
        .reduce(TableMetrics::default, |a, b| a + b)
}
