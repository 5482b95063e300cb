//! Chained hash tables counting occurrences per key.
//!
//! [`LocalTable`] is owned by a single worker and needs no locking. [`ConcurrentTable`] is the
//! shared aggregation target: its slots are split into segments guarded by one mutex each, and
//! the whole slot array sits behind a table wide lock that is only taken exclusively to grow.

mod hash;
mod local;
mod metrics;
mod shared;

pub use hash::HashKind;
pub use local::LocalTable;
pub use metrics::TableMetrics;
pub use shared::{ConcurrentTable, DEFAULT_SLOTS_PER_GUARD};

/// Fraction of the capacity that may be occupied before a table doubles.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// A counted key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub key: String,
    pub count: u64,
}

/// Entries whose keys land in the same slot, oldest first.
pub(crate) type Chain = Vec<Entry>;

/**
    Looks for `key` in a chain.

    Returns the position of the entry, if any, and how many entries were stepped over
    before the search ended.
*/
pub(crate) fn search(chain: &[Entry], key: &str) -> (Option<usize>, u64) {
    match chain.iter().position(|e| e.key == key) {
        Some(pos) => (Some(pos), pos as u64),
        None => (None, chain.len().saturating_sub(1) as u64),
    }
}

#[inline]
pub(crate) fn exceeds_load(len: usize, capacity: usize, load_factor: f64) -> bool {
    len as f64 > capacity as f64 * load_factor
}

/// `load_factor` if it's positive, [`DEFAULT_LOAD_FACTOR`] otherwise. NaN counts as not positive.
pub(crate) fn usable_load_factor(load_factor: f64) -> f64 {
    if load_factor > 0.0 {
        load_factor
    } else {
        DEFAULT_LOAD_FACTOR
    }
}

/// Capacity a table has to grow to so that `len` entries stay under the load factor.
pub(crate) fn grown_capacity(len: usize, mut capacity: usize, load_factor: f64) -> usize {
    capacity = capacity.max(1);
    while exceeds_load(len, capacity, load_factor) {
        capacity *= 2;
    }
    capacity
}

/**
    Something a worker can count normalized words into.
*/
pub trait Counter {
    fn count(&mut self, key: &str);
}

impl Counter for LocalTable {
    fn count(&mut self, key: &str) {
        self.increment(key);
    }
}

impl Counter for &ConcurrentTable {
    fn count(&mut self, key: &str) {
        self.increment(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str) -> Entry {
        Entry {
            key: key.to_string(),
            count: 1,
        }
    }

    #[test]
    fn test_search_counts_steps() {
        let chain = vec![entry("a"), entry("b"), entry("c")];
        assert_eq!(search(&chain, "a"), (Some(0), 0));
        assert_eq!(search(&chain, "c"), (Some(2), 2));
        assert_eq!(search(&chain, "d"), (None, 2));
        assert_eq!(search(&[], "d"), (None, 0));
    }

    #[test]
    fn test_grown_capacity_doubles_until_under_load() {
        assert_eq!(grown_capacity(3, 4, 0.75), 4);
        assert_eq!(grown_capacity(4, 4, 0.75), 8);
        assert_eq!(grown_capacity(100, 4, 0.75), 256);
        assert_eq!(grown_capacity(1, 0, 1.0), 1);
    }

    #[test]
    fn test_unusable_load_factor_falls_back_to_default() {
        assert_eq!(usable_load_factor(0.5), 0.5);
        assert_eq!(usable_load_factor(0.0), DEFAULT_LOAD_FACTOR);
        assert_eq!(usable_load_factor(-1.0), DEFAULT_LOAD_FACTOR);
        assert_eq!(usable_load_factor(f64::NAN), DEFAULT_LOAD_FACTOR);
    }
}
