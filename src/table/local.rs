use std::borrow::Cow;

use crate::table::{
    exceeds_load, grown_capacity, search, usable_load_factor, Chain, Entry, HashKind,
    TableMetrics, DEFAULT_LOAD_FACTOR,
};

/**
    Single owner counting table.

    Workers fill one of these privately and hand it to the merger afterwards. Growth
    follows the same rule as [`ConcurrentTable`](crate::table::ConcurrentTable): once the
    number of keys crosses `capacity * load_factor` the slot array doubles.
*/
#[derive(Debug)]
pub struct LocalTable {
    buckets: Vec<Chain>,
    len: usize,
    load_factor: f64,
    hasher: HashKind,
    metrics: TableMetrics,
}

impl LocalTable {
    /// A load factor that isn't positive is replaced by [`DEFAULT_LOAD_FACTOR`].
    pub fn new(capacity: usize, load_factor: f64, hasher: HashKind) -> Self {
        LocalTable {
            buckets: vec![Chain::new(); capacity.max(1)],
            len: 0,
            load_factor: usable_load_factor(load_factor),
            hasher,
            metrics: TableMetrics::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        LocalTable::new(capacity, DEFAULT_LOAD_FACTOR, HashKind::default())
    }

    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    /// Adds `n` to the count of `key`, inserting it if it's missing.
    pub fn add<'k>(&mut self, key: impl Into<Cow<'k, str>>, n: u64) {
        let key = key.into();
        let slot = self.hasher.slot(key.as_bytes(), self.buckets.len());
        let chain = &mut self.buckets[slot];

        let (found, collisions) = search(chain, &key);
        self.metrics.increments += 1;
        self.metrics.collisions += collisions;

        match found {
            Some(pos) => chain[pos].count += n,
            None => {
                chain.push(Entry {
                    key: key.into_owned(),
                    count: n,
                });
                self.len += 1;
                self.metrics.inserts += 1;

                if exceeds_load(self.len, self.buckets.len(), self.load_factor) {
                    self.grow();
                }
            }
        }
    }

    /// Adds every entry of `other` to this table.
    pub fn merge_from<T>(&mut self, other: T)
    where
        T: IntoIterator<Item = Entry>,
    {
        for entry in other {
            self.add(entry.key, entry.count);
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        let slot = self.hasher.slot(key.as_bytes(), self.buckets.len());
        let chain = &self.buckets[slot];
        search(chain, key).0.map(|pos| chain[pos].count)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.buckets.iter().flatten().map(|e| e.count).sum()
    }

    pub fn metrics(&self) -> TableMetrics {
        self.metrics
    }

    fn grow(&mut self) {
        let capacity = grown_capacity(self.len, self.buckets.len(), self.load_factor);
        let old = std::mem::replace(&mut self.buckets, vec![Chain::new(); capacity]);

        for entry in old.into_iter().flatten() {
            let slot = self.hasher.slot(entry.key.as_bytes(), capacity);
            self.buckets[slot].push(entry);
        }
        self.metrics.resizes += 1;
    }
}

impl IntoIterator for LocalTable {
    type Item = Entry;
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Chain>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter().flatten()
    }
}
