use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};

use itertools::Itertools;
use log::debug;
use parking_lot::{Mutex, RwLock};

use crate::table::metrics::SharedMetrics;
use crate::table::{
    exceeds_load, grown_capacity, search, usable_load_factor, Chain, Entry, HashKind,
    TableMetrics, DEFAULT_LOAD_FACTOR,
};

/// Slots covered by one guard unless configured otherwise.
pub const DEFAULT_SLOTS_PER_GUARD: usize = 64;

/**
    The slot array of a [`ConcurrentTable`].

    Slot `i` lives in segment `i / slots_per_guard` at position `i % slots_per_guard`.
    The last segment may be shorter than the others.
*/
struct Slots {
    capacity: usize,
    segments: Box<[Mutex<Vec<Chain>>]>,
}

impl Slots {
    fn new(capacity: usize, slots_per_guard: usize) -> Self {
        Slots::from_buckets(vec![Chain::new(); capacity], slots_per_guard)
    }

    fn from_buckets(buckets: Vec<Chain>, slots_per_guard: usize) -> Self {
        let capacity = buckets.len();
        let segments = buckets
            .into_iter()
            .chunks(slots_per_guard)
            .into_iter()
            .map(|segment| Mutex::new(segment.collect()))
            .collect();

        Slots {
            capacity,
            segments,
        }
    }

    fn into_entries(self) -> impl Iterator<Item = Entry> {
        self.segments
            .into_vec()
            .into_iter()
            .flat_map(|segment| segment.into_inner())
            .flatten()
    }
}

/**
    Hash table shared by all workers of a run.

    Every update locks only the segment holding its slot, so workers touching different
    segments proceed in parallel. The slot array itself sits behind an [`RwLock`]: updates
    and lookups hold it shared, a resize holds it exclusively. A resize therefore runs while
    no other thread is inside the table and replaces the array in one assignment, which means
    nobody observes a half migrated table.

    Whether to grow is first decided from the atomic length and capacity without any lock,
    then checked again once the exclusive lock is held since another thread may have grown
    the table in the meantime.
*/
pub struct ConcurrentTable {
    slots: RwLock<Slots>,
    len: AtomicUsize,
    capacity: AtomicUsize,
    load_factor: f64,
    slots_per_guard: usize,
    hasher: HashKind,
    metrics: SharedMetrics,
}

impl ConcurrentTable {
    /// A load factor that isn't positive is replaced by [`DEFAULT_LOAD_FACTOR`].
    pub fn new(
        capacity: usize,
        load_factor: f64,
        slots_per_guard: usize,
        hasher: HashKind,
    ) -> Self {
        let capacity = capacity.max(1);
        let slots_per_guard = slots_per_guard.max(1);

        ConcurrentTable {
            slots: RwLock::new(Slots::new(capacity, slots_per_guard)),
            len: AtomicUsize::new(0),
            capacity: AtomicUsize::new(capacity),
            load_factor: usable_load_factor(load_factor),
            slots_per_guard,
            hasher,
            metrics: SharedMetrics::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ConcurrentTable::new(
            capacity,
            DEFAULT_LOAD_FACTOR,
            DEFAULT_SLOTS_PER_GUARD,
            HashKind::default(),
        )
    }

    pub fn increment(&self, key: &str) {
        self.add(key, 1);
    }

    /// Adds `n` to the count of `key`, inserting it if it's missing.
    pub fn add<'k>(&self, key: impl Into<Cow<'k, str>>, n: u64) {
        let key = key.into();
        self.grow_if_needed();

        let inserted = {
            let slots = self.slots.read();
            let slot = self.hasher.slot(key.as_bytes(), slots.capacity);
            let mut segment = slots.segments[slot / self.slots_per_guard].lock();
            let chain = &mut segment[slot % self.slots_per_guard];

            let (found, collisions) = search(chain, &key);
            let inserted = match found {
                Some(pos) => {
                    chain[pos].count += n;
                    false
                }
                None => {
                    chain.push(Entry {
                        key: key.into_owned(),
                        count: n,
                    });
                    self.len.fetch_add(1, Ordering::AcqRel);
                    true
                }
            };
            self.metrics.record_update(collisions, inserted);
            inserted
        };

        if inserted {
            self.grow_if_needed();
        }
    }

    /// Count of `key`, or `None` if it was never inserted.
    pub fn get(&self, key: &str) -> Option<u64> {
        let slots = self.slots.read();
        let slot = self.hasher.slot(key.as_bytes(), slots.capacity);
        let segment = slots.segments[slot / self.slots_per_guard].lock();
        let chain = &segment[slot % self.slots_per_guard];
        search(chain, key).0.map(|pos| chain[pos].count)
    }

    /**
        Adds every entry of `other` to this table.

        Each entry is applied like a single [`add`](Self::add), so several merges into the
        same table may run at the same time.
    */
    pub fn merge_from<T>(&self, other: T)
    where
        T: IntoIterator<Item = Entry>,
    {
        for entry in other {
            self.add(entry.key, entry.count);
        }
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.read().capacity
    }

    /// Number of guards currently protecting the slot array.
    pub fn segments(&self) -> usize {
        self.slots.read().segments.len()
    }

    pub fn slots_per_guard(&self) -> usize {
        self.slots_per_guard
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Sum of all counts. Not a consistent snapshot while writers are active.
    pub fn total(&self) -> u64 {
        let slots = self.slots.read();
        slots
            .segments
            .iter()
            .map(|segment| segment.lock().iter().flatten().map(|e| e.count).sum::<u64>())
            .sum()
    }

    pub fn metrics(&self) -> TableMetrics {
        self.metrics.snapshot()
    }

    pub fn into_entries(self) -> impl Iterator<Item = Entry> {
        self.slots.into_inner().into_entries()
    }

    fn grow_if_needed(&self) {
        let len = self.len.load(Ordering::Acquire);
        if !exceeds_load(len, self.capacity.load(Ordering::Acquire), self.load_factor) {
            return;
        }

        let mut slots = self.slots.write();
        let len = self.len.load(Ordering::Acquire);
        if !exceeds_load(len, slots.capacity, self.load_factor) {
            return;
        }

        let capacity = grown_capacity(len, slots.capacity, self.load_factor);
        let old = std::mem::replace(&mut *slots, Slots::new(0, self.slots_per_guard));

        let mut buckets = vec![Chain::new(); capacity];
        for entry in old.into_entries() {
            let slot = self.hasher.slot(entry.key.as_bytes(), capacity);
            buckets[slot].push(entry);
        }

        *slots = Slots::from_buckets(buckets, self.slots_per_guard);
        self.capacity.store(capacity, Ordering::Release);
        self.metrics.record_resize();

        debug!(
            "table grew to {} slots in {} segments holding {} keys",
            capacity,
            slots.segments.len(),
            len
        );
    }
}

impl IntoIterator for ConcurrentTable {
    type Item = Entry;
    type IntoIter = Box<dyn Iterator<Item = Entry>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.into_entries())
    }
}
