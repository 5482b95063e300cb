use std::ops::{Add, AddAssign};
use std::sync::atomic::{AtomicU64, Ordering};

/**
    Counters describing how a table was used.

    `collisions` counts the chain entries stepped over before a lookup either found its key
    or reached the end of the chain.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableMetrics {
    pub increments: u64,
    pub inserts: u64,
    pub collisions: u64,
    pub resizes: u64,
}

impl AddAssign for TableMetrics {
    fn add_assign(&mut self, rhs: Self) {
        self.increments += rhs.increments;
        self.inserts += rhs.inserts;
        self.collisions += rhs.collisions;
        self.resizes += rhs.resizes;
    }
}

impl Add for TableMetrics {
    type Output = TableMetrics;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

/// Atomic counterpart of [`TableMetrics`] for tables written by several threads.
#[derive(Debug, Default)]
pub(crate) struct SharedMetrics {
    increments: AtomicU64,
    inserts: AtomicU64,
    collisions: AtomicU64,
    resizes: AtomicU64,
}

impl SharedMetrics {
    #[inline]
    pub(crate) fn record_update(&self, collisions: u64, inserted: bool) {
        self.increments.fetch_add(1, Ordering::Relaxed);
        if collisions > 0 {
            self.collisions.fetch_add(collisions, Ordering::Relaxed);
        }
        if inserted {
            self.inserts.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_resize(&self) {
        self.resizes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> TableMetrics {
        TableMetrics {
            increments: self.increments.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
            resizes: self.resizes.load(Ordering::Relaxed),
        }
    }
}

#[test]
fn test_metrics_add_up() {
    let a = TableMetrics {
        increments: 3,
        inserts: 2,
        collisions: 1,
        resizes: 0,
    };
    let b = TableMetrics {
        increments: 4,
        inserts: 1,
        collisions: 0,
        resizes: 2,
    };
    assert_eq!(
        a + b,
        TableMetrics {
            increments: 7,
            inserts: 3,
            collisions: 1,
            resizes: 2,
        }
    );
}

#[test]
fn test_shared_metrics_snapshot() {
    let m = SharedMetrics::default();
    m.record_update(0, true);
    m.record_update(2, false);
    m.record_resize();
    assert_eq!(
        m.snapshot(),
        TableMetrics {
            increments: 2,
            inserts: 1,
            collisions: 2,
            resizes: 1,
        }
    );
}
