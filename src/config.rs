use std::thread::available_parallelism;

use crate::error::ConfigError;
use crate::filtering::Hyphens;
use crate::table::{HashKind, DEFAULT_LOAD_FACTOR};
use crate::worker::Strategy;

pub use crate::table::DEFAULT_SLOTS_PER_GUARD;

/// Rough length of an average word including its separator.
pub const AVERAGE_WORD_BYTES: u64 = 5;
/// Share of the words expected to be distinct.
pub const UNIQUE_FRACTION: f64 = 0.2;
/// Smallest capacity the estimate hands out for the shared table.
pub const MIN_CAPACITY: usize = 100;
/// Smallest capacity of a worker's private table.
pub const MIN_PRIVATE_CAPACITY: usize = 16;

/**
    How many slots the shared table starts with.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capacity {
    Fixed(usize),
    /// Derived from the input length, see [`estimate_capacity`].
    #[default]
    Estimate,
}

/**
    Guesses the number of distinct words in `bytes` bytes of text.

    Assumes words of [`AVERAGE_WORD_BYTES`] of which [`UNIQUE_FRACTION`] are distinct, and
    never goes below [`MIN_CAPACITY`].
*/
pub fn estimate_capacity(bytes: u64) -> usize {
    let words = bytes / AVERAGE_WORD_BYTES;
    let unique = (words as f64 * UNIQUE_FRACTION) as usize;
    unique.max(MIN_CAPACITY)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub workers: usize,
    pub capacity: Capacity,
    pub load_factor: f64,
    pub slots_per_guard: usize,
    pub hyphens: Hyphens,
    pub strategy: Strategy,
    pub hasher: HashKind,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workers: available_parallelism().map(usize::from).unwrap_or(4),
            capacity: Capacity::default(),
            load_factor: DEFAULT_LOAD_FACTOR,
            slots_per_guard: DEFAULT_SLOTS_PER_GUARD,
            hyphens: Hyphens::default(),
            strategy: Strategy::default(),
            hasher: HashKind::default(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(ConfigError::LoadFactor(self.load_factor));
        }
        if self.slots_per_guard == 0 {
            return Err(ConfigError::NoSlotsPerGuard);
        }
        if self.capacity == Capacity::Fixed(0) {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Starting capacity of the shared table for an input of `bytes` bytes.
    pub fn shared_capacity(&self, bytes: u64) -> usize {
        match self.capacity {
            Capacity::Fixed(n) => n,
            Capacity::Estimate => estimate_capacity(bytes),
        }
    }

    /// Starting capacity of each worker's private table.
    pub fn private_capacity(&self, bytes: u64) -> usize {
        (self.shared_capacity(bytes) / self.workers.max(1)).max(MIN_PRIVATE_CAPACITY)
    }
}

/**
    Builder for [`Config`]. Unset values keep their defaults.
*/
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn capacity(mut self, capacity: Capacity) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.config.load_factor = load_factor;
        self
    }

    pub fn slots_per_guard(mut self, slots_per_guard: usize) -> Self {
        self.config.slots_per_guard = slots_per_guard;
        self
    }

    pub fn hyphens(mut self, hyphens: Hyphens) -> Self {
        self.config.hyphens = hyphens;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn hasher(mut self, hasher: HashKind) -> Self {
        self.config.hasher = hasher;
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_has_a_floor() {
        assert_eq!(estimate_capacity(0), 100);
        assert_eq!(estimate_capacity(2_000), 100);
        assert_eq!(estimate_capacity(5_000), 200);
        assert_eq!(estimate_capacity(1_000_000), 40_000);
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.workers >= 1);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.capacity, Capacity::Estimate);
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert_eq!(
            Config::builder().workers(0).build(),
            Err(ConfigError::NoWorkers)
        );
        assert_eq!(
            Config::builder().load_factor(0.0).build(),
            Err(ConfigError::LoadFactor(0.0))
        );
        assert_eq!(
            Config::builder().load_factor(1.2).build(),
            Err(ConfigError::LoadFactor(1.2))
        );
        assert!(Config::builder().load_factor(f64::NAN).build().is_err());
        assert_eq!(
            Config::builder().slots_per_guard(0).build(),
            Err(ConfigError::NoSlotsPerGuard)
        );
        assert_eq!(
            Config::builder().capacity(Capacity::Fixed(0)).build(),
            Err(ConfigError::ZeroCapacity)
        );
    }

    #[test]
    fn test_private_capacity_is_split_between_workers() {
        let config = Config::builder()
            .workers(4)
            .capacity(Capacity::Fixed(1000))
            .build()
            .unwrap();
        assert_eq!(config.shared_capacity(0), 1000);
        assert_eq!(config.private_capacity(0), 250);

        let config = Config::builder().workers(64).build().unwrap();
        assert_eq!(config.private_capacity(0), MIN_PRIVATE_CAPACITY);
    }
}
