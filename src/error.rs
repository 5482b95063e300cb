use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/**
    Everything that can abort a counting run.

    Malformed tokens and lookup misses are not errors: the former are dropped by
    the normalizer, the latter show up as `None` from the table lookups.
*/
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("couldn't start the worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Rejected configuration values, named after the offending parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("workers must be at least 1")]
    NoWorkers,

    #[error("load factor must be in (0, 1], got {0}")]
    LoadFactor(f64),

    #[error("slots per guard must be at least 1")]
    NoSlotsPerGuard,

    #[error("capacity must be at least 1")]
    ZeroCapacity,
}

#[test]
fn test_error_messages_name_the_parameter() {
    assert!(ConfigError::LoadFactor(1.5).to_string().contains("1.5"));
    assert!(ConfigError::NoWorkers.to_string().contains("workers"));

    let err = Error::io(
        "missing.txt",
        io::Error::new(io::ErrorKind::NotFound, "not found"),
    );
    assert!(err.to_string().contains("missing.txt"));
    // the cause is reported by `source()`, not repeated in the message
    assert!(!err.to_string().contains("not found"));
    assert_eq!(
        std::error::Error::source(&err).map(|e| e.to_string()),
        Some(String::from("not found"))
    );
}
