pub mod config;
pub mod error;
mod filtering;
pub mod io;
pub mod merge;
pub mod partition;
mod pipeline;
pub mod rank;
pub mod table;
pub mod worker;

pub use config::{Capacity, Config, ConfigBuilder};
pub use error::{ConfigError, Error, Result};
pub use filtering::*;
pub use pipeline::*;
