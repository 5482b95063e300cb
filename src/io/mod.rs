pub mod file;
mod source;

pub use file::write_ranked;
pub use source::{FileSource, MemorySource, Source};

pub(crate) use source::io_error;
