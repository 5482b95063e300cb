use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::path::PathBuf;

use crate::error::{Error, Result};

/**
    Input that every worker can open its own read cursor on.
*/
#[allow(clippy::len_without_is_empty)]
pub trait Source: Sync {
    type Reader: Read + Seek;

    /// Opens a fresh cursor positioned at the start of the input.
    fn open(&self) -> Result<Self::Reader>;

    /// Length of the input in bytes.
    fn len(&self) -> Result<u64>;

    /// Name used in log lines and error messages.
    fn name(&self) -> String;
}

/// A file on disk, reopened by every worker.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl Source for FileSource {
    type Reader = File;

    fn open(&self) -> Result<File> {
        File::open(&self.path).map_err(|e| Error::io(&self.path, e))
    }

    fn len(&self) -> Result<u64> {
        self.path
            .metadata()
            .map(|m| m.len())
            .map_err(|e| Error::io(&self.path, e))
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Input already held in memory.
#[derive(Clone, Copy)]
pub struct MemorySource<'a> {
    bytes: &'a [u8],
}

impl<'a> MemorySource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        MemorySource { bytes }
    }
}

impl<'a> fmt::Debug for MemorySource<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemorySource({} bytes)", self.bytes.len())
    }
}

impl<'a> Source for MemorySource<'a> {
    type Reader = Cursor<&'a [u8]>;

    fn open(&self) -> Result<Self::Reader> {
        Ok(Cursor::new(self.bytes))
    }

    fn len(&self) -> Result<u64> {
        Ok(self.bytes.len() as u64)
    }

    fn name(&self) -> String {
        String::from("<memory>")
    }
}

pub(crate) fn io_error(source: &impl Source, e: io::Error) -> Error {
    Error::io(source.name(), e)
}

#[test]
fn test_missing_file_reports_its_path() {
    let source = FileSource::new("/definitely/not/here.txt");
    let err = source.len().unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.txt"));
    assert!(source.open().is_err());
}

#[test]
fn test_memory_source_cursors_are_independent() {
    let source = MemorySource::new(b"abc");
    let mut first = source.open().unwrap();
    let mut byte = [0u8];
    first.read_exact(&mut byte).unwrap();

    let mut second = source.open().unwrap();
    let mut all = Vec::new();
    second.read_to_end(&mut all).unwrap();

    assert_eq!(byte, *b"a");
    assert_eq!(all, b"abc");
    assert_eq!(source.len().unwrap(), 3);
}
