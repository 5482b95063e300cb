use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::rank::RankedWords;

/**
    Writes `<word>: <count>` lines, most frequent first.

    The lines go to a temporary file next to `filename` that replaces it once everything is
    written, so a failed write never leaves a truncated result behind.
*/
pub fn write_ranked(filename: impl AsRef<Path>, ranked: &RankedWords) -> Result<()> {
    let path = filename.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    {
        let mut out = BufWriter::new(tmp.as_file());
        ranked
            .write_to(&mut out)
            .and_then(|_| out.flush())
            .map_err(|e| Error::io(path, e))?;
    }
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

    Ok(())
}
