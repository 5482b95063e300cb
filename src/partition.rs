use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::ops::Range;

use itertools::Itertools;

/**
    Splits `len` bytes of `source` into `workers` contiguous ranges.

    Every boundary but the last starts at `i * len / workers` and is pushed forward to the
    next ASCII whitespace byte, so no range ends in the middle of a word. A boundary that
    runs into the end of the input is clamped to `len`. The ranges are returned in order,
    each one ending where the next one starts, the first starting at 0 and the last ending
    at `len`. Some of them may be empty.
*/
pub fn partition<R>(source: &mut R, len: u64, workers: usize) -> io::Result<Vec<Range<u64>>>
where
    R: Read + Seek,
{
    let workers = workers.max(1);
    let mut boundaries = Vec::with_capacity(workers + 1);
    boundaries.push(0);

    for i in 1..workers {
        let from = start_of_search(i, workers, len, &boundaries);
        boundaries.push(next_whitespace(source, from, len)?);
    }
    boundaries.push(len);

    Ok(into_ranges(boundaries))
}

/// [`partition`] over an in-memory buffer.
pub fn partition_bytes(bytes: &[u8], workers: usize) -> Vec<Range<u64>> {
    let workers = workers.max(1);
    let len = bytes.len() as u64;
    let mut boundaries = Vec::with_capacity(workers + 1);
    boundaries.push(0);

    for i in 1..workers {
        let from = start_of_search(i, workers, len, &boundaries);
        let boundary = bytes[from.min(len) as usize..]
            .iter()
            .position(u8::is_ascii_whitespace)
            .map_or(len, |offset| from + offset as u64);
        boundaries.push(boundary);
    }
    boundaries.push(len);

    into_ranges(boundaries)
}

/// `i * len / workers`, but never before the previous boundary.
fn start_of_search(i: usize, workers: usize, len: u64, boundaries: &[u64]) -> u64 {
    let naive = (i as u128 * len as u128 / workers as u128) as u64;
    naive.max(boundaries.last().copied().unwrap_or(0))
}

fn into_ranges(boundaries: Vec<u64>) -> Vec<Range<u64>> {
    boundaries
        .into_iter()
        .tuple_windows()
        .map(|(start, end)| start..end)
        .collect()
}

/// Position of the first whitespace byte at or after `from`, or `len` if there is none.
fn next_whitespace<R: Read + Seek>(source: &mut R, from: u64, len: u64) -> io::Result<u64> {
    if from >= len {
        return Ok(len);
    }

    source.seek(SeekFrom::Start(from))?;
    let mut reader = BufReader::new(source.take(len - from));
    let mut pos = from;

    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(len);
        }
        if let Some(offset) = buf.iter().position(u8::is_ascii_whitespace) {
            return Ok(pos + offset as u64);
        }
        let consumed = buf.len();
        pos += consumed as u64;
        reader.consume(consumed);
    }
}
