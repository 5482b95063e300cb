use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::ops::Range;

use log::debug;

use crate::filtering::{normalize, Hyphens};
use crate::table::Counter;

/// Above this many workers `Strategy::Auto` counts into private tables.
pub const PRIVATE_TABLE_THRESHOLD: usize = 4;

/**
    Where workers put their counts.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Every worker increments the shared table directly.
    Shared,
    /// Every worker fills its own table, which is merged into the shared one afterwards.
    Private,
    /// `Private` for more than [`PRIVATE_TABLE_THRESHOLD`] workers, `Shared` otherwise.
    #[default]
    Auto,
}

impl Strategy {
    pub fn resolve(self, workers: usize) -> Strategy {
        match self {
            Strategy::Auto if workers > PRIVATE_TABLE_THRESHOLD => Strategy::Private,
            Strategy::Auto => Strategy::Shared,
            fixed => fixed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Whitespace separated tokens owned by the worker.
    pub tokens: u64,
    /// Tokens that survived normalization and were counted.
    pub words: u64,
    /// Bytes read, including the tail of a word finished past the range end.
    pub bytes: u64,
}

/**
    Counts the words of one byte range.

    A word belongs to the range holding its first byte. The worker skips the tail of a word
    that started before its range and reads past the end of its range to finish the last word
    it started, so any split of the input counts every word exactly once.
*/
#[derive(Debug, Clone)]
pub struct Worker {
    pub index: usize,
    pub range: Range<u64>,
    pub hyphens: Hyphens,
}

impl Worker {
    pub fn new(index: usize, range: Range<u64>, hyphens: Hyphens) -> Self {
        Worker {
            index,
            range,
            hyphens,
        }
    }

    /// Reads the range from `source`, its own cursor over the input, into `counter`.
    pub fn run<R, C>(&self, mut source: R, counter: &mut C) -> io::Result<WorkerStats>
    where
        R: Read + Seek,
        C: Counter + ?Sized,
    {
        let Range { start, end } = self.range.clone();
        let mut stats = WorkerStats::default();
        if start >= end {
            return Ok(stats);
        }

        // inside a word that belongs to the previous range
        let mut skipping = false;
        if start > 0 {
            source.seek(SeekFrom::Start(start - 1))?;
            let mut previous = [0u8];
            source.read_exact(&mut previous)?;
            skipping = !previous[0].is_ascii_whitespace();
        } else {
            source.seek(SeekFrom::Start(0))?;
        }

        let mut reader = BufReader::new(source);
        let mut token = Vec::new();
        let mut pos = start;

        let mut done = false;
        while !done {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }

            let mut consumed = 0;
            for &b in buf {
                if pos >= end && token.is_empty() {
                    done = true;
                    break;
                }

                if b.is_ascii_whitespace() {
                    skipping = false;
                    if !token.is_empty() {
                        self.emit(&token, counter, &mut stats);
                        token.clear();
                    }
                } else if !skipping {
                    token.push(b);
                }

                pos += 1;
                consumed += 1;
            }
            reader.consume(consumed);
        }

        if !token.is_empty() {
            self.emit(&token, counter, &mut stats);
        }
        stats.bytes = pos - start;

        debug!(
            "worker {} finished {}..{}: {} tokens, {} words, {} bytes read",
            self.index, start, end, stats.tokens, stats.words, stats.bytes
        );
        Ok(stats)
    }

    fn emit<C>(&self, token: &[u8], counter: &mut C, stats: &mut WorkerStats)
    where
        C: Counter + ?Sized,
    {
        stats.tokens += 1;
        if let Some(key) = normalize(token, self.hyphens) {
            counter.count(&key);
            stats.words += 1;
        }
    }
}
