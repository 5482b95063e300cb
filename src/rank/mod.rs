use std::fmt;
use std::io::{self, Write};

use rayon::slice::ParallelSliceMut;

use crate::table::{ConcurrentTable, Entry};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    pub content: String,
    pub count: u64,
}

impl Word {
    pub fn with_count(content: impl Into<String>, count: u64) -> Self {
        Self {
            content: content.into(),
            count,
        }
    }
}

impl From<Entry> for Word {
    fn from(entry: Entry) -> Self {
        Word {
            content: entry.key,
            count: entry.count,
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.content, self.count)
    }
}

/**
    Words ordered by descending count.

    Words with the same count are ordered alphabetically, so the same input always
    produces the same output regardless of how the table laid out its entries.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankedWords(pub Vec<Word>);

impl RankedWords {
    pub fn from_entries<I>(entries: I) -> RankedWords
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut n: Vec<Word> = entries.into_iter().map(Word::from).collect();

        n.par_sort_by(|w, w2| {
            w2.count
                .cmp(&w.count)
                .then_with(|| w.content.cmp(&w2.content))
        });

        RankedWords(n)
    }

    /// Drains the shared table. The table is gone afterwards.
    pub fn from_table(table: ConcurrentTable) -> RankedWords {
        RankedWords::from_entries(table.into_entries())
    }

    pub fn top(&self, n: usize) -> &[Word] {
        &self.0[..n.min(self.0.len())]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.0.iter()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|w| w.count).sum()
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for word in &self.0 {
            writeln!(out, "{}", word)?;
        }
        Ok(())
    }
}

impl fmt::Display for RankedWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in &self.0 {
            writeln!(f, "{}", word)?;
        }
        Ok(())
    }
}

impl IntoIterator for RankedWords {
    type Item = Word;
    type IntoIter = std::vec::IntoIter<Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::LocalTable;
    use itertools::Itertools;

    fn rank(s: &str) -> RankedWords {
        let mut table = LocalTable::with_capacity(4);
        for word in s.split_whitespace() {
            table.increment(word);
        }
        RankedWords::from_entries(table)
    }

    #[test]
    fn test_rank_orders_by_count() {
        let ranked = rank("the cat sat on the mat the cat ran");
        assert_eq!(ranked.0[0], Word::with_count("the", 3));
        assert_eq!(ranked.0[1], Word::with_count("cat", 2));
        assert!(ranked
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.count >= b.count));
    }

    #[test]
    fn test_ties_are_alphabetical() {
        let ranked = rank("pear apple fig apple pear fig kiwi");
        let order: Vec<_> = ranked.iter().map(|w| w.content.as_str()).collect();
        assert_eq!(order, vec!["apple", "fig", "pear", "kiwi"]);
    }

    #[test]
    fn test_display_matches_output_format() {
        let ranked = rank("hello");
        assert_eq!(ranked.to_string(), "hello: 1\n");

        let mut out = Vec::new();
        ranked.write_to(&mut out).unwrap();
        assert_eq!(out, b"hello: 1\n");
    }

    #[test]
    fn test_from_table_drains_shared_table() {
        let table = ConcurrentTable::with_capacity(4);
        for w in ["b", "a", "b", "c", "b", "a"] {
            table.increment(w);
        }
        let ranked = RankedWords::from_table(table);
        assert_eq!(
            ranked.0,
            vec![
                Word::with_count("b", 3),
                Word::with_count("a", 2),
                Word::with_count("c", 1)
            ]
        );
        assert_eq!(ranked.total(), 6);
    }

    #[test]
    fn test_top_is_clamped() {
        let ranked = rank("a b a");
        assert_eq!(ranked.top(1), &[Word::with_count("a", 2)]);
        assert_eq!(ranked.top(10).len(), 2);
        assert!(RankedWords::default().top(3).is_empty());
    }
}
