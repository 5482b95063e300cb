use std::collections::HashMap;
use std::fs;
use std::io::Cursor;

use itertools::Itertools;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use wordfreq::io::write_ranked;
use wordfreq::partition::partition_bytes;
use wordfreq::table::{HashKind, LocalTable};
use wordfreq::worker::{Strategy, Worker};
use wordfreq::{
    count_bytes, count_file, Capacity, Config, Error, Hyphens, NormalizeIterator, Tokens,
};

const VOCABULARY: &[&str] = &[
    "the", "The", "THE", "cat", "Cat.", "sat", "on", "mat,", "x-ray", "X-Ray", "well--known",
    "don't", "\"quoted\"", "42", "--", "café", "naïve", "a", "I", "zebra!", "-edge-",
];

fn corpus(seed: u64, words: usize) -> Vec<u8> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let separators = [" ", "  ", "\n", "\t", " \r\n"];
    let mut text = String::new();
    for _ in 0..words {
        text.push_str(VOCABULARY[rng.gen_range(0..VOCABULARY.len())]);
        text.push_str(separators[rng.gen_range(0..separators.len())]);
    }
    text.into_bytes()
}

fn reference_counts(text: &[u8], hyphens: Hyphens) -> HashMap<String, u64> {
    Tokens::new(text)
        .normalized(hyphens)
        .counts()
        .into_iter()
        .map(|(word, n)| (word, n as u64))
        .collect()
}

fn config(workers: usize, strategy: Strategy) -> Config {
    Config::builder()
        .workers(workers)
        .strategy(strategy)
        .build()
        .unwrap()
}

#[test]
fn sample_sentence_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("output.txt");
    fs::write(&input, "the Cat sat on the mat. THE cat ran.").unwrap();

    for workers in [1, 4] {
        let report = count_file(&input, &config(workers, Strategy::Auto)).unwrap();
        write_ranked(&output, &report.ranked).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "the: 3");
        assert_eq!(lines[1], "cat: 2");
        assert!(lines[2..].iter().all(|l| l.ends_with(": 1")));
    }
}

#[test]
fn empty_file_gives_empty_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.txt");
    let output = dir.path().join("output.txt");
    fs::write(&input, "").unwrap();

    let report = count_file(&input, &config(3, Strategy::Shared)).unwrap();
    write_ranked(&output, &report.ranked).unwrap();

    assert!(output.exists());
    assert_eq!(fs::metadata(&output).unwrap().len(), 0);
}

#[test]
fn single_word_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hello.txt");
    let output = dir.path().join("output.txt");
    fs::write(&input, "Hello").unwrap();

    let report = count_file(&input, &config(2, Strategy::Private)).unwrap();
    write_ranked(&output, &report.ranked).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "hello: 1\n");
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.txt");

    match count_file(&input, &config(2, Strategy::Auto)) {
        Err(Error::Io { path, .. }) => assert_eq!(path, input),
        other => panic!("expected an i/o error, got {:?}", other.map(|r| r.ranked)),
    }
}

#[test]
fn counts_are_conserved_across_workers_and_strategies() {
    let text = corpus(7, 5_000);
    for hyphens in [Hyphens::Keep, Hyphens::Drop] {
        let expected = reference_counts(&text, hyphens);

        for strategy in [Strategy::Shared, Strategy::Private] {
            for workers in 1..=8 {
                let config = Config::builder()
                    .workers(workers)
                    .strategy(strategy)
                    .hyphens(hyphens)
                    .capacity(Capacity::Fixed(4))
                    .slots_per_guard(3)
                    .build()
                    .unwrap();
                let report = count_bytes(&text, &config).unwrap();

                let counted: HashMap<_, _> = report
                    .ranked
                    .iter()
                    .map(|w| (w.content.clone(), w.count))
                    .collect();
                assert_eq!(counted, expected, "{:?} with {} workers", strategy, workers);
            }
        }
    }
}

#[test]
fn polynomial_hash_gives_the_same_counts() {
    let text = corpus(11, 2_000);
    let fnv = count_bytes(&text, &config(4, Strategy::Shared)).unwrap();
    let poly = Config::builder()
        .workers(4)
        .strategy(Strategy::Private)
        .hasher(HashKind::Polynomial)
        .build()
        .unwrap();
    let poly = count_bytes(&text, &poly).unwrap();

    assert_eq!(fnv.ranked, poly.ranked);
}

#[test]
fn ranking_is_non_increasing_and_deterministic() {
    let text = corpus(3, 3_000);
    let first = count_bytes(&text, &config(6, Strategy::Shared)).unwrap().ranked;
    let second = count_bytes(&text, &config(2, Strategy::Private)).unwrap().ranked;

    assert!(first
        .iter()
        .tuple_windows()
        .all(|(a, b)| a.count > b.count || (a.count == b.count && a.content < b.content)));
    assert_eq!(first, second);
}

#[test]
fn arbitrary_splits_count_every_word_once() {
    let text = corpus(5, 300);
    let expected = reference_counts(&text, Hyphens::Keep);
    let mut rng = SmallRng::seed_from_u64(99);

    for _ in 0..50 {
        let mut cuts: Vec<u64> = (0..rng.gen_range(1..6))
            .map(|_| rng.gen_range(0..=text.len() as u64))
            .collect();
        cuts.push(0);
        cuts.push(text.len() as u64);
        cuts.sort_unstable();

        let mut total = LocalTable::with_capacity(8);
        for (index, (start, end)) in cuts.into_iter().tuple_windows().enumerate() {
            let mut table = LocalTable::with_capacity(8);
            Worker::new(index, start..end, Hyphens::Keep)
                .run(Cursor::new(&text), &mut table)
                .unwrap();
            total.merge_from(table);
        }

        let counted: HashMap<_, _> = total.into_iter().map(|e| (e.key, e.count)).collect();
        assert_eq!(counted, expected);
    }
}

#[test]
fn partition_boundaries_never_split_words() {
    let text = corpus(13, 1_000);
    for workers in [1, 2, 5, 16, 64] {
        let ranges = partition_bytes(&text, workers);
        assert_eq!(ranges.len(), workers);
        for range in &ranges[..workers - 1] {
            let end = range.end as usize;
            assert!(end == text.len() || text[end].is_ascii_whitespace());
        }
    }
}
