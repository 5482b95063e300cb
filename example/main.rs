use std::env::args;

use wordfreq::worker::Strategy;
use wordfreq::{count_bytes, count_file, Config};

fn main() {
    env_logger::init();

    let config = Config::builder()
        .strategy(Strategy::Private)
        .build()
        .expect("default config is valid");

    let report = match args().nth(1) {
        Some(path) => count_file(path, &config).expect("couldn't count file"),
        None => count_bytes(
            b"the Cat sat on the mat. THE cat ran. A well-known x-ray of the cat.",
            &config,
        )
        .expect("counting in memory doesn't fail"),
    };

    for word in report.ranked.top(20) {
        println!("{}", word);
    }
    println!(
        "{} words, {} distinct, {} collisions",
        report.words(),
        report.ranked.len(),
        report.metrics.collisions
    );
}
