use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use log::{info, LevelFilter};

use wordfreq::io::write_ranked;
use wordfreq::table::HashKind;
use wordfreq::worker::Strategy;
use wordfreq::{count_file, Capacity, Config, Hyphens};

/// Counts word frequencies in a text file with parallel workers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Text file to count.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the `<word>: <count>` lines.
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// Number of workers; defaults to the available parallelism.
    #[arg(short, long)]
    workers: Option<usize>,

    /// Initial slots of the shared table; estimated from the file size if omitted.
    #[arg(short, long)]
    capacity: Option<usize>,

    #[arg(long, default_value_t = 0.75)]
    load_factor: f64,

    /// Slots covered by one lock of the shared table.
    #[arg(long, default_value_t = 64)]
    slots_per_guard: usize,

    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    strategy: StrategyArg,

    #[arg(long, value_enum, default_value_t = HashArg::Fnv1a)]
    hash: HashArg,

    /// Drop hyphens inside words instead of keeping them.
    #[arg(long)]
    no_hyphens: bool,

    /// Log table statistics after the run.
    #[arg(long)]
    stats: bool,

    /// More log output, repeat for trace.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Shared,
    Private,
    Auto,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HashArg {
    Fnv1a,
    Polynomial,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let mut builder = Config::builder()
            .load_factor(self.load_factor)
            .slots_per_guard(self.slots_per_guard)
            .hyphens(if self.no_hyphens {
                Hyphens::Drop
            } else {
                Hyphens::Keep
            })
            .strategy(match self.strategy {
                StrategyArg::Shared => Strategy::Shared,
                StrategyArg::Private => Strategy::Private,
                StrategyArg::Auto => Strategy::Auto,
            })
            .hasher(match self.hash {
                HashArg::Fnv1a => HashKind::Fnv1a,
                HashArg::Polynomial => HashKind::Polynomial,
            });

        if let Some(workers) = self.workers {
            builder = builder.workers(workers);
        }
        if let Some(capacity) = self.capacity {
            builder = builder.capacity(Capacity::Fixed(capacity));
        }

        Ok(builder.build()?)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    if verbose > 0 {
        builder.filter_level(level);
    }
    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.config().context("invalid arguments")?;
    let report = count_file(&args.input, &config)
        .with_context(|| format!("couldn't count {}", args.input.display()))?;

    write_ranked(&args.output, &report.ranked)
        .with_context(|| format!("couldn't write {}", args.output.display()))?;

    info!(
        "wrote {} words to {}",
        report.ranked.len(),
        args.output.display()
    );
    for word in report.ranked.top(10) {
        log::debug!("{}", word);
    }

    if args.stats {
        let m = report.metrics;
        info!(
            "{:?} tables: {} increments, {} keys inserted, {} collisions, {} resizes, {} final slots",
            report.strategy, m.increments, m.inserts, m.collisions, m.resizes, report.capacity
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_raises_log_level() {
        init_logging(1);
        assert!(log::log_enabled!(log::Level::Debug));
        assert!(!log::log_enabled!(log::Level::Trace));
    }
}
