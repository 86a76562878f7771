// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line front end.
//!
//! Wires the configuration surface to the dispatcher and renders progress as
//! log lines. All algorithmic behaviour lives in the library.

use anyhow::Result;
use circular_codes::dispatch::{Dispatcher, SearchConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "circodes", about = "Count circular trinucleotide codes of a given length")]
struct Args {
    /// Code length L (1..=20).
    #[arg(short, long)]
    length: usize,

    /// Number of worker threads.
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Number of partitions to split the search space into.
    #[arg(short, long, default_value_t = 1)]
    partitions: u64,

    /// Count (and only persist) maximal circular codes.
    #[arg(short, long)]
    maximal: bool,

    /// Write the sorted circular codes to this file. Omit to count only.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let count_maximal = args.maximal;

    let config = SearchConfig {
        length: args.length,
        partitions: args.partitions,
        workers: args.threads,
        count_maximal,
        output: args.output,
        poll_interval: Duration::from_millis(1000),
    };

    let progress = Arc::new(|subject: &str, fraction: f32| {
        info!("{} {}%", subject, (fraction * 100.0).round());
    });

    let dispatcher = Dispatcher::new(config, progress)?;
    let summary = dispatcher.launch();

    println!("Generated: {}", summary.generated);
    println!("Circular codes: {}", summary.circular);
    if count_maximal {
        println!("Maximals: {}", summary.maximal);
    }
    println!("Running time: {:.3}s", summary.elapsed.as_secs_f64());
    if summary.cancelled {
        println!("Cancelled");
    }
    Ok(())
}
