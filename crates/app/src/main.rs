//! `pngwrap`: embed files in PNG images and get them back.
//!
//! # Usage
//!
//! ```text
//! pngwrap convert report.pdf photo.png    # encode / decode by extension
//! pngwrap encode data.bin --name a.bin    # store under another name
//! pngwrap decode data.bin.png -o out/     # extract into out/
//! pngwrap inspect data.bin.png            # chunk table
//! pngwrap selftest --seed 42              # in-memory round trips
//! ```

#![forbid(unsafe_code)]

mod config;
mod convert;
mod input_gen;
mod output;
mod selftest;
mod telemetry;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use pngwrap_core::metrics::Metrics;
use tracing::error;

use config::{Cli, Config, Task};

fn main() -> ExitCode {
    let config = Config::from_cli(Cli::parse());
    telemetry::init(&config.log_level);

    if config.print_config {
        config.print();
    }

    let mut metrics = Metrics::new();
    let result = run(&config, &mut metrics);
    metrics.complete();

    if let Err(e) = result {
        error!("{e:#}");
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    if config.print_metrics && !matches!(config.task, Task::Inspect(_)) {
        metrics.print_summary();
        metrics.print_result();
    }

    if metrics.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(config: &Config, metrics: &mut Metrics) -> Result<()> {
    let out_dir = config.out_dir.as_deref();

    match &config.task {
        Task::Convert(paths) => {
            for written in convert::convert_all(paths, out_dir, &config.decode, metrics) {
                println!("{}", written.display());
            }
        }
        Task::Encode { path, name } => {
            let written = convert::encode_file(path, name.as_deref(), out_dir, metrics)?;
            println!("{}", written.display());
        }
        Task::Decode(path) => {
            let written = convert::decode_file(path, out_dir, &config.decode, metrics)?;
            println!("{}", written.display());
        }
        Task::Inspect(path) => convert::inspect_file(path, metrics)?,
        Task::Selftest { seed, size, rounds } => {
            println!("Seed: {seed}");
            let mismatches = selftest::run(*seed, *size, *rounds, &config.decode, metrics)?;
            println!("Round trips: {} ok, {mismatches} mismatched", rounds - mismatches);
        }
    }

    Ok(())
}
