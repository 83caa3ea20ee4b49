//! Configuration for the pngwrap application.
//!
//! Command-line arguments are parsed with clap and resolved into a [`Config`]
//! with every default filled in, so a run can be printed and reproduced.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pngwrap_core::DecodeOptions;

#[derive(Debug, Parser)]
#[command(
    name = "pngwrap",
    version,
    about = "Embed any file in a PNG image, and get it back"
)]
pub struct Cli {
    /// Directory for output files (default: next to each input).
    #[arg(short, long, global = true)]
    pub out_dir: Option<PathBuf>,

    /// Do not verify chunk CRCs when decoding.
    #[arg(long, global = true, default_value_t = false)]
    pub skip_crc: bool,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Print the resolved configuration before running.
    #[arg(long, global = true, default_value_t = false)]
    pub print_config: bool,

    /// Don't print the metrics summary.
    #[arg(long, global = true, default_value_t = false)]
    pub no_metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Convert each path: `.png` files are decoded, anything else is encoded.
    Convert {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Embed a file in a new PNG container.
    Encode {
        path: PathBuf,
        /// Name to store instead of the input's file name.
        #[arg(long)]
        name: Option<String>,
    },

    /// Extract the file embedded in a PNG container.
    Decode { path: PathBuf },

    /// List the chunks of a PNG container.
    Inspect { path: PathBuf },

    /// Round-trip generated sample files in memory.
    Selftest {
        /// Random seed for determinism (default: time-based).
        #[arg(long)]
        seed: Option<u64>,
        /// Size of each sample file in bytes.
        #[arg(long, default_value_t = 256 * 1024)]
        size: usize,
        /// Number of sample files.
        #[arg(long, default_value_t = 8)]
        rounds: usize,
    },
}

/// What a run does, with defaults resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Convert(Vec<PathBuf>),
    Encode { path: PathBuf, name: Option<String> },
    Decode(PathBuf),
    Inspect(PathBuf),
    Selftest { seed: u64, size: usize, rounds: usize },
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub task: Task,

    /// Output directory (None = next to each input)
    pub out_dir: Option<PathBuf>,

    pub decode: DecodeOptions,

    /// Fallback log filter when RUST_LOG is unset
    pub log_level: String,

    pub print_config: bool,

    pub print_metrics: bool,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Self {
        let task = match cli.command {
            Command::Convert { paths } => Task::Convert(paths),
            Command::Encode { path, name } => Task::Encode { path, name },
            Command::Decode { path } => Task::Decode(path),
            Command::Inspect { path } => Task::Inspect(path),
            Command::Selftest { seed, size, rounds } => Task::Selftest {
                seed: seed.unwrap_or_else(time_seed),
                size,
                rounds,
            },
        };

        let decode = if cli.skip_crc {
            DecodeOptions::lenient()
        } else {
            DecodeOptions::default()
        };

        Config {
            task,
            out_dir: cli.out_dir,
            decode,
            log_level: cli.log_level,
            print_config: cli.print_config,
            print_metrics: !cli.no_metrics,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.task {
            Task::Convert(paths) => {
                println!("Task: convert {} path(s)", paths.len());
                for p in paths {
                    println!("  {}", p.display());
                }
            }
            Task::Encode { path, name } => {
                println!("Task: encode {}", path.display());
                if let Some(name) = name {
                    println!("Stored name: {name}");
                }
            }
            Task::Decode(path) => println!("Task: decode {}", path.display()),
            Task::Inspect(path) => println!("Task: inspect {}", path.display()),
            Task::Selftest { seed, size, rounds } => {
                println!("Task: selftest");
                println!("Seed: {seed}");
                println!("Sample size: {} bytes ({} KiB)", size, size / 1024);
                println!("Rounds: {rounds}");
            }
        }
        println!(
            "Output dir: {}",
            self.out_dir
                .as_ref()
                .map_or("(next to input)".to_string(), |p| p.display().to_string())
        );
        println!("Verify CRC: {}", self.decode.verify_crc);
        println!("Log level: {}", self.log_level);
        println!();
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let cli = Cli::try_parse_from(std::iter::once("pngwrap").chain(args.iter().copied()))
            .expect("parse failed");
        Config::from_cli(cli)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["decode", "x.png"]);
        assert_eq!(config.task, Task::Decode(PathBuf::from("x.png")));
        assert!(config.decode.verify_crc);
        assert!(config.print_metrics);
        assert!(!config.print_config);
        assert_eq!(config.log_level, "info");
        assert!(config.out_dir.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let config = parse(&["convert", "a.txt", "b.png", "--skip-crc", "--out-dir", "out", "--no-metrics"]);
        assert_eq!(
            config.task,
            Task::Convert(vec![PathBuf::from("a.txt"), PathBuf::from("b.png")])
        );
        assert!(!config.decode.verify_crc);
        assert!(!config.print_metrics);
        assert_eq!(config.out_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_encode_name_override() {
        let config = parse(&["encode", "data.bin", "--name", "renamed.bin"]);
        assert_eq!(
            config.task,
            Task::Encode {
                path: PathBuf::from("data.bin"),
                name: Some("renamed.bin".to_string()),
            }
        );
    }

    #[test]
    fn test_selftest_seed() {
        let config = parse(&["selftest", "--seed", "42", "--rounds", "3"]);
        assert_eq!(
            config.task,
            Task::Selftest {
                seed: 42,
                size: 256 * 1024,
                rounds: 3
            }
        );
    }

    #[test]
    fn test_convert_requires_paths() {
        assert!(Cli::try_parse_from(["pngwrap", "convert"]).is_err());
    }
}
