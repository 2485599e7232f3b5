use clap::{Parser, Subcommand};
use pimon_core::cli;
use pimon_core::cli::watch::{WatchOptions, run_watch};
use pimon_core::logging::{self, LogMode, init_logging};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pimon",
    version,
    about = "pimon: priority inversion monitor for xv6 kernel logs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tail the kernel log and print boosts and inversions as they happen
    Watch {
        /// Path to the config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log file to tail, overriding the config
        #[arg(long)]
        log: Option<PathBuf>,

        /// Coloured one-line summaries
        #[arg(long, conflicts_with_all = ["raw", "stats"])]
        pretty: bool,

        /// JSON deltas, one per line
        #[arg(long, conflicts_with = "stats")]
        raw: bool,

        /// Live dashboard of the default scenario
        #[arg(long)]
        stats: bool,
    },

    /// Rebuild a scenario from a saved log and print its final statistics
    Replay {
        file: PathBuf,

        #[arg(long, default_value = "custom")]
        scenario: String,

        /// Path to the config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: cli::config::ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Watch {
            config,
            log,
            pretty,
            raw,
            stats,
        } => {
            let mode = if stats {
                LogMode::Stats
            } else if raw {
                LogMode::Raw
            } else if pretty {
                LogMode::Pretty
            } else {
                logging::default_log_mode()
            };
            run_watch(WatchOptions { config, log, mode })
        }

        Command::Replay {
            file,
            scenario,
            config,
            yaml,
        } => {
            init_logging();
            cli::replay::run_replay(&file, &scenario, config.as_deref(), yaml)
        }

        Command::Config { cmd } => {
            init_logging();
            cli::config::run(cmd)
        }
    };

    if let Err(e) = result {
        eprintln!("pimon: {e:#}");
        std::process::exit(1);
    }
}
