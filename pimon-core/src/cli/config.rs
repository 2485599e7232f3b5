use crate::conf::{load_config, parse_config, validate_config};
use anyhow::{Context, Result, bail};
use clap::Subcommand;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to the config file
        #[arg(default_value = "pimon.hcl")]
        path: PathBuf,

        /// Print the validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print resolved configuration
    Dump {
        #[arg(default_value = "pimon.hcl")]
        path: PathBuf,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },
}

pub fn run(cmd: ConfigCmd) -> Result<()> {
    match cmd {
        ConfigCmd::Check { path, json } => check(&path, json),
        ConfigCmd::Dump { path, json, yaml } => dump(&path, json, yaml),
    }
}

pub fn check(path: &Path, json: bool) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg = parse_config(path, &source)?;
    let report = validate_config(&cfg);

    if json {
        println!("{}", report.render_json()?);
    } else if report.has_violations() {
        eprint!("{}", report.render_pretty());
    }

    if !report.errors.is_empty() {
        bail!("{} is not a valid configuration", path.display());
    }

    if !json {
        println!("✔ Config loaded successfully");
        println!("✔ {} scenarios", cfg.scenarios.len());
        println!(
            "✔ {} classification markers",
            cfg.scenarios.iter().map(|s| s.markers.len()).sum::<usize>()
        );
        println!("✔ default scenario: {}", cfg.default_scenario);
        println!("✔ watching {}", cfg.source.path.display());
    }

    Ok(())
}

pub fn dump(path: &Path, json: bool, yaml: bool) -> Result<()> {
    let cfg = load_config(path)?;

    if yaml {
        dump_yaml(&cfg)?;
    } else if json || !yaml {
        // default: json
        dump_json(&cfg)?;
    }

    Ok(())
}

pub(crate) fn dump_json<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

pub(crate) fn dump_yaml<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_yaml::to_string(value)?;
    println!("{s}");
    Ok(())
}
