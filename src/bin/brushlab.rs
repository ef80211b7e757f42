// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! brushlab CLI

use anyhow::{Context, Result};
use brushlab::cli::{replay_decals, survey_shapes, Reporter};
use brushlab::EditorConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brushlab")]
#[command(about = "Brush editing and decal projection core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./brushlab.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tessellation resolution and triangle counts for every shape
    Shapes {
        /// Complexity in [0, 2]
        #[arg(short = 'x', long, default_value = "1.0")]
        complexity: f32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replay seeded clicks against a target and report the placed decals
    Decals {
        /// Target mesh (STL); a flat slab is used when omitted
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Number of clicks to replay
        #[arg(short = 'n', long, default_value = "5")]
        clicks: usize,

        /// Placement seed, overriding the configuration
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Print the effective configuration as TOML
    Config,

    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<EditorConfig> {
    let mut config = match path {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::load()?,
    };
    if path.is_some() {
        config.apply_env_overrides()?;
    }
    Ok(config.sanitized())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(&cli);
    if let Err(ref err) = result {
        Reporter::report_error(&format!("{:#}", err));
    }
    result
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Shapes { complexity, json } => {
            let rows = survey_shapes(*complexity);
            if *json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                Reporter::report_shapes(*complexity, &rows);
            }
        }
        Commands::Decals {
            target,
            clicks,
            seed,
        } => {
            let mut config = load_config(cli.config.as_ref())?;
            if seed.is_some() {
                config.decals.seed = *seed;
            }
            let label = target
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "demo slab".to_string());
            let replay = replay_decals(&config, target.as_deref(), *clicks)
                .with_context(|| format!("Decal replay failed for {}", label))?;
            Reporter::report_decals(&label, &replay);
        }
        Commands::Config => {
            let config = load_config(cli.config.as_ref())?;
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to serialize config")?
            );
        }
        Commands::Version => {
            Reporter::report_info(&format!("brushlab v{}", env!("CARGO_PKG_VERSION")));
        }
    }

    Ok(())
}
