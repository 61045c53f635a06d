//! # Argo Downsample Entry Point
//!
//! Command-line front end over the profile library. Each subcommand reads a
//! JSON profile table, runs one pipeline stage and writes the result beside
//! any rejects it produced.


use anyhow::{Context, Result};
use argo_profile_lib::config::{Config, DEFAULT_CONFIG_PATH};
use argo_profile_lib::derived::{profile_metrics, ProfileMetrics};
use argo_profile_lib::qc::{filter_levels, ingest_flag};
use argo_profile_lib::select::downsample;
use argo_profile_lib::store;
use argo_profile_lib::{Profile, RejectReason, RejectRecord};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Argo profile filtering, downsampling and derived quantities", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH, value_hint = ValueHint::FilePath)]
    config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop flagged profiles and levels with unacceptable quality codes
    Filter(StageArgs),
    /// Keep one profile per space-time bin
    Downsample(StageArgs),
    /// Compute mixed-layer depth and dynamic height anomaly per profile
    Derive(StageArgs),
    /// Write the default configuration file
    InitConfig(InitConfigArgs),
}

#[derive(Parser, Debug)]
struct StageArgs {
    /// Input profile table (JSON)
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output table (JSON); rejects go to <stem>_rejects.json beside it
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct InitConfigArgs {
    /// Where to write the configuration
    #[arg(default_value = DEFAULT_CONFIG_PATH, value_hint = ValueHint::FilePath)]
    path: PathBuf,

    /// Overwrite an existing file
    #[arg(long, action = ArgAction::SetTrue)]
    force: bool,
}

/// Main application entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Filter(args) => handle_filter(&args, &Config::load_from_path(&cli.config)),
        Command::Downsample(args) => handle_downsample(&args, &Config::load_from_path(&cli.config)),
        Command::Derive(args) => handle_derive(&args, &Config::load_from_path(&cli.config)),
        Command::InitConfig(args) => handle_init_config(&args),
    }
}

fn read_table(path: &Path) -> Result<Vec<Profile>> {
    store::load_profiles(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_rejects(output: &Path, rejects: &[RejectRecord]) -> Result<()> {
    let path = store::save_rejects(output, rejects)
        .with_context(|| format!("failed to write rejects for {}", output.display()))?;
    info!(path = %path.display(), rejects = rejects.len(), "wrote rejects");
    Ok(())
}

/// Profiles carrying an ingest flag (their own, or a startup cycle or
/// pressure reversal found here) are rejected whole; the rest keep only their
/// acceptable levels.
fn handle_filter(args: &StageArgs, config: &Config) -> Result<()> {
    let profiles = read_table(&args.input)?;

    let (flagged, clean): (Vec<Profile>, Vec<Profile>) = profiles
        .into_iter()
        .map(|mut p| {
            p.flag = ingest_flag(&p);
            p
        })
        .partition(|p| p.flag != 0);
    let rejects: Vec<RejectRecord> = flagged
        .iter()
        .map(|p| RejectRecord::new(p, RejectReason::Qc(p.flag)))
        .collect();

    let filtered: Vec<Profile> = clean.par_iter().map(|p| filter_levels(p, &config.qc)).collect();

    store::save_profiles(&args.output, &filtered)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    write_rejects(&args.output, &rejects)?;

    info!(kept = filtered.len(), rejected = rejects.len(), "filtered profile table");
    Ok(())
}

fn handle_downsample(args: &StageArgs, config: &Config) -> Result<()> {
    let profiles = read_table(&args.input)?;
    let result = downsample(profiles, &config.binning);

    store::save_profiles(&args.output, &result.selected)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    write_rejects(&args.output, &result.rejects)
}

fn handle_derive(args: &StageArgs, config: &Config) -> Result<()> {
    let profiles = read_table(&args.input)?;

    let metrics: Vec<ProfileMetrics> = profiles
        .par_iter()
        .map(|p| profile_metrics(p, &config.derived))
        .collect::<Result<_, _>>()
        .context("derived quantities failed")?;

    store::save_rows(&args.output, &metrics)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    let mld = metrics.iter().filter(|m| m.mld.is_some()).count();
    let dha = metrics.iter().filter(|m| m.dha.is_some()).count();
    info!(profiles = metrics.len(), mld, dha, "wrote derived quantities");
    Ok(())
}

fn handle_init_config(args: &InitConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        anyhow::bail!("{} already exists (use --force to overwrite)", args.path.display());
    }
    Config::default()
        .save_to_path(&args.path)
        .with_context(|| format!("failed to write {}", args.path.display()))
}
