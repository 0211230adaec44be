#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Runebound level headlessly.
//!
//! The binary loads a campaign, drives the world and its systems with a fixed
//! frame delta and a scripted player, then prints a summary of the run.

mod content;
mod harness;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use runebound_core::LevelId;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::harness::{Harness, HarnessConfig};

/// How many narrative encounters are allocated per level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EncounterMode {
    /// Three encounters spread across the level.
    Multi,
    /// A single encounter around the middle of the level.
    Single,
}

/// Command-line arguments accepted by the Runebound binary.
#[derive(Debug, Parser)]
#[command(name = "runebound", about = "Plays a Runebound level headlessly.")]
struct Args {
    /// Campaign file to load. The bundled campaign is used when omitted.
    #[arg(long, value_name = "PATH")]
    content: Option<PathBuf>,
    /// Campaign level to play.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Plays the level as a retry instead of a first attempt.
    #[arg(long)]
    retry: bool,
    /// Seed shared by the spawning and encounter systems.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 20_000)]
    frames: usize,
    /// Simulated frame length in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 50)]
    frame_ms: u64,
    /// Encounter allocation mode.
    #[arg(long, value_enum, default_value_t = EncounterMode::Multi)]
    encounters: EncounterMode,
    /// Damage dealt by each scripted spell.
    #[arg(long, default_value_t = 6)]
    spell_damage: u32,
    /// Minimum time between scripted spells, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 750)]
    cast_cooldown_ms: u64,
    /// Tracing filter directive, overriding `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
}

fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .context("failed to install the tracing subscriber")
}

/// Entry point for the Runebound command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_filter.as_deref())?;

    let campaign = match &args.content {
        Some(path) => content::load(path)?,
        None => content::builtin()?,
    };

    let mut harness = Harness::new(
        campaign,
        HarnessConfig {
            seed: args.seed,
            single_encounter: args.encounters == EncounterMode::Single,
            spell_damage: args.spell_damage,
            cast_cooldown: Duration::from_millis(args.cast_cooldown_ms),
        },
    );
    harness.start(LevelId::new(args.level), !args.retry);
    let summary = harness.run(args.frames, Duration::from_millis(args.frame_ms));
    println!("{summary}");
    Ok(())
}
