#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads Upside Home levels and drives sessions headlessly.

mod config;
mod script;
mod session;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use upside_home_core::{LevelIndex, TilePosition};
use upside_home_rendering::format_elapsed;
use upside_home_world::{query, World};

use crate::{
    config::GameConfig,
    session::{LogAudio, LogRenderer, Session},
};

/// Headless driver for the Upside Home maze game
#[derive(Parser)]
#[command(name = "upside-home", version, about, long_about = None)]
struct Cli {
    /// Game configuration file
    #[arg(short, long, value_name = "FILE", default_value = "upside-home.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Print the entry, exit and key placement solved for every level
    Inspect,

    /// Replay an input script through the frame loop
    Play(PlayArgs),
}

#[derive(Args)]
struct PlayArgs {
    /// Input script to replay
    #[arg(short, long, value_name = "FILE")]
    script: PathBuf,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

/// Entry point for the Upside Home command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GameConfig::load(&cli.config)?;
    let base = cli
        .config
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let levels = config.load_levels(&base)?;
    let world = World::new(config.session, levels).context("failed to assemble session")?;
    info!(levels = query::level_count(&world), "session loaded");

    match cli.command {
        Mode::Inspect => {
            inspect(&world);
            Ok(())
        }
        Mode::Play(args) => play(world, config.viewport.extent(), &args),
    }
}

fn inspect(world: &World) {
    for index in 0..query::level_count(world) {
        let level = LevelIndex::new(index);
        let (Some(grid), Some(topology)) = (
            query::level_grid(world, level),
            query::level_topology(world, level),
        ) else {
            continue;
        };

        println!(
            "level {}: {}x{} tiles, tile size {}",
            level.ordinal(),
            grid.columns(),
            grid.rows(),
            grid.tile_length()
        );
        println!("  entry {}", tile(topology.entry));
        println!("  exit  {}", tile(topology.exit));
        println!(
            "  key   {} at distance {}",
            tile(topology.key_tile),
            topology.key_distance
        );
    }
}

fn play(world: World, viewport: glam::Vec2, args: &PlayArgs) -> Result<()> {
    if args.fps == 0 {
        anyhow::bail!("fps must be positive");
    }

    let source = fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script {}", args.script.display()))?;
    let steps = script::parse(&source)
        .with_context(|| format!("invalid script {}", args.script.display()))?;

    let mut session = Session::new(
        world,
        viewport,
        args.fps,
        LogRenderer::default(),
        LogAudio,
    );
    let summary = session.run(&steps)?;

    println!("final state: {:?}", summary.state);
    println!("frames: {}", summary.frames);
    println!("time: {}", format_elapsed(summary.elapsed));
    Ok(())
}

fn tile(position: TilePosition) -> String {
    format!("({}, {})", position.column(), position.row())
}
