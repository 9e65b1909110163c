//! Disorderly Conduct headless runner
//!
//! Loads a map and plays a scripted session without a renderer, logging
//! how it went. Useful for balance checks and soak runs.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use disorderly_conduct::consts::*;
use disorderly_conduct::platform::{Button, InputSnapshot, LogAudio};
use disorderly_conduct::{Game, TileMap};

#[derive(Parser, Debug)]
#[command(name = "disorderly-conduct")]
#[command(about = "Run a headless Disorderly Conduct session with a scripted player")]
struct Cli {
    /// Built-in map slot (0 = warehouse, 1 = rooftops, 2 = arcade)
    #[arg(long, default_value_t = 0)]
    map: usize,
    /// Load the layout from a file instead (still scored in the --map slot)
    #[arg(long)]
    map_file: Option<PathBuf>,
    /// Frames to simulate at the fixed step
    #[arg(long, default_value_t = 3_600)]
    frames: u64,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Save record to read and update
    #[arg(long)]
    save: Option<PathBuf>,
    /// Force the tutorial even if it was completed before
    #[arg(long)]
    tutorial: bool,
    #[arg(long, short)]
    verbose: bool,
}

/// Scripted player: runs back and forth, hops and acts on a fixed rhythm
fn scripted_input(frame: u64) -> InputSnapshot {
    let mut snap = InputSnapshot::default();
    snap = if (frame / 90) % 2 == 0 {
        snap.hold(Button::Right)
    } else {
        snap.hold(Button::Left)
    };
    if frame % 40 == 0 {
        snap = snap.press(Button::Jump);
    }
    if frame % 25 == 0 {
        snap = snap.press(Button::Action);
    }
    snap
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if cli.map >= MAP_COUNT {
        bail!("map slot {} out of range (0..{})", cli.map, MAP_COUNT);
    }
    let (tiles, map_name) = match &cli.map_file {
        Some(path) => (
            TileMap::load(path)
                .with_context(|| format!("failed to load map file {}", path.display()))?,
            path.display().to_string(),
        ),
        None => (
            TileMap::builtin(cli.map).context("failed to load built-in map")?,
            TileMap::builtin_name(cli.map).unwrap_or_default().to_string(),
        ),
    };

    let mut game = Game::new(cli.save.clone(), LogAudio::default());
    let tutorial = cli.tutorial || game.wants_tutorial();
    game.begin(cli.map, tiles, cli.seed, tutorial);

    let mut died_at = None;
    for frame in 0..cli.frames {
        game.update(&scripted_input(frame), SIM_DT);

        let Some(session) = game.session() else {
            break;
        };
        if session.player_died && died_at.is_none() {
            died_at = Some(frame);
        }
        // Let the death play out for a second before stopping
        if died_at.is_some_and(|f| frame >= f + 30) {
            break;
        }
    }

    let sounds = game.audio().played;
    let Some(summary) = game.end() else {
        bail!("session ended unexpectedly");
    };
    println!(
        "map {} ({}) score {}{} | frames {} | kills {} takeovers {} | phase {} | sounds {}",
        summary.map_index,
        map_name,
        summary.score,
        if summary.got_highscore { " (new best)" } else { "" },
        summary.frames,
        summary.stats.kills,
        summary.stats.takeovers,
        summary.stats.phase,
        sounds,
    );
    Ok(())
}
