#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line entry point for Path Defence.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use path_defence_cli::{
    config,
    headless::{self, Autopilot, HeadlessOptions},
    input::apply_frame_input,
    scene::{build_scene, populate_scene, CLEAR_COLOR},
};
use path_defence_rendering::{Presentation, RenderingBackend};
use path_defence_rendering_macroquad::MacroquadBackend;
use path_defence_simulation::Simulation;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "path-defence")]
#[command(about = "Tower defence along a fixed path")]
struct Cli {
    /// TOML file overriding the classic rules
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for every random draw, overriding the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Play a scripted run without opening a window
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = HeadlessOptions::default().max_ticks)]
    ticks: u64,

    /// Completed waves after which headless mode stops
    #[arg(long, default_value_t = HeadlessOptions::default().max_waves)]
    waves: u32,

    /// Log the frame rate once per second
    #[arg(long)]
    show_fps: bool,

    /// Synchronise frames with the display refresh rate (true) or render unthrottled (false)
    #[arg(long)]
    vsync: Option<bool>,
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut game_config =
        config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(seed) = cli.seed {
        game_config.seed = seed;
    }

    let mut simulation = Simulation::new(game_config).context("failed to build the level")?;

    if cli.headless {
        let _ = headless::run(
            &mut simulation,
            &mut Autopilot::classic(),
            HeadlessOptions {
                max_ticks: cli.ticks,
                max_waves: cli.waves,
            },
        );
        return Ok(());
    }

    let scene = build_scene(&simulation).context("failed to build the initial scene")?;
    let presentation = Presentation::new("Path Defence", CLEAR_COLOR, scene);
    let mut backend = MacroquadBackend::new().with_show_fps(cli.show_fps);
    if let Some(vsync) = cli.vsync {
        backend = backend.with_vsync(vsync);
    }
    backend
        .run(presentation, move |_dt, input, scene| {
            let _ = apply_frame_input(&mut simulation, &input);
            let _ = simulation.tick();
            populate_scene(&simulation, scene);
        })
}
