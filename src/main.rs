use anyhow::Context;
use clap::Parser;
use macroquad::prelude::*;
use std::path::{Path, PathBuf};
use tilestep::config::GameConfig;
use tilestep::platform::{draw_scene, frame_input, Assets};
use tilestep::{load_map, Scene};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Walk a tile map with collision, a follow camera and animated sprites.
#[derive(Debug, Parser)]
#[command(name = "tilestep", version, about)]
struct Args {
    /// Map file, binary (.bin) or Tiled JSON (.json)
    map: PathBuf,

    /// Game config JSON; every field is optional
    #[arg(long, env = "TILESTEP_CONFIG")]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn window_conf() -> Conf {
    // Bad arguments are reported by `Args::parse` in main.
    let window = Args::try_parse()
        .ok()
        .and_then(|args| GameConfig::resolve(args.config.as_deref()).ok())
        .map(|c| c.window)
        .unwrap_or_default();
    Conf {
        window_title: window.title,
        window_width: window.width,
        window_height: window.height,
        high_dpi: true,
        ..Default::default()
    }
}

fn setup(args: &Args) -> anyhow::Result<(Scene, Assets, GameConfig)> {
    let config = GameConfig::resolve(args.config.as_deref())?;

    let map = load_map(&args.map).with_context(|| format!("Loading map {}", args.map.display()))?;
    let mut scene = Scene::new(map, &config).context("Building scene")?;

    let map_dir = args.map.parent().unwrap_or(Path::new("."));
    let assets = Assets::load(&mut scene, map_dir, &config)?;
    Ok((scene, assets, config))
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();
    init_tracing();

    let (mut scene, assets, config) = match setup(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    };
    info!(map = %args.map.display(), debug_collision = config.debug_collision, "entering frame loop");

    loop {
        let frame = frame_input();
        scene.update(&frame);
        draw_scene(&scene, &assets, frame.screen, config.debug_collision);
        next_frame().await;
    }
}
