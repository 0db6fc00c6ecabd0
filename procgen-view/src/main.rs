//! Application entry point for the procedural terrain and tree viewer.
//!
//! Builds the scene once from an optional RON config (first argument) and
//! hands it to [`Viewer`] for display.

mod config_file;
mod viewer;

use procgen_core::scene::{SceneConfig, build_scene};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match config_file::load_config(Path::new(&path)) {
            Ok(config) => {
                info!(%path, "loaded scene config");
                config
            }
            Err(err) => {
                warn!(%path, %err, "falling back to default scene config");
                SceneConfig::default()
            }
        },
        None => SceneConfig::default(),
    };

    let scene = match build_scene(&config) {
        Ok(scene) => scene,
        Err(err) => {
            error!(%err, "failed to build scene");
            std::process::exit(1);
        }
    };

    eframe::run_native(
        "Procgen Terrain",
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(Viewer::new(scene)))),
    )
}
