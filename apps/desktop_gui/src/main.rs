use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{load_settings, FileStore, KeyValueStore, MemoryStore, Settings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::TallyApp;

#[derive(Parser, Debug)]
struct Args {
    /// Config file (defaults to ./tally.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    fullscreen: bool,
}

/// Falls back to a session-only store so a broken state file never blocks
/// the station from starting.
fn open_state_store(settings: &Settings) -> Box<dyn KeyValueStore> {
    match FileStore::open(&settings.state_path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            tracing::warn!(
                path = %settings.state_path.display(),
                "state file unavailable, settings will not persist: {err}"
            );
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Tally Counting Station")
            .with_inner_size([1024.0, 700.0])
            .with_min_inner_size([720.0, 520.0])
            .with_fullscreen(args.fullscreen),
        ..Default::default()
    };
    eframe::run_native(
        "Tally Counting Station",
        options,
        Box::new(move |_cc| {
            let store = open_state_store(&settings);
            let mut app = TallyApp::new(cmd_tx, ui_rx, &settings, store);
            if args.fullscreen {
                app.mark_fullscreen();
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("counting station window failed: {err}"))
}
