mod app;
mod chart;
mod color;
mod config;
mod dashboard;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, anyhow};
use app::TvShowApp;
use clap::Parser;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = config::Cli::parse();

    // The table is read once here and shared read-only for the whole run.
    let table = data::loader::load_file(&cli.data)
        .with_context(|| format!("loading {}", cli.data.display()))
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))?;
    log::info!(
        "Loaded {} rows ({} shows, {} genres, {} networks) from {}",
        table.len(),
        table.show_count(),
        table.domains.genres.len(),
        table.domains.networks.len(),
        cli.data.display()
    );
    let table = Arc::new(table);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cli.width, cli.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TV Show Database",
        options,
        Box::new(move |_cc| Ok(Box::new(TvShowApp::new(table)))),
    )
    .map_err(|e| anyhow!("window error: {e}"))
}
