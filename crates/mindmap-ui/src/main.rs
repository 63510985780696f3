//! Mind-Map Viewer
//!
//! Usage:
//!   mindmap-viewer [--tree content.yaml] [--settings graph_settings.yaml]
//!
//! Without `--tree` the bundled sample tree is shown. Log level follows
//! `RUST_LOG` (default `info`).

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;
use mindmap_graph::{global_config, GraphSettings, MindMapSurface};
use mindmap_ui::{load_tree, sample_tree, MindMapApp};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "mindmap-viewer", about = "Explore a content tree as a mind map")]
struct Args {
    /// Content tree file (.json, .yaml or .yml)
    #[arg(long)]
    tree: Option<PathBuf>,

    /// Graph settings override (YAML)
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let root = match &args.tree {
        Some(path) => load_tree(path)?,
        None => sample_tree()?,
    };
    let settings = match &args.settings {
        Some(path) => GraphSettings::load(path)?,
        None => global_config().clone(),
    };
    let surface = MindMapSurface::new(root, settings)?;
    info!(nodes = surface.progress_report().total, "starting viewer");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Mind Map")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mind Map",
        native_options,
        Box::new(|cc| Ok(Box::new(MindMapApp::new(cc, surface)) as Box<dyn eframe::App>)),
    )
    .map_err(|e| anyhow!("viewer exited with error: {e}"))?;

    info!("viewer shut down cleanly");
    Ok(())
}
