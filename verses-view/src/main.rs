//! Application entry point for the verses viewer.
//!
//! This binary parses the command line, installs logging, loads the
//! configuration and delegates all interactive logic and rendering to
//! [`Viewer`] from the `viewer` module.

mod viewer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use verses_core::{config::Config, content::Catalog};
use viewer::{ENTRIES, TITLE, Viewer};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file overriding layout and motion parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible layout.
    #[arg(long)]
    seed: Option<u64>,
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` once the window is closed.
/// - `Err` if the config file cannot be read or is invalid, or if eframe
///   fails to create the native window or event loop.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = load_config(args.config.as_deref())?;
    let catalog = Catalog::from_json(ENTRIES).context("built-in catalog is malformed")?;
    info!(entries = catalog.len(), seed = ?args.seed, "starting viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([480.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg, catalog, args.seed)))),
    )
    .map_err(|err| anyhow!("viewer failed: {err}"))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg = Config::from_json(&text)
        .with_context(|| format!("loading config {}", path.display()))?;
    info!(path = %path.display(), "loaded config");
    Ok(cfg)
}
