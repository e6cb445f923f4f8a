mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use app::DashboardApp;
use auto_market_dashboard::config::DashboardConfig;
use auto_market_dashboard::data::DataContext;
use clap::Parser;
use eframe::egui;

#[derive(Parser, Debug)]
#[command(name = "auto-market-dashboard")]
#[command(about = "Automotive market analytics over brand share, used and new car data", long_about = None)]
struct Args {
    /// JSON config file (data directory, file names, window size)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the CSV files; overrides the config file
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    // No partial dashboard: any missing table leaves only the error screen.
    let app = match DataContext::load(&config.sources()) {
        Ok(context) => DashboardApp::ready(context),
        Err(e) => {
            log::error!("Error loading data: {e}");
            DashboardApp::unavailable(format!("Error loading data: {e}"))
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Automotive Market Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("running the dashboard: {e}"))
}
