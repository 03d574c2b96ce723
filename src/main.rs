//! Salescope - Interactive Sales Performance Dashboard
//!
//! Filters the sales table by region, category and order date and redraws
//! every aggregate view on each change.

use anyhow::Context;
use eframe::egui;
use salescope::gui::DashboardApp;
use salescope::{logging, settings};

fn main() -> anyhow::Result<()> {
    let settings = settings::load_settings().context("failed to load settings")?;
    logging::init(&settings.logging)?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Salescope"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Salescope",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard exited with an error: {e}"))
}
