//! Batch sales report.
//!
//! Loads the configured dataset, prints every aggregate view to stdout and
//! writes the charts as PNG files. Takes no arguments; see `salescope.toml`.

use anyhow::Context;
use salescope::charts::StaticChartRenderer;
use salescope::data::DataLoader;
use salescope::logging;
use salescope::report::{render_text, write_json_summary};
use salescope::settings::{self, Settings};
use salescope::stats::SalesReport;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

fn main() -> ExitCode {
    let settings = match settings::load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(&settings.logging) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> anyhow::Result<()> {
    let path = &settings.data.path;
    let table = DataLoader::from_settings(&settings.data)
        .load_table(path)
        .with_context(|| format!("could not load sales data from {}", path.display()))?;

    let report = SalesReport::build(&table, settings.report.top_n);
    print!("{}", render_text(&report));

    let charts = write_charts(settings, &report)?;

    if let Some(summary) = &settings.report.summary_json {
        write_json_summary(&report, summary)
            .with_context(|| format!("could not write JSON summary to {}", summary.display()))?;
        info!(path = %summary.display(), "wrote JSON summary");
    }

    if settings.report.open_charts {
        for chart in &charts {
            if let Err(e) = open::that(chart) {
                warn!(path = %chart.display(), error = %e, "could not open chart");
            }
        }
    }

    Ok(())
}

fn write_charts(settings: &Settings, report: &SalesReport) -> anyhow::Result<Vec<PathBuf>> {
    let dir = &settings.report.chart_dir;
    fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;

    let renderer = StaticChartRenderer::new(settings.report.chart_width, settings.report.chart_height);

    let region = dir.join("region_sales.png");
    renderer.render_region_sales(&report.region_sales, &region)?;

    let category = dir.join("category_performance.png");
    renderer.render_category_performance(&report.category_performance, &category)?;

    let monthly = dir.join("monthly_trend.png");
    renderer.render_monthly_trend(&report.monthly_trend, &monthly)?;

    let charts = vec![region, category, monthly];
    for chart in &charts {
        info!(path = %chart.display(), "wrote chart");
    }
    Ok(charts)
}
