//! Salescope Dashboard Application
//! Main window with the filter panel and the report view.

use crate::data::{DataLoader, FilterOptions, Table};
use crate::gui::{FilterPanel, FilterPanelAction, ReportView};
use crate::settings::Settings;
use crate::stats::SalesReport;
use egui::{Color32, RichText, SidePanel};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info};

/// Dataset loading result from background thread
enum LoadResult {
    Complete { table: Table, path: PathBuf },
    Error { message: String, path: PathBuf },
}

/// Main application window.
pub struct DashboardApp {
    settings: Settings,
    filter_panel: FilterPanel,
    table: Option<Table>,
    /// Every category of the loaded table, for stable scatter colours.
    categories: Vec<String>,
    report: Option<SalesReport>,
    load_error: Option<String>,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let path = settings.data.path.clone();
        let mut app = Self {
            settings,
            filter_panel: FilterPanel::new(),
            table: None,
            categories: Vec::new(),
            report: None,
            load_error: None,
            load_rx: None,
            is_loading: false,
        };
        app.start_loading(path);
        app
    }

    /// Load the dataset at `path` on a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        if self.is_loading {
            return; // Already loading
        }

        self.filter_panel.data_path = Some(path.clone());
        self.filter_panel
            .set_status(&format!("Loading {}...", path.display()));
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let loader = DataLoader::from_settings(&self.settings.data);

        thread::spawn(move || {
            let result = match loader.load_table(&path) {
                Ok(table) => LoadResult::Complete { table, path },
                Err(e) => LoadResult::Error {
                    message: e.to_string(),
                    path,
                },
            };
            let _ = tx.send(result);
        });
    }

    /// Check for dataset loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { table, path }) => {
                info!(path = %path.display(), rows = table.len(), "dashboard dataset ready");
                self.filter_panel
                    .set_status(&format!("Loaded {} rows", table.len()));
                self.filter_panel
                    .set_options(FilterOptions::from_table(&table));
                self.categories = table.categories();
                self.table = Some(table);
                self.load_error = None;
                self.is_loading = false;
                self.recompute();
            }
            Ok(LoadResult::Error { message, path }) => {
                error!(path = %path.display(), error = %message, "failed to load dataset");
                self.filter_panel.set_status(&format!("Error: {}", message));
                self.table = None;
                self.report = None;
                self.load_error = Some(message);
                self.is_loading = false;
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.is_loading = false;
            }
        }
    }

    /// Re-run filter + aggregation from the in-memory table.
    fn recompute(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let filtered = self.filter_panel.criteria().apply(table);
        self.report = Some(SalesReport::build(&filtered, self.settings.report.top_n));
        self.filter_panel.set_status(&format!(
            "Showing {} of {} rows",
            filtered.len(),
            table.len()
        ));
    }

    fn handle_open_dataset(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Filters
        SidePanel::left("filter_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let enabled = self.table.is_some() && !self.is_loading;
                    match self.filter_panel.show(ui, enabled) {
                        FilterPanelAction::OpenDataset => self.handle_open_dataset(),
                        FilterPanelAction::FiltersChanged => self.recompute(),
                        FilterPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &self.load_error {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("⚠ Could not load dataset\n\n{}", message))
                            .size(16.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                });
            } else if let Some(report) = &self.report {
                ReportView::show(ui, report, &self.categories);
            } else {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
        });
    }
}
